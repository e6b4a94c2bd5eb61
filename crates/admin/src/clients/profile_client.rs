//! Account profile sections and session management.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use common::{AppError, AppResult};
use domain::{
    PasswordChange, PersonalInfo, Preferences, ProfileForm, SecuritySettings, Session,
};

use super::api_client::{unwrap_envelope, ApiTransport};

const SESSIONS_PATH: &str = "/api/auth/sessions";

/// Client for `auth/profile/{id}/*` and `auth/sessions`.
pub struct ProfileClient {
    api: Arc<dyn ApiTransport>,
    user_id: i64,
    /// Session marker of this client, used to flag the current session
    session_id: Option<String>,
}

impl ProfileClient {
    pub fn new(api: Arc<dyn ApiTransport>, user_id: i64, session_id: Option<String>) -> Self {
        Self {
            api,
            user_id,
            session_id,
        }
    }

    fn section_path<F: ProfileForm>(&self) -> String {
        format!("/api/auth/profile/{}/{}", self.user_id, F::SECTION.as_str())
    }

    /// Validate a section form and send it. Invalid forms never hit the network.
    pub async fn update<F: ProfileForm>(&self, form: &F) -> AppResult<Value> {
        form.check().map_err(AppError::InvalidFields)?;

        let path = self.section_path::<F>();
        debug!("Updating profile section {}", F::SECTION.as_str());
        let response = self.api.put(&path, serde_json::to_value(form)?).await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn update_personal(&self, form: &PersonalInfo) -> AppResult<Value> {
        self.update(form).await
    }

    pub async fn change_password(&self, form: &PasswordChange) -> AppResult<()> {
        self.update(form).await?;
        info!("Password changed for user {}", self.user_id);
        Ok(())
    }

    pub async fn update_preferences(&self, form: &Preferences) -> AppResult<Value> {
        self.update(form).await
    }

    pub async fn update_security(&self, form: &SecuritySettings) -> AppResult<Value> {
        self.update(form).await
    }

    /// List sessions, flagging the one that belongs to this client.
    pub async fn list_sessions(&self) -> AppResult<Vec<Session>> {
        let value = unwrap_envelope(self.api.get(SESSIONS_PATH).await?);
        let mut sessions: Vec<Session> = serde_json::from_value(value)?;
        if let Some(current) = self.session_id.as_deref() {
            for session in &mut sessions {
                session.is_current = session.id == current;
            }
        }
        Ok(sessions)
    }

    /// Sign out one session. The current session cannot be terminated here.
    pub async fn terminate_session(&self, session_id: &str) -> AppResult<()> {
        if self.session_id.as_deref() == Some(session_id) {
            return Err(AppError::validation(
                "Use sign out to end the current session",
            ));
        }
        let path = format!("{}/{}", SESSIONS_PATH, session_id);
        match self.api.delete(&path).await {
            Ok(_) => Ok(()),
            // Already gone: nothing left to terminate
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Sign out every session except the current one.
    pub async fn terminate_other_sessions(&self) -> AppResult<()> {
        self.api.delete(SESSIONS_PATH).await?;
        info!("Terminated all other sessions for user {}", self.user_id);
        Ok(())
    }
}
