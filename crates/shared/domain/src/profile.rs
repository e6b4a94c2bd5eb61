//! Account profile sections and login sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{email_shape, not_blank, FieldErrors};

/// Profile sub-resources under `auth/profile/{id}/{section}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSection {
    Personal,
    Password,
    Preferences,
    Security,
}

impl ProfileSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileSection::Personal => "personal",
            ProfileSection::Password => "password",
            ProfileSection::Preferences => "preferences",
            ProfileSection::Security => "security",
        }
    }
}

/// A profile form that can be validated before it is sent.
pub trait ProfileForm: Serialize + Send + Sync {
    const SECTION: ProfileSection;

    fn check(&self) -> Result<(), FieldErrors>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(custom(function = "email_shape"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub bio: String,
}

impl ProfileForm for PersonalInfo {
    const SECTION: ProfileSection = ProfileSection::Personal;

    fn check(&self) -> Result<(), FieldErrors> {
        FieldErrors::from_validation(self.validate()).into_result()
    }
}

#[derive(Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[validate(custom(function = "not_blank", message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

// Passwords never show up in logs.
impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange")
            .field("current_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

impl ProfileForm for PasswordChange {
    const SECTION: ProfileSection = ProfileSection::Password;

    fn check(&self) -> Result<(), FieldErrors> {
        FieldErrors::from_validation(self.validate()).into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub language: String,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub newsletter: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            email_notifications: true,
            push_notifications: false,
            newsletter: false,
        }
    }
}

impl ProfileForm for Preferences {
    const SECTION: ProfileSection = ProfileSection::Preferences;

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.language.trim().is_empty() {
            errors.add("language", "Language is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    pub two_factor_enabled: bool,
    pub login_alerts: bool,
}

impl ProfileForm for SecuritySettings {
    const SECTION: ProfileSection = ProfileSection::Security;

    fn check(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}

/// A signed-in browser/device session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub location: String,
    pub last_active: DateTime<Utc>,
    /// Set client-side by comparing with the locally stored session marker
    #[serde(default)]
    pub is_current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_mismatch_is_field_scoped() {
        let form = PasswordChange {
            current_password: "old-secret".to_string(),
            new_password: "Abc12345".to_string(),
            confirm_password: "Abc1234".to_string(),
        };
        let errors = form.check().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
    }

    #[test]
    fn test_short_new_password() {
        let form = PasswordChange {
            current_password: "old-secret".to_string(),
            new_password: "abc".to_string(),
            confirm_password: "abc".to_string(),
        };
        let errors = form.check().unwrap_err();
        assert!(errors.contains("newPassword"));
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let form = PasswordChange {
            current_password: "hunter22".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", form).contains("hunter22"));
    }

    #[test]
    fn test_personal_info_requires_valid_email() {
        let form = PersonalInfo {
            name: "Ana".to_string(),
            email: "not-an-email".to_string(),
            ..Default::default()
        };
        assert!(form.check().unwrap_err().contains("email"));
    }

    #[test]
    fn test_section_paths() {
        assert_eq!(PasswordChange::SECTION.as_str(), "password");
        assert_eq!(Preferences::SECTION.as_str(), "preferences");
    }
}
