//! User entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{MIN_PASSWORD_LENGTH, ROLE_ADMIN, ROLE_USER};
use crate::entity::{Draft, DraftMode, Entity};
use crate::validation::{email_shape, not_blank, FieldErrors};

/// User roles enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::User => ROLE_USER,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case(ROLE_ADMIN) {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User as listed by `GET /api/users`. The password never comes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// User create/edit payload.
///
/// `password` is write-only: empty means "unchanged" when editing and is
/// omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(custom(function = "email_shape"))]
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(skip)]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl Draft<User> for UserDraft {
    fn from_entity(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            password: String::new(),
            confirm_password: String::new(),
        }
    }

    fn check(&self, mode: DraftMode) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::from_validation(self.validate());

        let length = self.password.chars().count() as u64;
        match mode {
            DraftMode::Create if self.password.is_empty() => {
                errors.add("password", "Password is required");
            }
            _ if !self.password.is_empty() && length < MIN_PASSWORD_LENGTH => {
                errors.add(
                    "password",
                    format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
                );
            }
            _ => {}
        }

        errors.into_result()
    }
}
