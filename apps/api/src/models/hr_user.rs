use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::validate_email;

/// A staff account belonging to one employer. Unique by email within that
/// employer; tokens carry an hr_user id as their subject.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HrUser {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewHrUser {
    pub email: String,
    pub full_name: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "member".to_string()
}

impl NewHrUser {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        if self.full_name.trim().is_empty() {
            return Err(AppError::Validation("full_name must not be empty".into()));
        }
        if self.role.trim().is_empty() {
            return Err(AppError::Validation("role must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HrUserPatch {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

impl HrUserPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.full_name.is_none() && self.role.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(full_name) = &self.full_name {
            if full_name.trim().is_empty() {
                return Err(AppError::Validation("full_name must not be empty".into()));
            }
        }
        if let Some(role) = &self.role {
            if role.trim().is_empty() {
                return Err(AppError::Validation("role must not be empty".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_member() {
        let input: NewHrUser =
            serde_json::from_str(r#"{"email": "hr@acme.test", "full_name": "Pat"}"#).unwrap();
        assert_eq!(input.role, "member");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_blank_role_rejected() {
        let patch = HrUserPatch {
            role: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(AppError::Validation(_))));
    }
}
