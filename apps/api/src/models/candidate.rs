use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::double_option;

/// A person an employer is hiring. Scoped to its owning employer; unique by
/// email within that employer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub headline: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewCandidate {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
}

impl NewCandidate {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        if self.full_name.trim().is_empty() {
            return Err(AppError::Validation("full_name must not be empty".into()));
        }
        Ok(())
    }
}

/// Partial update. Absent fields are left untouched; `phone` and `headline`
/// accept an explicit `null` to clear the column.
#[derive(Debug, Default, Deserialize)]
pub struct CandidatePatch {
    pub email: Option<String>,
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub headline: Option<Option<String>>,
}

impl CandidatePatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.full_name.is_none()
            && self.phone.is_none()
            && self.headline.is_none()
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
        Ok(())
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), AppError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(AppError::Validation(format!("invalid email: {email}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_candidate_requires_valid_email() {
        let input = NewCandidate {
            email: "not-an-email".to_string(),
            full_name: "Jane Doe".to_string(),
            phone: None,
            headline: None,
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let patch: CandidatePatch =
            serde_json::from_str(r#"{"full_name": "Jane", "phone": null}"#).unwrap();
        assert_eq!(patch.full_name.as_deref(), Some("Jane"));
        assert_eq!(patch.phone, Some(None));
        assert_eq!(patch.headline, None);
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_empty_patch() {
        let patch: CandidatePatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        assert!(patch.validate().is_ok());
    }
}
