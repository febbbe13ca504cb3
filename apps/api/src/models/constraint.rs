use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::double_option;

/// Attaches a form key to a job, optionally requiring it or pinning an
/// expected value. Lives and dies with its form key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobFormKeyConstraint {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub job_id: Uuid,
    pub form_key_id: Uuid,
    pub required: bool,
    pub expected_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewJobFormKeyConstraint {
    pub job_id: Uuid,
    pub form_key_id: Uuid,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub expected_value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConstraintPatch {
    pub required: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub expected_value: Option<Option<String>>,
}

impl ConstraintPatch {
    pub fn is_empty(&self) -> bool {
        self.required.is_none() && self.expected_value.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_defaults_to_false() {
        let input: NewJobFormKeyConstraint = serde_json::from_str(&format!(
            r#"{{"job_id": "{}", "form_key_id": "{}"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        ))
        .unwrap();
        assert!(!input.required);
        assert_eq!(input.expected_value, None);
    }

    #[test]
    fn test_patch_clears_expected_value_with_null() {
        let patch: ConstraintPatch = serde_json::from_str(r#"{"expected_value": null}"#).unwrap();
        assert_eq!(patch.expected_value, Some(None));
        assert!(!patch.is_empty());
    }
}
