use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// A reusable application-form field definition (e.g. "years_of_experience").
/// Unique by key within its employer. Jobs attach these through
/// [`crate::models::constraint::JobFormKeyConstraint`] rows, which are
/// deleted together with their form key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FormKey {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub key: String,
    pub field_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewFormKey {
    pub key: String,
    #[serde(default = "default_field_type")]
    pub field_type: String,
}

fn default_field_type() -> String {
    "text".to_string()
}

impl NewFormKey {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.key.trim().is_empty() {
            return Err(AppError::Validation("key must not be empty".into()));
        }
        validate_field_type(&self.field_type)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FormKeyPatch {
    pub key: Option<String>,
    pub field_type: Option<String>,
}

impl FormKeyPatch {
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.field_type.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(key) = &self.key {
            if key.trim().is_empty() {
                return Err(AppError::Validation("key must not be empty".into()));
            }
        }
        if let Some(field_type) = &self.field_type {
            validate_field_type(field_type)?;
        }
        Ok(())
    }
}

const FIELD_TYPES: &[&str] = &["text", "number", "boolean", "date"];

fn validate_field_type(field_type: &str) -> Result<(), AppError> {
    if !FIELD_TYPES.contains(&field_type) {
        return Err(AppError::Validation(format!(
            "unknown field type '{field_type}' (expected one of: {})",
            FIELD_TYPES.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_defaults_to_text() {
        let input: NewFormKey = serde_json::from_str(r#"{"key": "notice_period"}"#).unwrap();
        assert_eq!(input.field_type, "text");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_unknown_field_type_rejected() {
        let input = NewFormKey {
            key: "salary".to_string(),
            field_type: "currency".to_string(),
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }
}
