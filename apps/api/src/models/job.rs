use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::double_option;

/// An open position. Readable by the owning employer and by recruiters the
/// employer has delegated to; writable only by the owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "open".to_string()
}

impl NewJob {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".into()));
        }
        validate_status(&self.status)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    pub status: Option<String>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("title must not be empty".into()));
            }
        }
        if let Some(status) = &self.status {
            validate_status(status)?;
        }
        Ok(())
    }
}

const JOB_STATUSES: &[&str] = &["open", "paused", "closed"];

fn validate_status(status: &str) -> Result<(), AppError> {
    if !JOB_STATUSES.contains(&status) {
        return Err(AppError::Validation(format!(
            "unknown job status '{status}' (expected one of: {})",
            JOB_STATUSES.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_open() {
        let input: NewJob = serde_json::from_str(r#"{"title": "Backend Engineer"}"#).unwrap();
        assert_eq!(input.status, "open");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let patch = JobPatch {
            status: Some("archived".to_string()),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_patch_clears_location_with_null() {
        let patch: JobPatch = serde_json::from_str(r#"{"location": null}"#).unwrap();
        assert_eq!(patch.location, Some(None));
        assert_eq!(patch.description, None);
    }
}
