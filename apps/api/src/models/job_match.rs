use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::double_option;

/// A candidate considered for a job. One application per (job, candidate)
/// pair; the pair is the lookup key for application queries.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobMatch {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub score: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewJobMatch {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "pending".to_string()
}

impl NewJobMatch {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(score) = self.score {
            validate_score(score)?;
        }
        validate_status(&self.status)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobMatchPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub score: Option<Option<f64>>,
    pub status: Option<String>,
}

impl JobMatchPatch {
    pub fn is_empty(&self) -> bool {
        self.score.is_none() && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(Some(score)) = self.score {
            validate_score(score)?;
        }
        if let Some(status) = &self.status {
            validate_status(status)?;
        }
        Ok(())
    }
}

const MATCH_STATUSES: &[&str] = &["pending", "screening", "interviewing", "offered", "rejected"];

fn validate_status(status: &str) -> Result<(), AppError> {
    if !MATCH_STATUSES.contains(&status) {
        return Err(AppError::Validation(format!(
            "unknown match status '{status}' (expected one of: {})",
            MATCH_STATUSES.join(", ")
        )));
    }
    Ok(())
}

fn validate_score(score: f64) -> Result<(), AppError> {
    if !(0.0..=1.0).contains(&score) {
        return Err(AppError::Validation(format!(
            "score must be between 0.0 and 1.0, got {score}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_out_of_range_rejected() {
        let input = NewJobMatch {
            job_id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            score: Some(1.5),
            status: default_status(),
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_patch_clears_score_with_null() {
        let patch: JobMatchPatch = serde_json::from_str(r#"{"score": null}"#).unwrap();
        assert_eq!(patch.score, Some(None));
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let patch = JobMatchPatch {
            status: Some("ghosted".to_string()),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(AppError::Validation(_))));
    }
}
