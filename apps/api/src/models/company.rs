use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// A tenant. Every scoped row in the schema hangs off one of these, and a
/// company's own id doubles as its employer scope.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewCompany {
    pub name: String,
}

impl NewCompany {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("company name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CompanyPatch {
    pub name: Option<String>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("company name must not be empty".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_company_rejects_blank_name() {
        let input = NewCompany {
            name: "   ".to_string(),
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_patch_empty_detection() {
        assert!(CompanyPatch::default().is_empty());
        let patch = CompanyPatch {
            name: Some("Acme".to_string()),
        };
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());
    }
}
