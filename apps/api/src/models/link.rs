use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// A delegation edge: the recruiter company gains read access to the target
/// employer's jobs, candidates and matches. Directed; one edge per
/// (recruiter, target) pair; never self-referential.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecruiterCompanyLink {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub target_employer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewRecruiterCompanyLink {
    pub recruiter_id: Uuid,
    pub target_employer_id: Uuid,
}

impl NewRecruiterCompanyLink {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.recruiter_id == self.target_employer_id {
            return Err(AppError::Validation(
                "a company cannot recruit for itself".into(),
            ));
        }
        Ok(())
    }
}

/// The only mutable attribute of a link is which recruiter it grants.
#[derive(Debug, Default, Deserialize)]
pub struct LinkPatch {
    pub recruiter_id: Option<Uuid>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.recruiter_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_link_rejected() {
        let id = Uuid::new_v4();
        let input = NewRecruiterCompanyLink {
            recruiter_id: id,
            target_employer_id: id,
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_distinct_endpoints_accepted() {
        let input = NewRecruiterCompanyLink {
            recruiter_id: Uuid::new_v4(),
            target_employer_id: Uuid::new_v4(),
        };
        assert!(input.validate().is_ok());
    }
}
