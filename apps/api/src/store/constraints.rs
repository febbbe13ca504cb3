use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::constraint::{ConstraintPatch, JobFormKeyConstraint, NewJobFormKeyConstraint};
use crate::store::Page;
use crate::tenant::TenantSession;

/// Creating a constraint resolves both referenced rows under the bound
/// tenant first, so a foreign job or form key reads as NotFound instead of
/// leaking through an FK error.
pub async fn create(
    session: &mut TenantSession,
    input: NewJobFormKeyConstraint,
) -> Result<JobFormKeyConstraint, AppError> {
    let employer_id = session.employer_id();
    crate::store::jobs::get(session, input.job_id).await?;
    crate::store::form_keys::get(session, input.form_key_id).await?;

    let constraint = sqlx::query_as::<_, JobFormKeyConstraint>(
        "INSERT INTO job_form_key_constraints \
         (id, employer_id, job_id, form_key_id, required, expected_value) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(employer_id)
    .bind(input.job_id)
    .bind(input.form_key_id)
    .bind(input.required)
    .bind(&input.expected_value)
    .fetch_one(session.conn())
    .await?;
    Ok(constraint)
}

pub async fn get(
    session: &mut TenantSession,
    id: Uuid,
) -> Result<JobFormKeyConstraint, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, JobFormKeyConstraint>(
        "SELECT * FROM job_form_key_constraints WHERE id = $1 AND employer_id = $2",
    )
    .bind(id)
    .bind(employer_id)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("constraint {id} not found")))
}

pub async fn list(
    session: &mut TenantSession,
    page: Page,
) -> Result<Vec<JobFormKeyConstraint>, AppError> {
    let page = page.normalize()?;
    let employer_id = session.employer_id();
    Ok(sqlx::query_as::<_, JobFormKeyConstraint>(
        "SELECT * FROM job_form_key_constraints WHERE employer_id = $1 \
         ORDER BY created_at DESC, id OFFSET $2 LIMIT $3",
    )
    .bind(employer_id)
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(session.conn())
    .await?)
}

pub async fn list_by_job(
    session: &mut TenantSession,
    job_id: Uuid,
) -> Result<Vec<JobFormKeyConstraint>, AppError> {
    let employer_id = session.employer_id();
    Ok(sqlx::query_as::<_, JobFormKeyConstraint>(
        "SELECT * FROM job_form_key_constraints \
         WHERE employer_id = $1 AND job_id = $2 ORDER BY created_at, id",
    )
    .bind(employer_id)
    .bind(job_id)
    .fetch_all(session.conn())
    .await?)
}

pub async fn update(
    session: &mut TenantSession,
    id: Uuid,
    patch: ConstraintPatch,
) -> Result<JobFormKeyConstraint, AppError> {
    patch.validate()?;
    if patch.is_empty() {
        return get(session, id).await;
    }
    let employer_id = session.employer_id();
    update_query(id, employer_id, patch)
        .build_query_as::<JobFormKeyConstraint>()
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("constraint {id} not found")))
}

pub async fn remove(
    session: &mut TenantSession,
    id: Uuid,
) -> Result<JobFormKeyConstraint, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, JobFormKeyConstraint>(
        "DELETE FROM job_form_key_constraints WHERE id = $1 AND employer_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(employer_id)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("constraint {id} not found")))
}

fn update_query(
    id: Uuid,
    employer_id: Uuid,
    patch: ConstraintPatch,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE job_form_key_constraints SET ");
    let mut set = qb.separated(", ");
    if let Some(required) = patch.required {
        set.push("required = ").push_bind_unseparated(required);
    }
    if let Some(expected_value) = patch.expected_value {
        set.push("expected_value = ").push_bind_unseparated(expected_value);
    }
    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb.push(" AND employer_id = ");
    qb.push_bind(employer_id);
    qb.push(" RETURNING *");
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_query_clears_expected_value() {
        let patch = ConstraintPatch {
            expected_value: Some(None),
            ..Default::default()
        };
        let qb = update_query(Uuid::new_v4(), Uuid::new_v4(), patch);
        let sql = qb.sql();
        assert!(sql.contains("expected_value = "));
        assert!(!sql.contains("required = "));
    }
}
