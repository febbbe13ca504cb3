use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_match::{JobMatch, JobMatchPatch, NewJobMatch};
use crate::store::Page;
use crate::tenant::TenantSession;

/// Creating a match resolves the job and candidate under the bound tenant
/// first; the unique (job, candidate) pair makes a second application for
/// the same job a validation error.
pub async fn create(session: &mut TenantSession, input: NewJobMatch) -> Result<JobMatch, AppError> {
    input.validate()?;
    let employer_id = session.employer_id();
    crate::store::jobs::get(session, input.job_id).await?;
    crate::store::candidates::get(session, input.candidate_id).await?;

    let job_match = sqlx::query_as::<_, JobMatch>(
        "INSERT INTO matches (id, employer_id, job_id, candidate_id, score, status) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(employer_id)
    .bind(input.job_id)
    .bind(input.candidate_id)
    .bind(input.score)
    .bind(&input.status)
    .fetch_one(session.conn())
    .await?;
    Ok(job_match)
}

pub async fn get(session: &mut TenantSession, id: Uuid) -> Result<JobMatch, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, JobMatch>("SELECT * FROM matches WHERE id = $1 AND employer_id = $2")
        .bind(id)
        .bind(employer_id)
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("match {id} not found")))
}

pub async fn list(session: &mut TenantSession, page: Page) -> Result<Vec<JobMatch>, AppError> {
    let page = page.normalize()?;
    let employer_id = session.employer_id();
    Ok(sqlx::query_as::<_, JobMatch>(
        "SELECT * FROM matches WHERE employer_id = $1 \
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
) -> Result<Vec<JobMatch>, AppError> {
    let employer_id = session.employer_id();
    Ok(sqlx::query_as::<_, JobMatch>(
        "SELECT * FROM matches WHERE employer_id = $1 AND job_id = $2 \
         ORDER BY created_at DESC, id",
    )
    .bind(employer_id)
    .bind(job_id)
    .fetch_all(session.conn())
    .await?)
}

/// An application is the (job, candidate) pair.
pub async fn get_by_application(
    session: &mut TenantSession,
    job_id: Uuid,
    candidate_id: Uuid,
) -> Result<JobMatch, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, JobMatch>(
        "SELECT * FROM matches WHERE employer_id = $1 AND job_id = $2 AND candidate_id = $3",
    )
    .bind(employer_id)
    .bind(job_id)
    .bind(candidate_id)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| {
        AppError::NotFound(format!(
            "match for job {job_id} and candidate {candidate_id} not found"
        ))
    })
}

pub async fn update(
    session: &mut TenantSession,
    id: Uuid,
    patch: JobMatchPatch,
) -> Result<JobMatch, AppError> {
    patch.validate()?;
    if patch.is_empty() {
        return get(session, id).await;
    }
    let employer_id = session.employer_id();
    update_query(id, employer_id, patch)
        .build_query_as::<JobMatch>()
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("match {id} not found")))
}

pub async fn remove(session: &mut TenantSession, id: Uuid) -> Result<JobMatch, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, JobMatch>(
        "DELETE FROM matches WHERE id = $1 AND employer_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(employer_id)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("match {id} not found")))
}

fn update_query(id: Uuid, employer_id: Uuid, patch: JobMatchPatch) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE matches SET ");
    let mut set = qb.separated(", ");
    if let Some(score) = patch.score {
        set.push("score = ").push_bind_unseparated(score);
    }
    if let Some(status) = patch.status {
        set.push("status = ").push_bind_unseparated(status);
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
    fn test_update_query_status_only() {
        let patch = JobMatchPatch {
            status: Some("interviewing".to_string()),
            ..Default::default()
        };
        let qb = update_query(Uuid::new_v4(), Uuid::new_v4(), patch);
        let sql = qb.sql();
        assert!(sql.contains("status = "));
        assert!(!sql.contains("score = "));
    }
}
