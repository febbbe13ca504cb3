use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{Job, JobPatch, NewJob};
use crate::store::Page;
use crate::tenant::TenantSession;

pub async fn create(session: &mut TenantSession, input: NewJob) -> Result<Job, AppError> {
    input.validate()?;
    let employer_id = session.employer_id();
    let job = sqlx::query_as::<_, Job>(
        "INSERT INTO jobs (id, employer_id, title, description, location, status) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(employer_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.location)
    .bind(&input.status)
    .fetch_one(session.conn())
    .await?;
    Ok(job)
}

pub async fn get(session: &mut TenantSession, id: Uuid) -> Result<Job, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1 AND employer_id = $2")
        .bind(id)
        .bind(employer_id)
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))
}

pub async fn list(session: &mut TenantSession, page: Page) -> Result<Vec<Job>, AppError> {
    let page = page.normalize()?;
    let employer_id = session.employer_id();
    Ok(sqlx::query_as::<_, Job>(
        "SELECT * FROM jobs WHERE employer_id = $1 \
         ORDER BY created_at DESC, id OFFSET $2 LIMIT $3",
    )
    .bind(employer_id)
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(session.conn())
    .await?)
}

/// Jobs across every employer the bound tenant may read: its own plus the
/// targets of its outgoing recruiter links. Reads only; the widened set
/// never applies to writes.
pub async fn list_delegated(session: &mut TenantSession, page: Page) -> Result<Vec<Job>, AppError> {
    let page = page.normalize()?;
    let visible = session.visible_employers().await?;
    Ok(sqlx::query_as::<_, Job>(
        "SELECT * FROM jobs WHERE employer_id = ANY($1) \
         ORDER BY created_at DESC, id OFFSET $2 LIMIT $3",
    )
    .bind(visible)
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(session.conn())
    .await?)
}

pub async fn update(session: &mut TenantSession, id: Uuid, patch: JobPatch) -> Result<Job, AppError> {
    patch.validate()?;
    if patch.is_empty() {
        return get(session, id).await;
    }
    let employer_id = session.employer_id();
    update_query(id, employer_id, patch)
        .build_query_as::<Job>()
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))
}

pub async fn remove(session: &mut TenantSession, id: Uuid) -> Result<Job, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, Job>("DELETE FROM jobs WHERE id = $1 AND employer_id = $2 RETURNING *")
        .bind(id)
        .bind(employer_id)
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))
}

fn update_query(id: Uuid, employer_id: Uuid, patch: JobPatch) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE jobs SET ");
    let mut set = qb.separated(", ");
    if let Some(title) = patch.title {
        set.push("title = ").push_bind_unseparated(title);
    }
    if let Some(description) = patch.description {
        set.push("description = ").push_bind_unseparated(description);
    }
    if let Some(location) = patch.location {
        set.push("location = ").push_bind_unseparated(location);
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
    fn test_update_query_null_description_still_present() {
        // A null in the patch clears the column, so it must appear in SET.
        let patch = JobPatch {
            description: Some(None),
            ..Default::default()
        };
        let qb = update_query(Uuid::new_v4(), Uuid::new_v4(), patch);
        let sql = qb.sql();
        assert!(sql.contains("description = "));
        assert!(!sql.contains("title"));
        assert!(!sql.contains("location"));
        assert!(!sql.contains("status"));
    }
}
