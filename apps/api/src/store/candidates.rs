use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidatePatch, NewCandidate};
use crate::store::Page;
use crate::tenant::TenantSession;

pub async fn create(
    session: &mut TenantSession,
    input: NewCandidate,
) -> Result<Candidate, AppError> {
    input.validate()?;
    let employer_id = session.employer_id();
    let candidate = sqlx::query_as::<_, Candidate>(
        "INSERT INTO candidates (id, employer_id, email, full_name, phone, headline) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(employer_id)
    .bind(&input.email)
    .bind(&input.full_name)
    .bind(&input.phone)
    .bind(&input.headline)
    .fetch_one(session.conn())
    .await?;
    Ok(candidate)
}

pub async fn get(session: &mut TenantSession, id: Uuid) -> Result<Candidate, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, Candidate>(
        "SELECT * FROM candidates WHERE id = $1 AND employer_id = $2",
    )
    .bind(id)
    .bind(employer_id)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("candidate {id} not found")))
}

pub async fn list(session: &mut TenantSession, page: Page) -> Result<Vec<Candidate>, AppError> {
    let page = page.normalize()?;
    let employer_id = session.employer_id();
    Ok(sqlx::query_as::<_, Candidate>(
        "SELECT * FROM candidates WHERE employer_id = $1 \
         ORDER BY created_at DESC, id OFFSET $2 LIMIT $3",
    )
    .bind(employer_id)
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(session.conn())
    .await?)
}

pub async fn get_by_email(
    session: &mut TenantSession,
    email: &str,
) -> Result<Candidate, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, Candidate>(
        "SELECT * FROM candidates WHERE employer_id = $1 AND email = $2",
    )
    .bind(employer_id)
    .bind(email)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("candidate with email {email} not found")))
}

/// Exclude-unset merge: only fields present in the patch reach the SET
/// list; an empty patch is a no-op returning the current row.
pub async fn update(
    session: &mut TenantSession,
    id: Uuid,
    patch: CandidatePatch,
) -> Result<Candidate, AppError> {
    patch.validate()?;
    if patch.is_empty() {
        return get(session, id).await;
    }
    let employer_id = session.employer_id();
    update_query(id, employer_id, patch)
        .build_query_as::<Candidate>()
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("candidate {id} not found")))
}

pub async fn remove(session: &mut TenantSession, id: Uuid) -> Result<Candidate, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, Candidate>(
        "DELETE FROM candidates WHERE id = $1 AND employer_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(employer_id)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("candidate {id} not found")))
}

fn update_query(
    id: Uuid,
    employer_id: Uuid,
    patch: CandidatePatch,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE candidates SET ");
    let mut set = qb.separated(", ");
    if let Some(email) = patch.email {
        set.push("email = ").push_bind_unseparated(email);
    }
    if let Some(full_name) = patch.full_name {
        set.push("full_name = ").push_bind_unseparated(full_name);
    }
    if let Some(phone) = patch.phone {
        set.push("phone = ").push_bind_unseparated(phone);
    }
    if let Some(headline) = patch.headline {
        set.push("headline = ").push_bind_unseparated(headline);
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
    fn test_update_query_contains_only_present_fields() {
        let patch = CandidatePatch {
            full_name: Some("Jane Doe".to_string()),
            phone: Some(None),
            ..Default::default()
        };
        let qb = update_query(Uuid::new_v4(), Uuid::new_v4(), patch);
        let sql = qb.sql();
        assert!(sql.contains("full_name = "));
        assert!(sql.contains("phone = "));
        assert!(!sql.contains("email"));
        assert!(!sql.contains("headline"));
        assert!(sql.contains("employer_id = "));
        assert!(sql.ends_with("RETURNING *"));
    }

    #[test]
    fn test_update_query_always_scopes_by_tenant() {
        let patch = CandidatePatch {
            email: Some("new@acme.test".to_string()),
            ..Default::default()
        };
        let sql_owner = update_query(Uuid::new_v4(), Uuid::new_v4(), patch).sql().to_string();
        assert!(sql_owner.contains("WHERE id = "));
        assert!(sql_owner.contains(" AND employer_id = "));
    }
}
