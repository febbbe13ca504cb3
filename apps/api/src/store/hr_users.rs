use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::hr_user::{HrUser, HrUserPatch, NewHrUser};
use crate::store::Page;
use crate::tenant::TenantSession;

pub async fn create(session: &mut TenantSession, input: NewHrUser) -> Result<HrUser, AppError> {
    input.validate()?;
    let employer_id = session.employer_id();
    let user = sqlx::query_as::<_, HrUser>(
        "INSERT INTO hr_users (id, employer_id, email, full_name, role) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(employer_id)
    .bind(&input.email)
    .bind(&input.full_name)
    .bind(&input.role)
    .fetch_one(session.conn())
    .await?;
    Ok(user)
}

pub async fn get(session: &mut TenantSession, id: Uuid) -> Result<HrUser, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, HrUser>("SELECT * FROM hr_users WHERE id = $1 AND employer_id = $2")
        .bind(id)
        .bind(employer_id)
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("hr user {id} not found")))
}

pub async fn list(session: &mut TenantSession, page: Page) -> Result<Vec<HrUser>, AppError> {
    let page = page.normalize()?;
    let employer_id = session.employer_id();
    Ok(sqlx::query_as::<_, HrUser>(
        "SELECT * FROM hr_users WHERE employer_id = $1 \
         ORDER BY created_at DESC, id OFFSET $2 LIMIT $3",
    )
    .bind(employer_id)
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(session.conn())
    .await?)
}

pub async fn get_by_email(session: &mut TenantSession, email: &str) -> Result<HrUser, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, HrUser>("SELECT * FROM hr_users WHERE employer_id = $1 AND email = $2")
        .bind(employer_id)
        .bind(email)
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("hr user with email {email} not found")))
}

pub async fn update(
    session: &mut TenantSession,
    id: Uuid,
    patch: HrUserPatch,
) -> Result<HrUser, AppError> {
    patch.validate()?;
    if patch.is_empty() {
        return get(session, id).await;
    }
    let employer_id = session.employer_id();
    update_query(id, employer_id, patch)
        .build_query_as::<HrUser>()
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("hr user {id} not found")))
}

pub async fn remove(session: &mut TenantSession, id: Uuid) -> Result<HrUser, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, HrUser>(
        "DELETE FROM hr_users WHERE id = $1 AND employer_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(employer_id)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("hr user {id} not found")))
}

fn update_query(id: Uuid, employer_id: Uuid, patch: HrUserPatch) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE hr_users SET ");
    let mut set = qb.separated(", ");
    if let Some(email) = patch.email {
        set.push("email = ").push_bind_unseparated(email);
    }
    if let Some(full_name) = patch.full_name {
        set.push("full_name = ").push_bind_unseparated(full_name);
    }
    if let Some(role) = patch.role {
        set.push("role = ").push_bind_unseparated(role);
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
    fn test_update_query_skips_absent_fields() {
        let patch = HrUserPatch {
            role: Some("admin".to_string()),
            ..Default::default()
        };
        let qb = update_query(Uuid::new_v4(), Uuid::new_v4(), patch);
        let sql = qb.sql();
        assert!(sql.contains("role = "));
        assert!(!sql.contains("email"));
        assert!(!sql.contains("full_name"));
    }
}
