use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::form_key::{FormKey, FormKeyPatch, NewFormKey};
use crate::store::Page;
use crate::tenant::TenantSession;

pub async fn create(session: &mut TenantSession, input: NewFormKey) -> Result<FormKey, AppError> {
    input.validate()?;
    let employer_id = session.employer_id();
    let form_key = sqlx::query_as::<_, FormKey>(
        "INSERT INTO form_keys (id, employer_id, key, field_type) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(employer_id)
    .bind(&input.key)
    .bind(&input.field_type)
    .fetch_one(session.conn())
    .await?;
    Ok(form_key)
}

pub async fn get(session: &mut TenantSession, id: Uuid) -> Result<FormKey, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, FormKey>("SELECT * FROM form_keys WHERE id = $1 AND employer_id = $2")
        .bind(id)
        .bind(employer_id)
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("form key {id} not found")))
}

pub async fn list(session: &mut TenantSession, page: Page) -> Result<Vec<FormKey>, AppError> {
    let page = page.normalize()?;
    let employer_id = session.employer_id();
    Ok(sqlx::query_as::<_, FormKey>(
        "SELECT * FROM form_keys WHERE employer_id = $1 \
         ORDER BY created_at DESC, id OFFSET $2 LIMIT $3",
    )
    .bind(employer_id)
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(session.conn())
    .await?)
}

pub async fn update(
    session: &mut TenantSession,
    id: Uuid,
    patch: FormKeyPatch,
) -> Result<FormKey, AppError> {
    patch.validate()?;
    if patch.is_empty() {
        return get(session, id).await;
    }
    let employer_id = session.employer_id();
    update_query(id, employer_id, patch)
        .build_query_as::<FormKey>()
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("form key {id} not found")))
}

/// Deletes a form key and its dependent constraints atomically. Dependents
/// go first inside one transaction; a missing parent rolls the whole
/// operation back, leaving both tables untouched.
pub async fn remove(session: &mut TenantSession, id: Uuid) -> Result<FormKey, AppError> {
    let employer_id = session.employer_id();
    let mut tx = session.begin().await?;

    sqlx::query("DELETE FROM job_form_key_constraints WHERE form_key_id = $1 AND employer_id = $2")
        .bind(id)
        .bind(employer_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query_as::<_, FormKey>(
        "DELETE FROM form_keys WHERE id = $1 AND employer_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(employer_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(form_key) = deleted else {
        tx.rollback().await?;
        return Err(AppError::NotFound(format!("form key {id} not found")));
    };

    tx.commit().await?;
    Ok(form_key)
}

fn update_query(
    id: Uuid,
    employer_id: Uuid,
    patch: FormKeyPatch,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE form_keys SET ");
    let mut set = qb.separated(", ");
    if let Some(key) = patch.key {
        set.push("key = ").push_bind_unseparated(key);
    }
    if let Some(field_type) = patch.field_type {
        set.push("field_type = ").push_bind_unseparated(field_type);
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
    fn test_update_query_single_field() {
        let patch = FormKeyPatch {
            field_type: Some("number".to_string()),
            ..Default::default()
        };
        let qb = update_query(Uuid::new_v4(), Uuid::new_v4(), patch);
        let sql = qb.sql();
        assert!(sql.contains("field_type = "));
        assert!(!sql.contains("key = "));
    }
}
