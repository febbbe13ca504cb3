use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::company::{Company, CompanyPatch, NewCompany};
use crate::store::Page;
use crate::tenant::TenantSession;

/// Companies the bound employer may read: itself plus its link partners in
/// either direction. `$1` is always the bound employer id.
const VISIBLE_COMPANY_SQL: &str = "(c.id = $1 \
     OR EXISTS (SELECT 1 FROM recruiter_company_links l \
                WHERE l.recruiter_id = $1 AND l.target_employer_id = c.id) \
     OR EXISTS (SELECT 1 FROM recruiter_company_links l \
                WHERE l.target_employer_id = $1 AND l.recruiter_id = c.id))";

/// Creates a tenant. Runs outside any existing tenant scope, so the fresh
/// company id is bound first and the insert satisfies the same
/// binding-before-query contract as every other write.
pub async fn onboard(pool: &PgPool, input: NewCompany) -> Result<Company, AppError> {
    input.validate()?;
    let id = Uuid::new_v4();
    let mut session = TenantSession::bind(pool, id).await?;
    let company = sqlx::query_as::<_, Company>(
        "INSERT INTO companies (id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(id)
    .bind(&input.name)
    .fetch_one(session.conn())
    .await?;
    Ok(company)
}

pub async fn get(session: &mut TenantSession, id: Uuid) -> Result<Company, AppError> {
    let employer_id = session.employer_id();
    let sql = format!("SELECT c.* FROM companies c WHERE c.id = $2 AND {VISIBLE_COMPANY_SQL}");
    sqlx::query_as::<_, Company>(&sql)
        .bind(employer_id)
        .bind(id)
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("company {id} not found")))
}

pub async fn list(session: &mut TenantSession, page: Page) -> Result<Vec<Company>, AppError> {
    let page = page.normalize()?;
    let employer_id = session.employer_id();
    let sql = format!(
        "SELECT c.* FROM companies c WHERE {VISIBLE_COMPANY_SQL} \
         ORDER BY c.created_at DESC, c.id OFFSET $2 LIMIT $3"
    );
    Ok(sqlx::query_as::<_, Company>(&sql)
        .bind(employer_id)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(session.conn())
        .await?)
}

pub async fn get_by_name(session: &mut TenantSession, name: &str) -> Result<Company, AppError> {
    let employer_id = session.employer_id();
    let sql = format!("SELECT c.* FROM companies c WHERE c.name = $2 AND {VISIBLE_COMPANY_SQL}");
    sqlx::query_as::<_, Company>(&sql)
        .bind(employer_id)
        .bind(name)
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("company named '{name}' not found")))
}

/// Writes never cross tenants: only the bound employer's own row is
/// updatable, every other id resolves to NotFound.
pub async fn update(
    session: &mut TenantSession,
    id: Uuid,
    patch: CompanyPatch,
) -> Result<Company, AppError> {
    patch.validate()?;
    if id != session.employer_id() {
        return Err(AppError::NotFound(format!("company {id} not found")));
    }
    match patch.name {
        None => get(session, id).await,
        Some(name) => Ok(sqlx::query_as::<_, Company>(
            "UPDATE companies SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_one(session.conn())
        .await?),
    }
}

/// Deletes the bound employer's own row. Dependent rows block the delete
/// through FK RESTRICT, surfaced as a validation error.
pub async fn remove(session: &mut TenantSession, id: Uuid) -> Result<Company, AppError> {
    if id != session.employer_id() {
        return Err(AppError::NotFound(format!("company {id} not found")));
    }
    sqlx::query_as::<_, Company>("DELETE FROM companies WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("company {id} not found")))
}

/// Recruiter companies linked to `target`, unioned with the target itself,
/// deduplicated by company id and filtered to the caller's visible set.
/// NotFound when the target is not visible to the caller, so a foreign
/// company id is indistinguishable from an absent one.
pub async fn recruit_to_companies(
    session: &mut TenantSession,
    target: Uuid,
) -> Result<Vec<Company>, AppError> {
    let employer_id = session.employer_id();
    let sql = format!(
        "SELECT c.* FROM companies c \
         WHERE (c.id = $2 \
                OR EXISTS (SELECT 1 FROM recruiter_company_links l \
                           WHERE l.target_employer_id = $2 AND l.recruiter_id = c.id)) \
           AND {VISIBLE_COMPANY_SQL} \
         ORDER BY c.name, c.id"
    );
    let companies = sqlx::query_as::<_, Company>(&sql)
        .bind(employer_id)
        .bind(target)
        .fetch_all(session.conn())
        .await?;

    if !companies.iter().any(|c| c.id == target) {
        return Err(AppError::NotFound(format!("company {target} not found")));
    }
    Ok(companies)
}
