use uuid::Uuid;

use crate::errors::AppError;
use crate::models::link::{LinkPatch, NewRecruiterCompanyLink, RecruiterCompanyLink};
use crate::store::Page;
use crate::tenant::TenantSession;

/// Delegation is granted by the data owner: only the target employer may
/// create a link that names it as target. The unique (recruiter, target)
/// pair surfaces a duplicate grant as a validation error.
pub async fn create(
    session: &mut TenantSession,
    input: NewRecruiterCompanyLink,
) -> Result<RecruiterCompanyLink, AppError> {
    input.validate()?;
    if input.target_employer_id != session.employer_id() {
        return Err(AppError::Validation(
            "a recruiting link can only be granted by the target employer".into(),
        ));
    }
    let link = sqlx::query_as::<_, RecruiterCompanyLink>(
        "INSERT INTO recruiter_company_links (id, recruiter_id, target_employer_id) \
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(input.recruiter_id)
    .bind(input.target_employer_id)
    .fetch_one(session.conn())
    .await?;
    Ok(link)
}

/// Either endpoint of a link may read it.
pub async fn get(session: &mut TenantSession, id: Uuid) -> Result<RecruiterCompanyLink, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, RecruiterCompanyLink>(
        "SELECT * FROM recruiter_company_links \
         WHERE id = $1 AND (recruiter_id = $2 OR target_employer_id = $2)",
    )
    .bind(id)
    .bind(employer_id)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("recruiter link {id} not found")))
}

pub async fn list(
    session: &mut TenantSession,
    page: Page,
) -> Result<Vec<RecruiterCompanyLink>, AppError> {
    let page = page.normalize()?;
    let employer_id = session.employer_id();
    Ok(sqlx::query_as::<_, RecruiterCompanyLink>(
        "SELECT * FROM recruiter_company_links \
         WHERE recruiter_id = $1 OR target_employer_id = $1 \
         ORDER BY created_at DESC, id OFFSET $2 LIMIT $3",
    )
    .bind(employer_id)
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(session.conn())
    .await?)
}

/// Re-points an existing grant at a different recruiter. Grantor-only, like
/// create; the new recruiter must not be the target itself.
pub async fn update(
    session: &mut TenantSession,
    id: Uuid,
    patch: LinkPatch,
) -> Result<RecruiterCompanyLink, AppError> {
    let employer_id = session.employer_id();
    let Some(recruiter_id) = patch.recruiter_id else {
        return get(session, id).await;
    };
    if recruiter_id == employer_id {
        return Err(AppError::Validation(
            "a company cannot recruit for itself".into(),
        ));
    }
    sqlx::query_as::<_, RecruiterCompanyLink>(
        "UPDATE recruiter_company_links SET recruiter_id = $3 \
         WHERE id = $1 AND target_employer_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(employer_id)
    .bind(recruiter_id)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("recruiter link {id} not found")))
}

/// Either endpoint may sever the link.
pub async fn remove(
    session: &mut TenantSession,
    id: Uuid,
) -> Result<RecruiterCompanyLink, AppError> {
    let employer_id = session.employer_id();
    sqlx::query_as::<_, RecruiterCompanyLink>(
        "DELETE FROM recruiter_company_links \
         WHERE id = $1 AND (recruiter_id = $2 OR target_employer_id = $2) RETURNING *",
    )
    .bind(id)
    .bind(employer_id)
    .fetch_optional(session.conn())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("recruiter link {id} not found")))
}
