//! Recruiter delegation endpoints. Creating a link is something the target
//! employer does to a recruiter, never the other way round.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::Tenant;
use crate::errors::AppError;
use crate::models::link::{LinkPatch, NewRecruiterCompanyLink, RecruiterCompanyLink};
use crate::state::AppState;
use crate::store::{self, Page};
use crate::tenant::TenantSession;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_links).post(create_link))
        .route("/:id", get(get_link).patch(update_link).delete(delete_link))
}

/// POST /recruiter-links
pub async fn create_link(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Json(input): Json<NewRecruiterCompanyLink>,
) -> Result<(StatusCode, Json<RecruiterCompanyLink>), AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    let link = store::links::create(&mut session, input).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// GET /recruiter-links/:id
pub async fn get_link(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<RecruiterCompanyLink>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::links::get(&mut session, id).await?))
}

/// GET /recruiter-links?skip=&limit=
/// Links where the caller is either endpoint.
pub async fn list_links(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(page): Query<Page>,
) -> Result<Json<Vec<RecruiterCompanyLink>>, AppError> {
    let page = page.normalize()?;
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::links::list(&mut session, page).await?))
}

/// PATCH /recruiter-links/:id
/// Re-points the grant at a different recruiter (grantor only).
pub async fn update_link(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
    Json(patch): Json<LinkPatch>,
) -> Result<Json<RecruiterCompanyLink>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::links::update(&mut session, id, patch).await?))
}

/// DELETE /recruiter-links/:id
/// Either endpoint may sever the link.
pub async fn delete_link(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<RecruiterCompanyLink>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::links::remove(&mut session, id).await?))
}
