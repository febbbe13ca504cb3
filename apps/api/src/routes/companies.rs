//! Company endpoints, including unauthenticated tenant onboarding.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Tenant;
use crate::errors::AppError;
use crate::models::company::{Company, CompanyPatch, NewCompany};
use crate::state::AppState;
use crate::store::{self, Page};
use crate::tenant::TenantSession;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies).post(onboard_company))
        .route("/by-name", get(get_company_by_name))
        .route(
            "/:id",
            get(get_company).patch(update_company).delete(delete_company),
        )
        .route("/:id/recruiters", get(get_company_recruiters))
}

/// POST /companies
/// Public onboarding: creates a tenant and returns it. The fresh company id
/// becomes the caller's employer scope once their token carries it.
pub async fn onboard_company(
    State(state): State<AppState>,
    Json(input): Json<NewCompany>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    let company = store::companies::onboard(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /companies/:id
pub async fn get_company(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::companies::get(&mut session, id).await?))
}

/// GET /companies?skip=&limit=
pub async fn list_companies(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Company>>, AppError> {
    let page = page.normalize()?;
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::companies::list(&mut session, page).await?))
}

#[derive(Debug, Deserialize)]
pub struct NameParams {
    pub name: String,
}

/// GET /companies/by-name?name=
pub async fn get_company_by_name(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(params): Query<NameParams>,
) -> Result<Json<Company>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(
        store::companies::get_by_name(&mut session, &params.name).await?,
    ))
}

/// PATCH /companies/:id
pub async fn update_company(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
    Json(patch): Json<CompanyPatch>,
) -> Result<Json<Company>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::companies::update(&mut session, id, patch).await?))
}

/// DELETE /companies/:id
/// Returns the removed row.
pub async fn delete_company(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::companies::remove(&mut session, id).await?))
}

/// GET /companies/:id/recruiters
/// The recruiters delegated to a target company, plus the target itself.
pub async fn get_company_recruiters(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Company>>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(
        store::companies::recruit_to_companies(&mut session, id).await?,
    ))
}
