use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Tenant;
use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidatePatch, NewCandidate};
use crate::state::AppState;
use crate::store::{self, Page};
use crate::tenant::TenantSession;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_candidates).post(create_candidate))
        .route("/by-email", get(get_candidate_by_email))
        .route(
            "/:id",
            get(get_candidate)
                .patch(update_candidate)
                .delete(delete_candidate),
        )
}

/// POST /candidates
pub async fn create_candidate(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Json(input): Json<NewCandidate>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    let candidate = store::candidates::create(&mut session, input).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

/// GET /candidates/:id
pub async fn get_candidate(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::candidates::get(&mut session, id).await?))
}

/// GET /candidates?skip=&limit=
pub async fn list_candidates(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let page = page.normalize()?;
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::candidates::list(&mut session, page).await?))
}

#[derive(Debug, Deserialize)]
pub struct EmailParams {
    pub email: String,
}

/// GET /candidates/by-email?email=
pub async fn get_candidate_by_email(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(params): Query<EmailParams>,
) -> Result<Json<Candidate>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(
        store::candidates::get_by_email(&mut session, &params.email).await?,
    ))
}

/// PATCH /candidates/:id
/// Exclude-unset: absent fields stay untouched, explicit nulls clear.
pub async fn update_candidate(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
    Json(patch): Json<CandidatePatch>,
) -> Result<Json<Candidate>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::candidates::update(&mut session, id, patch).await?))
}

/// DELETE /candidates/:id
pub async fn delete_candidate(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::candidates::remove(&mut session, id).await?))
}
