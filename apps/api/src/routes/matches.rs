use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Tenant;
use crate::errors::AppError;
use crate::models::job_match::{JobMatch, JobMatchPatch, NewJobMatch};
use crate::state::AppState;
use crate::store::{self, Page};
use crate::tenant::TenantSession;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_matches).post(create_match))
        .route("/by-job/:job_id", get(list_matches_by_job))
        .route("/by-application", get(get_match_by_application))
        .route(
            "/:id",
            get(get_match).patch(update_match).delete(delete_match),
        )
}

/// POST /matches
pub async fn create_match(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Json(input): Json<NewJobMatch>,
) -> Result<(StatusCode, Json<JobMatch>), AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    let job_match = store::matches::create(&mut session, input).await?;
    Ok((StatusCode::CREATED, Json(job_match)))
}

/// GET /matches/:id
pub async fn get_match(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<JobMatch>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::matches::get(&mut session, id).await?))
}

/// GET /matches?skip=&limit=
pub async fn list_matches(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(page): Query<Page>,
) -> Result<Json<Vec<JobMatch>>, AppError> {
    let page = page.normalize()?;
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::matches::list(&mut session, page).await?))
}

/// GET /matches/by-job/:job_id
pub async fn list_matches_by_job(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<JobMatch>>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::matches::list_by_job(&mut session, job_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ApplicationParams {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
}

/// GET /matches/by-application?job_id=&candidate_id=
/// An application is identified by its (job, candidate) pair.
pub async fn get_match_by_application(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(params): Query<ApplicationParams>,
) -> Result<Json<JobMatch>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(
        store::matches::get_by_application(&mut session, params.job_id, params.candidate_id)
            .await?,
    ))
}

/// PATCH /matches/:id
pub async fn update_match(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
    Json(patch): Json<JobMatchPatch>,
) -> Result<Json<JobMatch>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::matches::update(&mut session, id, patch).await?))
}

/// DELETE /matches/:id
pub async fn delete_match(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<JobMatch>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::matches::remove(&mut session, id).await?))
}
