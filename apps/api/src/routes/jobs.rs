use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::Tenant;
use crate::errors::AppError;
use crate::models::job::{Job, JobPatch, NewJob};
use crate::state::AppState;
use crate::store::{self, Page};
use crate::tenant::TenantSession;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/delegated", get(list_delegated_jobs))
        .route("/:id", get(get_job).patch(update_job).delete(delete_job))
}

/// POST /jobs
pub async fn create_job(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Json(input): Json<NewJob>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    let job = store::jobs::create(&mut session, input).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /jobs/:id
pub async fn get_job(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::jobs::get(&mut session, id).await?))
}

/// GET /jobs?skip=&limit=
pub async fn list_jobs(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Job>>, AppError> {
    let page = page.normalize()?;
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::jobs::list(&mut session, page).await?))
}

/// GET /jobs/delegated?skip=&limit=
/// Jobs across every company the caller recruits for, plus its own.
pub async fn list_delegated_jobs(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Job>>, AppError> {
    let page = page.normalize()?;
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::jobs::list_delegated(&mut session, page).await?))
}

/// PATCH /jobs/:id
pub async fn update_job(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<Job>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::jobs::update(&mut session, id, patch).await?))
}

/// DELETE /jobs/:id
pub async fn delete_job(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::jobs::remove(&mut session, id).await?))
}
