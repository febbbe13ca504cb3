use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::Tenant;
use crate::errors::AppError;
use crate::models::constraint::{ConstraintPatch, JobFormKeyConstraint, NewJobFormKeyConstraint};
use crate::state::AppState;
use crate::store::{self, Page};
use crate::tenant::TenantSession;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_constraints).post(create_constraint))
        .route("/by-job/:job_id", get(list_constraints_by_job))
        .route(
            "/:id",
            get(get_constraint)
                .patch(update_constraint)
                .delete(delete_constraint),
        )
}

/// POST /form-key-constraints
pub async fn create_constraint(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Json(input): Json<NewJobFormKeyConstraint>,
) -> Result<(StatusCode, Json<JobFormKeyConstraint>), AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    let constraint = store::constraints::create(&mut session, input).await?;
    Ok((StatusCode::CREATED, Json(constraint)))
}

/// GET /form-key-constraints/:id
pub async fn get_constraint(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<JobFormKeyConstraint>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::constraints::get(&mut session, id).await?))
}

/// GET /form-key-constraints?skip=&limit=
pub async fn list_constraints(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(page): Query<Page>,
) -> Result<Json<Vec<JobFormKeyConstraint>>, AppError> {
    let page = page.normalize()?;
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::constraints::list(&mut session, page).await?))
}

/// GET /form-key-constraints/by-job/:job_id
pub async fn list_constraints_by_job(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<JobFormKeyConstraint>>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(
        store::constraints::list_by_job(&mut session, job_id).await?,
    ))
}

/// PATCH /form-key-constraints/:id
pub async fn update_constraint(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
    Json(patch): Json<ConstraintPatch>,
) -> Result<Json<JobFormKeyConstraint>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(
        store::constraints::update(&mut session, id, patch).await?,
    ))
}

/// DELETE /form-key-constraints/:id
pub async fn delete_constraint(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<JobFormKeyConstraint>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::constraints::remove(&mut session, id).await?))
}
