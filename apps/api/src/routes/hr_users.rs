use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Tenant;
use crate::errors::AppError;
use crate::models::hr_user::{HrUser, HrUserPatch, NewHrUser};
use crate::state::AppState;
use crate::store::{self, Page};
use crate::tenant::TenantSession;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_hr_users).post(create_hr_user))
        .route("/by-email", get(get_hr_user_by_email))
        .route(
            "/:id",
            get(get_hr_user).patch(update_hr_user).delete(delete_hr_user),
        )
}

/// POST /hr-users
pub async fn create_hr_user(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Json(input): Json<NewHrUser>,
) -> Result<(StatusCode, Json<HrUser>), AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    let user = store::hr_users::create(&mut session, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /hr-users/:id
pub async fn get_hr_user(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<HrUser>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::hr_users::get(&mut session, id).await?))
}

/// GET /hr-users?skip=&limit=
pub async fn list_hr_users(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(page): Query<Page>,
) -> Result<Json<Vec<HrUser>>, AppError> {
    let page = page.normalize()?;
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::hr_users::list(&mut session, page).await?))
}

#[derive(Debug, Deserialize)]
pub struct EmailParams {
    pub email: String,
}

/// GET /hr-users/by-email?email=
pub async fn get_hr_user_by_email(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(params): Query<EmailParams>,
) -> Result<Json<HrUser>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(
        store::hr_users::get_by_email(&mut session, &params.email).await?,
    ))
}

/// PATCH /hr-users/:id
pub async fn update_hr_user(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
    Json(patch): Json<HrUserPatch>,
) -> Result<Json<HrUser>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::hr_users::update(&mut session, id, patch).await?))
}

/// DELETE /hr-users/:id
pub async fn delete_hr_user(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<HrUser>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::hr_users::remove(&mut session, id).await?))
}
