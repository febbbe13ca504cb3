use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::Tenant;
use crate::errors::AppError;
use crate::models::form_key::{FormKey, FormKeyPatch, NewFormKey};
use crate::state::AppState;
use crate::store::{self, Page};
use crate::tenant::TenantSession;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_form_keys).post(create_form_key))
        .route(
            "/:id",
            get(get_form_key)
                .patch(update_form_key)
                .delete(delete_form_key),
        )
}

/// POST /form-keys
pub async fn create_form_key(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Json(input): Json<NewFormKey>,
) -> Result<(StatusCode, Json<FormKey>), AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    let form_key = store::form_keys::create(&mut session, input).await?;
    Ok((StatusCode::CREATED, Json(form_key)))
}

/// GET /form-keys/:id
pub async fn get_form_key(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<FormKey>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::form_keys::get(&mut session, id).await?))
}

/// GET /form-keys?skip=&limit=
pub async fn list_form_keys(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Query(page): Query<Page>,
) -> Result<Json<Vec<FormKey>>, AppError> {
    let page = page.normalize()?;
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::form_keys::list(&mut session, page).await?))
}

/// PATCH /form-keys/:id
pub async fn update_form_key(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
    Json(patch): Json<FormKeyPatch>,
) -> Result<Json<FormKey>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::form_keys::update(&mut session, id, patch).await?))
}

/// DELETE /form-keys/:id
/// Removes the form key and its job constraints in one transaction.
pub async fn delete_form_key(
    State(state): State<AppState>,
    Tenant(auth): Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<FormKey>, AppError> {
    let mut session = TenantSession::bind(&state.db, auth.employer_id).await?;
    Ok(Json(store::form_keys::remove(&mut session, id).await?))
}
