use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::state::AppState;

/// SQLSTATE raised by the `app_employer_id()` SQL function when a statement
/// reaches the database on a session with no tenant binding.
pub const UNBOUND_SQLSTATE: &str = "TNT01";

/// Largest foreign error body the envelope middleware will buffer.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// A tenant-scoped operation ran without a bound tenant session.
    /// This is an integration bug in the service, not a caller mistake,
    /// so it surfaces as a 500, never as a 4xx.
    #[error("Tenant context is not bound")]
    Unbound,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => return AppError::NotFound("record not found".to_string()),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some(UNBOUND_SQLSTATE) => return AppError::Unbound,
                Some("23505") => {
                    return AppError::Validation(
                        "a record with these values already exists".to_string(),
                    )
                }
                Some("23503") => {
                    return AppError::Validation(
                        "operation blocked by records that depend on this one".to_string(),
                    )
                }
                _ => {}
            },
            _ => {}
        }
        AppError::Database(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Unbound | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to callers. Server-side detail is logged instead.
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::Unbound => "Tenant context is not bound".to_string(),
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }

    /// Failure detail attached to 500-class bodies when debug mode is on.
    fn trace_detail(&self) -> Option<String> {
        match self {
            AppError::Database(e) => Some(format!("{e:?}")),
            AppError::Internal(e) => Some(format!("{e:?}")),
            _ => None,
        }
    }
}

/// Error detail carried on the response as an extension so the envelope
/// middleware can rebuild the body with the request path attached.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
    pub trace: Option<String>,
}

/// Wire shape of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::Unbound => {
                tracing::error!("Tenant-scoped operation reached the store without a bound session")
            }
            _ => {}
        }

        let detail = ErrorDetail {
            message: self.public_message(),
            trace: self.trace_detail(),
        };

        // Body without a path; the envelope middleware rewrites it with one.
        let body = Json(serde_json::json!({
            "message": detail.message,
            "status": status.as_u16(),
        }));
        let mut res = (status, body).into_response();
        res.extensions_mut().insert(detail);
        res
    }
}

/// Response-mapping middleware that renders every 4xx/5xx as the
/// `{message, status, path}` envelope. Failures raised as `AppError` carry
/// an `ErrorDetail` extension; rejections produced elsewhere (malformed
/// JSON, unknown method) are buffered and reshaped so the error surface is
/// uniform. Trace detail is attached only when `DEBUG_ERRORS` is set.
pub async fn error_envelope(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let res = next.run(req).await;
    let status = res.status();
    if !status.is_client_error() && !status.is_server_error() {
        return res;
    }

    let detail = res.extensions().get::<ErrorDetail>().cloned();
    let (message, trace) = match detail {
        Some(d) => (d.message, d.trace),
        None => {
            let bytes = axum::body::to_bytes(res.into_body(), ERROR_BODY_LIMIT)
                .await
                .unwrap_or_default();
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            let message = if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unhandled error")
                    .to_string()
            } else {
                text
            };
            (message, None)
        }
    };

    let body = ErrorBody {
        message,
        status: status.as_u16(),
        path,
        trace: if state.config.debug_errors { trace } else { None },
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unbound_is_a_server_error_not_a_4xx() {
        assert_eq!(
            AppError::Unbound.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_database_message_is_generic() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), "A database error occurred");
    }

    #[test]
    fn test_error_body_omits_trace_when_absent() {
        let body = ErrorBody {
            message: "nope".into(),
            status: 404,
            path: "/candidates/123".into(),
            trace: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "nope");
        assert_eq!(json["status"], 404);
        assert_eq!(json["path"], "/candidates/123");
        assert!(json.get("trace").is_none());
    }

    #[test]
    fn test_error_body_carries_trace_when_present() {
        let body = ErrorBody {
            message: "boom".into(),
            status: 500,
            path: "/jobs".into(),
            trace: Some("stack".into()),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["trace"], "stack");
    }
}
