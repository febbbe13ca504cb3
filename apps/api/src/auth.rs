//! Bearer-token authentication and the tenant identity it yields.
//!
//! The token collaborator (login, refresh, revocation) lives outside this
//! service; we only verify credentials it minted. A verified token resolves
//! to one employer id, which is the only tenant the request may bind.

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{header, request::Parts, HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Claims carried by a stafflink bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// HR user the token was issued to.
    pub sub: Uuid,
    /// Employer every statement in the request is scoped to.
    pub employer_id: Uuid,
    pub exp: usize,
}

/// Verifies a bearer credential into [`Claims`].
///
/// Held in `AppState` as `Arc<dyn TokenVerifier>` so deployments can swap
/// the verification backend without touching middleware or handlers.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, AppError>;
}

/// HS256 verifier keyed by `JWT_SECRET`. The default backend.
pub struct HsJwtVerifier {
    decoding: DecodingKey,
}

impl HsJwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[async_trait]
impl TokenVerifier for HsJwtVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

/// Mints an HS256 token for the given HR user and employer. Operators use
/// this shape when issuing service credentials by hand.
pub fn issue_token(
    secret: &str,
    sub: Uuid,
    employer_id: Uuid,
    ttl_secs: i64,
) -> Result<String, AppError> {
    let expires_at = Utc::now()
        .checked_add_signed(Duration::seconds(ttl_secs))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("token ttl out of range")))?;
    let claims = Claims {
        sub,
        employer_id,
        exp: expires_at.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("token encoding failed: {e}")))
}

/// Identity extracted from a verified bearer token. Inserted into request
/// extensions by [`require_employer`] and consumed through [`Tenant`].
#[derive(Debug, Clone)]
pub struct AuthedEmployer {
    pub employer_id: Uuid,
    pub hr_user_id: Uuid,
}

/// Routes reachable without a credential: liveness and tenant onboarding.
/// Everything else requires a verified employer.
fn is_public(method: &Method, path: &str) -> bool {
    (*method == Method::GET && path == "/health")
        || (*method == Method::POST && path == "/companies")
}

/// Middleware that authenticates the request and resolves its tenant.
/// Rejects with 401 when the bearer credential is missing or invalid.
pub async fn require_employer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let token = bearer_token(req.headers()).ok_or(AppError::Unauthorized)?;
    let claims = state.verifier.verify(&token).await?;
    req.extensions_mut().insert(AuthedEmployer {
        employer_id: claims.employer_id,
        hr_user_id: claims.sub,
    });
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Extractor handing the resolved tenant identity to handlers.
///
/// Fails closed: a route wired without [`require_employer`] has no
/// `AuthedEmployer` extension and the rejection is [`AppError::Unbound`],
/// so a wiring mistake surfaces as a 500 instead of widened visibility.
#[derive(Debug)]
pub struct Tenant(pub AuthedEmployer);

#[async_trait]
impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthedEmployer>()
            .cloned()
            .map(Tenant)
            .ok_or(AppError::Unbound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    #[tokio::test]
    async fn test_issued_token_verifies() {
        let sub = Uuid::new_v4();
        let employer_id = Uuid::new_v4();
        let token = issue_token(SECRET, sub, employer_id, 3600).unwrap();

        let verifier = HsJwtVerifier::new(SECRET);
        let claims = verifier.verify(&token).await.unwrap();
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.employer_id, employer_id);
    }

    #[tokio::test]
    async fn test_wrong_secret_is_unauthorized() {
        let token = issue_token(SECRET, Uuid::new_v4(), Uuid::new_v4(), 3600).unwrap();
        let verifier = HsJwtVerifier::new("another-secret");
        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        // Past the default 60s validation leeway.
        let token = issue_token(SECRET, Uuid::new_v4(), Uuid::new_v4(), -3600).unwrap();
        let verifier = HsJwtVerifier::new(SECRET);
        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let verifier = HsJwtVerifier::new(SECRET);
        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_public_route_allowlist() {
        assert!(is_public(&Method::GET, "/health"));
        assert!(is_public(&Method::POST, "/companies"));
        assert!(!is_public(&Method::GET, "/companies"));
        assert!(!is_public(&Method::POST, "/candidates"));
        assert!(!is_public(&Method::DELETE, "/companies"));
    }

    #[tokio::test]
    async fn test_tenant_extractor_fails_closed_without_auth() {
        let req = axum::http::Request::builder()
            .uri("/candidates")
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        let err = Tenant::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Unbound));
    }
}
