//! Tenant context binding.
//!
//! Every request runs under exactly one employer (tenant). The binding is
//! connection-scoped: [`TenantSession::bind`] acquires a pooled connection,
//! sets the `app.employer_id` session variable on it, and hands back the
//! only handle the store layer accepts. The pool's release hook clears the
//! variable, so a recycled connection always re-binds before it can touch
//! tenant data.

use sqlx::pool::PoolConnection;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;

/// A pooled connection with a tenant binding applied.
///
/// Store functions take `&mut TenantSession`, and the only way to obtain one
/// is [`TenantSession::bind`], so no query path can run ahead of the
/// binding. The row-security policies provisioned in migrations key on the
/// same session variable and fail closed when it is missing.
pub struct TenantSession {
    conn: PoolConnection<Postgres>,
    employer_id: Uuid,
    visible: Option<Vec<Uuid>>,
}

impl TenantSession {
    /// Binds `employer_id` to a fresh pooled connection.
    ///
    /// The `set_config` call is session-scoped (`is_local = false`): it
    /// covers every later statement on this connection, including
    /// statements inside transactions started via [`TenantSession::begin`].
    pub async fn bind(pool: &PgPool, employer_id: Uuid) -> Result<Self, AppError> {
        let mut conn = pool.acquire().await.map_err(AppError::from)?;
        sqlx::query("SELECT set_config('app.employer_id', $1, false)")
            .bind(employer_id.to_string())
            .execute(&mut *conn)
            .await?;
        debug!("Tenant session bound for employer {employer_id}");
        Ok(Self {
            conn,
            employer_id,
            visible: None,
        })
    }

    /// The employer every statement on this session is scoped to.
    pub fn employer_id(&self) -> Uuid {
        self.employer_id
    }

    /// The executor store functions run their statements on.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    /// Starts an explicit transaction on the bound connection. The tenant
    /// binding survives it; a transaction dropped without commit rolls back
    /// before the connection can return to the pool.
    pub async fn begin(&mut self) -> Result<Transaction<'_, Postgres>, AppError> {
        Ok(self.conn.begin().await?)
    }

    /// Employers the bound tenant may read: itself plus every target it is
    /// linked to as recruiter. Computed from the link table on first use and
    /// cached for the life of the session.
    pub async fn visible_employers(&mut self) -> Result<Vec<Uuid>, AppError> {
        if let Some(v) = &self.visible {
            return Ok(v.clone());
        }
        let targets: Vec<Uuid> = sqlx::query_scalar(
            "SELECT DISTINCT target_employer_id FROM recruiter_company_links WHERE recruiter_id = $1",
        )
        .bind(self.employer_id)
        .fetch_all(&mut *self.conn)
        .await?;

        let visible = with_self(targets, self.employer_id);
        self.visible = Some(visible.clone());
        Ok(visible)
    }
}

/// Unions the employer's own id into its delegated target set, deduplicated
/// so duplicate link rows can never widen the set twice.
fn with_self(mut targets: Vec<Uuid>, employer_id: Uuid) -> Vec<Uuid> {
    targets.push(employer_id);
    targets.sort();
    targets.dedup();
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_set_always_contains_self() {
        let me = Uuid::new_v4();
        let visible = with_self(vec![], me);
        assert_eq!(visible, vec![me]);
    }

    #[test]
    fn test_visible_set_dedupes_duplicate_targets() {
        let me = Uuid::new_v4();
        let target = Uuid::new_v4();
        let visible = with_self(vec![target, target, target], me);
        assert_eq!(visible.len(), 2);
        assert!(visible.contains(&me));
        assert!(visible.contains(&target));
    }

    #[test]
    fn test_visible_set_does_not_duplicate_self_link() {
        let me = Uuid::new_v4();
        let visible = with_self(vec![me, Uuid::new_v4()], me);
        assert_eq!(visible.iter().filter(|id| **id == me).count(), 1);
    }
}
