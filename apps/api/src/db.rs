use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
///
/// The `after_release` hook clears the `app.employer_id` session variable
/// whenever a connection re-enters the pool: the tenant binding is
/// connection-lifetime state, and a binding left over from one request must
/// never be observable by the next request that draws the same connection.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_release(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("SELECT set_config('app.employer_id', '', false)")
                    .execute(&mut *conn)
                    .await?;
                Ok(true)
            })
        })
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Applies the embedded schema migrations (tables, then tenant policies).
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!().run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
