use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{database_name, sanitize_db_url, validate_postgres_url};
use crate::error::DbInfraError;

/// Open a single-connection pool to `url`.
///
/// Attempted exactly once; an unreachable server surfaces as
/// [`DbInfraError::Connect`] once `connect_timeout` elapses.
pub async fn connect(
    url: &str,
    connect_timeout: Duration,
) -> Result<DatabaseConnection, DbInfraError> {
    validate_postgres_url(url)?;
    let sanitized_url = sanitize_db_url(url);

    info!(
        url = %sanitized_url,
        database = %database_name(url).unwrap_or_default(),
        timeout_ms = connect_timeout.as_millis() as u64,
        "connect=start"
    );

    let mut opt = ConnectOptions::new(url);
    opt.min_connections(1)
        .max_connections(1)
        .connect_timeout(connect_timeout)
        .acquire_timeout(connect_timeout)
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .map_err(|e| DbInfraError::Connect {
            target: sanitized_url.clone(),
            message: e.to_string(),
        })?;

    info!(url = %sanitized_url, "connect=done");
    Ok(conn)
}

/// Release a connection opened by [`connect`]. Close failures are logged, not returned.
pub async fn close(conn: DatabaseConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close database connection");
    }
}
