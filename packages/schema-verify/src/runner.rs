use db_infra::db::{sanitize_db_url, DbSettings};
use db_infra::{close, connect};
use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::checks::Check;
use crate::error::{CheckError, VerifyError};
use crate::report::Report;

/// Run every check once, in order.
///
/// The catalog checks use the connection from `settings.database_url`; that
/// connection is closed and a fresh one to the `university` database serves
/// the remaining checks. Only a failed first connection aborts the run. If the
/// second connection fails, its checks are recorded as failed.
pub async fn run(settings: &DbSettings) -> Result<Report, VerifyError> {
    let admin = connect(&settings.database_url, settings.connect_timeout).await?;

    let mut report = Report::new();
    run_checks(&admin, &Check::CATALOG, &mut report).await;
    close(admin).await;

    let target = match settings.target_url() {
        Ok(url) => {
            info!(url = %sanitize_db_url(&url), "switching to database under test");
            connect(&url, settings.connect_timeout).await
        }
        Err(e) => Err(e),
    };

    match target {
        Ok(conn) => {
            run_checks(&conn, &Check::TARGET, &mut report).await;
            close(conn).await;
        }
        Err(e) => {
            debug!(error = %e, "database under test unreachable");
            record_unreachable(&Check::TARGET, &e.to_string(), &mut report);
        }
    }

    info!(
        passed = report.passed(),
        total = report.total(),
        "verify=done"
    );
    Ok(report)
}

/// Run `checks` sequentially on one connection, recording each outcome.
pub async fn run_checks<C: ConnectionTrait>(conn: &C, checks: &[Check], report: &mut Report) {
    for &check in checks {
        let result = check.run(conn).await;
        report.record(check, result);
    }
}

/// Fail every one of `checks` with the same connection error.
fn record_unreachable(checks: &[Check], message: &str, report: &mut Report) {
    for &check in checks {
        report.record(
            check,
            Err(CheckError::Unreachable {
                message: message.to_string(),
            }),
        );
    }
}
