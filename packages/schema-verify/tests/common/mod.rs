#![allow(dead_code)]

// tests/common/mod.rs
use db_infra::db::{DbSettings, UNIVERSITY_DB};
use db_infra::{close, connect};
use sea_orm::DatabaseConnection;
use test_support::fixtures::{ensure_database, provision_university};

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    test_support::logging::init();
}

/// Create (if needed) and reseed the `university` database on the server
/// behind `DATABASE_URL`, returning settings that point straight at it.
///
/// Pointing the initial connection at `university` itself keeps the catalog
/// checks and the structure checks looking at the same tables.
pub async fn provisioned_settings() -> DbSettings {
    let base = DbSettings::from_env().expect("DATABASE_URL should be a valid Postgres URL");

    let admin = connect(&base.database_url, base.connect_timeout)
        .await
        .expect("connect to the server behind DATABASE_URL");
    ensure_database(&admin, UNIVERSITY_DB)
        .await
        .expect("create the university database");
    close(admin).await;

    let target_url = base.target_url().expect("derive university URL");
    let conn = connect(&target_url, base.connect_timeout)
        .await
        .expect("connect to the university database");
    provision_university(&conn)
        .await
        .expect("provision university tables and seed rows");
    close(conn).await;

    DbSettings {
        database_url: target_url,
        ..base
    }
}

/// Connection to the database under test, for planting rows.
pub async fn university_conn(settings: &DbSettings) -> DatabaseConnection {
    connect(&settings.database_url, settings.connect_timeout)
        .await
        .expect("connect to the university database")
}
