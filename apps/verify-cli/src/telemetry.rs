use tracing_subscriber::{fmt, EnvFilter};

/// Diagnostics go to stderr; stdout carries only the report.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,sqlx=warn,sea_orm=warn"));

    fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter(env_filter)
        .init();
}
