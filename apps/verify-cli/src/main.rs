use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use db_infra::db::{sanitize_db_url, DbSettings};
use db_infra::DbInfraError;
use schema_verify::{run, Report, VerifyError};
use serde_json::json;
use tracing::info;

mod telemetry;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "verify-university")]
#[command(about = "Verify the university database schema, seed data and constraints")]
struct Args {
    /// Server connection URL; the university database is reached by swapping
    /// its database segment
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Give up connecting after this many milliseconds. Validated with the
    /// rest of the settings, so a bad value is a configuration error.
    #[arg(long, env = "VERIFY_CONNECT_TIMEOUT_MS")]
    connect_timeout_ms: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,
}

impl Args {
    fn settings(&self) -> Result<DbSettings, DbInfraError> {
        DbSettings::from_lookup(|name| match name {
            "DATABASE_URL" => self.database_url.clone(),
            "VERIFY_CONNECT_TIMEOUT_MS" => self.connect_timeout_ms.clone(),
            _ => None,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let args = Args::parse();

    let outcome = match args.settings() {
        Ok(settings) => {
            info!(
                url = %sanitize_db_url(&settings.database_url),
                timeout_ms = settings.connect_timeout.as_millis() as u64,
                "verify=start"
            );
            run(&settings).await
        }
        Err(e) => Err(VerifyError::from(e)),
    };

    match outcome {
        Ok(report) => {
            print_report(&report, args.format);
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            print_fatal(&e, args.format);
            ExitCode::FAILURE
        }
    }
}

fn print_report(report: &Report, format: Format) {
    match format {
        Format::Text => println!("{}", report.render_text()),
        Format::Json => match serde_json::to_string(&report.summary()) {
            Ok(body) => println!("{body}"),
            Err(e) => eprintln!("❌ Failed to serialize report: {e}"),
        },
    }
}

fn print_fatal(error: &VerifyError, format: Format) {
    match format {
        Format::Text => println!("❌ {error}"),
        Format::Json => println!(
            "{}",
            json!({
                "passed": 0,
                "total": 0,
                "success": false,
                "error": error.to_string(),
            })
        ),
    }
}
