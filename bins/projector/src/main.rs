//! Tally projector.
//!
//! Reads a projection request from a JSON file (or stdin when the path is
//! `-` or missing), projects the invoice and payment journals, saves them
//! and prints the saved projection as JSON.
//!
//! Usage: tally-projector [request.json]

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::projection::{ProjectInvoiceRequest, ProjectionService};
use tally_db::{SeaOrmJournalStore, SeaOrmReferenceData, connect};
use tally_shared::config::LoggingConfig;
use tally_shared::{AppConfig, AppError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let request = read_request(std::env::args().nth(1).as_deref())?;

    let db = Arc::new(connect(&config.database).await?);
    info!("Connected to database");

    let service = ProjectionService::new(
        SeaOrmReferenceData::new(Arc::clone(&db)),
        SeaOrmJournalStore::new(db),
        config.projection.rounding,
    );

    let projection = service
        .project_invoice(&request)
        .await
        .inspect_err(|err| {
            if err.is_fatal() {
                tracing::error!(code = err.error_code(), error = %err, "Projector built unbalanced journals");
            } else {
                tracing::warn!(code = err.error_code(), status = err.http_status_code(), "Projection rejected");
            }
        })
        .map_err(AppError::from)?;

    println!("{}", serde_json::to_string_pretty(&projection)?);
    Ok(())
}

/// Logs to stderr so stdout carries only the projection.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_request(path: Option<&str>) -> anyhow::Result<ProjectInvoiceRequest> {
    let raw = match path {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {path}"))?,
    };

    serde_json::from_str(&raw).context("Invalid projection request")
}
