//! `console`
//!
//! Terminal front end of the Book Archive. Everything catalog-related lives in
//! `book_archive_core`; this crate wires settings, logging and the interactive session together.
use crate::errors::ConsoleError;
use crate::session::Session;
use crate::settings::Settings;
use anyhow::Error;
use book_archive_core::api::client::BookApiClient;
use book_archive_core::catalog::store::CatalogStore;
use clap::Parser as _;
use std::io;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt};
/// Parsing of the commands typed at the prompt
mod commands;
/// Error types
mod errors;
/// Plain-text rendering of records and the catalog
mod render;
/// The interactive session driving the catalog store
mod session;
/// Runtime settings from flags and environment
mod settings;

#[allow(
    clippy::missing_inline_in_public_items,
    reason = "Executed once per run, never across crate boundaries"
)]
#[allow(
    clippy::print_stderr,
    reason = "Tracing might not be available here if run_safe() failed before its initialization"
)]
pub fn run() {
    if let Err(error) = run_safe() {
        eprintln!("Failed to run Book Archive! Error: {error}");
    }
}

/// Encapsulated run function that allows returning errors instead of panicking.
fn run_safe() -> Result<(), Error> {
    let settings = Settings::parse();
    init_tracing(&settings)?;

    let client = BookApiClient::new(&settings.api_url).map_err(ConsoleError::Api)?;
    tracing::info!("Using book catalog at {}", client.endpoint());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let store = CatalogStore::new(client);
        let input = BufReader::new(tokio::io::stdin());
        let mut session = Session::new(&store, input, io::stdout());
        session.run().await
    })?;
    Ok(())
}

/// Install the global subscriber. Records emitted through `log` by the core crate are forwarded
/// to it as well.
fn init_tracing(settings: &Settings) -> Result<(), ConsoleError> {
    let filter = EnvFilter::try_new(settings.log_filter())
        .map_err(|err| ConsoleError::LogFilter(err.to_string()))?;
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| ConsoleError::Logging(err.to_string()))
}
