use clap::Parser;

/// The books collection of the public MockAPI project the archive was set up against.
pub const DEFAULT_API_URL: &str = "https://69867ea98bacd1d773eb19cd.mockapi.io/api/books";
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings, read from flags first, then the environment (including `.env`), then
/// defaults.
#[derive(Debug, Clone, Parser)]
#[command(name = "book-archive", version, about = "Manage your personal book catalog")]
pub struct Settings {
    /// URL of the remote books collection
    #[arg(long, env = "BOOK_ARCHIVE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
    /// Log filter directives, e.g. `debug` or `book_archive_core=debug`; falls back to `RUST_LOG`
    #[arg(long = "log", env = "BOOK_ARCHIVE_LOG")]
    pub log_filter: Option<String>,
}

impl Settings {
    /// Log filter to install: explicit setting, then `RUST_LOG`, then `info`.
    #[must_use]
    pub fn log_filter(&self) -> String {
        self.log_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned())
    }
}
