use book_archive_core::api::errors::ApiError;

/// The console error type
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Reading the terminal or writing to it failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The configured endpoint could not be used
    #[error("cannot reach the catalog: {0}")]
    Api(#[from] ApiError),
    /// Log filter from settings or `RUST_LOG` did not parse
    #[error("invalid log filter: {0}")]
    LogFilter(String),
    /// A global subscriber was already installed
    #[error("failed to set up logging: {0}")]
    Logging(String),
    /// First word of the line is not a command
    #[error("unknown command {0:?}, type `help` for a list")]
    UnknownCommand(String),
    /// Command needs an argument that was not given
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}
