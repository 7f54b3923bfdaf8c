//! The main function for the Book Archive terminal application

#[allow(clippy::print_stderr, reason = "No other tracing loaded at this point")]
fn main() {
    match dotenvy::dotenv() {
        Ok(_) => book_archive_lib::run(),
        Err(err) if err.not_found() => book_archive_lib::run(),
        Err(err) => eprintln!("Failed to load environment variables: {err}"),
    }
}
