/// Failures of a single call against the remote collection. These never leave the resource
/// client; they are logged and turned into sentinel values.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network error, non-2xx status or undecodable body, originating from `reqwest`.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The configured endpoint cannot be used as a base URL.
    #[error("invalid endpoint {0:?}, expected an absolute http(s) URL")]
    InvalidEndpoint(String),
}
