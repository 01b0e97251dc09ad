use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Unsupported HTTP method: {method}")]
    UnsupportedMethod { method: String },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid bearer token: {source}")]
    InvalidAuthToken {
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
}
