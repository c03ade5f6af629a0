use thiserror::Error;

#[derive(Debug, Error)]
pub enum NhlError {
    /// Network failure, timeout, non-2xx status, or an unreadable body.
    #[error("nhl api request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, NhlError>;
