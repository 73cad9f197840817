use thiserror::Error;

/// Failures talking to the Podio API.
#[derive(Debug, Error)]
pub enum PodioError {
    #[error("error sending request to Podio: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Podio rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected response from Podio: {0}")]
    InvalidResponse(String),
}
