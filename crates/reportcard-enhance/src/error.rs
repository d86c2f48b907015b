use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("nothing to enhance: the section is empty")]
    EmptyInput,

    #[error("enhancement is not configured: {0}")]
    Configuration(String),

    #[error("completion API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("completion response was malformed: {0}")]
    MalformedResponse(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
