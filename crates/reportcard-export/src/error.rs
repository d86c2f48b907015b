use reportcard_core::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("report is not ready for export: {0}")]
    Validation(#[from] ValidationError),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("image could not be decoded: {0}")]
    Image(String),

    #[error("logo could not be read: {0}")]
    Logo(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        ExportError::TemplateRender(e.to_string())
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e.to_string())
    }
}
