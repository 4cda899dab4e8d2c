/// Convenience result type used across the crate.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Top-level error taxonomy of the compositing core.
///
/// Every variant is recoverable: the editor session stays usable after any of them.
#[derive(thiserror::Error, Debug)]
pub enum ComposeError {
    /// Export was requested before any background image was loaded.
    #[error("no background image loaded")]
    NoBackgroundLoaded,

    /// A raster image or SVG document could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Rasterizing the composition at the requested multiplier failed.
    #[error("export rasterization error: {0}")]
    ExportRasterization(String),

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ComposeError {
    /// Build a [`ComposeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ComposeError::ExportRasterization`] value.
    pub fn export_rasterization(msg: impl Into<String>) -> Self {
        Self::ExportRasterization(msg.into())
    }

    /// Build a [`ComposeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Text shown to the user when this error reaches the UI boundary.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoBackgroundLoaded => "Please upload a background image first.".to_string(),
            Self::Decode(_) => {
                "The selected file could not be read as an image. Please choose another file."
                    .to_string()
            }
            Self::ExportRasterization(_) => "Failed to export image. The resolution might be \
                 too high. Try a lower quality setting."
                .to_string(),
            Self::Validation(msg) => format!("Invalid input: {msg}"),
            Self::Other(err) => format!("An unexpected error occurred: {err}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
