use crate::axis::Axis;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid SVG document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Malformed annotation {text:?}: {reason}")]
    MalformedAnnotation { text: String, reason: String },

    #[error("No usable calibration for the {axis} axis: {reason}")]
    Calibration { axis: Axis, reason: String },

    #[error("Degenerate calibration geometry on the {axis} axis: {reason}")]
    DegenerateGeometry { axis: Axis, reason: String },

    #[error("Invalid options: {message}")]
    InvalidOptions { message: String },
}

impl Error {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(text: &str, reason: impl Into<String>) -> Self {
        Self::MalformedAnnotation {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}
