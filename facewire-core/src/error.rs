/// Error type shared by every stage of the face pipeline
use thiserror::Error;

/// Configuration errors. Degenerate geometry and missing optional
/// landmarks are recovered locally and never show up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FaceError {
    #[error("invalid sampling plane '{0}', expected one of 'xy', 'xz', 'yz'")]
    UnknownPlane(String),

    #[error("unknown preset '{0}', expected 'male' or 'female'")]
    UnknownPreset(String),

    #[error("unknown face model '{0}', expected 'landmarks' or 'curves'")]
    UnknownModel(String),

    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("preset '{preset}' is missing landmark '{landmark}' referenced by {context}")]
    MissingLandmark {
        preset: String,
        landmark: String,
        context: String,
    },

    #[error("landmark '{landmark}' is not declared by every preset")]
    PresetMismatch { landmark: String },

    #[error("malformed parameter list: {0}")]
    InvalidAssignment(String),
}

pub type Result<T> = std::result::Result<T, FaceError>;
