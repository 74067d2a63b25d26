use thiserror::Error;

/// Errors raised while resolving or generating a symmetry.
///
/// Both variants are configuration errors: the group names form a closed set
/// and the generators never produce an empty set for clamped inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymmetryError {
    #[error("Unknown symmetry group: {0}")]
    UnknownGroup(String),

    #[error("Transform set must contain at least one transform")]
    EmptyTransformSet,
}

/// Errors that can occur while encoding or decoding the operation history
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Corrupt sketch data: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Failed to encode history: {0}")]
    Encode(serde_json::Error),
}

/// Errors that can occur while saving, loading or exporting sketches
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to access sketch file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cannot export a {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
