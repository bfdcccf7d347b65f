use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelingError {
    #[error("Mask has zero dimensions ({width}x{height})")]
    EmptyMask { width: usize, height: usize },

    #[error("Mask row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Mask data has {found} values, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Mask with {pixels} pixels exceeds the label range")]
    TooLarge { pixels: usize },

    #[error("Failed to allocate labeling buffers: {0}")]
    Allocation(#[from] std::collections::TryReserveError),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LabelingError>;
