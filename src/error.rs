// Error types for the emotion annotation pipeline

use thiserror::Error;

/// Main error type for the emotion annotation pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("face detector unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("emotion classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("invalid input image: {0}")]
    InvalidImage(String),

    #[error("OpenCV error: {0}")]
    OpenCv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decoding error: {0}")]
    ImageDecode(#[from] image::ImageError),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

// Conversion from OpenCV errors
impl From<opencv::Error> for PipelineError {
    fn from(err: opencv::Error) -> Self {
        PipelineError::OpenCv(err.to_string())
    }
}

// Conversion from ONNX Runtime errors. Model-load failures are mapped to
// ClassifierUnavailable explicitly at the load site; everything else coming
// out of ort is a per-call inference failure.
impl From<ort::Error> for PipelineError {
    fn from(err: ort::Error) -> Self {
        PipelineError::Inference(err.to_string())
    }
}
