use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("capture file '{}' does not exist", path.display())]
    InputNotFound { path: PathBuf },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no frame passed header/tail validation ({total_frames} frames inspected)")]
    DecodeEmpty { total_frames: usize },
    #[error("time window [{start}, {end}] s removed all {before} frames")]
    TimeWindowEmpty { start: f64, end: f64, before: usize },
    #[error("column not available: {0}")]
    ConfigColumnMissing(String),
    #[error("output column '{0}' is produced by more than one channel")]
    DuplicateColumn(String),
    #[error("frame layout mismatch: expected {expected} raw columns, got {actual}")]
    FrameLayout { expected: usize, actual: usize },
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,
    #[error("invalid 16-bit constant: {0}")]
    InvalidConstant(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("viewport {0} is not registered in this group")]
    UnknownViewport(usize),
    #[error("failed to export table: {0}")]
    Export(String),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl From<serde_json::Error> for ScopeError {
    fn from(value: serde_json::Error) -> Self {
        ScopeError::Config(value.to_string())
    }
}
impl From<csv::Error> for ScopeError {
    fn from(value: csv::Error) -> Self {
        ScopeError::Export(value.to_string())
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ScopeError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ScopeError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for ScopeError {
    fn from(value: image::ImageError) -> Self {
        ScopeError::Plot(value.to_string())
    }
}
