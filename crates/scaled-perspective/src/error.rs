use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScaledPerspectiveError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaledPerspectiveError {
    #[error("[scale] invalid scale: {0:?}")]
    InvalidScale(String),

    #[error("[length] not a length: {0:?}")]
    InvalidLength(String),

    #[error("[length] must be positive and finite, got {0}")]
    NonPositiveLength(f64),

    #[error("[length] unknown unit: {0:?}")]
    UnknownUnit(String),

    #[error("[camera] viewing distance requires a perspective camera and a target")]
    ViewingDistanceUnavailable,

    #[error("[camera] image height requires a target in perspective projection")]
    ImageHeightUnavailable,

    #[error("[geometry] degenerate: {0}")]
    DegenerateGeometry(&'static str),
}

/// Coarse classification, used by UI callers to tell rejected input apart
/// from an operation that is not available in the current camera mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    InvalidOperation,
    Degenerate,
}

impl ScaledPerspectiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidScale(_)
            | Self::InvalidLength(_)
            | Self::NonPositiveLength(_)
            | Self::UnknownUnit(_) => ErrorKind::InvalidInput,
            Self::ViewingDistanceUnavailable | Self::ImageHeightUnavailable => {
                ErrorKind::InvalidOperation
            }
            Self::DegenerateGeometry(_) => ErrorKind::Degenerate,
        }
    }
}
