use serde::{Deserialize, Serialize};

/// Rendering options applied when the reconstructed pattern is turned into a
/// surface: opacity of the drawn surface and a translation of the whole mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub transparency: f64,
    pub offset: [f64; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            transparency: 1.0,
            offset: [0.0, 0.0, 0.0],
        }
    }
}

/// Common error type for pipeline stages.
#[derive(thiserror::Error, Debug)]
pub enum PatternError {
    #[error("file format error: {0}")]
    FileFormat(String),
    #[error("invalid slice data: {0}")]
    InvalidSlice(String),
    #[error("no surface found in rendered scene")]
    NoSurfaceFound,
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type PatternResult<T> = Result<T, PatternError>;
