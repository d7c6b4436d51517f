// errors for everything that can fail before or around the search loop.
// the loop itself is total over a valid solution and never returns one of these.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// brush mask or target image could not be read/decoded
    #[error("failed to load image {path}: {source}")]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// a brush mask with zero width or height
    #[error("brush mask is empty ({width}x{height})")]
    EmptyBrush { width: u32, height: u32 },

    #[error("no brush masks were loaded")]
    NoBrushes,

    /// a configuration value outside its documented range
    #[error("invalid {name} = {value}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("failed to save image {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
