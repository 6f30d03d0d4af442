use std::{path::PathBuf, str::Utf8Error};
use thiserror::Error;

pub type SnpxResult<T> = std::result::Result<T, SnpxError>;

#[derive(Debug, Error)]
pub enum SnpxError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Htslib(#[from] rust_htslib::errors::Error),
    #[error(transparent)]
    Utf8(#[from] Utf8Error),
    #[error("Failed to open variant file {}: {message}", path.display())]
    Open { path: PathBuf, message: String },
    #[error("Variant file reading problem: {message}")]
    Read { message: String },
    #[error("Variant file declares no samples in its header")]
    NoSamples,
    #[error("Sample '{name}' not found in variant file header")]
    UnknownSample { name: String },
    #[error("Record {chrom}:{pos} has no QUAL value")]
    MissingQuality { chrom: String, pos: i64 },
    #[error("Record {chrom}:{pos} has negative QUAL {qual}")]
    NegativeQuality { chrom: String, pos: i64, qual: f32 },
}

impl SnpxError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }
}

#[macro_export]
macro_rules! snpx_error {
    ($($arg:tt)*) => {
        $crate::error::SnpxError::message(format!($($arg)*))
    };
}
