//! Error types for the configuration cache
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

// == Codec Error Enum ==
/// Failure to turn a record into bytes or bytes back into a record.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Bytes are not a well-formed envelope
    #[error("malformed cache record: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The envelope is not an object at the top level
    #[error("cache record is not an object")]
    NotAnObject,

    /// `expires` holds something other than null or an integer
    #[error("wrong cache life time, expected null or integer, found {0}")]
    InvalidExpiry(String),

    /// `config` is missing or not a mapping
    #[error("cache record has no config mapping")]
    InvalidConfig,
}

// == Cache Error Enum ==
/// Unified error type for the configuration cache.
///
/// A missing base directory and a missing cache file are not errors; they
/// surface as misses from `load` and `Ok(false)` from `save`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache directory could not be created and does not exist
    #[error("can not create cache directory {path}: {source}")]
    DirectoryCreateFailed { path: PathBuf, source: io::Error },

    /// Cache file exists but could not be read
    #[error("can not read configuration cache file {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Cache file could not be written
    #[error("can not save configuration cache file {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Record could not be encoded for writing
    #[error("can not encode configuration cache for {path}: {source}")]
    EncodeFailed { path: PathBuf, source: CodecError },

    /// Cache file content is not a valid record
    #[error("can not restore cache from {path}: {source}")]
    DecodeFailed { path: PathBuf, source: CodecError },
}

impl CacheError {
    /// Returns the path of the file or directory the failure relates to.
    pub fn path(&self) -> &PathBuf {
        match self {
            CacheError::DirectoryCreateFailed { path, .. }
            | CacheError::ReadFailed { path, .. }
            | CacheError::WriteFailed { path, .. }
            | CacheError::EncodeFailed { path, .. }
            | CacheError::DecodeFailed { path, .. } => path,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the configuration cache.
pub type Result<T> = std::result::Result<T, CacheError>;
