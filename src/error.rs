//! # Error Types
//!
//! This module defines all error types for the chordbook library.
//!
//! Parsing never fails: malformed chords, unmatched brackets and unknown directives
//! degrade to literal text. Errors only come from the library side (catalog lookups,
//! file I/O, persistence) and from import validation.
//!
//! ## Error Types
//! - `NotFound` - Song id is not in the catalog (no I/O is attempted)
//! - `Io` - Source file could not be read or written
//! - `Validation` - A freshly imported file produced no sections
//! - `Catalog` - The SQLite catalog rejected a query
//! - `Serialization` - A song could not be encoded to / decoded from JSON
//! - `Yaml` - A song could not be written as YAML
//! - `Config` - Invalid configuration file or environment
//!
//! Duplicate imports are reported through [`crate::library::ImportOutcome`], not here.
//!
//! ## Usage
//! ```rust,ignore
//! use chordbook::{ChordbookError, Library};
//!
//! match library.open("3f2a9c1d0b7e4a56") {
//!     Ok((meta, song)) => println!("{}", meta.title),
//!     Err(ChordbookError::NotFound { id }) => eprintln!("no song {}", id),
//!     Err(ChordbookError::Io { path, source }) => {
//!         eprintln!("cannot read {}: {}", path.display(), source);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChordbookError>;

#[derive(Error, Debug)]
pub enum ChordbookError {
    /// The referenced song id is absent from the catalog.
    ///
    /// # Example
    /// ```
    /// # use chordbook::ChordbookError;
    /// let err = ChordbookError::NotFound { id: "abc123".to_string() };
    /// assert_eq!(err.to_string(), "Song with id abc123 not found");
    /// ```
    #[error("Song with id {id} not found")]
    NotFound { id: String },

    /// Source file unreadable (or unwritable on save).
    ///
    /// The catalog is never touched when this is returned from a load.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file parsed into zero sections and is not accepted as a song.
    ///
    /// # Example
    /// ```
    /// # use chordbook::ChordbookError;
    /// let err = ChordbookError::Validation("File does not contain a valid song".to_string());
    /// assert_eq!(err.to_string(), "Validation error: File does not contain a valid song");
    /// ```
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid configuration.
    ///
    /// # Example
    /// ```
    /// # use chordbook::ChordbookError;
    /// let err = ChordbookError::Config("catalog_path must not be empty".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: catalog_path must not be empty");
    /// ```
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ChordbookError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
