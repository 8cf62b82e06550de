//! # Error Types
//!
//! This module defines all error types for the PT → BMS converter.
//!
//! Every error carries enough context to find the problem: the section and
//! byte offset for malformed charts, or the key that failed for lookups.
//!
//! ## Error Types
//! - `Format` - Malformed PT input (bad magic, truncation, undecodable text)
//! - `LookupMiss` - The song database has no entry for a derived key
//! - `Database` - The song database file could not be loaded
//! - `Config` - An options file could not be parsed
//! - `PaletteOverflow` - Too many distinct BPM values for 2-digit identifiers
//!
//! ## Usage
//! ```rust
//! use pt2bms::{parse_pt, ConvertError};
//!
//! match parse_pt(b"NOPE") {
//!     Ok(chart) => println!("{} lanes", chart.lanes.len()),
//!     Err(ConvertError::Format { section, offset, message }) => {
//!         eprintln!("Bad chart in {} at 0x{:x}: {}", section, offset, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::fmt;

use thiserror::Error;

/// The region of a PT file being read when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Clips,
    Tempo,
    /// Note lane, numbered from 0 in file order.
    Lane(usize),
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Header => write!(f, "file header"),
            Section::Clips => write!(f, "clip section"),
            Section::Tempo => write!(f, "tempo section"),
            Section::Lane(index) => write!(f, "lane {}", index),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    /// Malformed PT input.
    ///
    /// Parsing aborts at the first problem; no partial chart is produced.
    ///
    /// # Example
    /// ```
    /// # use pt2bms::{ConvertError, Section};
    /// let err = ConvertError::Format {
    ///     section: Section::Tempo,
    ///     offset: 0x9c,
    ///     message: "truncated record".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Format error in tempo section at offset 0x9c: truncated record");
    /// ```
    #[error("Format error in {section} at offset 0x{offset:x}: {message}")]
    Format {
        section: Section,
        offset: usize,
        message: String,
    },

    /// The song database has no entry for the key.
    ///
    /// # Example
    /// ```
    /// # use pt2bms::ConvertError;
    /// let err = ConvertError::LookupMiss { key: "ladymade".to_string() };
    /// assert_eq!(err.to_string(), "No database entry for 'ladymade'");
    /// ```
    #[error("No database entry for '{key}'")]
    LookupMiss { key: String },

    #[error("Invalid song database: {0}")]
    Database(String),

    #[error("Invalid options: {0}")]
    Config(String),

    #[error("Too many distinct BPM values ({count}); at most 255 can be declared")]
    PaletteOverflow { count: usize },
}

impl ConvertError {
    pub(crate) fn format(section: Section, offset: usize, message: impl Into<String>) -> Self {
        ConvertError::Format {
            section,
            offset,
            message: message.into(),
        }
    }
}
