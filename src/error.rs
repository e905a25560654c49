//! Error types

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Faults raised by the glyph codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlyphError {
    /// No symbols at all where a payload is required
    #[error("Invalid glyph encoding: input is empty")]
    Empty,

    /// Symbol count is not a multiple of the per-byte width
    #[error("Invalid glyph encoding: length {len} is not a multiple of {width}")]
    InvalidLength { len: usize, width: usize },

    /// A character outside the codec's alphabet
    #[error("Invalid glyph encoding: {symbol:?} at position {position} is not in the alphabet")]
    InvalidSymbol { symbol: char, position: usize },

    /// A group whose positional value does not fit in a byte
    #[error("Invalid glyph encoding: group {group} decodes to {value}, which exceeds 255")]
    ByteOutOfRange { group: usize, value: u32 },

    /// Rejected codec configuration
    #[error("Invalid glyph alphabet: {0}")]
    InvalidAlphabet(String),
}

/// Result type for glyph codec operations
pub type GlyphResult<T> = Result<T, GlyphError>;

/// Failures while reading input into a byte buffer
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("Timed out after {timeout:?} reading {}", path.display())]
    TimedOut { path: PathBuf, timeout: Duration },
}
