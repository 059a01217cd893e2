//! Runtime encoding lookup by name.
//!
//! Each codec module registers its tags together with their aliases via
//! `inventory::submit!`, so tools can pick encodings from user input.
//!
//! # Example
//!
//! ```
//! use transcodec::registry;
//! use transcodec::EncodingTag;
//!
//! assert_eq!(registry::find_encoding("latin1").unwrap(), EncodingTag::Iso8859_1);
//! assert_eq!("utf-16".parse::<EncodingTag>().unwrap(), EncodingTag::Utf16Be);
//!
//! let out = registry::transcode(b"caf\xE9", "ISO-8859-1", "UTF-8").unwrap();
//! assert_eq!(out, "café".as_bytes());
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;

use thiserror::Error;

use crate::encoding::EncodingTag;
use crate::error::Error;

/// Error returned when an encoding name is not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown encoding: {0}")]
pub struct UnknownEncodingError(pub String);

/// Error returned by [`transcode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    /// The source encoding name is unknown.
    #[error("source {0}")]
    UnknownSourceEncoding(UnknownEncodingError),
    /// The target encoding name is unknown.
    #[error("target {0}")]
    UnknownTargetEncoding(UnknownEncodingError),
    /// The conversion itself failed.
    #[error(transparent)]
    Codec(#[from] Error),
}

/// A registered encoding.
pub struct EncodingEntry {
    /// The encoding this entry names.
    pub tag: EncodingTag,
    /// Alternative names (e.g. `&["LATIN1"]`).
    pub aliases: &'static [&'static str],
}

impl EncodingEntry {
    /// Returns the canonical name of this encoding.
    pub fn name(&self) -> &'static str {
        self.tag.name()
    }

    /// Returns all names (canonical + aliases) for this encoding.
    pub fn all_names(&self) -> impl Iterator<Item = &'static str> {
        core::iter::once(self.name()).chain(self.aliases.iter().copied())
    }

    /// Check if this encoding matches the given name (case-insensitive).
    pub fn matches(&self, name: &str) -> bool {
        self.all_names().any(|n| n.eq_ignore_ascii_case(name))
    }
}

inventory::collect!(EncodingEntry);

/// Returns an iterator over all registered encodings.
pub fn encodings() -> impl Iterator<Item = &'static EncodingEntry> {
    inventory::iter::<EncodingEntry>()
}

/// Find an encoding by name (case-insensitive).
pub fn find_encoding(name: &str) -> Result<EncodingTag, UnknownEncodingError> {
    encodings()
        .find(|e| e.matches(name))
        .map(|e| e.tag)
        .ok_or_else(|| UnknownEncodingError(name.to_string()))
}

/// Transcode bytes between two encodings given by name.
///
/// # Arguments
///
/// * `input` - The input bytes in the source encoding
/// * `from` - The name of the source encoding
/// * `to` - The name of the target encoding
pub fn transcode(input: &[u8], from: &str, to: &str) -> Result<Vec<u8>, TranscodeError> {
    let from = find_encoding(from).map_err(TranscodeError::UnknownSourceEncoding)?;
    let to = find_encoding(to).map_err(TranscodeError::UnknownTargetEncoding)?;
    Ok(crate::transcode::transcode(input, from, to)?)
}

impl FromStr for EncodingTag {
    type Err = UnknownEncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_encoding(s)
    }
}
