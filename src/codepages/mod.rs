//! Legacy single-byte charsets: ASCII and ISO-8859-1..16 (no 12).
//!
//! Each charset has a static 256-entry forward table (byte -> scalar). The
//! reverse direction (scalar -> byte) is derived from it the first time a
//! charset is encoded into, and kept for the rest of the process.
//!
//! # Example
//!
//! ```
//! use transcodec::codepages::Codepage;
//! use transcodec::EncodingTag;
//!
//! let latin9 = Codepage::from_tag(EncodingTag::Iso8859_15).unwrap();
//! assert_eq!(latin9.decode_byte(0xA4), Some(0x20AC)); // Euro sign
//! assert_eq!(latin9.encode_scalar(0x20AC), Some(0xA4));
//!
//! let utf8 = latin9.to_utf8(b"caf\xE9 \xA4").unwrap();
//! assert_eq!(utf8, "café €".as_bytes());
//! assert_eq!(latin9.from_utf8(&utf8).unwrap(), b"caf\xE9 \xA4");
//!
//! // U+4E2D has no byte in Latin-9
//! assert!(latin9.from_utf8("中".as_bytes()).is_err());
//! ```

mod tables;

pub use tables::{ForwardTable, NO_MAP};

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::hash::BuildHasher;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::codepoint::is_valid_codepoint;
use crate::encoding::EncodingTag;
use crate::error::{Error, Result};
use crate::utf8;

const CODEPAGE_COUNT: usize = 16;

/// Forward tables, indexed by `EncodingTag::legacy_index`.
static FORWARD: [&ForwardTable; CODEPAGE_COUNT] = [
    &tables::ASCII,
    &tables::ISO_8859_1,
    &tables::ISO_8859_2,
    &tables::ISO_8859_3,
    &tables::ISO_8859_4,
    &tables::ISO_8859_5,
    &tables::ISO_8859_6,
    &tables::ISO_8859_7,
    &tables::ISO_8859_8,
    &tables::ISO_8859_9,
    &tables::ISO_8859_10,
    &tables::ISO_8859_11,
    &tables::ISO_8859_13,
    &tables::ISO_8859_14,
    &tables::ISO_8859_15,
    &tables::ISO_8859_16,
];

/// The reverse table type used by the process-wide cache.
pub type ReverseTable = HashMap<u32, u8>;

#[allow(clippy::declare_interior_mutable_const)]
const UNBUILT: OnceLock<ReverseTable> = OnceLock::new();

static REVERSE: [OnceLock<ReverseTable>; CODEPAGE_COUNT] = [UNBUILT; CODEPAGE_COUNT];

/// An associative container from scalar to legacy byte.
///
/// This is all the reverse lookup needs from its storage; any map with
/// insert-or-overwrite semantics will do.
pub trait ReverseMap {
    /// Maps `scalar` to `byte`, replacing any earlier byte for it.
    fn insert(&mut self, scalar: u32, byte: u8);

    /// Returns the byte mapped to `scalar`.
    fn get(&self, scalar: u32) -> Option<u8>;

    /// Number of distinct scalars mapped.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is mapped.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: BuildHasher> ReverseMap for HashMap<u32, u8, S> {
    #[inline]
    fn insert(&mut self, scalar: u32, byte: u8) {
        HashMap::insert(self, scalar, byte);
    }

    #[inline]
    fn get(&self, scalar: u32) -> Option<u8> {
        HashMap::get(self, &scalar).copied()
    }

    #[inline]
    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl ReverseMap for BTreeMap<u32, u8> {
    #[inline]
    fn insert(&mut self, scalar: u32, byte: u8) {
        BTreeMap::insert(self, scalar, byte);
    }

    #[inline]
    fn get(&self, scalar: u32) -> Option<u8> {
        BTreeMap::get(self, &scalar).copied()
    }

    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

/// Derives a reverse map from `table`.
///
/// Bytes are visited in ascending order and unassigned slots are skipped.
/// When a scalar appears at several bytes the highest byte wins.
pub fn build_reverse<M: ReverseMap + Default>(table: &ForwardTable) -> M {
    let mut map = M::default();
    for (byte, &cp) in table.iter().enumerate() {
        if cp != NO_MAP {
            map.insert(cp, byte as u8);
        }
    }
    map
}

/// A legacy single-byte charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codepage {
    tag: EncodingTag,
    index: usize,
}

impl Codepage {
    /// Returns the codepage for a legacy tag, or `None` for Unicode forms.
    pub const fn from_tag(tag: EncodingTag) -> Option<Codepage> {
        match tag.legacy_index() {
            Some(index) => Some(Codepage { tag, index }),
            None => None,
        }
    }

    /// Iterates over every supported codepage.
    pub fn all() -> impl Iterator<Item = Codepage> {
        EncodingTag::ALL.into_iter().filter_map(Codepage::from_tag)
    }

    /// The tag of this codepage.
    #[inline]
    pub const fn tag(self) -> EncodingTag {
        self.tag
    }

    /// The static byte -> scalar table.
    #[inline]
    pub fn forward(self) -> &'static ForwardTable {
        FORWARD[self.index]
    }

    /// The scalar -> byte table, built on first use.
    ///
    /// Construction happens at most once per codepage, even under
    /// concurrent first use.
    pub fn reverse(self) -> &'static ReverseTable {
        REVERSE[self.index].get_or_init(|| {
            let map: ReverseTable = build_reverse(self.forward());
            #[cfg(feature = "tracing")]
            tracing::debug!(
                encoding = self.tag.name(),
                entries = map.len(),
                "built reverse codepage table"
            );
            map
        })
    }

    /// The scalar assigned to `byte`, if any.
    #[inline]
    pub fn decode_byte(self, byte: u8) -> Option<u32> {
        match self.forward()[byte as usize] {
            NO_MAP => None,
            cp => Some(cp),
        }
    }

    /// The byte that encodes `cp`, if any.
    #[inline]
    pub fn encode_scalar(self, cp: u32) -> Option<u8> {
        ReverseMap::get(self.reverse(), cp)
    }

    /// Returns `true` if `cp` has a byte in this codepage.
    #[inline]
    pub fn can_encode(self, cp: u32) -> bool {
        self.encode_scalar(cp).is_some()
    }

    /// Converts legacy bytes to UTF-8.
    ///
    /// The first unassigned byte (for ASCII, any byte from 0x80) fails the
    /// whole conversion with [`Error::UnmappedByte`].
    pub fn to_utf8(self, bytes: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(bytes.len());
        let mut buf = [0u8; 4];
        for (position, &byte) in bytes.iter().enumerate() {
            let cp = self
                .decode_byte(byte)
                .ok_or(Error::UnmappedByte { byte, position })?;
            let len = utf8::encode(cp, &mut buf, 0)?;
            out.extend_from_slice(&buf[..len]);
        }
        Ok(out)
    }

    /// Converts UTF-8 to legacy bytes.
    ///
    /// Fails on the first malformed sequence, invalid scalar, or scalar
    /// without a byte in this codepage ([`Error::UnmappedScalar`]).
    pub fn from_utf8(self, utf8: &[u8]) -> Result<Vec<u8>> {
        let reverse = self.reverse();
        let mut out = Vec::with_capacity(utf8.len());
        let mut pos = 0;
        while pos < utf8.len() {
            let position = pos;
            let cp = utf8::decode(utf8, &mut pos)?;
            if !is_valid_codepoint(cp) {
                return Err(Error::InvalidCodepoint { scalar: cp });
            }
            let byte = ReverseMap::get(reverse, cp).ok_or(Error::UnmappedScalar {
                scalar: cp,
                position,
            })?;
            out.push(byte);
        }
        Ok(out)
    }
}

/// Converts `bytes` in legacy charset `tag` to UTF-8.
///
/// Returns `None` if `tag` is not a legacy charset.
pub fn to_utf8(tag: EncodingTag, bytes: &[u8]) -> Option<Result<Vec<u8>>> {
    Codepage::from_tag(tag).map(|cp| cp.to_utf8(bytes))
}

/// Converts UTF-8 to legacy charset `tag`.
///
/// Returns `None` if `tag` is not a legacy charset.
pub fn from_utf8(tag: EncodingTag, utf8: &[u8]) -> Option<Result<Vec<u8>>> {
    Codepage::from_tag(tag).map(|cp| cp.from_utf8(utf8))
}

// === Registry registration ===

#[cfg(feature = "registry")]
macro_rules! register_codepage {
    ($tag:ident, [$($alias:literal),* $(,)?]) => {
        inventory::submit! {
            crate::registry::EncodingEntry {
                tag: EncodingTag::$tag,
                aliases: &[$($alias),*],
            }
        }
    };
}

#[cfg(feature = "registry")]
mod registrations {
    use super::*;

    register_codepage!(Ascii, ["US-ASCII", "ANSI_X3.4-1968", "646"]);
    register_codepage!(Iso8859_1, ["ISO8859-1", "ISO_8859-1", "LATIN1", "L1"]);
    register_codepage!(Iso8859_2, ["ISO8859-2", "ISO_8859-2", "LATIN2", "L2"]);
    register_codepage!(Iso8859_3, ["ISO8859-3", "ISO_8859-3", "LATIN3", "L3"]);
    register_codepage!(Iso8859_4, ["ISO8859-4", "ISO_8859-4", "LATIN4", "L4"]);
    register_codepage!(Iso8859_5, ["ISO8859-5", "ISO_8859-5", "CYRILLIC"]);
    register_codepage!(Iso8859_6, ["ISO8859-6", "ISO_8859-6", "ARABIC"]);
    register_codepage!(Iso8859_7, ["ISO8859-7", "ISO_8859-7", "GREEK"]);
    register_codepage!(Iso8859_8, ["ISO8859-8", "ISO_8859-8", "HEBREW"]);
    register_codepage!(Iso8859_9, ["ISO8859-9", "ISO_8859-9", "LATIN5", "L5"]);
    register_codepage!(Iso8859_10, ["ISO8859-10", "ISO_8859-10", "LATIN6", "L6"]);
    register_codepage!(Iso8859_11, ["ISO8859-11", "ISO_8859-11", "THAI"]);
    register_codepage!(Iso8859_13, ["ISO8859-13", "ISO_8859-13", "LATIN7", "L7"]);
    register_codepage!(Iso8859_14, ["ISO8859-14", "ISO_8859-14", "LATIN8", "L8"]);
    register_codepage!(Iso8859_15, ["ISO8859-15", "ISO_8859-15", "LATIN9", "L9"]);
    register_codepage!(Iso8859_16, ["ISO8859-16", "ISO_8859-16", "LATIN10", "L10"]);
}
