//! Encoding tags, byte order, and the per-form codec trait.
//!
//! - [`EncodingTag`]: the closed set of supported encodings, used for runtime dispatch
//! - [`ByteOrder`]: big/little endian packing of 16- and 32-bit units
//! - [`UnitCodec`]: static encode/decode of one scalar, implemented by zero-sized markers
//!
//! # Example
//!
//! ```
//! use transcodec::{ByteOrder, EncodingTag, UnitCodec, Utf16Be};
//!
//! assert_eq!(EncodingTag::Utf16Be.name(), "UTF-16BE");
//! assert_eq!(EncodingTag::Utf16Be.byte_order(), Some(ByteOrder::Big));
//! assert!(EncodingTag::Iso8859_5.is_legacy());
//!
//! let mut buf = [0u8; 4];
//! let len = Utf16Be::encode(0x1F600, &mut buf, 0).unwrap();
//! assert_eq!(&buf[..len], &[0xD8, 0x3D, 0xDE, 0x00]);
//!
//! let mut pos = 0;
//! assert_eq!(Utf16Be::decode(&buf, &mut pos).unwrap(), 0x1F600);
//! assert_eq!(pos, 4);
//! ```

use core::fmt;

use crate::error::Result;

/// Byte order of multi-byte code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

impl ByteOrder {
    /// The byte order of the target platform.
    #[cfg(target_endian = "big")]
    pub const NATIVE: ByteOrder = ByteOrder::Big;
    /// The byte order of the target platform.
    #[cfg(target_endian = "little")]
    pub const NATIVE: ByteOrder = ByteOrder::Little;

    /// Returns `true` for [`ByteOrder::Big`].
    #[inline]
    pub const fn is_big(self) -> bool {
        matches!(self, ByteOrder::Big)
    }

    #[inline]
    pub(crate) fn read_u16(self, b: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Big => u16::from_be_bytes(b),
            ByteOrder::Little => u16::from_le_bytes(b),
        }
    }

    #[inline]
    pub(crate) fn write_u16(self, v: u16) -> [u8; 2] {
        match self {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        }
    }

    #[inline]
    pub(crate) fn read_u32(self, b: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Big => u32::from_be_bytes(b),
            ByteOrder::Little => u32::from_le_bytes(b),
        }
    }

    #[inline]
    pub(crate) fn write_u32(self, v: u32) -> [u8; 4] {
        match self {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        }
    }
}

/// Identifies one supported encoding.
///
/// ISO-8859-12 was never published, so there is no tag for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EncodingTag {
    /// 7-bit US-ASCII.
    Ascii,
    /// ISO-8859-1 (Latin-1, Western European).
    Iso8859_1,
    /// ISO-8859-2 (Latin-2, Central European).
    Iso8859_2,
    /// ISO-8859-3 (Latin-3, South European).
    Iso8859_3,
    /// ISO-8859-4 (Latin-4, North European).
    Iso8859_4,
    /// ISO-8859-5 (Cyrillic).
    Iso8859_5,
    /// ISO-8859-6 (Arabic).
    Iso8859_6,
    /// ISO-8859-7 (Greek).
    Iso8859_7,
    /// ISO-8859-8 (Hebrew).
    Iso8859_8,
    /// ISO-8859-9 (Latin-5, Turkish).
    Iso8859_9,
    /// ISO-8859-10 (Latin-6, Nordic).
    Iso8859_10,
    /// ISO-8859-11 (Thai).
    Iso8859_11,
    /// ISO-8859-13 (Latin-7, Baltic Rim).
    Iso8859_13,
    /// ISO-8859-14 (Latin-8, Celtic).
    Iso8859_14,
    /// ISO-8859-15 (Latin-9).
    Iso8859_15,
    /// ISO-8859-16 (Latin-10, South-Eastern European).
    Iso8859_16,
    /// UTF-8.
    Utf8,
    /// UCS-2, big-endian.
    Ucs2Be,
    /// UCS-2, little-endian.
    Ucs2Le,
    /// UTF-16, big-endian.
    Utf16Be,
    /// UTF-16, little-endian.
    Utf16Le,
    /// UCS-4, big-endian.
    Ucs4Be,
    /// UCS-4, little-endian.
    Ucs4Le,
    /// UTF-32, big-endian.
    Utf32Be,
    /// UTF-32, little-endian.
    Utf32Le,
}

impl EncodingTag {
    /// Every tag, legacy charsets first.
    pub const ALL: [EncodingTag; 25] = [
        EncodingTag::Ascii,
        EncodingTag::Iso8859_1,
        EncodingTag::Iso8859_2,
        EncodingTag::Iso8859_3,
        EncodingTag::Iso8859_4,
        EncodingTag::Iso8859_5,
        EncodingTag::Iso8859_6,
        EncodingTag::Iso8859_7,
        EncodingTag::Iso8859_8,
        EncodingTag::Iso8859_9,
        EncodingTag::Iso8859_10,
        EncodingTag::Iso8859_11,
        EncodingTag::Iso8859_13,
        EncodingTag::Iso8859_14,
        EncodingTag::Iso8859_15,
        EncodingTag::Iso8859_16,
        EncodingTag::Utf8,
        EncodingTag::Ucs2Be,
        EncodingTag::Ucs2Le,
        EncodingTag::Utf16Be,
        EncodingTag::Utf16Le,
        EncodingTag::Ucs4Be,
        EncodingTag::Ucs4Le,
        EncodingTag::Utf32Be,
        EncodingTag::Utf32Le,
    ];

    /// The canonical name (e.g. `"ISO-8859-15"`, `"UTF-16LE"`).
    pub const fn name(self) -> &'static str {
        match self {
            EncodingTag::Ascii => "ASCII",
            EncodingTag::Iso8859_1 => "ISO-8859-1",
            EncodingTag::Iso8859_2 => "ISO-8859-2",
            EncodingTag::Iso8859_3 => "ISO-8859-3",
            EncodingTag::Iso8859_4 => "ISO-8859-4",
            EncodingTag::Iso8859_5 => "ISO-8859-5",
            EncodingTag::Iso8859_6 => "ISO-8859-6",
            EncodingTag::Iso8859_7 => "ISO-8859-7",
            EncodingTag::Iso8859_8 => "ISO-8859-8",
            EncodingTag::Iso8859_9 => "ISO-8859-9",
            EncodingTag::Iso8859_10 => "ISO-8859-10",
            EncodingTag::Iso8859_11 => "ISO-8859-11",
            EncodingTag::Iso8859_13 => "ISO-8859-13",
            EncodingTag::Iso8859_14 => "ISO-8859-14",
            EncodingTag::Iso8859_15 => "ISO-8859-15",
            EncodingTag::Iso8859_16 => "ISO-8859-16",
            EncodingTag::Utf8 => "UTF-8",
            EncodingTag::Ucs2Be => "UCS-2BE",
            EncodingTag::Ucs2Le => "UCS-2LE",
            EncodingTag::Utf16Be => "UTF-16BE",
            EncodingTag::Utf16Le => "UTF-16LE",
            EncodingTag::Ucs4Be => "UCS-4BE",
            EncodingTag::Ucs4Le => "UCS-4LE",
            EncodingTag::Utf32Be => "UTF-32BE",
            EncodingTag::Utf32Le => "UTF-32LE",
        }
    }

    /// Byte order of the code units, or `None` for byte-oriented encodings.
    pub const fn byte_order(self) -> Option<ByteOrder> {
        match self {
            EncodingTag::Ucs2Be
            | EncodingTag::Utf16Be
            | EncodingTag::Ucs4Be
            | EncodingTag::Utf32Be => Some(ByteOrder::Big),
            EncodingTag::Ucs2Le
            | EncodingTag::Utf16Le
            | EncodingTag::Ucs4Le
            | EncodingTag::Utf32Le => Some(ByteOrder::Little),
            _ => None,
        }
    }

    /// Width in bytes of one code unit (and of the null terminator).
    pub const fn unit_len(self) -> usize {
        match self {
            EncodingTag::Ucs2Be | EncodingTag::Ucs2Le | EncodingTag::Utf16Be | EncodingTag::Utf16Le => 2,
            EncodingTag::Ucs4Be | EncodingTag::Ucs4Le | EncodingTag::Utf32Be | EncodingTag::Utf32Le => 4,
            _ => 1,
        }
    }

    /// Returns `true` for ASCII and the ISO-8859 charsets.
    pub const fn is_legacy(self) -> bool {
        self.legacy_index().is_some()
    }

    /// Returns `true` if every Unicode scalar is representable.
    ///
    /// UCS-2 is excluded: it stops at the BMP.
    pub const fn is_unicode(self) -> bool {
        matches!(
            self,
            EncodingTag::Utf8
                | EncodingTag::Utf16Be
                | EncodingTag::Utf16Le
                | EncodingTag::Ucs4Be
                | EncodingTag::Ucs4Le
                | EncodingTag::Utf32Be
                | EncodingTag::Utf32Le
        )
    }

    /// Slot of a legacy tag in the codepage tables.
    pub(crate) const fn legacy_index(self) -> Option<usize> {
        let idx = match self {
            EncodingTag::Ascii => 0,
            EncodingTag::Iso8859_1 => 1,
            EncodingTag::Iso8859_2 => 2,
            EncodingTag::Iso8859_3 => 3,
            EncodingTag::Iso8859_4 => 4,
            EncodingTag::Iso8859_5 => 5,
            EncodingTag::Iso8859_6 => 6,
            EncodingTag::Iso8859_7 => 7,
            EncodingTag::Iso8859_8 => 8,
            EncodingTag::Iso8859_9 => 9,
            EncodingTag::Iso8859_10 => 10,
            EncodingTag::Iso8859_11 => 11,
            EncodingTag::Iso8859_13 => 12,
            EncodingTag::Iso8859_14 => 13,
            EncodingTag::Iso8859_15 => 14,
            EncodingTag::Iso8859_16 => 15,
            _ => return None,
        };
        Some(idx)
    }

    /// The UTF-16 or UTF-32 tag matching the platform's `wchar_t` width and
    /// byte order.
    pub const fn native_wide() -> EncodingTag {
        match (
            core::mem::size_of::<crate::transcode::WideChar>(),
            ByteOrder::NATIVE,
        ) {
            (2, ByteOrder::Big) => EncodingTag::Utf16Be,
            (2, ByteOrder::Little) => EncodingTag::Utf16Le,
            (_, ByteOrder::Big) => EncodingTag::Utf32Be,
            (_, ByteOrder::Little) => EncodingTag::Utf32Le,
        }
    }

    /// Byte length of `bytes` up to (not including) the first all-zero code
    /// unit, or the whole slice rounded down to a unit boundary if there is
    /// no terminator.
    pub fn terminated_len(self, bytes: &[u8]) -> usize {
        nul_terminated_len(bytes, self.unit_len())
    }
}

impl fmt::Display for EncodingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn nul_terminated_len(bytes: &[u8], unit: usize) -> usize {
    bytes
        .chunks_exact(unit)
        .position(|u| u.iter().all(|&b| b == 0))
        .unwrap_or(bytes.len() / unit)
        * unit
}

/// Encodes and decodes single scalars in one Unicode encoding form.
///
/// Implementors are zero-sized markers; all operations are associated
/// functions working on caller-owned buffers through an explicit cursor.
pub trait UnitCodec: Sized + 'static {
    /// The tag this codec implements.
    const TAG: EncodingTag;

    /// The canonical encoding name.
    const NAME: &'static str = Self::TAG.name();

    /// Maximum number of bytes one scalar occupies.
    const MAX_CHAR_LEN: usize;

    /// Number of bytes in the null terminator.
    const NULL_LEN: usize;

    /// Decodes the scalar starting at `*pos`.
    ///
    /// On success `*pos` is advanced past the consumed bytes. On failure it
    /// is left untouched.
    fn decode(bytes: &[u8], pos: &mut usize) -> Result<u32>;

    /// Encodes `cp` into `out` starting at `pos` and returns the number of
    /// bytes written.
    ///
    /// Nothing is written on failure.
    fn encode(cp: u32, out: &mut [u8], pos: usize) -> Result<usize>;

    /// Number of bytes `cp` needs, or `None` if this form cannot encode it.
    fn encoded_len(cp: u32) -> Option<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_unique() {
        for (i, a) in EncodingTag::ALL.iter().enumerate() {
            for b in &EncodingTag::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_legacy_indices_dense() {
        let indices: Vec<usize> = EncodingTag::ALL
            .iter()
            .filter_map(|t| t.legacy_index())
            .collect();
        assert_eq!(indices, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_byte_order() {
        assert_eq!(EncodingTag::Ucs4Le.byte_order(), Some(ByteOrder::Little));
        assert_eq!(EncodingTag::Ucs2Be.byte_order(), Some(ByteOrder::Big));
        assert_eq!(EncodingTag::Utf8.byte_order(), None);
        assert_eq!(EncodingTag::Iso8859_1.byte_order(), None);
    }

    #[test]
    fn test_unicode_classification() {
        assert!(EncodingTag::Utf16Le.is_unicode());
        assert!(!EncodingTag::Ucs2Le.is_unicode());
        assert!(!EncodingTag::Ascii.is_unicode());
        assert!(!EncodingTag::Utf8.is_legacy());
    }

    #[test]
    fn test_native_wide() {
        let tag = EncodingTag::native_wide();
        assert_eq!(
            tag.unit_len(),
            core::mem::size_of::<crate::transcode::WideChar>()
        );
        assert_eq!(tag.byte_order(), Some(ByteOrder::NATIVE));
    }

    #[test]
    fn test_terminated_len() {
        assert_eq!(EncodingTag::Utf8.terminated_len(b"abc\0def"), 3);
        assert_eq!(EncodingTag::Utf8.terminated_len(b"abc"), 3);
        // 0x00 0x41 is 'A' in UTF-16BE, not a terminator
        let bytes = [0x00, 0x41, 0x00, 0x00, 0x00, 0x42];
        assert_eq!(EncodingTag::Utf16Be.terminated_len(&bytes), 2);
        // odd trailing byte is dropped
        assert_eq!(EncodingTag::Utf16Le.terminated_len(&[0x41, 0x00, 0x42]), 2);
        let bytes = [0x41, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(EncodingTag::Utf32Le.terminated_len(&bytes), 4);
    }

    #[test]
    fn test_byte_order_packing() {
        assert_eq!(ByteOrder::Big.write_u16(0x0041), [0x00, 0x41]);
        assert_eq!(ByteOrder::Little.write_u16(0x0041), [0x41, 0x00]);
        assert_eq!(ByteOrder::Big.read_u32([0, 1, 0xF6, 0]), 0x1F600);
        assert_eq!(ByteOrder::Little.read_u32([0, 0xF6, 1, 0]), 0x1F600);
    }
}
