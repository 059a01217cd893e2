//! Transcoding between Unicode encoding forms and legacy single-byte charsets.
//!
//! Supported encodings:
//!
//! - UTF-8
//! - UTF-16 and UCS-2, both byte orders
//! - UTF-32 and UCS-4, both byte orders
//! - ASCII and ISO-8859-1 through ISO-8859-16 (ISO-8859-12 does not exist)
//!
//! The crate works at two levels. Per-scalar codecs ([`Utf8`], [`Utf16Be`],
//! ... through the [`UnitCodec`] trait) encode into and decode from
//! caller-owned buffers with an explicit cursor. Whole-buffer functions
//! ([`encode_to_utf8`], [`decode_from_utf8`], [`transcode`]) convert
//! complete inputs, all-or-nothing, with UTF-8 as the pivot.
//!
//! # Example
//!
//! ```
//! use transcodec::{decode_from_utf8, encode_to_utf8, EncodingTag, UnitCodec, Utf8};
//!
//! // One scalar at a time
//! let mut buf = [0u8; 4];
//! let len = Utf8::encode(0x20AC, &mut buf, 0).unwrap();
//! assert_eq!(&buf[..len], "€".as_bytes());
//!
//! // Whole buffers
//! let latin1 = encode_to_utf8(EncodingTag::Iso8859_1, b"na\xEFve").unwrap();
//! assert_eq!(latin1, "naïve".as_bytes());
//! let ucs2 = decode_from_utf8(&latin1, EncodingTag::Ucs2Be).unwrap();
//! assert_eq!(&ucs2[4..6], &[0x00, 0xEF]);
//! ```

#![deny(missing_docs)]

extern crate alloc;

/// Legacy single-byte charsets.
pub mod codepages;
/// Scalar value model.
pub mod codepoint;
/// Encoding tags, byte order, and the codec trait.
pub mod encoding;
/// Error types for codec operations.
pub mod error;
/// Whole-buffer conversion.
pub mod transcode;
/// UTF-16 and UCS-2 codecs.
pub mod utf16;
/// UTF-32 and UCS-4 codecs.
pub mod utf32;
/// UTF-8 codec.
pub mod utf8;

/// Runtime encoding registry for dynamic encoding selection.
#[cfg(feature = "registry")]
pub mod registry;

pub use codepoint::{is_valid_codepoint, INVALID_CODEPOINT, MAX_CODEPOINT};
pub use encoding::{ByteOrder, EncodingTag, UnitCodec};
pub use error::{Error, Result};
pub use transcode::{
    decode_from_utf8, decode_from_utf8_until_nul, decode_utf8_to_wide, encode_to_utf8,
    encode_to_utf8_until_nul, encode_wide_to_utf8, transcode, WideChar,
};
pub use utf16::{Ucs2Be, Ucs2Le, Utf16Be, Utf16Le};
pub use utf32::{Ucs4Be, Ucs4Le, Utf32Be, Utf32Le};
pub use utf8::Utf8;
