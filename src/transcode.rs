//! Whole-buffer conversion between any supported encoding and UTF-8.
//!
//! UTF-8 is the pivot: [`encode_to_utf8`] brings input into UTF-8 and
//! [`decode_from_utf8`] takes it out again. Every function here is
//! all-or-nothing. The first failing unit aborts the call and any output
//! produced so far is dropped.
//!
//! # Example
//!
//! ```
//! use transcodec::{decode_from_utf8, encode_to_utf8, transcode, EncodingTag};
//!
//! let utf16 = decode_from_utf8("h€".as_bytes(), EncodingTag::Utf16Le).unwrap();
//! assert_eq!(utf16, [0x68, 0x00, 0xAC, 0x20]);
//! assert_eq!(encode_to_utf8(EncodingTag::Utf16Le, &utf16).unwrap(), "h€".as_bytes());
//!
//! let latin9 = transcode(&utf16, EncodingTag::Utf16Le, EncodingTag::Iso8859_15).unwrap();
//! assert_eq!(latin9, b"h\xA4");
//! ```

use alloc::vec::Vec;

use crate::codepages::Codepage;
use crate::codepoint::is_valid_codepoint;
use crate::encoding::{EncodingTag, UnitCodec};
use crate::error::{Error, Result};
use crate::utf16::{Ucs2Be, Ucs2Le, Utf16Be, Utf16Le};
use crate::utf32::{Ucs4Be, Ucs4Le, Utf32Be, Utf32Le};
use crate::utf8;

/// The platform's `wchar_t`.
#[cfg(windows)]
pub type WideChar = u16;
/// The platform's `wchar_t`.
#[cfg(not(windows))]
pub type WideChar = u32;

const WIDE_LEN: usize = core::mem::size_of::<WideChar>();

#[inline]
fn traced<T>(tag: EncodingTag, op: &'static str, result: Result<T>) -> Result<T> {
    #[cfg(feature = "tracing")]
    {
        if let Err(err) = &result {
            tracing::trace!(encoding = tag.name(), op, error = %err, "conversion failed");
        }
    }
    #[cfg(not(feature = "tracing"))]
    let _ = (tag, op);
    result
}

fn units_to_utf8<C: UnitCodec>(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut buf = [0u8; 4];
    let mut pos = 0;
    while pos < input.len() {
        let cp = C::decode(input, &mut pos)?;
        if !is_valid_codepoint(cp) {
            return Err(Error::InvalidCodepoint { scalar: cp });
        }
        let len = utf8::encode(cp, &mut buf, 0)?;
        out.extend_from_slice(&buf[..len]);
    }
    Ok(out)
}

fn utf8_to_units<C: UnitCodec>(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len() * C::NULL_LEN);
    let mut buf = [0u8; 4];
    let mut pos = 0;
    while pos < input.len() {
        let cp = utf8::decode(input, &mut pos)?;
        let len = C::encode(cp, &mut buf, 0)?;
        out.extend_from_slice(&buf[..len]);
    }
    Ok(out)
}

/// Converts `input` in encoding `tag` to UTF-8.
///
/// UTF-8 input is copied through as is. Legacy charsets go through their
/// forward table. The Unicode forms are decoded unit by unit and every
/// decoded value must be a valid scalar.
pub fn encode_to_utf8(tag: EncodingTag, input: &[u8]) -> Result<Vec<u8>> {
    let result = if let Some(page) = Codepage::from_tag(tag) {
        page.to_utf8(input)
    } else {
        match tag {
            EncodingTag::Ucs2Be => units_to_utf8::<Ucs2Be>(input),
            EncodingTag::Ucs2Le => units_to_utf8::<Ucs2Le>(input),
            EncodingTag::Utf16Be => units_to_utf8::<Utf16Be>(input),
            EncodingTag::Utf16Le => units_to_utf8::<Utf16Le>(input),
            EncodingTag::Ucs4Be => units_to_utf8::<Ucs4Be>(input),
            EncodingTag::Ucs4Le => units_to_utf8::<Ucs4Le>(input),
            EncodingTag::Utf32Be => units_to_utf8::<Utf32Be>(input),
            EncodingTag::Utf32Le => units_to_utf8::<Utf32Le>(input),
            // UTF-8; legacy tags were handled above
            _ => Ok(input.to_vec()),
        }
    };
    traced(tag, "encode_to_utf8", result)
}

/// Converts UTF-8 `input` to encoding `tag`.
///
/// The inverse of [`encode_to_utf8`]. A UTF-8 target copies the input
/// through as is.
pub fn decode_from_utf8(input: &[u8], tag: EncodingTag) -> Result<Vec<u8>> {
    let result = if let Some(page) = Codepage::from_tag(tag) {
        page.from_utf8(input)
    } else {
        match tag {
            EncodingTag::Ucs2Be => utf8_to_units::<Ucs2Be>(input),
            EncodingTag::Ucs2Le => utf8_to_units::<Ucs2Le>(input),
            EncodingTag::Utf16Be => utf8_to_units::<Utf16Be>(input),
            EncodingTag::Utf16Le => utf8_to_units::<Utf16Le>(input),
            EncodingTag::Ucs4Be => utf8_to_units::<Ucs4Be>(input),
            EncodingTag::Ucs4Le => utf8_to_units::<Ucs4Le>(input),
            EncodingTag::Utf32Be => utf8_to_units::<Utf32Be>(input),
            EncodingTag::Utf32Le => utf8_to_units::<Utf32Le>(input),
            _ => Ok(input.to_vec()),
        }
    };
    traced(tag, "decode_from_utf8", result)
}

/// Like [`encode_to_utf8`], but stops at the first all-zero code unit.
pub fn encode_to_utf8_until_nul(tag: EncodingTag, input: &[u8]) -> Result<Vec<u8>> {
    encode_to_utf8(tag, &input[..tag.terminated_len(input)])
}

/// Like [`decode_from_utf8`], but stops at the first zero byte.
///
/// The output carries no terminator.
pub fn decode_from_utf8_until_nul(input: &[u8], tag: EncodingTag) -> Result<Vec<u8>> {
    decode_from_utf8(&input[..utf8::length(input)], tag)
}

/// Converts `input` from one encoding to another through UTF-8.
pub fn transcode(input: &[u8], from: EncodingTag, to: EncodingTag) -> Result<Vec<u8>> {
    let utf8 = encode_to_utf8(from, input)?;
    decode_from_utf8(&utf8, to)
}

/// Converts a platform wide string to UTF-8.
///
/// Units are interpreted as [`EncodingTag::native_wide`].
pub fn encode_wide_to_utf8(input: &[WideChar]) -> Result<Vec<u8>> {
    let bytes: Vec<u8> = input.iter().flat_map(|unit| unit.to_ne_bytes()).collect();
    encode_to_utf8(EncodingTag::native_wide(), &bytes)
}

/// Converts UTF-8 to a platform wide string.
pub fn decode_utf8_to_wide(input: &[u8]) -> Result<Vec<WideChar>> {
    let bytes = decode_from_utf8(input, EncodingTag::native_wide())?;
    Ok(bytes
        .chunks_exact(WIDE_LEN)
        .map(|chunk| {
            let mut raw = [0u8; WIDE_LEN];
            raw.copy_from_slice(chunk);
            WideChar::from_ne_bytes(raw)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Aé€\u{1F600}中";

    #[test]
    fn test_utf8_passthrough() {
        // Passthrough does not validate
        let bytes = [0x41, 0xFF, 0xC0];
        assert_eq!(encode_to_utf8(EncodingTag::Utf8, &bytes).unwrap(), bytes);
        assert_eq!(decode_from_utf8(&bytes, EncodingTag::Utf8).unwrap(), bytes);
    }

    #[test]
    fn test_unicode_forms_roundtrip() {
        for tag in EncodingTag::ALL.into_iter().filter(|t| t.is_unicode()) {
            let encoded = decode_from_utf8(SAMPLE.as_bytes(), tag).unwrap();
            assert_eq!(
                encode_to_utf8(tag, &encoded).unwrap(),
                SAMPLE.as_bytes(),
                "{tag}"
            );
        }
    }

    #[test]
    fn test_utf16_matches_std() {
        let expected: Vec<u8> = SAMPLE.encode_utf16().flat_map(u16::to_be_bytes).collect();
        assert_eq!(
            decode_from_utf8(SAMPLE.as_bytes(), EncodingTag::Utf16Be).unwrap(),
            expected
        );
    }

    #[test]
    fn test_ucs2_rejects_supplementary() {
        assert_eq!(
            decode_from_utf8("a\u{1F600}".as_bytes(), EncodingTag::Ucs2Le),
            Err(Error::Unencodable {
                scalar: 0x1F600,
                encoding: "UCS-2LE"
            })
        );
        assert!(matches!(
            encode_to_utf8(EncodingTag::Ucs2Be, &[0xD8, 0x3D, 0xDE, 0x00]),
            Err(Error::MalformedUnit { position: 0 })
        ));
    }

    #[test]
    fn test_utf32_rejects_invalid_scalar() {
        assert_eq!(
            encode_to_utf8(EncodingTag::Utf32Be, &[0, 0, 0, 0x41, 0, 0x11, 0, 0]),
            Err(Error::InvalidCodepoint { scalar: 0x110000 })
        );
        assert_eq!(
            encode_to_utf8(EncodingTag::Ucs4Le, &[0x00, 0xD8, 0, 0]),
            Err(Error::InvalidCodepoint { scalar: 0xD800 })
        );
    }

    #[test]
    fn test_utf8_surrogate_rejected_by_target() {
        // ED A0 80 is a UTF-8-shaped surrogate
        assert_eq!(
            decode_from_utf8(&[0xED, 0xA0, 0x80], EncodingTag::Utf16Le),
            Err(Error::InvalidCodepoint { scalar: 0xD800 })
        );
    }

    #[test]
    fn test_truncated_unit() {
        assert!(matches!(
            encode_to_utf8(EncodingTag::Utf16Le, &[0x41, 0x00, 0x42]),
            Err(Error::InsufficientInput { position: 2, .. })
        ));
        assert!(matches!(
            encode_to_utf8(EncodingTag::Utf32Le, &[0x41, 0x00]),
            Err(Error::InsufficientInput { position: 0, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        for tag in EncodingTag::ALL {
            assert_eq!(encode_to_utf8(tag, &[]).unwrap(), Vec::<u8>::new());
            assert_eq!(decode_from_utf8(&[], tag).unwrap(), Vec::<u8>::new());
        }
    }

    #[test]
    fn test_until_nul() {
        let utf16 = [0x41, 0x00, 0x42, 0x00, 0x00, 0x00, 0x43, 0x00];
        assert_eq!(
            encode_to_utf8_until_nul(EncodingTag::Utf16Le, &utf16).unwrap(),
            b"AB"
        );
        assert_eq!(
            decode_from_utf8_until_nul(b"hi\0there", EncodingTag::Utf32Be).unwrap(),
            [0, 0, 0, b'h', 0, 0, 0, b'i']
        );
        assert_eq!(
            encode_to_utf8_until_nul(EncodingTag::Iso8859_1, b"\xE9\0\xFF").unwrap(),
            "é".as_bytes()
        );
    }

    #[test]
    fn test_transcode_between_forms() {
        let utf32 = transcode(
            &[0xD8, 0x3D, 0xDE, 0x00],
            EncodingTag::Utf16Be,
            EncodingTag::Utf32Le,
        )
        .unwrap();
        assert_eq!(utf32, [0x00, 0xF6, 0x01, 0x00]);

        let latin2 =
            transcode("Łódź".as_bytes(), EncodingTag::Utf8, EncodingTag::Iso8859_2).unwrap();
        assert_eq!(latin2, b"\xA3\xF3d\xBC");
        assert_eq!(
            transcode(&latin2, EncodingTag::Iso8859_2, EncodingTag::Utf8).unwrap(),
            "Łódź".as_bytes()
        );
    }

    #[test]
    fn test_transcode_unmapped() {
        assert_eq!(
            transcode(b"\xE9", EncodingTag::Iso8859_1, EncodingTag::Ascii),
            Err(Error::UnmappedScalar {
                scalar: 0xE9,
                position: 0
            })
        );
    }

    #[test]
    fn test_wide_roundtrip() {
        let wide = decode_utf8_to_wide(SAMPLE.as_bytes()).unwrap();
        #[cfg(not(windows))]
        assert_eq!(wide, SAMPLE.chars().map(|c| c as u32).collect::<Vec<_>>());
        #[cfg(windows)]
        assert_eq!(wide, SAMPLE.encode_utf16().collect::<Vec<_>>());
        assert_eq!(encode_wide_to_utf8(&wide).unwrap(), SAMPLE.as_bytes());
    }

    #[test]
    fn test_native_wide_tag() {
        let tag = EncodingTag::native_wide();
        assert_eq!(tag.unit_len(), WIDE_LEN);
        assert_eq!(tag.byte_order(), Some(crate::ByteOrder::NATIVE));
    }
}
