use crate::codepoint::is_valid_codepoint;
use crate::encoding::{nul_terminated_len, EncodingTag, UnitCodec};
use crate::error::{Error, Result};

/// UTF-8 encoding marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Utf8;

// Marker bits of each byte kind
const CONTINUATION_BITS: u8 = 0x80; // 10xx xxxx
const LEADING2_BITS: u8 = 0xC0; // 110x xxxx
const LEADING3_BITS: u8 = 0xE0; // 1110 xxxx
const LEADING4_BITS: u8 = 0xF0; // 1111 0xxx

// Payload masks
const CONTINUATION_MASK: u32 = 0x3F;
const LEADING2_MASK: u8 = 0x1F;
const LEADING3_MASK: u8 = 0x0F;
const LEADING4_MASK: u8 = 0x07;

/// Smallest scalar that needs `n` bytes, indexed by `n - 1`.
const MIN_FOR_LEN: [u32; 4] = [0x0000_0000, 0x0000_0080, 0x0000_0800, 0x0001_0000];

/// Returns true if the byte is a single-byte (ASCII) sequence (0xxxxxxx).
#[inline]
pub const fn is_single(b: u8) -> bool {
    b & 0x80 == 0x00
}

/// Returns true if the byte starts a multi-byte sequence (11xxxxxx).
#[inline]
pub const fn is_leading(b: u8) -> bool {
    b & 0xC0 == 0xC0
}

/// Returns true if the byte is a UTF-8 continuation byte (10xxxxxx).
#[inline]
pub const fn is_continuation(b: u8) -> bool {
    b & 0xC0 == CONTINUATION_BITS
}

/// Number of bytes needed to encode `cp`, or `None` if it is not a valid
/// scalar.
pub const fn encoded_len(cp: u32) -> Option<usize> {
    if !is_valid_codepoint(cp) {
        return None;
    }
    Some(if cp < MIN_FOR_LEN[1] {
        1
    } else if cp < MIN_FOR_LEN[2] {
        2
    } else if cp < MIN_FOR_LEN[3] {
        3
    } else {
        4
    })
}

/// Encodes `cp` into `out[pos..]`, returning the number of bytes written.
///
/// Fails with [`Error::InvalidCodepoint`] for surrogates and values above
/// U+10FFFF, and with [`Error::BufferTooSmall`] when fewer bytes remain than
/// the sequence needs. Nothing is written on failure.
pub fn encode(cp: u32, out: &mut [u8], pos: usize) -> Result<usize> {
    let len = encoded_len(cp).ok_or(Error::InvalidCodepoint { scalar: cp })?;
    let available = out.len().saturating_sub(pos);
    if available < len {
        return Err(Error::BufferTooSmall {
            needed: len,
            available,
        });
    }

    let dst = &mut out[pos..pos + len];
    match len {
        1 => dst[0] = cp as u8,
        2 => {
            dst[0] = LEADING2_BITS | (cp >> 6) as u8;
            dst[1] = continuation(cp);
        }
        3 => {
            dst[0] = LEADING3_BITS | (cp >> 12) as u8;
            dst[1] = continuation(cp >> 6);
            dst[2] = continuation(cp);
        }
        _ => {
            dst[0] = LEADING4_BITS | (cp >> 18) as u8;
            dst[1] = continuation(cp >> 12);
            dst[2] = continuation(cp >> 6);
            dst[3] = continuation(cp);
        }
    }
    Ok(len)
}

#[inline]
fn continuation(bits: u32) -> u8 {
    CONTINUATION_BITS | (bits & CONTINUATION_MASK) as u8
}

/// Decodes the sequence starting at `*pos` and advances `*pos` past it.
///
/// The leading byte fixes the sequence length; every following byte must be
/// a continuation byte. A sequence that assembles to a value encodable in
/// fewer bytes is rejected as [`Error::OverlongEncoding`].
///
/// The result is not range-checked: a well-formed four-byte sequence may
/// yield a value above U+10FFFF, and three-byte sequences may yield
/// surrogates. Apply [`is_valid_codepoint`] when that matters; [`validate`]
/// and the whole-buffer conversions do.
///
/// On failure `*pos` is unchanged.
pub fn decode(bytes: &[u8], pos: &mut usize) -> Result<u32> {
    let start = *pos;
    let available = bytes.len().saturating_sub(start);
    let lead = match bytes.get(start) {
        Some(&b) => b,
        None => {
            return Err(Error::InsufficientInput {
                position: start,
                needed: 1,
                available,
            })
        }
    };

    let (len, mut cp) = if is_single(lead) {
        (1, lead as u32)
    } else if lead & !LEADING2_MASK == LEADING2_BITS {
        (2, (lead & LEADING2_MASK) as u32)
    } else if lead & !LEADING3_MASK == LEADING3_BITS {
        (3, (lead & LEADING3_MASK) as u32)
    } else if lead & !LEADING4_MASK == LEADING4_BITS {
        (4, (lead & LEADING4_MASK) as u32)
    } else {
        // stray continuation byte or 0xF8..=0xFF
        return Err(Error::MalformedUnit { position: start });
    };

    for i in 1..len {
        let b = match bytes.get(start + i) {
            Some(&b) => b,
            None => {
                return Err(Error::InsufficientInput {
                    position: start,
                    needed: len,
                    available,
                })
            }
        };
        if !is_continuation(b) {
            return Err(Error::MalformedUnit { position: start });
        }
        cp = (cp << 6) | (b as u32 & CONTINUATION_MASK);
    }

    if cp < MIN_FOR_LEN[len - 1] {
        return Err(Error::OverlongEncoding {
            position: start,
            scalar: cp,
        });
    }

    *pos = start + len;
    Ok(cp)
}

/// Byte length of a null-terminated UTF-8 string: the offset of the first
/// zero byte, or `bytes.len()` if there is none.
pub fn length(bytes: &[u8]) -> usize {
    nul_terminated_len(bytes, 1)
}

/// Checks that `bytes` is entirely well-formed UTF-8, stopping at the first
/// bad sequence.
///
/// Unlike [`decode`], this also rejects sequences that decode to surrogates
/// or to values above U+10FFFF.
pub fn validate(bytes: &[u8]) -> Result<()> {
    let mut pos = 0;
    while pos < bytes.len() {
        let cp = decode(bytes, &mut pos)?;
        if !is_valid_codepoint(cp) {
            return Err(Error::InvalidCodepoint { scalar: cp });
        }
    }
    Ok(())
}

/// Returns `true` if [`validate`] succeeds.
#[inline]
pub fn is_well_formed(bytes: &[u8]) -> bool {
    validate(bytes).is_ok()
}

impl UnitCodec for Utf8 {
    const TAG: EncodingTag = EncodingTag::Utf8;
    const MAX_CHAR_LEN: usize = 4;
    const NULL_LEN: usize = 1;

    #[inline]
    fn decode(bytes: &[u8], pos: &mut usize) -> Result<u32> {
        decode(bytes, pos)
    }

    #[inline]
    fn encode(cp: u32, out: &mut [u8], pos: usize) -> Result<usize> {
        encode(cp, out, pos)
    }

    #[inline]
    fn encoded_len(cp: u32) -> Option<usize> {
        encoded_len(cp)
    }
}

// === Registry registration ===

#[cfg(feature = "registry")]
inventory::submit! {
    crate::registry::EncodingEntry {
        tag: EncodingTag::Utf8,
        aliases: &["UTF8"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> Result<u32> {
        let mut pos = 0;
        decode(bytes, &mut pos)
    }

    #[test]
    fn test_encode_lengths() {
        let mut buf = [0u8; 4];
        assert_eq!(encode(0x41, &mut buf, 0), Ok(1));
        assert_eq!(buf[0], 0x41);
        assert_eq!(encode(0xE9, &mut buf, 0), Ok(2));
        assert_eq!(&buf[..2], &[0xC3, 0xA9]);
        assert_eq!(encode(0x20AC, &mut buf, 0), Ok(3));
        assert_eq!(&buf[..3], &[0xE2, 0x82, 0xAC]);
        assert_eq!(encode(0x1F600, &mut buf, 0), Ok(4));
        assert_eq!(&buf, &[0xF0, 0x9F, 0x98, 0x80]);
    }

    #[test]
    fn test_encode_boundaries() {
        assert_eq!(encoded_len(0x7F), Some(1));
        assert_eq!(encoded_len(0x80), Some(2));
        assert_eq!(encoded_len(0x7FF), Some(2));
        assert_eq!(encoded_len(0x800), Some(3));
        assert_eq!(encoded_len(0xFFFF), Some(3));
        assert_eq!(encoded_len(0x10000), Some(4));
        assert_eq!(encoded_len(0x10FFFF), Some(4));
        assert_eq!(encoded_len(0x110000), None);
    }

    #[test]
    fn test_encode_at_position() {
        let mut buf = [0u8; 6];
        assert_eq!(encode(0x20AC, &mut buf, 3), Ok(3));
        assert_eq!(&buf, &[0, 0, 0, 0xE2, 0x82, 0xAC]);
    }

    #[test]
    fn test_encode_rejects_invalid() {
        let mut buf = [0u8; 4];
        assert_eq!(
            encode(0xD800, &mut buf, 0),
            Err(Error::InvalidCodepoint { scalar: 0xD800 })
        );
        assert_eq!(
            encode(0x110000, &mut buf, 0),
            Err(Error::InvalidCodepoint { scalar: 0x110000 })
        );
        assert_eq!(buf, [0u8; 4]);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 4];
        assert_eq!(
            encode(0x1F600, &mut buf, 1),
            Err(Error::BufferTooSmall {
                needed: 4,
                available: 3
            })
        );
        assert_eq!(
            encode(0x41, &mut buf, 4),
            Err(Error::BufferTooSmall {
                needed: 1,
                available: 0
            })
        );
        assert_eq!(buf, [0u8; 4]);
    }

    #[test]
    fn test_encode_matches_std() {
        let mut buf = [0u8; 4];
        let mut expected = [0u8; 4];
        for cp in (0u32..=0x10FFFF).step_by(7) {
            if let Some(c) = char::from_u32(cp) {
                let len = encode(cp, &mut buf, 0).unwrap();
                assert_eq!(&buf[..len], c.encode_utf8(&mut expected).as_bytes());
            }
        }
    }

    #[test]
    fn test_roundtrip_all_scalars() {
        let mut buf = [0u8; 4];
        for cp in (0u32..=0x10FFFF).filter(|&cp| is_valid_codepoint(cp)) {
            let len = encode(cp, &mut buf, 0).unwrap();
            let mut pos = 0;
            assert_eq!(decode(&buf[..len], &mut pos), Ok(cp), "U+{:04X}", cp);
            assert_eq!(pos, len);
        }
    }

    #[test]
    fn test_decode_overlong() {
        // U+0000 in three bytes
        assert_eq!(
            decode_all(&[0xE0, 0x80, 0x80]),
            Err(Error::OverlongEncoding {
                position: 0,
                scalar: 0
            })
        );
        // '/' in two bytes
        assert!(matches!(
            decode_all(&[0xC0, 0xAF]),
            Err(Error::OverlongEncoding { scalar: 0x2F, .. })
        ));
        // U+FFFF in four bytes
        assert!(matches!(
            decode_all(&[0xF0, 0x8F, 0xBF, 0xBF]),
            Err(Error::OverlongEncoding { scalar: 0xFFFF, .. })
        ));
    }

    #[test]
    fn test_decode_bad_continuation() {
        assert_eq!(
            decode_all(&[0xE2, 0x41, 0xAC]),
            Err(Error::MalformedUnit { position: 0 })
        );
    }

    #[test]
    fn test_decode_bad_leading() {
        assert_eq!(decode_all(&[0x80]), Err(Error::MalformedUnit { position: 0 }));
        assert_eq!(decode_all(&[0xF8, 0x80, 0x80, 0x80, 0x80]), Err(Error::MalformedUnit { position: 0 }));
        assert_eq!(decode_all(&[0xFF]), Err(Error::MalformedUnit { position: 0 }));
    }

    #[test]
    fn test_decode_truncated_keeps_cursor() {
        let bytes = [0x41, 0xE2, 0x82];
        let mut pos = 1;
        assert_eq!(
            decode(&bytes, &mut pos),
            Err(Error::InsufficientInput {
                position: 1,
                needed: 3,
                available: 2
            })
        );
        assert_eq!(pos, 1);
    }

    #[test]
    fn test_decode_at_end() {
        let mut pos = 2;
        assert!(matches!(
            decode(b"ab", &mut pos),
            Err(Error::InsufficientInput { needed: 1, .. })
        ));
    }

    #[test]
    fn test_decode_sequence() {
        let bytes = "a€😀".as_bytes();
        let mut pos = 0;
        assert_eq!(decode(bytes, &mut pos), Ok(0x61));
        assert_eq!(decode(bytes, &mut pos), Ok(0x20AC));
        assert_eq!(decode(bytes, &mut pos), Ok(0x1F600));
        assert_eq!(pos, bytes.len());
    }

    #[test]
    fn test_decode_leaves_range_check_to_caller() {
        // Syntactically valid, overlong-free, but above U+10FFFF
        assert_eq!(decode_all(&[0xF4, 0x90, 0x80, 0x80]), Ok(0x110000));
        // Encoded surrogate
        assert_eq!(decode_all(&[0xED, 0xA0, 0x80]), Ok(0xD800));

        assert!(!is_well_formed(&[0xF4, 0x90, 0x80, 0x80]));
        assert!(!is_well_formed(&[0xED, 0xA0, 0x80]));
    }

    #[test]
    fn test_validate() {
        assert!(validate(b"").is_ok());
        assert!(validate("héllo wörld €😀".as_bytes()).is_ok());
        assert_eq!(
            validate(&[0x41, 0x42, 0xC3]),
            Err(Error::InsufficientInput {
                position: 2,
                needed: 2,
                available: 1
            })
        );
        assert!(!is_well_formed(&[0x41, 0xE0, 0x80, 0x80]));
    }

    #[test]
    fn test_length() {
        assert_eq!(length(b"hello\0world"), 5);
        assert_eq!(length(b"\0"), 0);
        assert_eq!(length(b"abc"), 3);
        assert_eq!(length(&[]), 0);
    }

    #[test]
    fn test_byte_classes() {
        assert!(is_single(b'a'));
        assert!(!is_single(0xC3));
        assert!(is_leading(0xC3));
        assert!(is_leading(0xF0));
        assert!(!is_leading(0xA9));
        assert!(is_continuation(0xA9));
        assert!(!is_continuation(0x41));
    }
}
