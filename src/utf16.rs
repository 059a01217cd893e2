use crate::codepoint::is_valid_codepoint;
use crate::encoding::{nul_terminated_len, ByteOrder, EncodingTag, UnitCodec};
use crate::error::{Error, Result};

// Surrogate range constants
const SURROGATE_HIGH_START: u16 = 0xD800;
const SURROGATE_HIGH_END: u16 = 0xDBFF;
const SURROGATE_LOW_START: u16 = 0xDC00;
const SURROGATE_LOW_END: u16 = 0xDFFF;

const SUPPLEMENTARY_START: u32 = 0x10000;

#[inline]
fn is_high_surrogate(unit: u16) -> bool {
    (SURROGATE_HIGH_START..=SURROGATE_HIGH_END).contains(&unit)
}

#[inline]
fn is_low_surrogate(unit: u16) -> bool {
    (SURROGATE_LOW_START..=SURROGATE_LOW_END).contains(&unit)
}

#[inline]
fn read_unit(bytes: &[u8], at: usize, order: ByteOrder) -> u16 {
    order.read_u16([bytes[at], bytes[at + 1]])
}

fn ensure_capacity(out: &[u8], pos: usize, needed: usize) -> Result<()> {
    let available = out.len().saturating_sub(pos);
    if available < needed {
        return Err(Error::BufferTooSmall { needed, available });
    }
    Ok(())
}

/// Number of bytes `cp` needs in UTF-16: 2 in the BMP, 4 for a surrogate
/// pair, `None` if it is not a valid scalar.
pub const fn encoded_len(cp: u32) -> Option<usize> {
    if !is_valid_codepoint(cp) {
        None
    } else if cp < SUPPLEMENTARY_START {
        Some(2)
    } else {
        Some(4)
    }
}

/// Encodes `cp` as UTF-16 into `out[pos..]` and returns the bytes written.
///
/// BMP scalars take one unit. Scalars from U+10000 take a surrogate pair,
/// high unit first, each unit packed in `order`.
pub fn encode(cp: u32, out: &mut [u8], pos: usize, order: ByteOrder) -> Result<usize> {
    let len = encoded_len(cp).ok_or(Error::InvalidCodepoint { scalar: cp })?;
    ensure_capacity(out, pos, len)?;

    if len == 2 {
        out[pos..pos + 2].copy_from_slice(&order.write_u16(cp as u16));
    } else {
        let v = cp - SUPPLEMENTARY_START;
        let high = SURROGATE_HIGH_START + (v >> 10) as u16;
        let low = SURROGATE_LOW_START + (v & 0x3FF) as u16;
        out[pos..pos + 2].copy_from_slice(&order.write_u16(high));
        out[pos + 2..pos + 4].copy_from_slice(&order.write_u16(low));
    }
    Ok(len)
}

/// Decodes one UTF-16 scalar at `*pos`, advancing `*pos` by 2 or 4.
///
/// A high surrogate must be followed by a low surrogate; a lone low
/// surrogate, or a high surrogate followed by anything else, is
/// [`Error::MalformedUnit`]. A high surrogate at the end of the input is
/// [`Error::InsufficientInput`]. On failure `*pos` is unchanged.
pub fn decode(bytes: &[u8], pos: &mut usize, order: ByteOrder) -> Result<u32> {
    let start = *pos;
    let available = bytes.len().saturating_sub(start);
    if available < 2 {
        return Err(Error::InsufficientInput {
            position: start,
            needed: 2,
            available,
        });
    }

    let unit = read_unit(bytes, start, order);

    if is_high_surrogate(unit) {
        if available < 4 {
            return Err(Error::InsufficientInput {
                position: start,
                needed: 4,
                available,
            });
        }
        let low = read_unit(bytes, start + 2, order);
        if !is_low_surrogate(low) {
            return Err(Error::MalformedUnit { position: start });
        }

        let high = (unit - SURROGATE_HIGH_START) as u32;
        let low = (low - SURROGATE_LOW_START) as u32;
        *pos = start + 4;
        Ok(((high << 10) | low) + SUPPLEMENTARY_START)
    } else if is_low_surrogate(unit) {
        // Lone low surrogate
        Err(Error::MalformedUnit { position: start })
    } else {
        *pos = start + 2;
        Ok(unit as u32)
    }
}

/// Encodes `cp` as a single UCS-2 unit.
///
/// Scalars outside the BMP are [`Error::Unencodable`]; no surrogate pair is
/// produced.
pub fn encode_ucs2(cp: u32, out: &mut [u8], pos: usize, order: ByteOrder) -> Result<usize> {
    match encoded_len_ucs2(cp) {
        Some(_) => encode(cp, out, pos, order),
        None if is_valid_codepoint(cp) => Err(Error::Unencodable {
            scalar: cp,
            encoding: ucs2_tag(order).name(),
        }),
        None => Err(Error::InvalidCodepoint { scalar: cp }),
    }
}

/// Decodes one UCS-2 unit at `*pos`, advancing `*pos` by 2.
///
/// Any surrogate unit is [`Error::MalformedUnit`]; pairs are not combined.
pub fn decode_ucs2(bytes: &[u8], pos: &mut usize, order: ByteOrder) -> Result<u32> {
    let start = *pos;
    let available = bytes.len().saturating_sub(start);
    if available < 2 {
        return Err(Error::InsufficientInput {
            position: start,
            needed: 2,
            available,
        });
    }

    let unit = read_unit(bytes, start, order);
    if is_high_surrogate(unit) || is_low_surrogate(unit) {
        return Err(Error::MalformedUnit { position: start });
    }
    *pos = start + 2;
    Ok(unit as u32)
}

/// Number of bytes `cp` needs in UCS-2: always 2 for BMP scalars, `None`
/// otherwise.
pub const fn encoded_len_ucs2(cp: u32) -> Option<usize> {
    if is_valid_codepoint(cp) && cp < SUPPLEMENTARY_START {
        Some(2)
    } else {
        None
    }
}

/// Byte length of a UTF-16 or UCS-2 string terminated by a 0x0000 unit.
///
/// Without a terminator this is the slice length rounded down to whole
/// units.
pub fn length(bytes: &[u8]) -> usize {
    nul_terminated_len(bytes, 2)
}

const fn ucs2_tag(order: ByteOrder) -> EncodingTag {
    match order {
        ByteOrder::Big => EncodingTag::Ucs2Be,
        ByteOrder::Little => EncodingTag::Ucs2Le,
    }
}

macro_rules! utf16_codec {
    (
        $(#[$doc:meta])*
        $name:ident, $tag:ident, $order:expr, $max:expr,
        $encode:ident, $decode:ident, $encoded_len:ident
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name;

        impl UnitCodec for $name {
            const TAG: EncodingTag = EncodingTag::$tag;
            const MAX_CHAR_LEN: usize = $max;
            const NULL_LEN: usize = 2;

            #[inline]
            fn decode(bytes: &[u8], pos: &mut usize) -> Result<u32> {
                $decode(bytes, pos, $order)
            }

            #[inline]
            fn encode(cp: u32, out: &mut [u8], pos: usize) -> Result<usize> {
                $encode(cp, out, pos, $order)
            }

            #[inline]
            fn encoded_len(cp: u32) -> Option<usize> {
                $encoded_len(cp)
            }
        }
    };
}

utf16_codec!(
    /// UTF-16 Big Endian encoding marker.
    Utf16Be, Utf16Be, ByteOrder::Big, 4, encode, decode, encoded_len
);
utf16_codec!(
    /// UTF-16 Little Endian encoding marker.
    Utf16Le, Utf16Le, ByteOrder::Little, 4, encode, decode, encoded_len
);
utf16_codec!(
    /// UCS-2 Big Endian encoding marker.
    Ucs2Be, Ucs2Be, ByteOrder::Big, 2, encode_ucs2, decode_ucs2, encoded_len_ucs2
);
utf16_codec!(
    /// UCS-2 Little Endian encoding marker.
    Ucs2Le, Ucs2Le, ByteOrder::Little, 2, encode_ucs2, decode_ucs2, encoded_len_ucs2
);

// === Registry registration ===

#[cfg(feature = "registry")]
inventory::submit! {
    crate::registry::EncodingEntry {
        tag: EncodingTag::Utf16Be,
        aliases: &["UTF16BE", "UTF-16", "UTF16"],
    }
}

#[cfg(feature = "registry")]
inventory::submit! {
    crate::registry::EncodingEntry {
        tag: EncodingTag::Utf16Le,
        aliases: &["UTF16LE"],
    }
}

#[cfg(feature = "registry")]
inventory::submit! {
    crate::registry::EncodingEntry {
        tag: EncodingTag::Ucs2Be,
        aliases: &["UCS2BE", "UCS-2", "UCS2"],
    }
}

#[cfg(feature = "registry")]
inventory::submit! {
    crate::registry::EncodingEntry {
        tag: EncodingTag::Ucs2Le,
        aliases: &["UCS2LE"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_bmp_both_orders() {
        let mut buf = [0u8; 2];
        assert_eq!(encode(0x41, &mut buf, 0, ByteOrder::Big), Ok(2));
        assert_eq!(buf, [0x00, 0x41]);
        assert_eq!(encode(0x41, &mut buf, 0, ByteOrder::Little), Ok(2));
        assert_eq!(buf, [0x41, 0x00]);
    }

    #[test]
    fn test_encode_surrogate_pair() {
        let mut buf = [0u8; 4];
        assert_eq!(encode(0x1F600, &mut buf, 0, ByteOrder::Big), Ok(4));
        assert_eq!(buf, [0xD8, 0x3D, 0xDE, 0x00]);
        assert_eq!(encode(0x1F600, &mut buf, 0, ByteOrder::Little), Ok(4));
        assert_eq!(buf, [0x3D, 0xD8, 0x00, 0xDE]);
    }

    #[test]
    fn test_encode_extremes() {
        let mut buf = [0u8; 4];
        encode(0x10000, &mut buf, 0, ByteOrder::Big).unwrap();
        assert_eq!(buf, [0xD8, 0x00, 0xDC, 0x00]);
        encode(0x10FFFF, &mut buf, 0, ByteOrder::Big).unwrap();
        assert_eq!(buf, [0xDB, 0xFF, 0xDF, 0xFF]);
    }

    #[test]
    fn test_encode_rejects_invalid() {
        let mut buf = [0u8; 4];
        for cp in [0xD800, 0xDBFF, 0xDC00, 0xDFFF, 0x110000] {
            assert_eq!(
                encode(cp, &mut buf, 0, ByteOrder::Big),
                Err(Error::InvalidCodepoint { scalar: cp })
            );
        }
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 3];
        assert_eq!(
            encode(0x1F600, &mut buf, 0, ByteOrder::Big),
            Err(Error::BufferTooSmall {
                needed: 4,
                available: 3
            })
        );
        assert_eq!(buf, [0u8; 3]);
        assert!(encode(0x41, &mut buf, 2, ByteOrder::Big).is_err());
        assert_eq!(encode(0x41, &mut buf, 1, ByteOrder::Big), Ok(2));
    }

    #[test]
    fn test_decode_bmp() {
        let mut pos = 0;
        assert_eq!(decode(&[0x00, 0x68], &mut pos, ByteOrder::Big), Ok(0x68));
        assert_eq!(pos, 2);
        let mut pos = 0;
        assert_eq!(decode(&[0x68, 0x00], &mut pos, ByteOrder::Little), Ok(0x68));
    }

    #[test]
    fn test_decode_surrogate_pair() {
        let mut pos = 0;
        let bytes = [0xD8, 0x3D, 0xDE, 0x00];
        assert_eq!(decode(&bytes, &mut pos, ByteOrder::Big), Ok(0x1F600));
        assert_eq!(pos, 4);
    }

    #[test]
    fn test_decode_truncated_high_surrogate() {
        let mut pos = 0;
        assert_eq!(
            decode(&[0xD8, 0x00], &mut pos, ByteOrder::Big),
            Err(Error::InsufficientInput {
                position: 0,
                needed: 4,
                available: 2
            })
        );
        assert_eq!(pos, 0);
    }

    #[test]
    fn test_decode_unpaired_high_surrogate() {
        let mut pos = 0;
        assert_eq!(
            decode(&[0xD8, 0x3D, 0x00, 0x68], &mut pos, ByteOrder::Big),
            Err(Error::MalformedUnit { position: 0 })
        );
        assert_eq!(pos, 0);
    }

    #[test]
    fn test_decode_lone_low_surrogate() {
        let mut pos = 0;
        assert_eq!(
            decode(&[0xDE, 0x00, 0x00, 0x68], &mut pos, ByteOrder::Big),
            Err(Error::MalformedUnit { position: 0 })
        );
    }

    #[test]
    fn test_decode_odd_trailing_byte() {
        let bytes = [0x00, 0x68, 0x00];
        let mut pos = 0;
        assert_eq!(decode(&bytes, &mut pos, ByteOrder::Big), Ok(0x68));
        assert_eq!(
            decode(&bytes, &mut pos, ByteOrder::Big),
            Err(Error::InsufficientInput {
                position: 2,
                needed: 2,
                available: 1
            })
        );
        assert_eq!(pos, 2);
    }

    #[test]
    fn test_roundtrip_all_scalars() {
        let mut buf = [0u8; 4];
        for order in [ByteOrder::Big, ByteOrder::Little] {
            for cp in (0u32..=0x10FFFF).filter(|&cp| is_valid_codepoint(cp)) {
                let len = encode(cp, &mut buf, 0, order).unwrap();
                let mut pos = 0;
                assert_eq!(decode(&buf[..len], &mut pos, order), Ok(cp), "U+{:04X}", cp);
                assert_eq!(pos, len);
            }
        }
    }

    #[test]
    fn test_matches_std_encode_utf16() {
        let mut buf = [0u8; 4];
        let mut units = [0u16; 2];
        for c in ['h', 'é', '€', '\u{FFFD}', '😀', '\u{10FFFF}'] {
            let len = encode(c as u32, &mut buf, 0, ByteOrder::Big).unwrap();
            let expected: Vec<u8> = c
                .encode_utf16(&mut units)
                .iter()
                .flat_map(|u| u.to_be_bytes())
                .collect();
            assert_eq!(&buf[..len], expected.as_slice());
        }
    }

    #[test]
    fn test_ucs2_rejects_supplementary() {
        let mut buf = [0u8; 4];
        assert_eq!(
            encode_ucs2(0x1F600, &mut buf, 0, ByteOrder::Big),
            Err(Error::Unencodable {
                scalar: 0x1F600,
                encoding: "UCS-2BE"
            })
        );
        assert_eq!(
            encode_ucs2(0xD800, &mut buf, 0, ByteOrder::Little),
            Err(Error::InvalidCodepoint { scalar: 0xD800 })
        );
        assert_eq!(encode_ucs2(0xFFFD, &mut buf, 0, ByteOrder::Little), Ok(2));
        assert_eq!(&buf[..2], &[0xFD, 0xFF]);
    }

    #[test]
    fn test_ucs2_rejects_surrogate_units() {
        let mut pos = 0;
        assert_eq!(
            decode_ucs2(&[0xD8, 0x3D, 0xDE, 0x00], &mut pos, ByteOrder::Big),
            Err(Error::MalformedUnit { position: 0 })
        );
        assert_eq!(
            decode_ucs2(&[0xDE, 0x00], &mut pos, ByteOrder::Big),
            Err(Error::MalformedUnit { position: 0 })
        );
        assert_eq!(pos, 0);
        assert_eq!(decode_ucs2(&[0x20, 0xAC], &mut pos, ByteOrder::Big), Ok(0x20AC));
        assert_eq!(pos, 2);
    }

    #[test]
    fn test_markers() {
        let mut buf = [0u8; 4];
        assert_eq!(Utf16Le::encode(0x1F600, &mut buf, 0), Ok(4));
        let mut pos = 0;
        assert_eq!(Utf16Le::decode(&buf, &mut pos), Ok(0x1F600));
        assert!(Ucs2Le::encode(0x1F600, &mut buf, 0).is_err());
        assert_eq!(Ucs2Be::NAME, "UCS-2BE");
        assert_eq!(Utf16Be::MAX_CHAR_LEN, 4);
        assert_eq!(Ucs2Be::MAX_CHAR_LEN, 2);
    }

    #[test]
    fn test_length() {
        assert_eq!(length(&[0x00, 0x41, 0x00, 0x42, 0x00, 0x00, 0x00, 0x43]), 4);
        assert_eq!(length(&[0x41, 0x00, 0x42]), 2);
        assert_eq!(length(&[0x00, 0x00]), 0);
    }
}
