use crate::codepoint::is_valid_codepoint;
use crate::encoding::{nul_terminated_len, ByteOrder, EncodingTag, UnitCodec};
use crate::error::{Error, Result};

/// Encodes `cp` as one 4-byte unit in `order` at `out[pos..]`.
///
/// Invalid scalars are rejected like in every other form, even though any
/// `u32` would fit.
pub fn encode(cp: u32, out: &mut [u8], pos: usize, order: ByteOrder) -> Result<usize> {
    if !is_valid_codepoint(cp) {
        return Err(Error::InvalidCodepoint { scalar: cp });
    }
    let available = out.len().saturating_sub(pos);
    if available < 4 {
        return Err(Error::BufferTooSmall {
            needed: 4,
            available,
        });
    }
    out[pos..pos + 4].copy_from_slice(&order.write_u32(cp));
    Ok(4)
}

/// Reads one 4-byte unit in `order` at `*pos` and returns it verbatim.
///
/// The value is not validated; check it with [`is_valid_codepoint`] if
/// needed. Fails only when fewer than 4 bytes remain, leaving `*pos`
/// unchanged.
pub fn decode(bytes: &[u8], pos: &mut usize, order: ByteOrder) -> Result<u32> {
    let start = *pos;
    let available = bytes.len().saturating_sub(start);
    if available < 4 {
        return Err(Error::InsufficientInput {
            position: start,
            needed: 4,
            available,
        });
    }
    let cp = order.read_u32([
        bytes[start],
        bytes[start + 1],
        bytes[start + 2],
        bytes[start + 3],
    ]);
    *pos = start + 4;
    Ok(cp)
}

/// Always 4 for valid scalars.
pub const fn encoded_len(cp: u32) -> Option<usize> {
    if is_valid_codepoint(cp) {
        Some(4)
    } else {
        None
    }
}

/// Byte length of a UTF-32 string terminated by a zero unit.
pub fn length(bytes: &[u8]) -> usize {
    nul_terminated_len(bytes, 4)
}

macro_rules! utf32_codec {
    ($(#[$doc:meta])* $name:ident, $tag:ident, $order:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name;

        impl UnitCodec for $name {
            const TAG: EncodingTag = EncodingTag::$tag;
            const MAX_CHAR_LEN: usize = 4;
            const NULL_LEN: usize = 4;

            #[inline]
            fn decode(bytes: &[u8], pos: &mut usize) -> Result<u32> {
                decode(bytes, pos, $order)
            }

            #[inline]
            fn encode(cp: u32, out: &mut [u8], pos: usize) -> Result<usize> {
                encode(cp, out, pos, $order)
            }

            #[inline]
            fn encoded_len(cp: u32) -> Option<usize> {
                encoded_len(cp)
            }
        }
    };
}

utf32_codec!(
    /// UTF-32 Big Endian encoding marker.
    Utf32Be, Utf32Be, ByteOrder::Big
);
utf32_codec!(
    /// UTF-32 Little Endian encoding marker.
    Utf32Le, Utf32Le, ByteOrder::Little
);
utf32_codec!(
    /// UCS-4 Big Endian encoding marker. Same wire format as UTF-32BE.
    Ucs4Be, Ucs4Be, ByteOrder::Big
);
utf32_codec!(
    /// UCS-4 Little Endian encoding marker. Same wire format as UTF-32LE.
    Ucs4Le, Ucs4Le, ByteOrder::Little
);

// === Registry registration ===

#[cfg(feature = "registry")]
inventory::submit! {
    crate::registry::EncodingEntry {
        tag: EncodingTag::Utf32Be,
        aliases: &["UTF32BE", "UTF-32", "UTF32"],
    }
}

#[cfg(feature = "registry")]
inventory::submit! {
    crate::registry::EncodingEntry {
        tag: EncodingTag::Utf32Le,
        aliases: &["UTF32LE"],
    }
}

#[cfg(feature = "registry")]
inventory::submit! {
    crate::registry::EncodingEntry {
        tag: EncodingTag::Ucs4Be,
        aliases: &["UCS4BE", "UCS-4", "UCS4"],
    }
}

#[cfg(feature = "registry")]
inventory::submit! {
    crate::registry::EncodingEntry {
        tag: EncodingTag::Ucs4Le,
        aliases: &["UCS4LE"],
    }
}
