//! The Unicode scalar value space.
//!
//! Scalars are carried as plain `u32` rather than `char` so that decoders can
//! hand back raw values (for example a UTF-32 unit above U+10FFFF) and leave
//! the validity decision to the caller.

/// Largest Unicode scalar value.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Sentinel meaning "no scalar". Never a valid code point.
pub const INVALID_CODEPOINT: u32 = 0xFFFF_FFFF;

/// First code point of the surrogate band.
pub const SURROGATE_START: u32 = 0xD800;
/// Last code point of the surrogate band.
pub const SURROGATE_END: u32 = 0xDFFF;

/// Returns `true` if `cp` is a Unicode scalar value: at most U+10FFFF and
/// outside U+D800..=U+DFFF.
#[inline]
pub const fn is_valid_codepoint(cp: u32) -> bool {
    cp <= MAX_CODEPOINT && (cp < SURROGATE_START || cp > SURROGATE_END)
}

/// Returns `true` if `cp` lies in one of the combining-diacritics blocks.
pub const fn is_combining_mark(cp: u32) -> bool {
    matches!(
        cp,
        0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF | 0xFE20..=0xFE2F
    )
}

/// Converts `cp` to a `char` if it is a valid scalar.
#[inline]
pub fn to_char(cp: u32) -> Option<char> {
    char::from_u32(cp)
}
