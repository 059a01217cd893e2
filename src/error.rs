use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// An error produced by a codec primitive or a whole-buffer conversion.
///
/// Decode-side variants carry the byte offset at which the offending unit
/// starts. Whole-buffer conversions stop at the first error and discard any
/// output produced so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The scalar is above U+10FFFF or inside the surrogate band.
    #[error("invalid code point 0x{scalar:X}")]
    InvalidCodepoint {
        /// The rejected value.
        scalar: u32,
    },

    /// Fewer bytes remain in the input than the unit requires.
    #[error("incomplete sequence at index {position}: need {needed} bytes, {available} available")]
    InsufficientInput {
        /// Offset of the incomplete unit.
        position: usize,
        /// Bytes the unit requires.
        needed: usize,
        /// Bytes left in the input from `position`.
        available: usize,
    },

    /// The output buffer cannot hold the encoded scalar.
    #[error("output buffer too small: need {needed} bytes, {available} available")]
    BufferTooSmall {
        /// Bytes the encoding requires.
        needed: usize,
        /// Bytes left in the buffer from the write position.
        available: usize,
    },

    /// A byte or code unit does not fit the expected pattern: a bad leading
    /// or continuation byte, or an unpaired surrogate.
    #[error("malformed code unit at index {position}")]
    MalformedUnit {
        /// Offset of the sequence containing the bad unit.
        position: usize,
    },

    /// A UTF-8 sequence encodes a value that fits in fewer bytes.
    #[error("overlong encoding of 0x{scalar:X} at index {position}")]
    OverlongEncoding {
        /// Offset of the leading byte.
        position: usize,
        /// The value the sequence assembled to.
        scalar: u32,
    },

    /// A valid scalar that the target form cannot represent.
    #[error("U+{scalar:04X} cannot be represented in {encoding}")]
    Unencodable {
        /// The scalar.
        scalar: u32,
        /// Name of the target encoding.
        encoding: &'static str,
    },

    /// A legacy byte with no assigned scalar.
    #[error("byte 0x{byte:02X} at index {position} is not mapped")]
    UnmappedByte {
        /// The byte value.
        byte: u8,
        /// Offset of the byte in the input.
        position: usize,
    },

    /// A scalar with no byte in the target legacy charset.
    #[error("U+{scalar:04X} at index {position} has no mapping in the target charset")]
    UnmappedScalar {
        /// The scalar.
        scalar: u32,
        /// Offset of its UTF-8 sequence in the input.
        position: usize,
    },
}

impl Error {
    /// Returns the input offset associated with this error, if any.
    pub const fn position(&self) -> Option<usize> {
        match *self {
            Self::InsufficientInput { position, .. }
            | Self::MalformedUnit { position }
            | Self::OverlongEncoding { position, .. }
            | Self::UnmappedByte { position, .. }
            | Self::UnmappedScalar { position, .. } => Some(position),
            Self::InvalidCodepoint { .. }
            | Self::BufferTooSmall { .. }
            | Self::Unencodable { .. } => None,
        }
    }
}
