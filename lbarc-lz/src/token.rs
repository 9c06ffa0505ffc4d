//! Token model and bitstream packing shared by LZSS and LZMIT.
//!
//! Both compressors emit the same stream shape: a control byte announces the
//! next eight decisions, least significant bit first. A set bit is followed
//! by one literal byte; a clear bit by a little-endian 16-bit token holding
//! a 12-bit distance and a 4-bit length.
//!
//! ```text
//! 0x05       'A'   0x20 0x00   'B'   ...
//! │          │     │           └──── decision 2: literal (bit 2 set)
//! │          │     └──────────────── decision 1: token, distance 2, length field 0
//! │          └────────────────────── decision 0: literal (bit 0 set)
//! └───────────────────────────────── control byte for decisions 0..8
//! ```

/// Number of bits used for the distance field of a token.
pub const DISTANCE_BITS: u32 = 12;

/// Number of bits used for the length field of a token.
pub const LENGTH_BITS: u32 = 4;

/// Largest encodable distance field.
pub const MAX_DISTANCE: usize = (1 << DISTANCE_BITS) - 1;

/// Largest raw length field.
pub const MAX_LENGTH_FIELD: usize = (1 << LENGTH_BITS) - 1;

/// A single compressor decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference into previously produced output.
    Match {
        /// Bytes back from the current position, minus one.
        distance: u16,
        /// Number of bytes to copy.
        length: u16,
    },
}

impl Token {
    /// Number of input bytes this token covers.
    pub fn span(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Match { length, .. } => *length as usize,
        }
    }
}

/// Packs tokens into control-byte groups.
///
/// Callers guarantee that match lengths lie in `bias..=bias + 15` and
/// distances fit in 12 bits; both encoders clamp before pushing.
#[derive(Debug)]
pub(crate) struct TokenWriter {
    out: Vec<u8>,
    /// Position of the control byte of the current group.
    flags_at: usize,
    /// Decisions already recorded in the current group.
    count: u32,
    /// Subtracted from match lengths before packing.
    bias: usize,
}

impl TokenWriter {
    /// Create a writer whose shortest match length is `bias`.
    pub(crate) fn new(bias: usize, capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            flags_at: 0,
            count: 0,
            bias,
        }
    }

    /// Append a token.
    ///
    /// The control byte of a group is only allocated once the group receives
    /// its first decision, so the stream never ends in an empty group.
    pub(crate) fn push(&mut self, token: Token) {
        if self.count == 0 {
            self.flags_at = self.out.len();
            self.out.push(0);
        }

        match token {
            Token::Literal(byte) => {
                self.out[self.flags_at] |= 1 << self.count;
                self.out.push(byte);
            }
            Token::Match { distance, length } => {
                let length = length as usize;
                debug_assert!(length >= self.bias && length - self.bias <= MAX_LENGTH_FIELD);
                debug_assert!(distance as usize <= MAX_DISTANCE);
                let word = (distance << LENGTH_BITS) | (length - self.bias) as u16;
                self.out.extend_from_slice(&word.to_le_bytes());
            }
        }

        self.count = (self.count + 1) % 8;
    }

    /// Take the packed stream.
    pub(crate) fn finish(self) -> Vec<u8> {
        self.out
    }
}
