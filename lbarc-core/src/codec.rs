//! Codec identifiers.
//!
//! HQR records carry a 16-bit compression type in their header. Three values
//! are defined; anything else is rejected (or, in lenient loading, carried
//! through as a raw id so the record can still be listed).

use crate::error::{LbarcError, Result};

/// Compression codec used for a record payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodecId {
    /// No compression (stored).
    #[default]
    Store,
    /// LZSS with a 4 KB sliding window (LBA1).
    Lzss,
    /// LZMIT ring-window LZ77 (LBA2).
    Lzmit,
}

impl CodecId {
    /// All defined codecs, in id order.
    pub const ALL: [CodecId; 3] = [CodecId::Store, CodecId::Lzss, CodecId::Lzmit];

    /// Parse a raw header value.
    pub fn from_id(id: u16) -> Result<Self> {
        match id {
            0 => Ok(Self::Store),
            1 => Ok(Self::Lzss),
            2 => Ok(Self::Lzmit),
            _ => Err(LbarcError::invalid_codec(id)),
        }
    }

    /// Get the raw header value.
    pub fn id(&self) -> u16 {
        match self {
            Self::Store => 0,
            Self::Lzss => 1,
            Self::Lzmit => 2,
        }
    }

    /// Amount added to the 4-bit length field of a back-reference token.
    ///
    /// This is the shortest match each compressor ever emits: 2 for LZSS
    /// (break-even + 1) and 3 for LZMIT.
    pub fn length_bias(&self) -> usize {
        self.id() as usize + 1
    }

    /// Check if this codec is "stored" (no compression).
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Store)
    }

    /// Get the codec name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Store => "None",
            Self::Lzss => "LZSS",
            Self::Lzmit => "LZMIT",
        }
    }
}

impl TryFrom<u16> for CodecId {
    type Error = LbarcError;

    fn try_from(id: u16) -> Result<Self> {
        Self::from_id(id)
    }
}

impl From<CodecId> for u16 {
    fn from(codec: CodecId) -> u16 {
        codec.id()
    }
}

impl std::fmt::Display for CodecId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
