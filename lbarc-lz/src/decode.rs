//! Shared LZSS/LZMIT decompressor.
//!
//! Both compressors produce the same token stream and differ only in the
//! length bias, so one decoder serves both. The stream is not
//! self-describing: the caller supplies the codec from the record header.

use crate::token::LENGTH_BITS;
use lbarc_core::error::{LbarcError, Result};
use lbarc_core::{BlockDecoder, CodecId};

/// Decoder for LZSS and LZMIT streams.
#[derive(Debug, Clone, Copy)]
pub struct LzDecoder {
    codec: CodecId,
}

impl LzDecoder {
    /// Create a decoder for LZSS (codec 1) streams.
    pub fn lzss() -> Self {
        Self {
            codec: CodecId::Lzss,
        }
    }

    /// Create a decoder for LZMIT (codec 2) streams.
    pub fn lzmit() -> Self {
        Self {
            codec: CodecId::Lzmit,
        }
    }

    /// Create a decoder for a compressed codec.
    ///
    /// Returns `None` for [`CodecId::Store`], which has no token stream.
    pub fn for_codec(codec: CodecId) -> Option<Self> {
        match codec {
            CodecId::Store => None,
            CodecId::Lzss | CodecId::Lzmit => Some(Self { codec }),
        }
    }

    /// Decode until the input runs out, without a known output size.
    pub fn decode_to_end(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.run(input, None)
    }

    fn run(&self, input: &[u8], limit: Option<usize>) -> Result<Vec<u8>> {
        let bias = self.codec.length_bias();
        // A two-byte token expands to at most 18 bytes.
        let ceiling = input.len().saturating_mul(9);
        let mut out = Vec::with_capacity(limit.unwrap_or(ceiling).min(ceiling));
        let mut pos = 0;

        while pos < input.len() {
            let flags = input[pos];
            pos += 1;

            for bit in 0..8 {
                if pos >= input.len() {
                    break;
                }

                if flags & (1 << bit) != 0 {
                    out.push(input[pos]);
                    pos += 1;
                } else {
                    let Some(pair) = input.get(pos..pos + 2) else {
                        return Err(LbarcError::corrupt_stream(
                            pos as u64,
                            "stream ends inside a back-reference token",
                        ));
                    };
                    let word = u16::from_le_bytes([pair[0], pair[1]]);
                    let distance = usize::from(word >> LENGTH_BITS);
                    let length = usize::from(word & 0xF) + bias;

                    if distance >= out.len() {
                        return Err(LbarcError::corrupt_stream(
                            pos as u64,
                            format!(
                                "back-reference distance {} reaches before the start of {} produced bytes",
                                distance + 1,
                                out.len()
                            ),
                        ));
                    }

                    // Byte at a time: overlapping copies replicate the run.
                    let start = out.len() - distance - 1;
                    for k in 0..length {
                        let byte = out[start + k];
                        out.push(byte);
                    }
                    pos += 2;
                }

                if let Some(limit) = limit.filter(|&limit| out.len() > limit) {
                    return Err(LbarcError::corrupt_stream(
                        pos as u64,
                        format!("output overruns the declared size of {limit} bytes"),
                    ));
                }
            }
        }

        Ok(out)
    }
}

impl BlockDecoder for LzDecoder {
    fn codec(&self) -> CodecId {
        self.codec
    }

    fn decode(&self, input: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        let out = self.run(input, Some(expected_len))?;
        if out.len() != expected_len {
            return Err(LbarcError::corrupt_stream(
                input.len() as u64,
                format!(
                    "stream decoded to {} bytes, expected {expected_len}",
                    out.len()
                ),
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_only() {
        let out = LzDecoder::lzss().decode(&[0x07, b'a', b'b', b'c'], 3).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn test_overlapping_copy() {
        // 'x', then copy 5 bytes from one back (distance field 0, length 2 + 3).
        let out = LzDecoder::lzss().decode(&[0x01, b'x', 0x03, 0x00], 6).unwrap();
        assert_eq!(out, b"xxxxxx");
    }

    #[test]
    fn test_length_bias_per_codec() {
        let stream = [0x03, b'a', b'b', 0x10, 0x00];
        assert_eq!(LzDecoder::lzss().decode(&stream, 4).unwrap(), b"abab");
        assert_eq!(LzDecoder::lzmit().decode(&stream, 5).unwrap(), b"ababa");
    }

    #[test]
    fn test_distance_before_start() {
        let err = LzDecoder::lzss().decode(&[0x01, b'x', 0x50, 0x00], 3).unwrap_err();
        assert!(matches!(err, LbarcError::CorruptStream { offset: 2, .. }));
    }

    #[test]
    fn test_first_decision_is_token() {
        let err = LzDecoder::lzmit().decode(&[0x00, 0x00, 0x00], 3).unwrap_err();
        assert!(matches!(err, LbarcError::CorruptStream { .. }));
    }

    #[test]
    fn test_truncated_token() {
        let err = LzDecoder::lzss().decode(&[0x01, b'x', 0x00], 3).unwrap_err();
        assert!(matches!(err, LbarcError::CorruptStream { offset: 2, .. }));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(LzDecoder::lzss().decode(&[0x03, b'a', b'b'], 3).is_err());
        assert!(LzDecoder::lzss().decode(&[0x03, b'a', b'b'], 1).is_err());
    }

    #[test]
    fn test_decode_to_end() {
        let out = LzDecoder::lzss().decode_to_end(&[0x01, b'q', 0x00, 0x00]).unwrap();
        assert_eq!(out, b"qqq");
    }

    #[test]
    fn test_for_codec() {
        assert!(LzDecoder::for_codec(CodecId::Store).is_none());
        assert_eq!(
            LzDecoder::for_codec(CodecId::Lzmit).map(|d| d.codec()),
            Some(CodecId::Lzmit)
        );
    }
}
