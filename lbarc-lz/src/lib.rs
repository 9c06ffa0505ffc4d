//! # lbarc LZ
//!
//! Pure Rust implementation of the two LZ77 compressors used for Little Big
//! Adventure resources, plus the decoder they share:
//!
//! - **Store** (codec 0): no compression
//! - **LZSS** (codec 1): 4 KB sliding window, binary-tree matching, 2..=17 byte matches
//! - **LZMIT** (codec 2): ring-indexed window over the input, 3..=18 byte matches
//!
//! Both compressed formats are a sequence of groups: one control byte whose
//! bits (least significant first) mark each of the next eight items as a
//! literal byte (set) or a 16-bit back-reference token (clear).
//!
//! ## Example
//!
//! ```rust
//! use lbarc_core::CodecId;
//! use lbarc_lz::{compress, decompress};
//!
//! let data = b"Twinsen! Twinsen! Twinsen!";
//! let packed = compress(CodecId::Lzmit, data);
//! assert!(packed.len() < data.len());
//!
//! let unpacked = decompress(CodecId::Lzmit, &packed, data.len()).unwrap();
//! assert_eq!(unpacked, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod lzmit;
pub mod lzss;
pub mod store;
pub mod token;
pub mod tree;

use lbarc_core::{BlockDecoder, BlockEncoder, CodecId, Result};

// Re-exports
pub use decode::LzDecoder;
pub use lzmit::LzmitEncoder;
pub use lzss::LzssEncoder;
pub use store::StoreCodec;
pub use token::Token;

/// Create a fresh encoder session for `codec`.
pub fn encoder_for(codec: CodecId) -> Box<dyn BlockEncoder + Send> {
    match codec {
        CodecId::Store => Box::new(StoreCodec),
        CodecId::Lzss => Box::new(LzssEncoder::new()),
        CodecId::Lzmit => Box::new(LzmitEncoder::new()),
    }
}

/// Compress `input` with `codec`.
///
/// Store returns a copy of the input. The compressed codecs always return
/// their stream, even when it is larger than the input; deciding whether
/// to keep it is up to the caller.
pub fn compress(codec: CodecId, input: &[u8]) -> Vec<u8> {
    let output = encoder_for(codec).encode(input);
    tracing::trace!(
        codec = codec.name(),
        input = input.len(),
        output = output.len(),
        "compressed block"
    );
    output
}

/// Decompress `input`, which must expand to exactly `expected_len` bytes.
pub fn decompress(codec: CodecId, input: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let output = match LzDecoder::for_codec(codec) {
        Some(decoder) => decoder.decode(input, expected_len)?,
        None => StoreCodec.decode(input, expected_len)?,
    };
    tracing::trace!(
        codec = codec.name(),
        input = input.len(),
        output = output.len(),
        "decompressed block"
    );
    Ok(output)
}

/// Decompress `input` without knowing the decoded size.
///
/// The stream is decoded until the input is exhausted. Structural
/// corruption is still detected, but a truncated stream cannot be.
pub fn decompress_to_end(codec: CodecId, input: &[u8]) -> Result<Vec<u8>> {
    match LzDecoder::for_codec(codec) {
        Some(decoder) => decoder.decode_to_end(input),
        None => Ok(input.to_vec()),
    }
}

/// Compress with a raw header codec id.
///
/// Fails with [`LbarcError::InvalidCodec`](lbarc_core::LbarcError::InvalidCodec)
/// for ids other than 0, 1 and 2.
pub fn compress_raw(codec_id: u16, input: &[u8]) -> Result<Vec<u8>> {
    Ok(compress(CodecId::from_id(codec_id)?, input))
}

/// Decompress with a raw header codec id.
pub fn decompress_raw(codec_id: u16, input: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    decompress(CodecId::from_id(codec_id)?, input, expected_len)
}
