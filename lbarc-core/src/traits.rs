//! Core traits for block codecs.
//!
//! HQR payloads are always compressed and decompressed whole, so the codecs
//! work on complete buffers rather than streams. Each encoder is a session
//! object owning its own search state; independent sessions can run on
//! different threads at the same time.

use crate::codec::CodecId;
use crate::error::Result;

/// A whole-buffer compressor.
pub trait BlockEncoder {
    /// The codec this encoder produces.
    fn codec(&self) -> CodecId;

    /// Compress `input` into a new buffer.
    ///
    /// The encoder state is reset first, so calling this repeatedly on the
    /// same session yields the same output for the same input.
    fn encode(&mut self, input: &[u8]) -> Vec<u8>;

    /// Reset the encoder to its initial state.
    fn reset(&mut self);
}

/// A whole-buffer decompressor.
pub trait BlockDecoder {
    /// The codec this decoder reads.
    fn codec(&self) -> CodecId;

    /// Decompress `input`, which must expand to exactly `expected_len` bytes.
    fn decode(&self, input: &[u8], expected_len: usize) -> Result<Vec<u8>>;
}
