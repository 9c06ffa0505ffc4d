//! Store codec (codec 0): payload bytes are kept as-is.

use lbarc_core::prelude::*;

/// Identity codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreCodec;

impl BlockEncoder for StoreCodec {
    fn codec(&self) -> CodecId {
        CodecId::Store
    }

    fn encode(&mut self, input: &[u8]) -> Vec<u8> {
        input.to_vec()
    }

    fn reset(&mut self) {}
}

impl BlockDecoder for StoreCodec {
    fn codec(&self) -> CodecId {
        CodecId::Store
    }

    fn decode(&self, input: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        if input.len() != expected_len {
            return Err(LbarcError::corrupt_stream(
                0,
                format!(
                    "stored payload is {} bytes, expected {expected_len}",
                    input.len()
                ),
            ));
        }
        Ok(input.to_vec())
    }
}
