//! LZSS compressor (codec 1).
//!
//! A 4 KB sliding window with a 17-byte look-ahead, searched through a binary
//! tree of every string currently in the window. Matches of one byte or less
//! are emitted as literals; everything longer becomes a 12+4 bit token whose
//! length field is biased by two.

use crate::token::{DISTANCE_BITS, MAX_LENGTH_FIELD, Token, TokenWriter};
use crate::tree::{MatchTree, Side};
use lbarc_core::{BlockEncoder, CodecId};

/// Window size in bytes.
pub const WINDOW_SIZE: usize = 1 << DISTANCE_BITS;

/// Longest match not worth a token.
pub const BREAK_EVEN: usize = 1;

/// Look-ahead buffer size, which is also the longest match.
pub const LOOK_AHEAD: usize = MAX_LENGTH_FIELD + 1 + BREAK_EVEN;

const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// LZSS encoder session.
///
/// Owns the window and the match tree. Every [`encode`](BlockEncoder::encode)
/// call starts from a zeroed window, so a session can be reused.
#[derive(Debug, Clone)]
pub struct LzssEncoder {
    window: Vec<u8>,
    tree: MatchTree,
    match_pos: usize,
}

impl LzssEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self {
            window: vec![0; WINDOW_SIZE],
            tree: MatchTree::new(WINDOW_SIZE),
            match_pos: 0,
        }
    }

    #[inline]
    fn at(&self, pos: usize) -> u8 {
        self.window[pos & WINDOW_MASK]
    }

    /// Insert the string at `new_node` and return the longest match length.
    ///
    /// `match_pos` is left on the latest node with that length. A node that
    /// matches the full look-ahead is replaced by `new_node`.
    fn add_string(&mut self, new_node: usize) -> usize {
        let Some(mut test_node) = self.tree.first() else {
            self.tree.set_first(new_node);
            return 0;
        };

        let mut match_length = 0;
        loop {
            let mut i = 0;
            let mut delta = 0i32;
            while i < LOOK_AHEAD {
                delta = i32::from(self.at(new_node + i)) - i32::from(self.at(test_node + i));
                if delta != 0 {
                    break;
                }
                i += 1;
            }

            if i >= match_length {
                match_length = i;
                self.match_pos = test_node;
                if match_length >= LOOK_AHEAD {
                    self.tree.replace(test_node, new_node);
                    return match_length;
                }
            }

            let side = Side::toward(delta);
            match self.tree.child(test_node, side) {
                Some(next) => test_node = next,
                None => {
                    self.tree.attach(test_node, side, new_node);
                    return match_length;
                }
            }
        }
    }
}

impl Default for LzssEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockEncoder for LzssEncoder {
    fn codec(&self) -> CodecId {
        CodecId::Lzss
    }

    fn encode(&mut self, input: &[u8]) -> Vec<u8> {
        self.reset();

        let capacity = input.len() + input.len() / 8 + 1;
        let mut writer = TokenWriter::new(CodecId::Lzss.length_bias(), capacity);
        let mut source = input.iter().copied();

        let mut look_ahead = 0;
        for slot in self.window.iter_mut().take(LOOK_AHEAD) {
            match source.next() {
                Some(byte) => {
                    *slot = byte;
                    look_ahead += 1;
                }
                None => break,
            }
        }
        if look_ahead == 0 {
            return writer.finish();
        }

        let mut new_node = 0;
        self.tree.set_first(new_node);
        let mut match_length = 0;

        while look_ahead > 0 {
            match_length = match_length.min(look_ahead);

            let replace_count = if match_length <= BREAK_EVEN {
                writer.push(Token::Literal(self.window[new_node]));
                1
            } else {
                let distance = (new_node + WINDOW_SIZE - self.match_pos - 1) & WINDOW_MASK;
                writer.push(Token::Match {
                    distance: distance as u16,
                    length: match_length as u16,
                });
                match_length
            };

            for _ in 0..replace_count {
                let incoming = (new_node + LOOK_AHEAD) & WINDOW_MASK;
                self.tree.remove(incoming);
                match source.next() {
                    Some(byte) => self.window[incoming] = byte,
                    None => look_ahead -= 1,
                }

                new_node = (new_node + 1) & WINDOW_MASK;
                if look_ahead > 0 {
                    match_length = self.add_string(new_node);
                }
            }
        }

        writer.finish()
    }

    fn reset(&mut self) {
        self.window.fill(0);
        self.tree.clear();
        self.match_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::LzDecoder;
    use lbarc_core::BlockDecoder;

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let packed = LzssEncoder::new().encode(data);
        let unpacked = LzDecoder::lzss().decode(&packed, data.len()).unwrap();
        assert_eq!(unpacked, data);
        packed
    }

    #[test]
    fn test_constants() {
        assert_eq!(WINDOW_SIZE, 4096);
        assert_eq!(LOOK_AHEAD, 17);
    }

    #[test]
    fn test_empty() {
        assert!(LzssEncoder::new().encode(&[]).is_empty());
    }

    #[test]
    fn test_single_byte() {
        assert_eq!(roundtrip(b"Z"), vec![0x01, b'Z']);
    }

    #[test]
    fn test_run_uses_overlapping_match() {
        let data = vec![b'a'; 40];
        let packed = roundtrip(&data);
        assert!(packed.len() < 12);
        // The second decision is a token copying from one byte back.
        assert_eq!(packed[0] & 0b11, 0b01);
        let word = u16::from_le_bytes([packed[2], packed[3]]);
        assert_eq!(word >> 4, 0);
    }

    #[test]
    fn test_text() {
        let data = b"The quick brown fox jumps over the lazy dog. The quick brown fox jumps again.";
        let packed = roundtrip(data);
        assert!(packed.len() < data.len());
    }

    #[test]
    fn test_data_larger_than_window() {
        let mut data = Vec::new();
        let mut seed: u32 = 0x1234_5678;
        for i in 0..20_000u32 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let byte = if i % 64 < 32 { (seed >> 24) as u8 } else { (i % 7) as u8 };
            data.push(byte);
        }
        roundtrip(&data);
    }

    #[test]
    fn test_session_reuse_is_deterministic() {
        let data = b"abcabcabcabcXYZabcabc";
        let mut encoder = LzssEncoder::new();
        let first = encoder.encode(data);
        let _ = encoder.encode(b"something else entirely, to dirty the window");
        assert_eq!(encoder.encode(data), first);
    }
}
