//! LZMIT compressor (codec 2).
//!
//! The window is the input itself. Positions are mapped onto a ring of
//! [`RING_SIZE`] tree slots; every position is inserted into the tree as the
//! cursor passes it, evicting whatever older position shared its slot.
//! Matches shorter than three bytes are emitted as literals and the length
//! field is biased by three, so tokens cover 3 to 18 bytes.

use crate::token::{MAX_DISTANCE, MAX_LENGTH_FIELD, Token, TokenWriter};
use crate::tree::{MatchTree, Side};
use lbarc_core::{BlockEncoder, CodecId};

/// Number of ring slots. A back distance of up to `RING_SIZE - 1` positions
/// still fits the 12-bit distance field once reduced by one.
pub const RING_SIZE: usize = MAX_DISTANCE + 2;

/// Shortest match emitted as a token.
pub const MIN_MATCH: usize = 3;

/// Longest match, and the number of bytes compared per node.
pub const MAX_MATCH: usize = MAX_LENGTH_FIELD + MIN_MATCH;

/// Best match found while inserting a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Found {
    length: usize,
    /// Positions back from the inserted one, `1..RING_SIZE`.
    back: usize,
}

/// LZMIT encoder session.
#[derive(Debug, Clone)]
pub struct LzmitEncoder {
    tree: MatchTree,
}

impl LzmitEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self {
            tree: MatchTree::new(RING_SIZE),
        }
    }

    /// Insert `pos` into the tree and report the best match for it.
    ///
    /// Only matches longer than two bytes are reported, and a later node
    /// must be strictly longer to displace an earlier best. Comparison
    /// stops at the end of the input; a string that runs out sorts below
    /// the node it is compared with. A node matching all [`MAX_MATCH`]
    /// bytes is replaced by `pos`.
    fn insert(&mut self, input: &[u8], pos: usize) -> Option<Found> {
        let slot = pos % RING_SIZE;
        self.tree.remove(slot);

        let Some(mut node) = self.tree.first() else {
            self.tree.set_first(slot);
            return None;
        };

        let limit = (input.len() - pos).min(MAX_MATCH);
        let current = &input[pos..pos + limit];
        let mut best: Option<Found> = None;
        let mut best_length = MIN_MATCH - 1;

        loop {
            let back = (slot + RING_SIZE - node) % RING_SIZE;
            let earlier = &input[pos - back..];
            let length = current
                .iter()
                .zip(earlier)
                .take_while(|(a, b)| a == b)
                .count();

            if length > best_length {
                best_length = length;
                best = Some(Found { length, back });
            }

            if length == MAX_MATCH {
                self.tree.replace(node, slot);
                return best;
            }

            let side = if length < limit {
                Side::toward(i32::from(current[length]) - i32::from(earlier[length]))
            } else {
                Side::Smaller
            };

            match self.tree.child(node, side) {
                Some(next) => node = next,
                None => {
                    self.tree.attach(node, side, slot);
                    return best;
                }
            }
        }
    }
}

impl Default for LzmitEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockEncoder for LzmitEncoder {
    fn codec(&self) -> CodecId {
        CodecId::Lzmit
    }

    fn encode(&mut self, input: &[u8]) -> Vec<u8> {
        self.reset();

        let capacity = input.len() + input.len() / 8 + 1;
        let mut writer = TokenWriter::new(CodecId::Lzmit.length_bias(), capacity);

        let mut pos = 0;
        while pos < input.len() {
            let token = match self.insert(input, pos) {
                Some(found) => Token::Match {
                    distance: (found.back - 1) as u16,
                    length: found.length as u16,
                },
                None => Token::Literal(input[pos]),
            };
            writer.push(token);

            let next = pos + token.span();
            for covered in pos + 1..next {
                self.insert(input, covered);
            }
            pos = next;
        }

        writer.finish()
    }

    fn reset(&mut self) {
        self.tree.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::LzDecoder;
    use lbarc_core::BlockDecoder;

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let packed = LzmitEncoder::new().encode(data);
        let unpacked = LzDecoder::lzmit().decode(&packed, data.len()).unwrap();
        assert_eq!(unpacked, data);
        packed
    }

    #[test]
    fn test_constants() {
        assert_eq!(RING_SIZE, 4097);
        assert_eq!(MAX_MATCH, 18);
    }

    #[test]
    fn test_empty() {
        assert!(LzmitEncoder::new().encode(&[]).is_empty());
    }

    #[test]
    fn test_two_byte_repeat_stays_literal() {
        // "abab": the only match is two bytes long, below the minimum.
        assert_eq!(roundtrip(b"abab"), vec![0x0F, b'a', b'b', b'a', b'b']);
    }

    #[test]
    fn test_three_byte_repeat_becomes_token() {
        let packed = roundtrip(b"abcabc");
        // three literals, then one token: distance 2, length field 0
        assert_eq!(packed, vec![0b0000_0111, b'a', b'b', b'c', 0x20, 0x00]);
    }

    #[test]
    fn test_run_of_one_byte() {
        let data = vec![0u8; 100];
        let packed = roundtrip(&data);
        // literal, then tokens of at most 18 bytes each
        assert!(packed.len() <= 1 + 1 + 2 * 6);
    }

    #[test]
    fn test_earlier_match_wins_ties() {
        // Both "xyz" occurrences match three bytes; the first one visited
        // is kept because later nodes must be strictly longer.
        let data = b"xyz1xyz2xyz";
        roundtrip(data);
    }

    #[test]
    fn test_ring_wraparound() {
        let mut data = Vec::new();
        let mut seed: u64 = 0xDEAD_BEEF;
        for _ in 0..3000 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            data.push((seed >> 56) as u8);
        }
        let block = data.clone();
        data.extend_from_slice(&block[..2000]);
        data.extend_from_slice(&block);
        let packed = roundtrip(&data);
        assert!(packed.len() < data.len());
    }

    #[test]
    fn test_match_at_end_of_input_is_clamped() {
        let data = b"0123456789ABCDEF0123456789ABC";
        roundtrip(data);
    }
}
