//! HQR entry model.
//!
//! A container is a flat sequence of [`Entry`] slots. Normal slots own a
//! [`Resource`] and, optionally, hidden child resources stored right after
//! it in the file. Pointer slots share the resource of an earlier Normal
//! slot. The sequence always ends with a single [`Entry::Eof`] marker.

use lbarc_core::CodecId;
use lbarc_core::error::{LbarcError, Result};

/// Size of the record header in front of every payload.
///
/// Layout (little-endian): decoded size `u32`, encoded size `u32`,
/// codec id `u16`.
pub const HEADER_SIZE: usize = 10;

/// A record payload with its header fields.
///
/// The payload is kept exactly as stored; it is only decoded on request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    decoded_size: u32,
    codec_id: u16,
    payload: Vec<u8>,
    offset: Option<u64>,
}

/// A hidden record stored after a Normal entry's payload.
pub type Child = Resource;

impl Resource {
    /// Create a resource from an already encoded payload.
    ///
    /// A stored payload must be exactly `decoded_size` bytes long.
    pub fn new(codec: CodecId, decoded_size: u32, payload: Vec<u8>) -> Result<Self> {
        let resource = Self::from_parts(decoded_size, codec.id(), payload, None)?;
        resource.check()?;
        Ok(resource)
    }

    /// Create a stored (codec 0) resource.
    pub fn stored(data: Vec<u8>) -> Result<Self> {
        let decoded_size = size_u32(data.len())?;
        Self::from_parts(decoded_size, CodecId::Store.id(), data, None)
    }

    /// Compress `data` with `codec` and wrap the result.
    pub fn compress(codec: CodecId, data: &[u8]) -> Result<Self> {
        let decoded_size = size_u32(data.len())?;
        let payload = lbarc_lz::compress(codec, data);
        Self::from_parts(decoded_size, codec.id(), payload, None)
    }

    /// Compress `data`, falling back to Store when `codec` does not make it
    /// smaller.
    pub fn compress_or_store(codec: CodecId, data: &[u8]) -> Result<Self> {
        if !codec.is_stored() {
            let resource = Self::compress(codec, data)?;
            if resource.payload.len() < data.len() {
                return Ok(resource);
            }
            tracing::debug!(
                codec = codec.name(),
                size = data.len(),
                "compression is unprofitable, storing instead"
            );
        }
        Self::stored(data.to_vec())
    }

    pub(crate) fn from_parts(
        decoded_size: u32,
        codec_id: u16,
        payload: Vec<u8>,
        offset: Option<u64>,
    ) -> Result<Self> {
        size_u32(payload.len())?;
        Ok(Self {
            decoded_size,
            codec_id,
            payload,
            offset,
        })
    }

    /// Declared size after decoding.
    pub fn decoded_size(&self) -> u32 {
        self.decoded_size
    }

    /// Size of the stored payload.
    pub fn encoded_size(&self) -> u32 {
        // Checked on construction.
        self.payload.len() as u32
    }

    /// Raw codec id from the header.
    pub fn codec_id(&self) -> u16 {
        self.codec_id
    }

    /// Parsed codec.
    pub fn codec(&self) -> Result<CodecId> {
        CodecId::from_id(self.codec_id)
    }

    /// Stored payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Position of the header in the file this resource was loaded from.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Bytes this record occupies in a file, header included.
    pub fn record_len(&self) -> u64 {
        HEADER_SIZE as u64 + self.payload.len() as u64
    }

    /// Check the header fields against each other.
    pub fn check(&self) -> Result<()> {
        let codec = self.codec()?;
        if codec.is_stored() && self.decoded_size != self.encoded_size() {
            return Err(LbarcError::size_mismatch(
                self.offset.unwrap_or(0),
                self.decoded_size,
                self.encoded_size(),
            ));
        }
        Ok(())
    }

    /// Decode the payload.
    pub fn decode(&self) -> Result<Vec<u8>> {
        lbarc_lz::decompress(self.codec()?, &self.payload, self.decoded_size as usize)
    }

    /// Serialize the record header.
    pub fn header_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&self.decoded_size.to_le_bytes());
        header[4..8].copy_from_slice(&self.encoded_size().to_le_bytes());
        header[8..10].copy_from_slice(&self.codec_id.to_le_bytes());
        header
    }
}

fn size_u32(len: usize) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| LbarcError::invalid_header(format!("record of {len} bytes exceeds 4 GiB")))
}

/// Kind of a top-level slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Empty slot, stored as offset 0.
    Null,
    /// Slot owning a resource.
    Normal,
    /// Slot sharing the resource of an earlier Normal slot.
    Pointer,
    /// End-of-file marker.
    Eof,
}

impl EntryKind {
    /// Get the kind name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Normal => "Normal",
            Self::Pointer => "Pointer",
            Self::Eof => "EOF",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One top-level slot of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Empty slot.
    Null,
    /// A resource and its hidden children.
    Normal {
        /// The slot's own record.
        resource: Resource,
        /// Hidden records following it, in file order.
        children: Vec<Child>,
    },
    /// Alias of an earlier Normal slot.
    Pointer {
        /// Index of the aliased slot.
        alias_of: usize,
    },
    /// End-of-file marker.
    Eof,
}

impl Entry {
    /// Create a Normal entry without children.
    pub fn normal(resource: Resource) -> Self {
        Self::Normal {
            resource,
            children: Vec::new(),
        }
    }

    /// Create a Pointer entry.
    pub fn pointer(alias_of: usize) -> Self {
        Self::Pointer { alias_of }
    }

    /// Get the kind of this entry.
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Null => EntryKind::Null,
            Self::Normal { .. } => EntryKind::Normal,
            Self::Pointer { .. } => EntryKind::Pointer,
            Self::Eof => EntryKind::Eof,
        }
    }

    /// Check if this is a Normal entry.
    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal { .. })
    }

    /// The entry's own resource, for Normal entries.
    pub fn resource(&self) -> Option<&Resource> {
        match self {
            Self::Normal { resource, .. } => Some(resource),
            _ => None,
        }
    }

    /// Hidden children. Empty for anything but Normal entries.
    pub fn children(&self) -> &[Child] {
        match self {
            Self::Normal { children, .. } => children,
            _ => &[],
        }
    }

    /// Aliased index, for Pointer entries.
    pub fn alias_of(&self) -> Option<usize> {
        match self {
            Self::Pointer { alias_of } => Some(*alias_of),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_resource() {
        let res = Resource::stored(b"AB".to_vec()).unwrap();
        assert_eq!(res.decoded_size(), 2);
        assert_eq!(res.encoded_size(), 2);
        assert_eq!(res.codec().unwrap(), CodecId::Store);
        assert_eq!(res.decode().unwrap(), b"AB");
        assert!(res.check().is_ok());
    }

    #[test]
    fn test_header_bytes() {
        let res = Resource::new(CodecId::Lzmit, 0x0102_0304, vec![0; 5]).unwrap();
        assert_eq!(
            res.header_bytes(),
            [0x04, 0x03, 0x02, 0x01, 5, 0, 0, 0, 2, 0]
        );
    }

    #[test]
    fn test_compress_roundtrip() {
        let data = b"Sendell Sendell Sendell Sendell Sendell".repeat(4);
        for codec in CodecId::ALL {
            let res = Resource::compress(codec, &data).unwrap();
            assert_eq!(res.codec().unwrap(), codec);
            assert_eq!(res.decoded_size() as usize, data.len());
            assert_eq!(res.decode().unwrap(), data);
        }
    }

    #[test]
    fn test_compress_or_store_falls_back() {
        // Distinct bytes never compress.
        let data: Vec<u8> = (0..=255u8).collect();
        let res = Resource::compress_or_store(CodecId::Lzss, &data).unwrap();
        assert_eq!(res.codec().unwrap(), CodecId::Store);
        assert_eq!(res.payload(), &data[..]);

        let data = vec![7u8; 300];
        let res = Resource::compress_or_store(CodecId::Lzss, &data).unwrap();
        assert_eq!(res.codec().unwrap(), CodecId::Lzss);
        assert!(res.encoded_size() < 300);
    }

    #[test]
    fn test_new_rejects_bad_store() {
        assert!(matches!(
            Resource::new(CodecId::Store, 5, b"A".to_vec()),
            Err(LbarcError::SizeMismatch {
                decoded: 5,
                encoded: 1,
                ..
            })
        ));
        assert!(Resource::new(CodecId::Store, 1, b"A".to_vec()).is_ok());
    }

    #[test]
    fn test_check_rejects_bad_store() {
        let res = Resource::from_parts(4, 0, vec![1, 2], Some(0x20)).unwrap();
        assert!(matches!(
            res.check(),
            Err(LbarcError::SizeMismatch {
                offset: 0x20,
                decoded: 4,
                encoded: 2
            })
        ));

        let res = Resource::from_parts(2, 9, vec![1, 2], None).unwrap();
        assert!(matches!(res.check(), Err(LbarcError::InvalidCodec { id: 9 })));
    }

    #[test]
    fn test_entry_accessors() {
        let entry = Entry::normal(Resource::stored(vec![1]).unwrap());
        assert_eq!(entry.kind(), EntryKind::Normal);
        assert!(entry.children().is_empty());
        assert_eq!(Entry::pointer(3).alias_of(), Some(3));
        assert_eq!(Entry::Eof.kind().name(), "EOF");
        assert!(Entry::Null.resource().is_none());
    }
}
