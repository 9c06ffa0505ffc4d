//! HQR container writer.
//!
//! Output layout: the offset table (4 bytes per slot), then for every
//! Normal slot in order its header and payload followed by those of its
//! children. Pointer slots repeat their target's offset, Null slots write 0
//! and the EOF slot writes the total file length.

use crate::entry::Entry;
use lbarc_core::error::{LbarcError, Result};
use std::io::Write;

/// HQR container writer.
pub struct HqrWriter<W: Write> {
    writer: W,
}

impl<W: Write> HqrWriter<W> {
    /// Create a new writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a complete container and return the number of bytes written.
    pub fn write_entries(&mut self, entries: &[Entry]) -> Result<u64> {
        let table = offset_table(entries)?;

        for offset in &table {
            self.writer.write_all(&offset.to_le_bytes())?;
        }

        for entry in entries {
            if let Entry::Normal { resource, children } = entry {
                for record in std::iter::once(resource).chain(children) {
                    self.writer.write_all(&record.header_bytes())?;
                    self.writer.write_all(record.payload())?;
                }
            }
        }

        self.writer.flush()?;
        let total = table.last().copied().map_or(0, u64::from);
        tracing::debug!(entries = entries.len(), bytes = total, "wrote container");
        Ok(total)
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Compute the table value of every slot.
///
/// Records that a strict load would reject (unknown codec, stored size
/// mismatch) are refused here as well.
pub fn offset_table(entries: &[Entry]) -> Result<Vec<u32>> {
    let mut cursor = entries.len() as u64 * 4;
    let mut table: Vec<u32> = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let value = match entry {
            Entry::Null => 0,
            Entry::Normal { resource, children } => {
                resource.check()?;
                for child in children {
                    child.check()?;
                }
                let offset = to_offset(cursor)?;
                cursor += resource.record_len();
                cursor += children.iter().map(|c| c.record_len()).sum::<u64>();
                offset
            }
            Entry::Pointer { alias_of } => match (table.get(*alias_of), entries.get(*alias_of)) {
                (Some(&offset), Some(Entry::Normal { .. })) => offset,
                _ => {
                    return Err(LbarcError::out_of_range(
                        "alias target",
                        *alias_of,
                        index.saturating_sub(1),
                    ));
                }
            },
            Entry::Eof => to_offset(cursor)?,
        };
        table.push(value);
    }

    Ok(table)
}

fn to_offset(value: u64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| LbarcError::invalid_header(format!("container size {value} exceeds 4 GiB")))
}

/// Serialize entries into a new buffer.
pub fn write_to_vec(entries: &[Entry]) -> Result<Vec<u8>> {
    let mut writer = HqrWriter::new(Vec::new());
    writer.write_entries(entries)?;
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Resource;

    #[test]
    fn test_layout() {
        let entries = vec![
            Entry::normal(Resource::stored(b"AB".to_vec()).unwrap()),
            Entry::pointer(0),
            Entry::Null,
            Entry::Eof,
        ];
        let bytes = write_to_vec(&entries).unwrap();

        let mut expected = Vec::new();
        for offset in [16u32, 16, 0, 28] {
            expected.extend_from_slice(&offset.to_le_bytes());
        }
        expected.extend_from_slice(&[2, 0, 0, 0, 2, 0, 0, 0, 0, 0, b'A', b'B']);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_children_follow_parent() {
        let entries = vec![
            Entry::Normal {
                resource: Resource::stored(b"A".to_vec()).unwrap(),
                children: vec![Resource::stored(b"BC".to_vec()).unwrap()],
            },
            Entry::normal(Resource::stored(b"D".to_vec()).unwrap()),
            Entry::Eof,
        ];
        let table = offset_table(&entries).unwrap();
        assert_eq!(table, vec![12, 35, 46]);
        assert_eq!(write_to_vec(&entries).unwrap().len(), 46);
    }

    #[test]
    fn test_only_eof() {
        assert_eq!(write_to_vec(&[Entry::Eof]).unwrap(), vec![4, 0, 0, 0]);
    }

    #[test]
    fn test_inconsistent_record_rejected() {
        let bad = Resource::from_parts(5, 0, b"A".to_vec(), None).unwrap();
        let entries = vec![Entry::normal(bad.clone()), Entry::Eof];
        assert!(matches!(
            write_to_vec(&entries),
            Err(LbarcError::SizeMismatch { .. })
        ));

        let entries = vec![
            Entry::Normal {
                resource: Resource::stored(b"A".to_vec()).unwrap(),
                children: vec![bad],
            },
            Entry::Eof,
        ];
        assert!(matches!(
            offset_table(&entries),
            Err(LbarcError::SizeMismatch { .. })
        ));

        let unknown = Resource::from_parts(1, 3, b"A".to_vec(), None).unwrap();
        assert!(matches!(
            write_to_vec(&[Entry::normal(unknown), Entry::Eof]),
            Err(LbarcError::InvalidCodec { id: 3 })
        ));
    }

    #[test]
    fn test_dangling_pointer_rejected() {
        let entries = vec![Entry::Null, Entry::pointer(0), Entry::Eof];
        assert!(matches!(
            offset_table(&entries),
            Err(LbarcError::OutOfRange { .. })
        ));
    }
}
