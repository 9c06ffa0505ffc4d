//! HQR container loader.
//!
//! Loading happens in two passes. The first walks the offset table until
//! the slot whose offset equals the file length, classifying each slot as
//! Null, Pointer (offset already seen), or Normal (header and payload read
//! undecoded). The second finds hidden children: any bytes between the end
//! of a Normal record and the next offset in the table are further records.

use crate::entry::{Entry, HEADER_SIZE, Resource};
use lbarc_core::CodecId;
use lbarc_core::error::{LbarcError, Result};
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};

/// How to treat records whose header is inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Fail on the first invalid codec, stored size mismatch or
    /// overlapping child region.
    #[default]
    Strict,
    /// Log those anomalies and keep going. Truncated data and a missing
    /// EOF marker are still fatal.
    Lenient,
}

/// Options for loading a container.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Validation mode.
    pub mode: LoadMode,
}

impl LoadOptions {
    /// Create default (strict) options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for lenient, diagnostic loading.
    pub fn lenient() -> Self {
        Self::new().with_mode(LoadMode::Lenient)
    }

    /// Set the validation mode.
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    fn is_lenient(&self) -> bool {
        self.mode == LoadMode::Lenient
    }
}

/// HQR container reader.
pub struct HqrReader<R: Read + Seek> {
    reader: R,
    options: LoadOptions,
    len: u64,
}

impl<R: Read + Seek> HqrReader<R> {
    /// Create a new reader with default options.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_options(reader, LoadOptions::default())
    }

    /// Create a new reader.
    pub fn with_options(mut reader: R, options: LoadOptions) -> Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        Ok(Self {
            reader,
            options,
            len,
        })
    }

    /// Read all entries.
    pub fn read_entries(&mut self) -> Result<Vec<Entry>> {
        let (mut entries, mut offsets) = self.read_table()?;
        offsets.sort_unstable();
        self.read_children(&mut entries, &offsets)?;
        Ok(entries)
    }

    /// Pass 1: table slots and their main records.
    fn read_table(&mut self) -> Result<(Vec<Entry>, Vec<u64>)> {
        let mut entries = Vec::new();
        let mut owners: HashMap<u64, usize> = HashMap::new();
        let mut offsets = Vec::new();
        let mut first_data = u64::MAX;

        loop {
            let slot = entries.len();
            let pos = slot as u64 * 4;
            if pos >= first_data || pos + 4 > self.len {
                return Err(LbarcError::missing_eof(slot));
            }

            let offset = u64::from(self.read_u32(pos)?);

            if offset == 0 {
                tracing::trace!(slot, "null entry");
                entries.push(Entry::Null);
                continue;
            }

            if let Some(&alias_of) = owners.get(&offset) {
                tracing::trace!(slot, offset, alias_of, "pointer entry");
                entries.push(Entry::Pointer { alias_of });
                continue;
            }

            owners.insert(offset, slot);
            offsets.push(offset);
            first_data = first_data.min(offset);

            if offset == self.len {
                tracing::debug!(slot, offset, "end of offset table");
                entries.push(Entry::Eof);
                return Ok((entries, offsets));
            }

            let resource = self.read_record(offset)?;
            tracing::trace!(
                slot,
                offset,
                decoded = resource.decoded_size(),
                encoded = resource.encoded_size(),
                codec = resource.codec_id(),
                "normal entry"
            );
            entries.push(Entry::normal(resource));
        }
    }

    /// Pass 2: hidden records between each Normal record and the next
    /// table offset.
    fn read_children(&mut self, entries: &mut [Entry], offsets: &[u64]) -> Result<()> {
        for (index, entry) in entries.iter_mut().enumerate() {
            let Entry::Normal { resource, children } = entry else {
                continue;
            };
            let Some(offset) = resource.offset() else {
                continue;
            };

            let next = offsets.partition_point(|&o| o <= offset);
            let table_next = offsets.get(next).copied().unwrap_or(self.len);
            let mut body_next = offset + resource.record_len();

            while body_next != table_next {
                if body_next > table_next {
                    let message = format!(
                        "entry {index}: records end at {body_next:#x}, past the next table offset {table_next:#x}"
                    );
                    if self.options.is_lenient() {
                        tracing::warn!("{message}");
                        break;
                    }
                    return Err(LbarcError::invalid_header(message));
                }

                let child = self.read_record(body_next)?;
                tracing::trace!(
                    entry = index,
                    child = children.len(),
                    offset = body_next,
                    "hidden entry"
                );
                body_next += child.record_len();
                children.push(child);
            }
        }
        Ok(())
    }

    /// Read a header and its undecoded payload at `offset`.
    fn read_record(&mut self, offset: u64) -> Result<Resource> {
        let mut header = [0u8; HEADER_SIZE];
        self.read_exact_at(offset, &mut header)?;

        let decoded_size = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let encoded_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let codec_id = u16::from_le_bytes([header[8], header[9]]);

        match CodecId::from_id(codec_id) {
            Ok(codec) if codec.is_stored() && decoded_size != encoded_size => {
                let err = LbarcError::size_mismatch(offset, decoded_size, encoded_size);
                if !self.options.is_lenient() {
                    return Err(err);
                }
                tracing::warn!("{err}");
            }
            Ok(_) => {}
            Err(err) => {
                if !self.options.is_lenient() {
                    return Err(err);
                }
                tracing::warn!(offset, "{err}");
            }
        }

        let body = offset + HEADER_SIZE as u64;
        self.ensure_available(body, u64::from(encoded_size))?;
        let mut payload = vec![0u8; encoded_size as usize];
        self.read_exact_at(body, &mut payload)?;
        Resource::from_parts(decoded_size, codec_id, payload, Some(offset))
    }

    fn read_u32(&mut self, pos: u64) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_at(pos, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn ensure_available(&self, pos: u64, count: u64) -> Result<()> {
        let end = pos + count;
        if end > self.len {
            return Err(LbarcError::unexpected_eof((end - self.len) as usize));
        }
        Ok(())
    }

    fn read_exact_at(&mut self, pos: u64, buf: &mut [u8]) -> Result<()> {
        self.ensure_available(pos, buf.len() as u64)?;
        self.reader.seek(SeekFrom::Start(pos))?;
        self.reader.read_exact(buf)?;
        Ok(())
    }
}

/// Read all entries from `reader`.
pub fn read_entries<R: Read + Seek>(reader: R, options: &LoadOptions) -> Result<Vec<Entry>> {
    HqrReader::with_options(reader, options.clone())?.read_entries()
}
