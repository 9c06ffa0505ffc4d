//! Per-entry summaries of a container, for inspection tools.

use crate::container::Container;
use crate::entry::{EntryKind, Resource};
use lbarc_core::CodecId;

/// Header fields of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    /// Codec name, or `Unknown(n)` for an unrecognized id.
    pub codec: String,
    /// Declared decoded size.
    pub decoded_size: u32,
    /// Stored payload size.
    pub encoded_size: u32,
    /// Header position in the loaded file, if any.
    pub offset: Option<u64>,
}

impl RecordSummary {
    fn from_resource(resource: &Resource) -> Self {
        let codec = match CodecId::from_id(resource.codec_id()) {
            Ok(codec) => codec.name().to_string(),
            Err(_) => format!("Unknown({})", resource.codec_id()),
        };
        Self {
            codec,
            decoded_size: resource.decoded_size(),
            encoded_size: resource.encoded_size(),
            offset: resource.offset(),
        }
    }

    /// Space saved by the codec, in percent.
    pub fn savings(&self) -> f64 {
        if self.decoded_size == 0 {
            return 0.0;
        }
        (1.0 - f64::from(self.encoded_size) / f64::from(self.decoded_size)) * 100.0
    }
}

/// Summary of one top-level slot.
///
/// Pointers carry the record and children of the entry they alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    /// Slot index.
    pub index: usize,
    /// Slot kind.
    pub kind: EntryKind,
    /// Aliased index, for Pointers.
    pub alias_of: Option<usize>,
    /// The slot's record, for Normal slots and resolved Pointers.
    pub record: Option<RecordSummary>,
    /// Hidden records, in file order.
    pub children: Vec<RecordSummary>,
}

/// Summarize every slot of `container`, EOF marker included.
pub fn summarize(container: &Container) -> Vec<EntrySummary> {
    container
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let owner = container.resolve(index).and_then(|i| container.get(i));
            EntrySummary {
                index,
                kind: entry.kind(),
                alias_of: entry.alias_of(),
                record: owner
                    .and_then(|e| e.resource())
                    .map(RecordSummary::from_resource),
                children: owner
                    .map(|e| e.children().iter().map(RecordSummary::from_resource).collect())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;

    #[test]
    fn test_summarize() {
        let mut container = Container::new();
        container.push(Resource::stored(b"AB".to_vec()).unwrap());
        container
            .push_child(0, Resource::compress(CodecId::Lzmit, &[5; 64]).unwrap())
            .unwrap();
        container.insert(1, 0, Entry::pointer(0), false).unwrap();
        container.insert(2, 0, Entry::Null, false).unwrap();

        let summary = summarize(&container);
        assert_eq!(summary.len(), 4);

        assert_eq!(summary[0].kind, EntryKind::Normal);
        let record = summary[0].record.as_ref().unwrap();
        assert_eq!(record.codec, "None");
        assert_eq!(record.decoded_size, 2);
        assert_eq!(summary[0].children.len(), 1);
        assert_eq!(summary[0].children[0].codec, "LZMIT");

        assert_eq!(summary[1].kind, EntryKind::Pointer);
        assert_eq!(summary[1].alias_of, Some(0));
        assert_eq!(summary[1].record, summary[0].record);
        assert_eq!(summary[1].children.len(), 1);

        assert!(summary[2].record.is_none());
        assert_eq!(summary[3].kind, EntryKind::Eof);
    }

    #[test]
    fn test_unknown_codec_name() {
        let resource = Resource::from_parts(1, 4, vec![0], None).unwrap();
        assert_eq!(RecordSummary::from_resource(&resource).codec, "Unknown(4)");
    }

    #[test]
    fn test_savings() {
        let record = RecordSummary {
            codec: "LZSS".to_string(),
            decoded_size: 200,
            encoded_size: 50,
            offset: None,
        };
        assert!((record.savings() - 75.0).abs() < f64::EPSILON);
    }
}
