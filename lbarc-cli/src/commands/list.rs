//! List command implementation.

use crate::utils::{open_archive, print_tree};
use lbarc_hqr::{EntrySummary, RecordSummary, summarize};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// JSON serializable record header.
#[derive(Debug, Serialize, Deserialize)]
struct RecordJson {
    codec: String,
    size: u32,
    compressed_size: u32,
    ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u64>,
}

impl RecordJson {
    fn from_record(record: &RecordSummary) -> Self {
        Self {
            codec: record.codec.clone(),
            size: record.decoded_size,
            compressed_size: record.encoded_size,
            ratio: record.savings(),
            offset: record.offset,
        }
    }
}

/// JSON serializable top-level slot.
#[derive(Debug, Serialize, Deserialize)]
struct EntryJson {
    index: usize,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias_of: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<RecordJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<RecordJson>,
}

impl EntryJson {
    fn from_summary(entry: &EntrySummary) -> Self {
        Self {
            index: entry.index,
            kind: entry.kind.name().to_string(),
            alias_of: entry.alias_of,
            record: entry.record.as_ref().map(RecordJson::from_record),
            children: entry.children.iter().map(RecordJson::from_record).collect(),
        }
    }
}

/// JSON output for archive listing.
#[derive(Debug, Serialize, Deserialize)]
struct ArchiveListJson {
    archive: String,
    eof_index: usize,
    entries: Vec<EntryJson>,
}

pub fn cmd_list(
    archive: &Path,
    json: bool,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let container = open_archive(archive, lenient)?;
    let entries = summarize(&container);

    if json {
        let output = ArchiveListJson {
            archive: archive.display().to_string(),
            eof_index: container.eof_index(),
            entries: entries.iter().map(EntryJson::from_summary).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Archive: {}", archive.display());
    println!();
    print_tree(&entries);
    Ok(())
}
