//! Utility functions for the CLI.

use lbarc_hqr::{Container, EntryKind, EntrySummary, LoadOptions, RecordSummary};
use std::fs;
use std::path::Path;

/// Load an archive in strict or lenient mode.
pub fn open_archive(path: &Path, lenient: bool) -> lbarc_core::Result<Container> {
    let options = if lenient {
        LoadOptions::lenient()
    } else {
        LoadOptions::default()
    };
    Container::open(path, &options)
}

/// Load an archive for editing; a missing file starts an empty archive.
pub fn open_or_create(path: &Path) -> lbarc_core::Result<Container> {
    if path.exists() {
        open_archive(path, false)
    } else {
        tracing::info!(path = %path.display(), "creating new archive");
        Ok(Container::new())
    }
}

/// Write `data` to `path`, removing any existing file first.
pub fn replace_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    fs::write(path, data)
}

fn record_columns(record: &RecordSummary) -> String {
    let ratio = if record.decoded_size > 0 {
        format!("{:.1}%", record.savings())
    } else {
        "-".to_string()
    };
    format!(
        "{:>10} {:>10} {:>6} {:>8}",
        record.decoded_size, record.encoded_size, ratio, record.codec
    )
}

/// Print entries and their hidden children as a tree.
pub fn print_tree(entries: &[EntrySummary]) {
    println!(
        "{:>6}  {:<8} {:>10} {:>10} {:>6} {:>8}  Notes",
        "Index", "Kind", "Size", "Packed", "Ratio", "Codec"
    );
    println!("{}", "-".repeat(68));

    for entry in entries {
        let columns = entry
            .record
            .as_ref()
            .map(record_columns)
            .unwrap_or_default();
        let note = match (entry.kind, entry.alias_of) {
            (EntryKind::Pointer, Some(target)) => format!("-> {target}"),
            _ => String::new(),
        };
        println!(
            "{:>6}  {:<8} {:<37}  {}",
            entry.index,
            entry.kind.name(),
            columns,
            note
        );

        let last = entry.children.len().saturating_sub(1);
        for (i, child) in entry.children.iter().enumerate() {
            let branch = if i == last { "└──" } else { "├──" };
            println!("        {branch} {:<2} {}", i, record_columns(child));
        }
    }

    let normal = entries
        .iter()
        .filter(|e| e.kind == EntryKind::Normal)
        .count();
    println!("{}", "-".repeat(68));
    println!(
        "{} slots, {} resources, EOF at {}",
        entries.len(),
        normal,
        entries.len().saturating_sub(1)
    );
}
