//! # lbarc HQR
//!
//! Reading, writing and editing of HQR resource containers, the archive
//! format Little Big Adventure stores its game data in.
//!
//! An HQR file starts with a table of little-endian `u32` offsets, one per
//! slot. The table ends at the slot whose offset equals the file length.
//! Each distinct offset points at a record: a 10-byte header (decoded size,
//! encoded size, codec id) followed by the payload. A repeated offset makes
//! a Pointer slot that shares an earlier record, offset 0 makes a Null slot,
//! and records stored between a slot's record and the next table offset are
//! hidden children of that slot.
//!
//! - [`entry`]: Entry model and record construction
//! - [`reader`]: Two-pass loader with strict and lenient modes
//! - [`writer`]: Serializer
//! - [`container`]: In-memory container with delete/insert and decoding
//! - [`listing`]: Per-entry summaries
//!
//! ## Example
//!
//! ```rust
//! use lbarc_core::CodecId;
//! use lbarc_hqr::{Container, Entry, LoadOptions, Resource};
//! use std::io::Cursor;
//!
//! let mut container = Container::new();
//! let index = container.push(Resource::compress_or_store(CodecId::Lzss, &[0u8; 512]).unwrap());
//! container.insert(index + 1, 0, Entry::pointer(index), false).unwrap();
//!
//! let bytes = container.to_bytes().unwrap();
//! let reloaded = Container::load(Cursor::new(bytes), &LoadOptions::default()).unwrap();
//! assert_eq!(reloaded.entries()[1].alias_of(), Some(0));
//! assert_eq!(reloaded.decode_entry(1).unwrap(), Some(vec![0u8; 512]));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod container;
pub mod entry;
pub mod listing;
pub mod reader;
pub mod writer;

// Re-exports
pub use container::{Container, Placement};
pub use entry::{Child, Entry, EntryKind, HEADER_SIZE, Resource};
pub use listing::{EntrySummary, RecordSummary, summarize};
pub use reader::{HqrReader, LoadMode, LoadOptions, read_entries};
pub use writer::{HqrWriter, offset_table, write_to_vec};
