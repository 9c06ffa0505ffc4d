//! In-memory HQR container and its structural operations.
//!
//! Entries are addressed by position. Inserting or removing a top-level
//! slot renumbers every later slot, so all Pointer targets are shifted in
//! the same operation through [`Container::insert_slot`] and
//! [`Container::remove_slot`].

use crate::entry::{Child, Entry, EntryKind, Resource};
use crate::reader::{HqrReader, LoadOptions};
use crate::writer::{HqrWriter, write_to_vec};
use lbarc_core::error::{LbarcError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Where an inserted record ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A new top-level slot at this index.
    TopLevel(usize),
    /// A hidden child of a Normal entry.
    Child {
        /// Index of the owning entry.
        entry: usize,
        /// Position among its children.
        child: usize,
    },
}

/// An HQR container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    entries: Vec<Entry>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Create an empty container holding only the EOF marker.
    pub fn new() -> Self {
        Self {
            entries: vec![Entry::Eof],
        }
    }

    /// Build a container from entries, checking every structural rule.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self> {
        let container = Self { entries };
        container.validate()?;
        Ok(container)
    }

    /// Load a container from a seekable stream.
    pub fn load<R: Read + Seek>(reader: R, options: &LoadOptions) -> Result<Self> {
        let mut reader = HqrReader::with_options(reader, options.clone())?;
        let entries = reader.read_entries()?;
        tracing::debug!(entries = entries.len(), "loaded container");
        Ok(Self { entries })
    }

    /// Open and load a container file.
    pub fn open<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let file = File::open(path)?;
        Self::load(BufReader::new(file), options)
    }

    /// Serialize to `writer`, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<u64> {
        HqrWriter::new(writer).write_entries(&self.entries)
    }

    /// Serialize into a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        write_to_vec(&self.entries)
    }

    /// Serialize to a file, replacing it if it exists.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    /// All slots, the EOF marker included.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Slot at `index`.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Number of slots, the EOF marker included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the container holds nothing but the EOF marker.
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Index of the EOF marker.
    pub fn eof_index(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    /// Indices of the Pointers aliasing `index`, in ascending order.
    pub fn aliases_of(&self, index: usize) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alias_of() == Some(index))
            .map(|(i, _)| i)
            .collect()
    }

    /// Follow a Pointer to the Normal entry it shares.
    ///
    /// Returns the index of the owning slot, or `None` for Null and EOF
    /// slots and out-of-range indices.
    pub fn resolve(&self, index: usize) -> Option<usize> {
        match self.entries.get(index)? {
            Entry::Normal { .. } => Some(index),
            Entry::Pointer { alias_of } => match self.entries.get(*alias_of)? {
                Entry::Normal { .. } => Some(*alias_of),
                _ => None,
            },
            Entry::Null | Entry::Eof => None,
        }
    }

    // ------------------------------------------------------------------
    // Decoding
    // ------------------------------------------------------------------

    /// Decode the resource of `index`, following Pointers.
    ///
    /// Null slots decode to `None`. Asking for the EOF marker fails.
    pub fn decode_entry(&self, index: usize) -> Result<Option<Vec<u8>>> {
        self.check_entry_index(index)?;
        match self.resolve(index) {
            Some(owner) => self.resource(owner).map(Resource::decode).transpose(),
            None if self.entries[index].kind() == EntryKind::Eof => {
                Err(LbarcError::protected_entry(index))
            }
            None => Ok(None),
        }
    }

    /// Decode hidden child `child` of `index`, following Pointers.
    pub fn decode_child(&self, index: usize, child: usize) -> Result<Vec<u8>> {
        self.check_entry_index(index)?;
        let owner = self.resolve(index).unwrap_or(index);
        let children = self.entries[owner].children();
        children
            .get(child)
            .ok_or_else(|| {
                LbarcError::out_of_range("child", child, children.len().saturating_sub(1))
            })?
            .decode()
    }

    /// Decode every slot, in slot order. Pointers decode their target; Null
    /// and EOF slots yield `None`.
    pub fn decode_all(&self) -> Vec<Result<Option<Vec<u8>>>> {
        let decode = |index: usize| match self.resolve(index) {
            Some(owner) => self.resource(owner).map(Resource::decode).transpose(),
            None => Ok(None),
        };

        #[cfg(feature = "parallel")]
        {
            (0..self.entries.len()).into_par_iter().map(decode).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..self.entries.len()).map(decode).collect()
        }
    }

    fn resource(&self, index: usize) -> Option<&Resource> {
        self.entries.get(index).and_then(Entry::resource)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Delete top-level slot `index`.
    ///
    /// - The EOF marker cannot be deleted.
    /// - A Normal entry that is aliased hands its resource and children to
    ///   the lowest aliasing Pointer, which the other aliases are repointed
    ///   to; the children are kept regardless of `delete_children`.
    /// - A Normal entry with children, deleted with `delete_children`
    ///   false, is replaced by its first child and keeps its slot.
    /// - Anything else is removed together with its children.
    pub fn delete(&mut self, index: usize, delete_children: bool) -> Result<()> {
        self.check_entry_index(index)?;
        if index == self.eof_index() {
            return Err(LbarcError::protected_entry(index));
        }

        let aliases = self.aliases_of(index);
        if let Some((&heir, others)) = aliases.split_first() {
            let owner = std::mem::replace(&mut self.entries[index], Entry::Null);
            self.entries[heir] = owner;
            for &other in others {
                self.entries[other] = Entry::Pointer { alias_of: heir };
            }
            tracing::debug!(index, heir, "promoted alias of deleted entry");
            self.remove_slot(index);
            return Ok(());
        }

        if let Entry::Normal { resource, children } = &mut self.entries[index] {
            if !delete_children && !children.is_empty() {
                *resource = children.remove(0);
                tracing::debug!(index, "promoted first child of deleted entry");
                return Ok(());
            }
        }

        self.remove_slot(index);
        tracing::debug!(index, "deleted entry");
        Ok(())
    }

    /// Insert `record` at the gap identified by `(entry, child)`.
    ///
    /// The cursor names a gap in the flattened list of records: `child`
    /// 0 is the gap right before slot `entry`, and `child` `c >= 1` is the
    /// gap right before child `c - 1` of `entry`, which always yields a
    /// child. At a `child` 0 gap the record becomes the last child of the
    /// previous slot when `as_child` is set and the gap lies between two
    /// Normal entries. Next to a Pointer, Null or EOF slot `as_child` is
    /// ignored and the record becomes a new top-level slot at `entry`.
    ///
    /// Only childless Normal records can become children. EOF records are
    /// never inserted, and a Pointer record must alias a Normal entry
    /// before its insertion point.
    pub fn insert(
        &mut self,
        entry: usize,
        child: usize,
        record: Entry,
        as_child: bool,
    ) -> Result<Placement> {
        self.check_entry_index(entry)?;
        let child_count = self.entries[entry].children().len();
        if child > child_count {
            return Err(LbarcError::out_of_range("child", child, child_count));
        }

        if child >= 1 {
            let resource = into_child(record)?;
            return self.insert_child(entry, child - 1, resource);
        }

        let between_normals =
            entry >= 1 && self.entries[entry - 1].is_normal() && self.entries[entry].is_normal();
        if as_child && between_normals {
            let owner = entry - 1;
            let at = self.entries[owner].children().len();
            let resource = into_child(record)?;
            return self.insert_child(owner, at, resource);
        }

        match &record {
            Entry::Eof => return Err(LbarcError::protected_entry(entry)),
            Entry::Pointer { alias_of } => {
                let valid = *alias_of < entry && self.entries[*alias_of].is_normal();
                if !valid {
                    return Err(LbarcError::out_of_range(
                        "alias target",
                        *alias_of,
                        entry.saturating_sub(1),
                    ));
                }
            }
            Entry::Null | Entry::Normal { .. } => {}
        }

        self.insert_slot(entry, record);
        tracing::debug!(index = entry, "inserted entry");
        Ok(Placement::TopLevel(entry))
    }

    /// Append a resource as a new top-level slot before the EOF marker.
    pub fn push(&mut self, resource: Resource) -> usize {
        let index = self.eof_index();
        self.insert_slot(index, Entry::normal(resource));
        index
    }

    /// Append a hidden child to Normal entry `index`.
    pub fn push_child(&mut self, index: usize, resource: Resource) -> Result<usize> {
        self.check_entry_index(index)?;
        let at = self.entries[index].children().len();
        match self.insert_child(index, at, resource)? {
            Placement::Child { child, .. } => Ok(child),
            Placement::TopLevel(i) => Ok(i),
        }
    }

    fn insert_child(&mut self, entry: usize, at: usize, resource: Child) -> Result<Placement> {
        match &mut self.entries[entry] {
            Entry::Normal { children, .. } => {
                children.insert(at, resource);
                tracing::debug!(entry, child = at, "inserted hidden entry");
                Ok(Placement::Child { entry, child: at })
            }
            other => Err(LbarcError::invalid_header(format!(
                "entry {entry} is {} and cannot own hidden entries",
                other.kind()
            ))),
        }
    }

    /// Splice `record` in at `index`, shifting Pointer targets at or past it.
    fn insert_slot(&mut self, index: usize, record: Entry) {
        for entry in &mut self.entries {
            if let Entry::Pointer { alias_of } = entry {
                if *alias_of >= index {
                    *alias_of += 1;
                }
            }
        }
        self.entries.insert(index, record);
    }

    /// Remove slot `index`, shifting Pointer targets past it.
    fn remove_slot(&mut self, index: usize) -> Entry {
        let removed = self.entries.remove(index);
        for entry in &mut self.entries {
            if let Entry::Pointer { alias_of } = entry {
                if *alias_of > index {
                    *alias_of -= 1;
                }
            }
        }
        removed
    }

    fn check_entry_index(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(LbarcError::out_of_range("entry", index, self.eof_index()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Check the structural rules and every record header.
    ///
    /// - exactly one EOF marker, in the last slot
    /// - every Pointer aliases an earlier Normal slot
    /// - the alias target is the first slot sharing that resource, so a
    ///   Pointer never aliases a slot that is itself a Pointer
    /// - every header has a known codec and stored records have equal sizes
    pub fn validate(&self) -> Result<()> {
        let eof = self.eof_index();
        match self.entries.last() {
            Some(Entry::Eof) => {}
            _ => return Err(LbarcError::invalid_header("container does not end with EOF")),
        }

        for (index, entry) in self.entries.iter().enumerate() {
            match entry {
                Entry::Eof if index != eof => {
                    return Err(LbarcError::invalid_header(format!(
                        "EOF marker at {index} before the last slot"
                    )));
                }
                Entry::Pointer { alias_of } => {
                    let valid = *alias_of < index && self.entries[*alias_of].is_normal();
                    if !valid {
                        return Err(LbarcError::out_of_range(
                            "alias target",
                            *alias_of,
                            index.saturating_sub(1),
                        ));
                    }
                }
                Entry::Normal { resource, children } => {
                    resource.check()?;
                    for child in children {
                        child.check()?;
                    }
                }
                Entry::Null | Entry::Eof => {}
            }
        }
        Ok(())
    }
}

/// Unwrap a record that is about to become a hidden child.
fn into_child(record: Entry) -> Result<Child> {
    match record {
        Entry::Normal { resource, children } if children.is_empty() => Ok(resource),
        Entry::Normal { .. } => Err(LbarcError::invalid_child_kind("Normal entry with children")),
        other => Err(LbarcError::invalid_child_kind(other.kind().name())),
    }
}
