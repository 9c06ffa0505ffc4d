//! Commands that modify an archive in place.

use crate::utils::{open_archive, open_or_create};
use lbarc_core::CodecId;
use lbarc_hqr::{Entry, Placement, Resource};
use std::fs;
use std::path::Path;

pub fn cmd_delete(
    archive: &Path,
    index: usize,
    children: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut container = open_archive(archive, false)?;
    container.delete(index, children)?;
    let written = container.save(archive)?;

    println!(
        "Deleted entry {} ({} slots left, {} bytes)",
        index,
        container.len(),
        written
    );
    Ok(())
}

pub fn cmd_add(
    archive: &Path,
    file: &Path,
    codec: u16,
    at: Option<usize>,
    as_child: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut container = open_or_create(archive)?;
    let resource = load_resource(file, codec)?;
    let at = at.unwrap_or_else(|| container.eof_index());

    let placement = container.insert(at, 0, Entry::normal(resource), as_child)?;
    let written = container.save(archive)?;

    match placement {
        Placement::TopLevel(index) => println!("Added {} as entry {}", file.display(), index),
        Placement::Child { entry, child } => println!(
            "Added {} as child {} of entry {}",
            file.display(),
            child,
            entry
        ),
    }
    println!("{}: {} bytes", archive.display(), written);
    Ok(())
}

pub fn cmd_add_child(
    archive: &Path,
    index: usize,
    file: &Path,
    codec: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut container = open_archive(archive, false)?;
    let resource = load_resource(file, codec)?;
    let child = container.push_child(index, resource)?;
    let written = container.save(archive)?;

    println!(
        "Added {} as child {} of entry {}",
        file.display(),
        child,
        index
    );
    println!("{}: {} bytes", archive.display(), written);
    Ok(())
}

fn load_resource(file: &Path, codec: u16) -> Result<Resource, Box<dyn std::error::Error>> {
    let codec = CodecId::from_id(codec)?;
    let data = fs::read(file)?;
    let resource = Resource::compress_or_store(codec, &data)?;
    tracing::debug!(
        file = %file.display(),
        codec = resource.codec_id(),
        size = resource.decoded_size(),
        packed = resource.encoded_size(),
        "prepared resource"
    );
    Ok(resource)
}
