//! Raw stream compress/decompress commands.

use crate::utils::replace_file;
use std::fs;
use std::path::Path;

pub fn cmd_compress(
    codec: u16,
    source: &Path,
    destination: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = fs::read(source)?;
    let output = lbarc_lz::compress_raw(codec, &input)?;
    replace_file(destination, &output)?;

    report(source, input.len(), destination, output.len());
    Ok(())
}

pub fn cmd_decompress(
    codec: u16,
    source: &Path,
    destination: &Path,
    size: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = fs::read(source)?;
    let output = match size {
        Some(size) => lbarc_lz::decompress_raw(codec, &input, size)?,
        None => {
            let codec = lbarc_core::CodecId::from_id(codec)?;
            lbarc_lz::decompress_to_end(codec, &input)?
        }
    };
    replace_file(destination, &output)?;

    report(source, input.len(), destination, output.len());
    Ok(())
}

fn report(source: &Path, source_len: usize, destination: &Path, destination_len: usize) {
    println!("{}: {} bytes", source.display(), source_len);
    println!("{}: {} bytes", destination.display(), destination_len);
}
