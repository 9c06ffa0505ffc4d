//! Extract command implementation.

use crate::utils::{open_archive, replace_file};
use std::path::Path;

pub fn cmd_extract(
    archive: &Path,
    index: usize,
    child: Option<usize>,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let container = open_archive(archive, false)?;

    let data = match child {
        Some(child) => container.decode_child(index, child)?,
        None => container
            .decode_entry(index)?
            .ok_or_else(|| format!("entry {index} is empty"))?,
    };
    replace_file(output, &data)?;

    match child {
        Some(child) => println!(
            "Extracted entry {}.{} ({} bytes) to {}",
            index,
            child,
            data.len(),
            output.display()
        ),
        None => println!(
            "Extracted entry {} ({} bytes) to {}",
            index,
            data.len(),
            output.display()
        ),
    }
    Ok(())
}
