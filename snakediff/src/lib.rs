use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Map a file into memory for diffing without copying it
pub fn map_file<P: AsRef<Path>>(path: P) -> Result<Mmap> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map {}", path.as_ref().display()))?;
    Ok(map)
}

/// Split mapped content into diffable lines
pub fn split_lines(buf: &[u8]) -> Result<Vec<&str>> {
    let content = std::str::from_utf8(buf).context("Input is not valid utf8")?;
    Ok(content.lines().collect())
}
