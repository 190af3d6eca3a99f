use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::extract::Listing;

/// Two blank lines, ten '=' characters, two blank lines.
const SEPARATOR: &str = "\n\n==========\n\n";

/// Appends `listings` as formatted blocks to `<dir>/<file_stem>.txt`.
///
/// Files are append-only and never truncated. With no listings, nothing is
/// created or touched (not even the directory); returns the written path
/// otherwise.
pub fn append_listings(dir: &Path, file_stem: &str, listings: &[Listing]) -> Result<Option<PathBuf>> {
    if listings.is_empty() {
        return Ok(None);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let path = dir.join(format!("{file_stem}.txt"));
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    for listing in listings {
        file.write_all(listing.text.as_bytes())?;
        file.write_all(listing.link.as_bytes())?;
        file.write_all(SEPARATOR.as_bytes())?;
    }

    Ok(Some(path))
}
