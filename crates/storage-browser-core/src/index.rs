//! Lookups over a single directory listing.
//!
//! A file and a directory may share a name, so every lookup is keyed by
//! name and kind. The first match in listing order wins.

use crate::entry::{Entry, EntryKind};
use crate::error::BrowserError;

/// Find the first entry with the given name and kind.
pub fn find_by_name_and_kind<'a>(
    entries: &'a [Entry],
    name: &str,
    kind: EntryKind,
) -> Result<&'a Entry, BrowserError> {
    entries
        .iter()
        .find(|e| e.kind == kind && e.name == name)
        .ok_or_else(|| BrowserError::NotFound {
            kind,
            name: name.to_string(),
        })
}

/// Hash of the first file named `name`.
pub fn find_file(entries: &[Entry], name: &str) -> Result<String, BrowserError> {
    find_by_name_and_kind(entries, name, EntryKind::File).map(|e| e.hash.clone())
}

/// Hash of the first directory named `name`.
pub fn find_directory(entries: &[Entry], name: &str) -> Result<String, BrowserError> {
    find_by_name_and_kind(entries, name, EntryKind::Directory).map(|e| e.hash.clone())
}

/// Declared size of an entry. Unused for directories.
pub fn size(entry: &Entry) -> i64 {
    entry.size()
}
