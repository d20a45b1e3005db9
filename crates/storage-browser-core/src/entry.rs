use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a remote directory entry.
///
/// Discriminants follow the remote convention: files are 0, directories 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EntryKind {
    File = 0,
    Directory = 1,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => f.write_str("file"),
            EntryKind::Directory => f.write_str("directory"),
        }
    }
}

/// One child of a remote directory, as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Entry name (a single path component)
    pub name: String,
    /// File or directory
    pub kind: EntryKind,
    /// Opaque identity token, unique within the remote store
    pub hash: String,
    /// Size in bytes (meaningful for files only)
    pub size: i64,
}

impl Entry {
    pub fn file(name: impl Into<String>, hash: impl Into<String>, size: i64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            hash: hash.into(),
            size,
        }
    }

    pub fn directory(name: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            hash: hash.into(),
            size: 0,
        }
    }

    /// Declared size in bytes.
    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
