use tracing::{debug, instrument};

use crate::error::BrowserError;
use crate::index;
use crate::remote::ChildLister;

/// Walks a path from a root hash down to the hash of the terminal file.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver {
    separator: char,
}

impl PathResolver {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Split `path` into components after mapping platform separators to
    /// the resolver's separator. Empty components are dropped.
    pub fn components(&self, path: &str) -> Vec<String> {
        let normalized: String = path
            .trim()
            .chars()
            .map(|c| {
                if c == '/' || c == std::path::MAIN_SEPARATOR {
                    self.separator
                } else {
                    c
                }
            })
            .collect();

        normalized
            .split(self.separator)
            .filter(|component| !component.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Resolve `path` against `root_hash`.
    ///
    /// Every component but the last must be a directory; the last must be a
    /// file. Listing errors and lookup misses stop the traversal at once.
    #[instrument(skip(self, lister), level = "debug")]
    pub async fn resolve(
        &self,
        path: &str,
        root_hash: &str,
        lister: &(impl ChildLister + ?Sized),
    ) -> Result<String, BrowserError> {
        let components = self.components(path);
        let (file_name, directories) = components
            .split_last()
            .ok_or(BrowserError::EmptyPath)?;

        let mut current = root_hash.to_string();
        for directory in directories {
            let children = lister.list_children_of(&current).await?;
            current = index::find_directory(&children, directory)?;
            debug!("Descended into {} ({})", directory, current);
        }

        let children = lister.list_children_of(&current).await?;
        let hash = index::find_file(&children, file_name)?;
        debug!("Resolved {} to {}", path, hash);
        Ok(hash)
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(crate::browser::DEFAULT_PATH_SEPARATOR)
    }
}
