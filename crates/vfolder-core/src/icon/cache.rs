//! Lazily populated icon list keyed by file type.
//!
//! Resolving an icon is assumed to be expensive (an OS call), so each
//! [`Discriminator`] is resolved at most once per process. The list never
//! evicts: the set of extensions a user collects is small and bounded.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::settings::IconConfig;

/// Cache key for icon resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Discriminator {
    /// Shared by every directory regardless of its label.
    Directory,
    /// A file extension exactly as [`file_extension`] extracts it.
    Extension(String),
}

impl Discriminator {
    /// Discriminator for the file at `path`.
    pub fn for_file(path: &str) -> Self {
        Self::Extension(file_extension(path).to_owned())
    }
}

/// Position of a resolved icon in the cache's icon list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconIndex(usize);

impl IconIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Opaque icon produced by an [`IconResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconHandle(String);

impl IconHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The external icon lookup. `None` means no icon could be found.
pub trait IconResolver {
    fn resolve_file(&self, path: &Path, large: bool) -> Option<IconHandle>;
    fn resolve_directory(&self, path: &Path, large: bool) -> Option<IconHandle>;
}

/// Returns the extension of `path` with its leading dot, or `""`.
///
/// Only the final component is inspected (`/` and `\` both separate).
/// Case is preserved and a name that is all extension keeps it whole, so
/// `".bashrc"` yields `".bashrc"`. A trailing dot yields `""`.
pub fn file_extension(path: &str) -> &str {
    let start = path.rfind(|c: char| c == '/' || c == '\\').map_or(0, |i| i + 1);
    let file_name = &path[start..];
    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => &file_name[dot..],
        _ => "",
    }
}

/// Maps discriminators to indices into a growing list of icons.
pub struct IconCache {
    resolver: Box<dyn IconResolver>,
    large: bool,
    directory_placeholder: PathBuf,
    icons: Vec<IconHandle>,
    indices: HashMap<Discriminator, Option<IconIndex>>,
}

impl IconCache {
    pub fn new(resolver: impl IconResolver + 'static, config: &IconConfig) -> Self {
        Self {
            resolver: Box::new(resolver),
            large: config.large,
            directory_placeholder: PathBuf::from(&config.directory_placeholder),
            icons: Vec::new(),
            indices: HashMap::new(),
        }
    }

    /// Returns the index cached for `discriminator`, resolving it on a miss.
    ///
    /// `file_path` is what the resolver sees for an extension miss and must
    /// be the path `discriminator` was derived from; the directory sentinel
    /// always resolves the configured placeholder path. A failed resolution
    /// is cached as `None` so it is attempted only once.
    fn resolve_index(
        &mut self,
        discriminator: &Discriminator,
        file_path: &str,
    ) -> Option<IconIndex> {
        if let Some(cached) = self.indices.get(discriminator) {
            return *cached;
        }

        let handle = match discriminator {
            Discriminator::Directory => self
                .resolver
                .resolve_directory(&self.directory_placeholder, self.large),
            Discriminator::Extension(_) => {
                self.resolver.resolve_file(Path::new(file_path), self.large)
            }
        };

        let index = match handle {
            Some(handle) => {
                self.icons.push(handle);
                Some(IconIndex(self.icons.len() - 1))
            }
            None => {
                tracing::warn!(?discriminator, "icon resolution failed, using no icon");
                None
            }
        };
        self.indices.insert(discriminator.clone(), index);
        index
    }

    /// Index of the icon shared by all directories.
    pub fn directory_index(&mut self) -> Option<IconIndex> {
        self.resolve_index(&Discriminator::Directory, "")
    }

    /// Index of the icon for the file at `file_path`, keyed by its extension.
    pub fn file_index(&mut self, file_path: &str) -> Option<IconIndex> {
        self.resolve_index(&Discriminator::for_file(file_path), file_path)
    }

    pub fn icon(&self, index: IconIndex) -> Option<&IconHandle> {
        self.icons.get(index.0)
    }

    /// Number of icons successfully resolved so far.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl fmt::Debug for IconCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconCache")
            .field("large", &self.large)
            .field("directory_placeholder", &self.directory_placeholder)
            .field("icons", &self.icons)
            .field("indices", &self.indices)
            .finish_non_exhaustive()
    }
}
