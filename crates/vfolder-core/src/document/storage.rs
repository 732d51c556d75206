//! The tree document on disk.
//!
//! [`TreeDocument`] pairs the parsed element tree with the file it came
//! from. Saving writes a sibling staging file and renames it over the
//! document, so an interrupted save leaves the previous version intact.

use std::path::{Path, PathBuf};

use super::element::Element;
use super::{ATTR_KEY, ATTR_NAME, TAG_DIR};
use crate::error::{CoreError, CoreResult};

/// Tag of the implicit document element.
pub const TAG_DOCUMENT: &str = "Data";

/// A parsed tree document bound to its file.
#[derive(Debug, Clone)]
pub struct TreeDocument {
    path: PathBuf,
    root: Element,
}

impl TreeDocument {
    /// Reads and parses the document at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::MalformedDocument`] if the XML cannot be parsed.
    pub fn open(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        let root = Element::parse(&content)?;
        tracing::debug!(path = %path.display(), "opened tree document");
        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    /// Opens `path`, or creates and saves a document holding a single
    /// empty root directory labelled `root_name` if the file is missing.
    pub fn open_or_create(path: &Path, root_key: &str, root_name: &str) -> CoreResult<Self> {
        match Self::open(path) {
            Err(CoreError::NotFound(_)) => {
                let root = Element::new(TAG_DOCUMENT).with_child(
                    Element::new(TAG_DIR)
                        .with_attribute(ATTR_KEY, root_key)
                        .with_attribute(ATTR_NAME, root_name),
                );
                let document = Self::from_element(path, root);
                document.save()?;
                tracing::info!(path = %path.display(), "created new tree document");
                Ok(document)
            }
            other => other,
        }
    }

    /// Wraps an already parsed document element without touching disk.
    pub fn from_element(path: &Path, root: Element) -> Self {
        Self {
            path: path.to_path_buf(),
            root,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document element; its child elements are the top-level nodes.
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Writes the whole document to its file.
    ///
    /// # Errors
    ///
    /// [`CoreError::Persist`] if the staging file cannot be written or
    /// renamed into place.
    pub fn save(&self) -> CoreResult<()> {
        let content = self.root.to_document_string()?;
        let persist_error = |source: std::io::Error| CoreError::Persist {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(persist_error)?;
        }
        let staging = staging_path(&self.path);
        if let Err(e) = std::fs::write(&staging, content)
            .and_then(|()| std::fs::rename(&staging, &self.path))
        {
            let _ = std::fs::remove_file(&staging);
            return Err(persist_error(e));
        }
        tracing::debug!(path = %self.path.display(), "saved tree document");
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
