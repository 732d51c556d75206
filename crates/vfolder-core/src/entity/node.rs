//! A single node of the virtual folder hierarchy.

use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::document::{TAG_DIR, TAG_FILE};
use crate::icon::IconIndex;

/// Handle to an entity inside an [`EntityTree`](super::tree::EntityTree).
///
/// Ids are never reused, so the id of a removed entity stays dangling
/// instead of pointing at a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A virtual folder; `name` is its label.
    Directory,
    /// A shortcut; `name` is the absolute path of the real file.
    File,
    /// A document element of an unrecognized kind.
    Unknown,
}

impl EntityKind {
    /// Classifies a document element tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            TAG_DIR => Self::Directory,
            TAG_FILE => Self::File,
            _ => Self::Unknown,
        }
    }
}

/// A virtual directory or file shortcut.
///
/// Structure (`parent`, `children`) is owned by the tree; an `Entity` is
/// only ever handed out by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    kind: EntityKind,
    key: String,
    name: String,
    icon: Option<IconIndex>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
}

impl Entity {
    /// Creates a detached entity.
    pub fn new(
        kind: EntityKind,
        key: impl Into<String>,
        name: impl Into<String>,
        icon: Option<IconIndex>,
    ) -> Self {
        Self {
            kind,
            key: key.into(),
            name: name.into(),
            icon,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntityKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntityKind::File
    }

    /// The identity shared with the document element.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Folder label for directories, real file path for files.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index into the icon cache, absent if resolution failed.
    pub fn icon(&self) -> Option<IconIndex> {
        self.icon
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in display order.
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// The path of the real file, if this is a file shortcut.
    pub fn file_path(&self) -> Option<&Path> {
        self.is_file().then(|| Path::new(&self.name))
    }

    /// The label shown for this entity.
    ///
    /// Files show the last component of their path, NFC-normalised so that
    /// decomposed names (as stored by macOS) render composed.
    pub fn display_name(&self) -> String {
        match self.file_path().and_then(Path::file_name) {
            Some(file_name) => file_name.to_string_lossy().nfc().collect(),
            None => self.name.clone(),
        }
    }

    /// The directory holding the real file, for "open file location".
    pub fn containing_folder(&self) -> Option<&Path> {
        self.file_path()?.parent()
    }
}
