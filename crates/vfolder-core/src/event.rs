//! Command and event types for communication between a frontend and the store.
//!
//! A frontend translates user actions into [`Command`]s and hands them to
//! [`Store::dispatch`](crate::store::Store::dispatch), which answers with
//! an [`Event`]. This lets any frontend drive the store without matching
//! on error types.

use crate::entity::EntityId;

/// A change the frontend asks the store to make.
///
/// Commands flow **UI → Core**. The core never creates commands itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a shortcut to `path` under the directory `parent`.
    AddFile { parent: EntityId, path: String },
    /// Remove the file shortcut.
    RemoveFile(EntityId),
    /// Re-read the document from disk and rebuild the tree.
    Reload,
}

/// The store's answer to a [`Command`].
///
/// Events flow **Core → UI**. The UI uses these to update its display state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A shortcut was added and saved.
    FileAdded {
        parent: EntityId,
        id: EntityId,
        key: String,
    },
    /// A shortcut left the tree.
    FileRemoved {
        id: EntityId,
        /// `false` when the document had no matching element.
        removed_from_document: bool,
    },
    /// The tree was rebuilt from disk.
    Reloaded {
        /// Number of entities in the new tree.
        entities: usize,
    },
    /// A command failed.
    OperationFailed {
        /// Human-readable description of the operation.
        operation: String,
        /// The error message.
        error: String,
    },
}

impl Command {
    /// Short description used in [`Event::OperationFailed`].
    pub fn describe(&self) -> String {
        match self {
            Self::AddFile { path, .. } => format!("add {path}"),
            Self::RemoveFile(id) => format!("remove {id:?}"),
            Self::Reload => "reload".to_string(),
        }
    }
}
