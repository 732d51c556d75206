//! The virtual folder hierarchy.
//!
//! [`node::Entity`] is a single directory or file shortcut;
//! [`tree::EntityTree`] owns all entities and their parent/child links.

pub mod node;
pub mod tree;

pub use node::{Entity, EntityId, EntityKind};
pub use tree::{EntityTree, Preorder};
