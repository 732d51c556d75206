//! Arena holding the virtual folder hierarchy.
//!
//! Entities are stored in slots addressed by [`EntityId`]. A node owns its
//! children through its `children` list; the `parent` link is a plain id
//! used for lookup only. Removing a node clears its slot for good.

use std::collections::HashMap;

use super::node::{Entity, EntityId, EntityKind};
use crate::error::{CoreError, CoreResult};

/// The in-memory entity hierarchy, rooted at a single node.
#[derive(Debug, Clone, Default)]
pub struct EntityTree {
    slots: Vec<Option<Entity>>,
    keys: HashMap<String, EntityId>,
    root: Option<EntityId>,
}

impl EntityTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<EntityId> {
        self.root
    }

    /// Returns the entity behind `id`, or `None` if it has been removed.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn find_by_key(&self, key: &str) -> Option<EntityId> {
        self.keys.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.get(id).and_then(Entity::parent)
    }

    /// Children of `id` in display order; empty for unknown ids.
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.get(id).map(Entity::children).unwrap_or_default()
    }

    /// Only the directory children of `id`, as shown in a folder tree.
    pub fn subdirectories(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.get(*child).is_some_and(Entity::is_directory))
    }

    /// Depth-first walk from the root in document order.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    pub(crate) fn insert_root(&mut self, entity: Entity) -> CoreResult<EntityId> {
        if self.root.is_some() {
            return Err(CoreError::InvalidParent("tree already has a root".to_string()));
        }
        let id = self.insert(entity, None)?;
        self.root = Some(id);
        Ok(id)
    }

    /// Appends `entity` as the last child of `parent`.
    pub(crate) fn insert_child(&mut self, parent: EntityId, entity: Entity) -> CoreResult<EntityId> {
        match self.get(parent) {
            None => {
                return Err(CoreError::InvalidParent(format!(
                    "entity {parent:?} is not in the tree"
                )))
            }
            Some(p) if p.kind() == EntityKind::File => {
                return Err(CoreError::InvalidParent(format!(
                    "`{}` is a file",
                    p.name()
                )))
            }
            Some(_) => {}
        }
        let id = self.insert(entity, Some(parent))?;
        if let Some(Some(p)) = self.slots.get_mut(parent.0) {
            p.children.push(id);
        }
        Ok(id)
    }

    fn insert(&mut self, mut entity: Entity, parent: Option<EntityId>) -> CoreResult<EntityId> {
        if self.keys.contains_key(entity.key()) {
            return Err(CoreError::DuplicateKey(entity.key().to_string()));
        }
        let id = EntityId(self.slots.len());
        entity.parent = parent;
        entity.children.clear();
        self.keys.insert(entity.key().to_string(), id);
        self.slots.push(Some(entity));
        Ok(id)
    }

    /// Detaches `id` from its parent and drops it with its whole subtree.
    ///
    /// Returns the removed entity, or `None` if `id` was already gone.
    pub(crate) fn detach(&mut self, id: EntityId) -> Option<Entity> {
        let parent = self.get(id)?.parent();
        match parent {
            Some(parent) => {
                if let Some(Some(p)) = self.slots.get_mut(parent.0) {
                    p.children.retain(|child| *child != id);
                }
            }
            None => self.root = None,
        }

        let mut pending = vec![id];
        let mut removed = None;
        while let Some(next) = pending.pop() {
            if let Some(entity) = self.slots.get_mut(next.0).and_then(Option::take) {
                self.keys.remove(entity.key());
                pending.extend(entity.children.iter().copied());
                if next == id {
                    removed = Some(entity);
                }
            }
        }
        removed
    }
}

/// Pre-order iterator over a tree, see [`EntityTree::iter`].
#[derive(Debug)]
pub struct Preorder<'a> {
    tree: &'a EntityTree,
    stack: Vec<EntityId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (EntityId, &'a Entity);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(entity) = self.tree.get(id) {
                self.stack.extend(entity.children().iter().rev().copied());
                return Some((id, entity));
            }
        }
        None
    }
}
