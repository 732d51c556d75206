//! Synchronisation between the entity tree and the tree document.
//!
//! [`PersistenceAdapter`] builds an [`EntityTree`] from the document and
//! mirrors every structural change back into it. Each change is written
//! through to disk before the call returns.

use crate::config::settings::StoreConfig;
use crate::document::element::Element;
use crate::document::storage::TreeDocument;
use crate::document::{ATTR_KEY, ATTR_NAME, TAG_DIR, TAG_FILE};
use crate::entity::{Entity, EntityId, EntityKind, EntityTree};
use crate::error::{CoreError, CoreResult};
use crate::icon::IconCache;

/// Owns the tree document and applies tree mutations to it.
#[derive(Debug, Clone)]
pub struct PersistenceAdapter {
    document: TreeDocument,
}

impl PersistenceAdapter {
    /// Opens the document named by `config`, creating it when allowed.
    pub fn open(config: &StoreConfig) -> CoreResult<Self> {
        let document = if config.create_if_missing {
            TreeDocument::open_or_create(&config.document_path, &new_key(), &config.root_name)?
        } else {
            TreeDocument::open(&config.document_path)?
        };
        Ok(Self::new(document))
    }

    pub fn new(document: TreeDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &TreeDocument {
        &self.document
    }

    /// Builds the entity tree from the document.
    ///
    /// The first top-level element becomes the root; the tree is empty if
    /// there is none. Any further top-level elements stay in the document
    /// but are not loaded.
    ///
    /// # Errors
    ///
    /// [`CoreError::MalformedDocument`] if an element lacks `key` or
    /// `name`, a `File` element has children, or a key repeats. No partial
    /// tree is returned.
    pub fn load(&self, icons: &mut IconCache) -> CoreResult<EntityTree> {
        let mut tree = EntityTree::new();
        let mut top_level = self.document.root().children().iter();

        if let Some(first) = top_level.next() {
            build(first, None, &mut tree, icons)?;
        }
        let ignored = top_level.count();
        if ignored > 0 {
            tracing::warn!(ignored, "document has extra top-level elements, loading the first only");
        }

        tracing::debug!(entities = tree.len(), "loaded entity tree");
        Ok(tree)
    }

    /// Adds a shortcut to `file_path` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidParent`] if `parent` is not a live directory.
    /// - [`CoreError::InvalidPath`] if `file_path` is empty.
    /// - [`CoreError::ParentNotFound`] if the document has no `Dir` with the
    ///   parent's key. Nothing is changed in either tree.
    /// - [`CoreError::Persist`] if saving fails. The entity and the
    ///   document element have been added in memory regardless.
    pub fn add_file(
        &mut self,
        tree: &mut EntityTree,
        icons: &mut IconCache,
        parent: EntityId,
        file_path: &str,
    ) -> CoreResult<EntityId> {
        let parent_entity = tree
            .get(parent)
            .ok_or_else(|| CoreError::InvalidParent(format!("entity {parent:?} no longer exists")))?;
        if !parent_entity.is_directory() {
            return Err(CoreError::InvalidParent(format!(
                "`{}` is not a directory",
                parent_entity.name()
            )));
        }
        if file_path.is_empty() {
            return Err(CoreError::InvalidPath);
        }

        let parent_key = parent_entity.key().to_string();
        let node = match self
            .document
            .root_mut()
            .find_mut(TAG_DIR, ATTR_KEY, &parent_key)
        {
            Some(node) => node,
            None => {
                tracing::warn!(key = %parent_key, "directory missing from document, tree has drifted");
                return Err(CoreError::ParentNotFound(parent_key));
            }
        };

        let key = unique_key(tree);
        let icon = icons.file_index(file_path);
        node.push_child(
            Element::new(TAG_FILE)
                .with_attribute(ATTR_KEY, key.as_str())
                .with_attribute(ATTR_NAME, file_path),
        );
        let id = tree.insert_child(parent, Entity::new(EntityKind::File, key.as_str(), file_path, icon))?;
        tracing::debug!(%key, parent = %parent_key, path = file_path, "added file");

        self.document.save()?;
        Ok(id)
    }

    /// Removes the file shortcut `file`.
    ///
    /// The entity is detached from its parent first, whatever happens to
    /// the document. Returns whether a matching `File` element was found
    /// and removed; a stale `file` id yields `Ok(false)`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidTarget`] if `file` is not a file.
    /// - [`CoreError::Persist`] if saving fails after the element was removed.
    pub fn remove_file(&mut self, tree: &mut EntityTree, file: EntityId) -> CoreResult<bool> {
        let Some(entity) = tree.get(file) else {
            tracing::debug!(?file, "remove of an entity that is already gone");
            return Ok(false);
        };
        if !entity.is_file() {
            return Err(CoreError::InvalidTarget(format!(
                "`{}` is not a file",
                entity.name()
            )));
        }

        let Some(removed) = tree.detach(file) else {
            return Ok(false);
        };
        let key = removed.key();

        if self
            .document
            .root_mut()
            .remove_descendant(TAG_FILE, ATTR_KEY, key)
            .is_none()
        {
            tracing::warn!(%key, "file missing from document, removed from tree only");
            return Ok(false);
        }
        tracing::debug!(%key, path = removed.name(), "removed file");

        self.document.save()?;
        Ok(true)
    }

    /// Writes the current document to disk again.
    pub fn persist(&self) -> CoreResult<()> {
        self.document.save()
    }
}

/// Converts `element` and its subtree into entities under `parent`.
fn build(
    element: &Element,
    parent: Option<EntityId>,
    tree: &mut EntityTree,
    icons: &mut IconCache,
) -> CoreResult<()> {
    let key = required_attribute(element, ATTR_KEY)?;
    let name = required_attribute(element, ATTR_NAME)?;
    let kind = EntityKind::from_tag(element.tag());

    if kind == EntityKind::File && !element.children().is_empty() {
        return Err(CoreError::MalformedDocument(format!(
            "File `{key}` has child elements"
        )));
    }

    let icon = match kind {
        EntityKind::Directory => icons.directory_index(),
        EntityKind::File => icons.file_index(name),
        EntityKind::Unknown => None,
    };
    let entity = Entity::new(kind, key, name, icon);
    let inserted = match parent {
        Some(parent) => tree.insert_child(parent, entity),
        None => tree.insert_root(entity),
    };
    let id = inserted.map_err(|e| match e {
        CoreError::DuplicateKey(key) => {
            CoreError::MalformedDocument(format!("key `{key}` is used more than once"))
        }
        other => other,
    })?;

    for child in element.children() {
        build(child, Some(id), tree, icons)?;
    }
    Ok(())
}

fn required_attribute<'a>(element: &'a Element, name: &str) -> CoreResult<&'a str> {
    element.attribute(name).ok_or_else(|| {
        CoreError::MalformedDocument(format!(
            "<{}> element is missing the `{name}` attribute",
            element.tag()
        ))
    })
}

fn new_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn unique_key(tree: &EntityTree) -> String {
    loop {
        let key = new_key();
        if !tree.contains_key(&key) {
            return key;
        }
    }
}
