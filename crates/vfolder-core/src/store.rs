//! The store facade used by frontends.
//!
//! A [`Store`] starts [`Uninitialized`]: it can resolve icons but has no
//! tree. [`Store::load`] turns it into a `Store<Ready>`, the only state
//! that exposes the tree and its mutations, so mutating an unloaded store
//! does not compile.
//!
//! # Examples
//!
//! ```no_run
//! use vfolder_core::{Config, GlyphResolver, Store};
//!
//! let mut store = Store::new(&Config::default(), GlyphResolver).load()?;
//! let root = store.root().expect("document has a root directory");
//! let id = store.add_file(root, "/home/user/plan.md")?;
//! assert!(store.remove_file(id)?);
//! # Ok::<(), vfolder_core::CoreError>(())
//! ```

use crate::config::settings::{Config, StoreConfig};
use crate::document::{PersistenceAdapter, TreeDocument};
use crate::entity::{Entity, EntityId, EntityTree};
use crate::error::CoreResult;
use crate::event::{Command, Event};
use crate::icon::{IconCache, IconIndex, IconResolver};

/// Store state before the document has been loaded.
#[derive(Debug)]
pub struct Uninitialized;

/// Store state once the tree has been built from the document.
#[derive(Debug)]
pub struct Ready {
    adapter: PersistenceAdapter,
    tree: EntityTree,
}

/// Owns the icon cache, the tree document and the entity tree.
///
/// One store per document. All methods take `&self`/`&mut self`; callers
/// needing to share a store across threads must wrap the whole store.
#[derive(Debug)]
pub struct Store<S = Ready> {
    config: StoreConfig,
    icons: IconCache,
    state: S,
}

impl Store<Uninitialized> {
    pub fn new(config: &Config, resolver: impl IconResolver + 'static) -> Self {
        Self {
            config: config.store.clone(),
            icons: IconCache::new(resolver, &config.icons),
            state: Uninitialized,
        }
    }

    /// Opens the document and builds the entity tree.
    ///
    /// # Errors
    ///
    /// Fails like [`PersistenceAdapter::open`] and
    /// [`PersistenceAdapter::load`]; no store is produced in that case.
    pub fn load(self) -> CoreResult<Store<Ready>> {
        let Self {
            config, mut icons, ..
        } = self;
        let adapter = PersistenceAdapter::open(&config)?;
        let tree = adapter.load(&mut icons)?;
        tracing::info!(
            path = %config.document_path.display(),
            entities = tree.len(),
            "store ready"
        );
        Ok(Store {
            config,
            icons,
            state: Ready { adapter, tree },
        })
    }
}

impl<S> Store<S> {
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn icons(&self) -> &IconCache {
        &self.icons
    }

    pub fn resolve_directory_icon(&mut self) -> Option<IconIndex> {
        self.icons.directory_index()
    }

    pub fn resolve_file_icon(&mut self, file_path: &str) -> Option<IconIndex> {
        self.icons.file_index(file_path)
    }
}

impl Store<Ready> {
    pub fn tree(&self) -> &EntityTree {
        &self.state.tree
    }

    pub fn root(&self) -> Option<EntityId> {
        self.state.tree.root()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.state.tree.get(id)
    }

    pub fn document(&self) -> &TreeDocument {
        self.state.adapter.document()
    }

    /// See [`PersistenceAdapter::add_file`].
    pub fn add_file(&mut self, parent: EntityId, file_path: &str) -> CoreResult<EntityId> {
        let Ready { adapter, tree } = &mut self.state;
        adapter.add_file(tree, &mut self.icons, parent, file_path)
    }

    /// See [`PersistenceAdapter::remove_file`].
    pub fn remove_file(&mut self, file: EntityId) -> CoreResult<bool> {
        let Ready { adapter, tree } = &mut self.state;
        adapter.remove_file(tree, file)
    }

    /// Re-reads the document from disk and rebuilds the tree.
    ///
    /// Ids from the previous tree are invalid afterwards. On error the
    /// current tree and document are kept.
    pub fn reload(&mut self) -> CoreResult<()> {
        let adapter = PersistenceAdapter::open(&self.config)?;
        let tree = adapter.load(&mut self.icons)?;
        self.state = Ready { adapter, tree };
        tracing::info!(entities = self.state.tree.len(), "store reloaded");
        Ok(())
    }

    /// Saves the in-memory document, e.g. after a failed write-through.
    pub fn persist(&self) -> CoreResult<()> {
        self.state.adapter.persist()
    }

    /// Applies `command` and reports the outcome as an [`Event`].
    pub fn dispatch(&mut self, command: Command) -> Event {
        let operation = command.describe();
        let outcome = match command {
            Command::AddFile { parent, path } => self.add_file(parent, &path).map(|id| {
                let key = self
                    .entity(id)
                    .map(|e| e.key().to_string())
                    .unwrap_or_default();
                Event::FileAdded { parent, id, key }
            }),
            Command::RemoveFile(id) => self.remove_file(id).map(|removed| Event::FileRemoved {
                id,
                removed_from_document: removed,
            }),
            Command::Reload => self.reload().map(|()| Event::Reloaded {
                entities: self.state.tree.len(),
            }),
        };

        outcome.unwrap_or_else(|e| {
            tracing::warn!(%operation, error = %e, "command failed");
            Event::OperationFailed {
                operation,
                error: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::error::CoreError;
    use crate::icon::cache::tests::RecordingResolver;
    use crate::icon::GlyphResolver;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"<Data>
  <Dir key="k0" name="Root">
    <Dir key="k1" name="Work"/>
    <File key="k2" name="/tmp/readme.txt"/>
  </Dir>
</Data>"#;

    fn config_for(dir: &Path) -> Config {
        let mut config = Config::default();
        config.store.document_path = dir.join("Data.xml");
        config
    }

    fn ready_store(tmp: &TempDir) -> Store<Ready> {
        fs::write(tmp.path().join("Data.xml"), SAMPLE).unwrap();
        Store::new(&config_for(tmp.path()), RecordingResolver::default())
            .load()
            .unwrap()
    }

    /// Kind, key, name and parent key of every entity, in pre-order.
    fn shape(tree: &EntityTree) -> Vec<(EntityKind, String, String, Option<String>)> {
        tree.iter()
            .map(|(id, e)| {
                let parent = tree
                    .parent(id)
                    .and_then(|p| tree.get(p))
                    .map(|p| p.key().to_string());
                (e.kind(), e.key().to_string(), e.name().to_string(), parent)
            })
            .collect()
    }

    // --- load ---

    #[test]
    fn load_creates_document_when_missing() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(&config_for(tmp.path()), RecordingResolver::default())
            .load()
            .unwrap();

        let root = store.entity(store.root().unwrap()).unwrap();
        assert_eq!(root.name(), "Root");
        assert!(root.is_directory());
        assert!(tmp.path().join("Data.xml").exists());
    }

    #[test]
    fn load_malformed_document_fails() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("Data.xml"),
            r#"<Data><Dir key="r" name="Root"><File name="x"/></Dir></Data>"#,
        )
        .unwrap();

        let err = Store::new(&config_for(tmp.path()), RecordingResolver::default())
            .load()
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedDocument(_)));
    }

    #[test]
    fn loaded_keys_are_unique_and_files_are_leaves() {
        let tmp = TempDir::new().unwrap();
        let store = ready_store(&tmp);

        let mut keys: Vec<_> = store.tree().iter().map(|(_, e)| e.key()).collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);

        assert!(store
            .tree()
            .iter()
            .filter(|(_, e)| e.is_file())
            .all(|(_, e)| e.children().is_empty()));
    }

    // --- icons ---

    #[test]
    fn icon_resolution_works_before_load() {
        let resolver = RecordingResolver::default();
        let mut store = Store::new(&Config::default(), resolver.clone());

        let a = store.resolve_file_icon("/x/a.pdf");
        let b = store.resolve_file_icon("/y/b.pdf");
        let dir = store.resolve_directory_icon();

        assert_eq!(a, b);
        assert_ne!(a, dir);
        assert_eq!(resolver.calls.borrow().len(), 2);
    }

    #[test]
    fn load_reuses_icons_resolved_earlier() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Data.xml"), SAMPLE).unwrap();
        let resolver = RecordingResolver::default();
        let mut store = Store::new(&config_for(tmp.path()), resolver.clone());
        let txt = store.resolve_file_icon("/elsewhere/other.txt");

        let store = store.load().unwrap();

        let readme = store.entity(store.tree().find_by_key("k2").unwrap()).unwrap();
        assert_eq!(readme.icon(), txt);
        // .txt before load, folder during load
        assert_eq!(resolver.calls.borrow().len(), 2);
    }

    #[test]
    fn glyph_icons_depend_on_extension_not_load_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("Data.xml"),
            r#"<Data><Dir key="r" name="Root"><File key="c" name="/repo/Cargo.toml"/><File key="a" name="/etc/app.toml"/></Dir></Data>"#,
        )
        .unwrap();
        let mut config = config_for(tmp.path());
        config.icons.large = false;

        let store = Store::new(&config, GlyphResolver).load().unwrap();

        let app = store.entity(store.tree().find_by_key("a").unwrap()).unwrap();
        let icon = app.icon().and_then(|i| store.icons().icon(i)).unwrap();
        let fresh = GlyphResolver.resolve_file(Path::new("/etc/app.toml"), false).unwrap();
        assert_eq!(icon, &fresh);
        assert_eq!(icon.as_str(), "\u{e615}");
    }

    // --- mutations ---

    #[test]
    fn add_then_remove_round_trip_through_disk() {
        let tmp = TempDir::new().unwrap();
        let mut store = ready_store(&tmp);
        let work = store.tree().find_by_key("k1").unwrap();
        let root = store.root().unwrap();

        let a = store.add_file(work, "/tmp/a.txt").unwrap();
        store.add_file(work, "/srv/b & c.pdf").unwrap();
        store.add_file(root, "/tmp/d.md").unwrap();
        assert!(store.remove_file(a).unwrap());
        let before = shape(store.tree());

        let reloaded = Store::new(&config_for(tmp.path()), RecordingResolver::default())
            .load()
            .unwrap();

        assert_eq!(shape(reloaded.tree()), before);
        assert_eq!(reloaded.tree().len(), 5);
    }

    #[test]
    fn remove_twice_reports_false() {
        let tmp = TempDir::new().unwrap();
        let mut store = ready_store(&tmp);
        let readme = store.tree().find_by_key("k2").unwrap();

        assert!(store.remove_file(readme).unwrap());
        assert!(!store.remove_file(readme).unwrap());
    }

    #[test]
    fn add_under_file_changes_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut store = ready_store(&tmp);
        let readme = store.tree().find_by_key("k2").unwrap();
        let before = shape(store.tree());

        let err = store.add_file(readme, "/tmp/b.txt").unwrap_err();

        assert!(matches!(err, CoreError::InvalidParent(_)));
        assert_eq!(shape(store.tree()), before);
        assert_eq!(fs::read_to_string(tmp.path().join("Data.xml")).unwrap(), SAMPLE);
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let tmp = TempDir::new().unwrap();
        let mut store = ready_store(&tmp);
        fs::write(
            tmp.path().join("Data.xml"),
            r#"<Data><Dir key="z" name="Elsewhere"/></Data>"#,
        )
        .unwrap();

        store.reload().unwrap();

        assert_eq!(store.tree().len(), 1);
        assert_eq!(store.entity(store.root().unwrap()).unwrap().name(), "Elsewhere");
    }

    #[test]
    fn failed_reload_keeps_current_tree() {
        let tmp = TempDir::new().unwrap();
        let mut store = ready_store(&tmp);
        fs::write(tmp.path().join("Data.xml"), "<Data><Dir").unwrap();

        assert!(store.reload().is_err());
        assert_eq!(store.tree().len(), 3);
    }

    #[test]
    fn persist_rewrites_document() {
        let tmp = TempDir::new().unwrap();
        let store = ready_store(&tmp);
        fs::remove_file(tmp.path().join("Data.xml")).unwrap();

        store.persist().unwrap();

        let text = fs::read_to_string(tmp.path().join("Data.xml")).unwrap();
        assert!(text.contains(r#"name="/tmp/readme.txt""#));
    }

    // --- dispatch ---

    #[test]
    fn dispatch_add_and_remove() {
        let tmp = TempDir::new().unwrap();
        let mut store = ready_store(&tmp);
        let work = store.tree().find_by_key("k1").unwrap();

        let added = store.dispatch(Command::AddFile {
            parent: work,
            path: "/tmp/a.txt".to_string(),
        });
        let (id, key) = match added {
            Event::FileAdded { id, key, .. } => (id, key),
            other => panic!("unexpected event: {other:?}"),
        };
        assert_eq!(store.tree().find_by_key(&key), Some(id));

        let removed = store.dispatch(Command::RemoveFile(id));
        assert_eq!(
            removed,
            Event::FileRemoved {
                id,
                removed_from_document: true
            }
        );
    }

    #[test]
    fn dispatch_reports_failures() {
        let tmp = TempDir::new().unwrap();
        let mut store = ready_store(&tmp);
        let root = store.root().unwrap();

        let event = store.dispatch(Command::AddFile {
            parent: root,
            path: String::new(),
        });

        assert!(matches!(
            event,
            Event::OperationFailed { ref error, .. } if error.contains("invalid path")
        ));
    }

    #[test]
    fn dispatch_reload() {
        let tmp = TempDir::new().unwrap();
        let mut store = ready_store(&tmp);

        assert_eq!(store.dispatch(Command::Reload), Event::Reloaded { entities: 3 });
    }
}
