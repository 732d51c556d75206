//! vfolder core library — a virtual folder tree of file shortcuts.
//!
//! `vfolder-core` keeps shortcuts to real files under a user-defined folder
//! hierarchy that is independent of where the files actually live. The
//! hierarchy is persisted as an XML document and every change is written
//! through to disk. It is decoupled from any UI so that any frontend can
//! drive it through the [`Store`] facade.
//!
//! # Modules
//!
//! - [`entity`] — The in-memory hierarchy: [`Entity`], [`EntityTree`].
//! - [`document`] — The XML tree document and the [`PersistenceAdapter`] mapping it to entities.
//! - [`icon`] — The per-file-type [`IconCache`] and the [`IconResolver`] seam.
//! - [`store`] — The [`Store`] facade combining the above.
//! - [`config`] — User-facing configuration (TOML-based settings).
//! - [`event`] — Command and event types for UI ↔ Core communication.
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod config;
pub mod document;
pub mod entity;
pub mod error;
pub mod event;
pub mod icon;
pub mod store;

pub use config::settings::Config;
pub use document::{PersistenceAdapter, TreeDocument};
pub use entity::{Entity, EntityId, EntityKind, EntityTree};
pub use error::{CoreError, CoreResult};
pub use event::{Command, Event};
pub use icon::{GlyphResolver, IconCache, IconHandle, IconIndex, IconResolver};
pub use store::{Ready, Store, Uninitialized};
