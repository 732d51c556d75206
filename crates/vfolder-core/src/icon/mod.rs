//! Icon resolution for tree entities.
//!
//! [`cache::IconCache`] hands out stable indices per file type and calls an
//! [`cache::IconResolver`] only on a miss. [`glyph::GlyphResolver`] is the
//! built-in resolver for terminal frontends.

pub mod cache;
pub mod glyph;

pub use cache::{file_extension, Discriminator, IconCache, IconHandle, IconIndex, IconResolver};
pub use glyph::GlyphResolver;
