//! The persisted tree document and its mapping to entities.
//!
//! The document is XML. Under the document element, `Dir` elements are
//! virtual folders and `File` elements are shortcuts; both carry a unique
//! `key` and a `name`:
//!
//! ```xml
//! <Data>
//!   <Dir key="..." name="Root">
//!     <Dir key="..." name="Work">
//!       <File key="..." name="/home/user/plan.md"/>
//!     </Dir>
//!   </Dir>
//! </Data>
//! ```

pub mod adapter;
pub mod element;
pub mod storage;

pub use adapter::PersistenceAdapter;
pub use element::Element;
pub use storage::TreeDocument;

pub const TAG_DIR: &str = "Dir";
pub const TAG_FILE: &str = "File";
pub const ATTR_KEY: &str = "key";
pub const ATTR_NAME: &str = "name";
