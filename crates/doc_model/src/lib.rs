//! Document Model - in-memory WordprocessingML tree
//!
//! This crate provides the ordered XML element tree that a `.docx` part is
//! loaded into, path-based node addressing, and the closed classification of
//! the WordprocessingML elements the review engine walks.

mod node;
mod node_path;
mod tree;
mod error;
mod hyperlink;
mod run;
pub mod table;

pub use node::*;
pub use node_path::*;
pub use tree::*;
pub use error::*;
pub use hyperlink::*;
pub use run::*;
pub use table::TableContext;
