//! Document tree model.
//!
//! The tree is produced by an external outline-markup parser and handed to
//! the renderer as-is. Nodes own their children; navigation towards parents
//! and siblings goes through a [`TreeIndex`] built once per export.

mod index;
mod node;

pub use index::*;
pub use node::*;
