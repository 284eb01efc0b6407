//! Melba element tree
//!
//! A minimal retained element tree that stands in for the page a toast
//! library normally mutates. It provides exactly what the toast lifecycle
//! needs and nothing else:
//!
//! - **Arena-backed nodes**: cheap copyable [`NodeId`] keys, stale keys are
//!   detectable after removal
//! - **Structure**: parent/child links with insertion-ordered children
//! - **Presentation hooks**: class lists and string attributes, toggled by
//!   the library and consumed by whatever renders the tree
//! - **Inert text**: text content is plain data and is never interpreted
//!   as markup
//! - **Queries**: attach checks and class/attribute lookups under `body`
//!
//! The tree has no layout, styling, or event loop of its own. Hosts render
//! it however they like and feed input back through the owning library.

pub mod tree;

pub use tree::{Document, NodeId};
