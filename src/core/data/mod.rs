//! Core data types shared by the extraction and merge phases.
//!
//! ## Module Structure
//!
//! - `scalar`: Scalar leaf values (template constants, catalog leaves)
//! - `syntax`: Template syntax tree (SyntaxNode and its variants)
//! - `catalog`: Translation catalogs (MessageCatalog, MessageMap, CatalogValue)

pub mod catalog;
pub mod scalar;
pub mod syntax;

pub use catalog::{CatalogValue, MessageCatalog, MessageMap};
pub use scalar::Scalar;
pub use syntax::{
    Child, ChildKey, FilterNode, GenericNode, INNER_NODE, NodeKind, PrintNode, SyntaxNode,
    TransNode,
};
