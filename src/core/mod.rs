//! Core extraction engine.
//!
//! ## Module Structure
//!
//! - `data`: Syntax trees, scalars and translation catalogs
//! - `parsers`: Twig template parser and YAML catalog loader
//! - `extract`: Message extraction from syntax trees
//! - `merge`: Deep merge of catalogs
//! - `scanner`: Template discovery
//! - `pipeline`: Parse, extract and merge for one run
//! - `yaml_writer`: Catalog write-back with backups

pub mod data;
pub mod extract;
pub mod merge;
pub mod parsers;
pub mod pipeline;
pub mod scanner;
pub mod yaml_writer;
