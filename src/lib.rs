//! Trawl - translation message extractor for Twig templates
//!
//! Trawl scans the Twig templates of a Symfony bundle for translatable
//! text, merges what it finds with the bundle's YAML translation files and
//! prints or writes the result. Existing translations are kept; new
//! messages get a prefixed placeholder value.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Template parsing, message extraction and catalog merging

pub mod cli;
pub mod config;
pub mod core;
