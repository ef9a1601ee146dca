//! File parsers for templates and message files.
//!
//! This module provides parsers for different file types:
//! - `twig`: Twig template parser (hand-written lexer and recursive descent)
//! - `yaml`: YAML message file loader (scans a translations directory)

pub mod twig;
pub mod yaml;
