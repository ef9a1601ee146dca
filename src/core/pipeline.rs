//! One extraction run: parse templates, extract messages, merge with the
//! persisted catalog.
//!
//! Reading and parsing templates is parallelized with rayon. Extraction
//! runs sequentially in file order so the first-seen order of messages is
//! reproducible.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::core::data::{MessageCatalog, SyntaxNode};
use crate::core::extract::{ExtractOptions, MessageExtractor};
use crate::core::merge::merge_catalogs;
use crate::core::parsers::twig::parse_template;

/// A template that could not be read, parsed or traversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateError {
    pub file_path: PathBuf,
    pub error: String,
}

pub struct ParsedTemplate {
    pub file_path: PathBuf,
    pub tree: Result<SyntaxNode>,
}

#[derive(Debug, Default)]
pub struct ExtractResult {
    pub catalog: MessageCatalog,
    /// Templates that contributed to the catalog, in order.
    pub templates: Vec<PathBuf>,
    pub errors: Vec<TemplateError>,
}

/// Read and parse templates in parallel. Output order matches `files`.
pub fn parse_templates(files: &[PathBuf]) -> Vec<ParsedTemplate> {
    files
        .par_iter()
        .map(|file_path| {
            let tree = fs::read_to_string(file_path)
                .with_context(|| format!("Failed to read file: {}", file_path.display()))
                .and_then(|source| parse_template(&source));
            ParsedTemplate {
                file_path: file_path.clone(),
                tree,
            }
        })
        .collect()
}

/// Extract messages from parsed templates, in order.
///
/// Templates that failed to parse, or that nest deeper than the configured
/// limit, are reported in `errors` and contribute nothing.
pub fn extract_messages(templates: Vec<ParsedTemplate>, options: ExtractOptions) -> ExtractResult {
    let mut result = ExtractResult::default();

    for ParsedTemplate { file_path, tree } in templates {
        let outcome = tree.and_then(|tree| {
            let mut extractor = MessageExtractor::new(options.clone());
            extractor.crawl(&tree)?;
            Ok(extractor.into_catalog())
        });
        match outcome {
            Ok(found) => {
                for (domain, messages) in &found {
                    for (message, value) in messages {
                        result
                            .catalog
                            .insert_if_absent(domain, message, value.clone());
                    }
                }
                result.templates.push(file_path);
            }
            Err(e) => result.errors.push(TemplateError {
                file_path,
                error: format!("{:#}", e),
            }),
        }
    }

    result
}

/// Parse and extract in one step.
pub fn extract_templates(files: &[PathBuf], options: ExtractOptions) -> ExtractResult {
    extract_messages(parse_templates(files), options)
}

/// Reconcile extracted messages with the persisted catalog. Persisted
/// translations win; new messages keep their placeholder.
pub fn merge_with_persisted(extracted: MessageCatalog, persisted: MessageCatalog) -> MessageCatalog {
    merge_catalogs(extracted, [persisted])
}
