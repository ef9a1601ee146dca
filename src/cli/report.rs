//! Output formatting for the CLI.
//!
//! Separate from core logic so trawl can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use crate::core::data::{CatalogValue, MessageCatalog};
use crate::core::pipeline::TemplateError;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Print every domain of a catalog as `## <domain>` followed by its
/// messages.
pub fn print_messages(catalog: &MessageCatalog) {
    print_messages_to(catalog, &mut io::stdout().lock());
}

/// Print a catalog to a custom writer.
pub fn print_messages_to<W: Write>(catalog: &MessageCatalog, writer: &mut W) {
    for (domain, messages) in catalog {
        let _ = writeln!(writer, "## {}", domain);
        for (key, value) in messages {
            print_entry(key, value, 0, writer);
        }
    }
}

/// `key : value` for leaves; `key :` and an indented block for containers.
fn print_entry<W: Write>(key: &str, value: &CatalogValue, level: usize, writer: &mut W) {
    let indent = " ".repeat(level * 2);
    match value {
        CatalogValue::Scalar(scalar) => {
            let _ = writeln!(writer, "{}{} : {}", indent, key, scalar);
        }
        CatalogValue::Sequence(items) => {
            let _ = writeln!(writer, "{}{} :", indent, key);
            for (index, item) in items.iter().enumerate() {
                print_entry(&index.to_string(), item, level + 1, writer);
            }
        }
        CatalogValue::Map(map) => {
            let _ = writeln!(writer, "{}{} :", indent, key);
            for (child_key, child) in map {
                print_entry(child_key, child, level + 1, writer);
            }
        }
    }
}

pub fn print_warning(message: &str) {
    print_warning_to(message, &mut io::stderr().lock());
}

pub fn print_warning_to<W: Write>(message: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), message);
}

/// Report templates that were skipped.
pub fn print_template_errors(errors: &[TemplateError], verbose: bool) {
    print_template_errors_to(errors, verbose, &mut io::stderr().lock());
}

/// With `verbose`, one line per template; otherwise a one-line summary.
pub fn print_template_errors_to<W: Write>(errors: &[TemplateError], verbose: bool, writer: &mut W) {
    if errors.is_empty() {
        return;
    }
    if verbose {
        for error in errors {
            print_warning_to(
                &format!(
                    "Skipped {}: {}",
                    error.file_path.display(),
                    error.error
                ),
                writer,
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} template(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            errors.len(),
            "-v".cyan()
        );
    }
}
