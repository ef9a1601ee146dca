use std::path::{Path, PathBuf};

use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning for templates.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Template paths, sorted.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Find templates under `views_dir`.
///
/// A file is a template when its file name matches one of `patterns`.
/// `ignores` are glob patterns matched against the path relative to
/// `views_dir`, or literal relative paths matched as prefixes.
pub fn scan_templates(
    views_dir: &Path,
    patterns: &[String],
    ignores: &[String],
    verbose: bool,
) -> ScanResult {
    let mut result = ScanResult::default();

    let name_patterns = compile_patterns(patterns, verbose);

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut ignore_patterns: Vec<Pattern> = Vec::new();
    for p in ignores {
        if is_glob_pattern(p) {
            ignore_patterns.extend(compile_patterns(std::slice::from_ref(p), verbose));
        } else {
            literal_ignore_paths.push(PathBuf::from(p));
        }
    }

    if !views_dir.is_dir() {
        if verbose {
            eprintln!(
                "{} Views directory does not exist: {}",
                "warning:".bold().yellow(),
                views_dir.display()
            );
        }
        return result;
    }

    for entry in WalkDir::new(views_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                result.skipped_count += 1;
                if verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(views_dir).unwrap_or(path);

        if literal_ignore_paths
            .iter()
            .any(|ignore_path| relative.starts_with(ignore_path))
        {
            continue;
        }
        if ignore_patterns.iter().any(|p| p.matches_path(relative)) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if name_patterns.iter().any(|p| p.matches(&file_name)) {
            result.files.push(path.to_path_buf());
        }
    }

    result.files.sort();
    result
}

fn compile_patterns(patterns: &[String], verbose: bool) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                if verbose {
                    eprintln!(
                        "{} Invalid glob pattern '{}': {}",
                        "warning:".bold().yellow(),
                        p,
                        e
                    );
                }
                None
            }
        })
        .collect()
}
