use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Result, bail};
use regex::Regex;

use super::super::{
    args::UpdateCommand,
    exit_status::ExitStatus,
    report::{print_messages, print_template_errors, print_warning},
};
use crate::config::{Config, ConfigLoadResult, load_config};
use crate::core::{
    parsers::yaml::load_catalog,
    pipeline::{extract_templates, merge_with_persisted},
    scanner::scan_templates,
    yaml_writer::{YamlWriter, is_writable_domain},
};

/// `en`, `fr_FR`, `pt-BR`, `zh_Hant_TW`, ...
static LOCALE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(?:[_-][A-Za-z0-9]{2,8})*$").expect("valid locale regex")
});

pub fn update(cmd: UpdateCommand) -> Result<ExitStatus> {
    if !cmd.force && !cmd.dump_messages {
        println!("You should choose option --force or --dump-messages");
        return Ok(ExitStatus::Success);
    }

    if !LOCALE_PATTERN.is_match(&cmd.locale) {
        bail!("Invalid locale \"{}\"", cmd.locale);
    }

    let source_root = cmd.source_root.clone().unwrap_or_else(|| PathBuf::from("."));
    let ConfigLoadResult { config, path } = load_config(&source_root)?;
    if cmd.verbose
        && let Some(path) = &path
    {
        eprintln!("Using config {}", path.display());
    }

    let bundle_dir = resolve_bundle(&config, &source_root, &cmd.bundle)?;
    let options = config.extract_options(cmd.prefix.as_deref());

    // templates
    let scan = scan_templates(
        &bundle_dir.join(&config.views_dir),
        &config.template_patterns,
        &config.ignores,
        cmd.verbose,
    );
    if scan.skipped_count > 0 {
        print_warning(&format!(
            "{} path(s) skipped due to access errors{}",
            scan.skipped_count,
            if cmd.verbose { "" } else { " (use -v for details)" }
        ));
    }
    for file in &scan.files {
        println!("Parsing : {}", file.display());
    }
    let extracted = extract_templates(&scan.files, options);
    print_template_errors(&extracted.errors, cmd.verbose);

    // translation files
    let translations_dir = bundle_dir.join(&config.translations_dir);
    let persisted = load_catalog(&translations_dir, &cmd.locale)?;
    for file in &persisted.files {
        println!("Parsing : {}", file.display());
    }

    println!();
    println!("Merging...");
    let merged = merge_with_persisted(extracted.catalog, persisted.catalog);

    if cmd.dump_messages {
        println!();
        println!("Merged messages");
        print_messages(&merged);
    }

    if cmd.force {
        println!();
        println!("Writing files...");
        let writer = YamlWriter::new(&translations_dir, &cmd.locale);
        for (domain, messages) in &merged {
            if !is_writable_domain(domain) {
                print_warning(&format!(
                    "Skipping domain \"{}\": not usable as a file name",
                    domain
                ));
                continue;
            }
            println!("Writing {}", writer.file_name(domain));
            writer.write_domain(domain, messages)?;
        }
    }

    if extracted.errors.is_empty() {
        Ok(ExitStatus::Success)
    } else {
        Ok(ExitStatus::Failure)
    }
}

/// Bundle directory: a name from the `bundles` config map, otherwise a path
/// relative to the source root.
fn resolve_bundle(config: &Config, source_root: &Path, bundle: &str) -> Result<PathBuf> {
    let dir = match config.bundles.get(bundle) {
        Some(dir) => source_root.join(dir),
        None => source_root.join(bundle),
    };
    if !dir.is_dir() {
        bail!(
            "Bundle \"{}\" does not exist (looked in {})",
            bundle,
            dir.display()
        );
    }
    Ok(dir)
}
