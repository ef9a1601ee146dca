use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde_yaml::{Mapping, Value};

use crate::core::data::{CatalogValue, MessageCatalog, MessageMap, Scalar};
use crate::core::merge::deep_merge;

/// File name prefix of the copy kept before a catalog file is overwritten.
pub const BACKUP_PREFIX: &str = "~";

/// Extensions of persisted catalog files, in the order they are written.
pub const CATALOG_EXTENSIONS: &[&str] = &["yml", "yaml"];

#[derive(Debug, Default)]
pub struct LoadCatalogResult {
    pub catalog: MessageCatalog,
    /// Files that were read, in load order.
    pub files: Vec<PathBuf>,
}

/// Load every `<domain>.<locale>.yml` file in `dir` into one catalog.
///
/// Files are read in file-name order. A missing directory is an empty
/// catalog; a file that is not a YAML mapping is an error.
pub fn load_catalog(dir: &Path, locale: &str) -> Result<LoadCatalogResult> {
    let mut result = LoadCatalogResult::default();
    if !dir.is_dir() {
        return Ok(result);
    }

    let mut entries: Vec<(String, PathBuf)> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            Some((name, entry.path()))
        })
        .collect();
    entries.sort();

    for (file_name, path) in entries {
        let Some(domain) = catalog_file_domain(&file_name, locale) else {
            continue;
        };
        let messages = parse_catalog_file(&path)?;
        let messages = match result.catalog.domain(domain) {
            Some(existing) => deep_merge(
                CatalogValue::Map(existing.clone()),
                [CatalogValue::Map(messages)],
            )
            .into_map(),
            None => messages,
        };
        result.catalog.insert_domain(domain, messages);
        result.files.push(path);
    }

    Ok(result)
}

/// Domain of a catalog file name for `locale`, e.g. `admin.fr.yml` -> `admin`.
///
/// Backups (`~admin.fr.yml`) are not catalog files.
pub fn catalog_file_domain<'a>(file_name: &'a str, locale: &str) -> Option<&'a str> {
    if file_name.starts_with(BACKUP_PREFIX) {
        return None;
    }
    CATALOG_EXTENSIONS.iter().find_map(|ext| {
        let domain = file_name.strip_suffix(&format!(".{}.{}", locale, ext))?;
        (!domain.is_empty()).then_some(domain)
    })
}

/// Parse one catalog file. An empty document is an empty domain.
pub fn parse_catalog_file(path: &Path) -> Result<MessageMap> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read YAML file: {}", path.display()))?;

    if is_blank_document(&content) {
        return Ok(MessageMap::new());
    }

    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

    match value {
        Value::Null => Ok(MessageMap::new()),
        Value::Mapping(mapping) => to_message_map(mapping)
            .with_context(|| format!("Invalid catalog in {}", path.display())),
        _ => bail!("Root of YAML file must be a mapping: {}", path.display()),
    }
}

/// Only blank lines and comments.
fn is_blank_document(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}

/// Convert a YAML document into a catalog value.
pub fn to_catalog_value(value: Value) -> Result<CatalogValue> {
    Ok(match value {
        Value::Null => CatalogValue::null(),
        Value::Bool(b) => CatalogValue::Scalar(Scalar::Bool(b)),
        Value::Number(n) => CatalogValue::Scalar(match n.as_i64() {
            Some(i) => Scalar::Int(i),
            None => Scalar::Float(n.as_f64().unwrap_or_default()),
        }),
        Value::String(s) => CatalogValue::str(s),
        Value::Sequence(items) => CatalogValue::Sequence(
            items
                .into_iter()
                .map(to_catalog_value)
                .collect::<Result<_>>()?,
        ),
        Value::Mapping(mapping) => CatalogValue::Map(to_message_map(mapping)?),
        Value::Tagged(tagged) => to_catalog_value(tagged.value)?,
    })
}

fn to_message_map(mapping: Mapping) -> Result<MessageMap> {
    let mut map = MessageMap::with_capacity(mapping.len());
    for (key, value) in mapping {
        map.insert(key_to_string(&key)?, to_catalog_value(value)?);
    }
    Ok(map)
}

fn key_to_string(key: &Value) -> Result<String> {
    Ok(match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Tagged(tagged) => key_to_string(&tagged.value)?,
        Value::Sequence(_) | Value::Mapping(_) => {
            bail!("Mapping keys must be scalars, found {:?}", key)
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_catalog_file_domain() {
        assert_eq!(catalog_file_domain("messages.fr.yml", "fr"), Some("messages"));
        assert_eq!(catalog_file_domain("x.y.fr.yaml", "fr"), Some("x.y"));
        assert_eq!(catalog_file_domain("messages.en.yml", "fr"), None);
        assert_eq!(catalog_file_domain("messages.fr_FR.yml", "fr"), None);
        assert_eq!(catalog_file_domain(".fr.yml", "fr"), None);
        assert_eq!(catalog_file_domain("messages.fr.xlf", "fr"), None);
        assert_eq!(catalog_file_domain("~messages.fr.yml", "fr"), None);
    }

    #[test]
    fn test_backup_files_are_not_loaded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("messages.fr.yml"), "Hello: Bonjour\n").unwrap();
        fs::write(dir.path().join("~messages.fr.yml"), "Hello: Salut\n").unwrap();
        fs::write(dir.path().join("~~messages.fr.yml"), "Hello: Coucou\n").unwrap();

        let result = load_catalog(dir.path(), "fr").unwrap();

        let domains: Vec<_> = result.catalog.domain_names().cloned().collect();
        assert_eq!(domains, vec!["messages"]);
        assert_eq!(result.files, vec![dir.path().join("messages.fr.yml")]);
        assert_eq!(
            result.catalog.domain("messages").unwrap()["Hello"],
            CatalogValue::str("Bonjour")
        );
    }

    #[test]
    fn test_load_catalog() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("messages.fr.yml"),
            "Hello: Bonjour\nmenu:\n  home: Accueil\n",
        )
        .unwrap();
        fs::write(dir.path().join("admin.fr.yml"), "Save: Enregistrer\n").unwrap();
        fs::write(dir.path().join("messages.en.yml"), "Hello: Hello\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let result = load_catalog(dir.path(), "fr").unwrap();

        let domains: Vec<_> = result.catalog.domain_names().cloned().collect();
        assert_eq!(domains, vec!["admin", "messages"]);
        assert_eq!(result.files.len(), 2);

        let messages = result.catalog.domain("messages").unwrap();
        assert_eq!(messages["Hello"], CatalogValue::str("Bonjour"));
        assert_eq!(
            messages["menu"],
            CatalogValue::Map(MessageMap::from([(
                "home".to_string(),
                CatalogValue::str("Accueil")
            )]))
        );
    }

    #[test]
    fn test_load_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let result = load_catalog(&dir.path().join("missing"), "fr").unwrap();
        assert!(result.catalog.is_empty());
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_empty_file_is_empty_domain() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("messages.fr.yml"), "# nothing yet\n").unwrap();

        let result = load_catalog(dir.path(), "fr").unwrap();
        assert!(result.catalog.domain("messages").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("messages.fr.yml"), "Hello: [unclosed\n").unwrap();

        let err = load_catalog(dir.path(), "fr").unwrap_err();
        assert!(err.to_string().contains("messages.fr.yml"));
    }

    #[test]
    fn test_non_mapping_root_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("messages.fr.yml"), "- a\n- b\n").unwrap();

        let err = load_catalog(dir.path(), "fr").unwrap_err();
        assert!(err.to_string().contains("must be a mapping"));
    }

    #[test]
    fn test_scalar_kinds_and_integer_keys() {
        let value: Value =
            serde_yaml::from_str("404: Not found\nflag: true\nratio: 1.5\nempty: ~\nlist: [a, 1]\n")
                .unwrap();

        let CatalogValue::Map(map) = to_catalog_value(value).unwrap() else {
            panic!("expected map");
        };
        assert_eq!(map["404"], CatalogValue::str("Not found"));
        assert_eq!(map["flag"], CatalogValue::Scalar(Scalar::Bool(true)));
        assert_eq!(map["ratio"], CatalogValue::Scalar(Scalar::Float(1.5)));
        assert_eq!(map["empty"], CatalogValue::null());
        assert_eq!(
            map["list"],
            CatalogValue::Sequence(vec![CatalogValue::str("a"), CatalogValue::from(1i64)])
        );
    }

    #[test]
    fn test_yml_and_yaml_files_of_one_domain_are_merged() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("messages.fr.yaml"), "A: a\nB: old\n").unwrap();
        fs::write(dir.path().join("messages.fr.yml"), "B: new\nC: c\n").unwrap();

        let result = load_catalog(dir.path(), "fr").unwrap();
        let messages = result.catalog.domain("messages").unwrap();
        let keys: Vec<_> = messages.keys().cloned().collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(messages["B"], CatalogValue::str("new"));
    }
}
