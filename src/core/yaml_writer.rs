use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Number, Value};

use crate::core::data::{CatalogValue, MessageMap, Scalar};
use crate::core::merge::integer_key;
use crate::core::parsers::yaml::{BACKUP_PREFIX, CATALOG_EXTENSIONS};

/// Writes catalog domains to `<dir>/<domain>.<locale>.yml`.
pub struct YamlWriter {
    dir: PathBuf,
    locale: String,
}

impl YamlWriter {
    pub fn new(dir: &Path, locale: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            locale: locale.to_string(),
        }
    }

    pub fn file_name(&self, domain: &str) -> String {
        format!("{}.{}.{}", domain, self.locale, CATALOG_EXTENSIONS[0])
    }

    pub fn file_path(&self, domain: &str) -> PathBuf {
        self.dir.join(self.file_name(domain))
    }

    /// Backup of a domain file: the same name prefixed with `~`.
    pub fn backup_path(&self, domain: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", BACKUP_PREFIX, self.file_name(domain)))
    }

    /// Write one domain, copying the current file to its backup first.
    ///
    /// Returns the path written.
    pub fn write_domain(&self, domain: &str, messages: &MessageMap) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let path = self.file_path(domain);
        if path.exists() {
            let backup = self.backup_path(domain);
            fs::copy(&path, &backup).with_context(|| {
                format!(
                    "Failed to back up {} to {}",
                    path.display(),
                    backup.display()
                )
            })?;
        }

        let content = to_yaml_string(messages)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        Ok(path)
    }
}

/// Whether `domain` can be used as a file name prefix.
pub fn is_writable_domain(domain: &str) -> bool {
    !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.contains(['/', '\\'])
        && !domain.contains('\0')
}

/// Serialize a message map as block YAML.
pub fn to_yaml_string(messages: &MessageMap) -> Result<String> {
    if messages.is_empty() {
        return Ok("{}\n".to_string());
    }
    serde_yaml::to_string(&Value::Mapping(to_yaml_mapping(messages)))
        .context("Failed to serialize YAML")
}

fn to_yaml_mapping(messages: &MessageMap) -> Mapping {
    messages
        .iter()
        .map(|(key, value)| (to_yaml_key(key), to_yaml_value(value)))
        .collect()
}

/// Integer-looking keys are written as integers so list slots survive.
fn to_yaml_key(key: &str) -> Value {
    match integer_key(key) {
        Some(n) => Value::Number(n.into()),
        None => Value::String(key.to_string()),
    }
}

fn to_yaml_value(value: &CatalogValue) -> Value {
    match value {
        CatalogValue::Scalar(scalar) => match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(n) => Value::Number((*n).into()),
            Scalar::Float(f) => Value::Number(Number::from(*f)),
            Scalar::Str(s) => Value::String(s.clone()),
        },
        CatalogValue::Sequence(items) => Value::Sequence(items.iter().map(to_yaml_value).collect()),
        CatalogValue::Map(map) => Value::Mapping(to_yaml_mapping(map)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::core::parsers::yaml::parse_catalog_file;

    fn messages(entries: &[(&str, CatalogValue)]) -> MessageMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_write_new_file() {
        let dir = tempdir().unwrap();
        let writer = YamlWriter::new(&dir.path().join("translations"), "fr");

        let path = writer
            .write_domain(
                "messages",
                &messages(&[("Hello", "Bonjour".into()), ("Goodbye", "__Goodbye".into())]),
            )
            .unwrap();

        assert!(path.ends_with("translations/messages.fr.yml"));
        assert!(!writer.backup_path("messages").exists());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Hello: Bonjour\nGoodbye: __Goodbye\n");
    }

    #[test]
    fn test_existing_file_is_backed_up() {
        let dir = tempdir().unwrap();
        let writer = YamlWriter::new(dir.path(), "fr");
        fs::write(writer.file_path("admin"), "Save: Enregistrer\n").unwrap();

        writer
            .write_domain("admin", &messages(&[("Save", "Sauver".into())]))
            .unwrap();

        let backup = fs::read_to_string(dir.path().join("~admin.fr.yml")).unwrap();
        assert_eq!(backup, "Save: Enregistrer\n");
        let content = fs::read_to_string(writer.file_path("admin")).unwrap();
        assert_eq!(content, "Save: Sauver\n");
    }

    #[test]
    fn test_nested_values_read_back_unchanged() {
        let dir = tempdir().unwrap();
        let writer = YamlWriter::new(dir.path(), "fr");
        let original = messages(&[
            (
                "menu",
                CatalogValue::Map(messages(&[("home", "Accueil".into())])),
            ),
            (
                "codes",
                CatalogValue::Map(messages(&[("404", "Introuvable".into())])),
            ),
            (
                "list",
                CatalogValue::Sequence(vec!["a".into(), CatalogValue::from(2i64)]),
            ),
            ("empty", CatalogValue::null()),
        ]);

        let path = writer.write_domain("messages", &original).unwrap();

        assert_eq!(parse_catalog_file(&path).unwrap(), original);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("  404: Introuvable"));
    }

    #[test]
    fn test_empty_domain_is_an_empty_mapping() {
        assert_eq!(to_yaml_string(&MessageMap::new()).unwrap(), "{}\n");
    }

    #[test]
    fn test_is_writable_domain() {
        assert!(is_writable_domain("messages"));
        assert!(is_writable_domain("x.y"));
        assert!(!is_writable_domain(""));
        assert!(!is_writable_domain(".hidden"));
        assert!(!is_writable_domain("../escape"));
        assert!(!is_writable_domain("a/b"));
        assert!(!is_writable_domain("a\\b"));
    }
}
