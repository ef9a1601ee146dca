use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::extract::{DEFAULT_DOMAIN, DEFAULT_MAX_DEPTH, DEFAULT_PREFIX, ExtractOptions};

pub const CONFIG_FILE_NAME: &str = ".trawlrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_domain")]
    pub default_domain: String,
    #[serde(default = "default_views_dir")]
    pub views_dir: String,
    #[serde(default = "default_translations_dir")]
    pub translations_dir: String,
    #[serde(default = "default_template_patterns")]
    pub template_patterns: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    /// Bundle name to bundle directory, relative to the source root.
    #[serde(default)]
    pub bundles: BTreeMap<String, String>,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_views_dir() -> String {
    "Resources/views".to_string()
}

fn default_translations_dir() -> String {
    "Resources/translations".to_string()
}

fn default_template_patterns() -> Vec<String> {
    vec!["*.html.twig".to_string()]
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            default_domain: default_domain(),
            views_dir: default_views_dir(),
            translations_dir: default_translations_dir(),
            template_patterns: default_template_patterns(),
            ignores: Vec::new(),
            bundles: BTreeMap::new(),
            max_depth: default_max_depth(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern is invalid or a required value
    /// is empty.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        for pattern in &self.template_patterns {
            Pattern::new(pattern).with_context(|| {
                format!("Invalid glob pattern in 'templatePatterns': \"{}\"", pattern)
            })?;
        }
        if self.template_patterns.is_empty() {
            bail!("'templatePatterns' must not be empty");
        }

        if self.default_domain.is_empty() {
            bail!("'defaultDomain' must not be empty");
        }
        if self.max_depth == 0 {
            bail!("'maxDepth' must be greater than 0");
        }

        Ok(())
    }

    /// Extraction options, with `prefix` overriding the configured one.
    pub fn extract_options(&self, prefix: Option<&str>) -> ExtractOptions {
        ExtractOptions {
            prefix: prefix.unwrap_or(&self.prefix).to_string(),
            default_domain: self.default_domain.clone(),
            max_depth: self.max_depth,
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Where the config was loaded from; `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
