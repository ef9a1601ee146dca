use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["prefix", "defaultDomain", "viewsDir", "translationsDir"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["prefix"], "__");
    assert_eq!(parsed["templatePatterns"][0], "*.html.twig");

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Created .trawlrc.json"));
    assert!(test.root().join(".trawlrc.json").exists());

    let content = test.read_file(".trawlrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".trawlrc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already exists"));
    assert_eq!(test.read_file(".trawlrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file(
        "AppBundle/Resources/views/index.html.twig",
        "{{ 'Hello'|trans }}",
    )?;

    let output = test.update_command("fr", "AppBundle").arg("--force").output()?;
    assert!(
        output.status.success(),
        "Update should work with initialized config. stderr: {}",
        stderr(&output)
    );
    assert_eq!(
        test.read_file("AppBundle/Resources/translations/messages.fr.yml")?,
        "Hello: __Hello\n"
    );

    Ok(())
}
