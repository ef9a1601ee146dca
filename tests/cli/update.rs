use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

const INDEX_TEMPLATE: &str = r#"
<h1>{% trans %}Hello{% endtrans %}</h1>
<p>{{ 'Goodbye'|trans }}</p>
<button>{{ 'Save'|trans({}, 'admin') }}</button>
"#;

fn bundle_with_catalog() -> Result<CliTest> {
    let test = CliTest::with_file("AppBundle/Resources/views/index.html.twig", INDEX_TEMPLATE)?;
    test.write_file(
        "AppBundle/Resources/translations/messages.fr.yml",
        "Hello: Bonjour\n",
    )?;
    Ok(test)
}

#[test]
fn test_requires_force_or_dump() -> Result<()> {
    let test = bundle_with_catalog()?;

    let output = test.update_command("fr", "AppBundle").output()?;

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "You should choose option --force or --dump-messages\n"
    );
    assert_eq!(
        test.read_file("AppBundle/Resources/translations/messages.fr.yml")?,
        "Hello: Bonjour\n"
    );

    Ok(())
}

#[test]
fn test_force_writes_merged_catalogs() -> Result<()> {
    let test = bundle_with_catalog()?;

    let output = test
        .update_command("fr", "AppBundle")
        .arg("--force")
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("AppBundle/Resources/translations/messages.fr.yml")?,
        "Hello: Bonjour\nGoodbye: __Goodbye\n"
    );
    assert_eq!(
        test.read_file("AppBundle/Resources/translations/admin.fr.yml")?,
        "Save: __Save\n"
    );
    assert_eq!(
        test.read_file("AppBundle/Resources/translations/~messages.fr.yml")?,
        "Hello: Bonjour\n"
    );
    assert!(
        !test
            .root()
            .join("AppBundle/Resources/translations/~admin.fr.yml")
            .exists()
    );

    let out = stdout(&output);
    assert!(out.contains("Parsing : ./AppBundle/Resources/views/index.html.twig"));
    assert!(out.contains("Merging..."));
    assert!(out.contains("Writing files..."));
    assert!(out.contains("Writing messages.fr.yml"));
    assert!(out.contains("Writing admin.fr.yml"));

    Ok(())
}

#[test]
fn test_obsolete_translations_are_kept() -> Result<()> {
    let test = CliTest::with_file(
        "AppBundle/Resources/views/index.html.twig",
        "{{ 'Hello'|trans }}",
    )?;
    test.write_file(
        "AppBundle/Resources/translations/messages.fr.yml",
        "Old: Ancien\nHello: Bonjour\n",
    )?;

    let output = test
        .update_command("fr", "AppBundle")
        .arg("--force")
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        test.read_file("AppBundle/Resources/translations/messages.fr.yml")?,
        "Hello: Bonjour\nOld: Ancien\n"
    );

    Ok(())
}

#[test]
fn test_dump_messages_does_not_write() -> Result<()> {
    let test = bundle_with_catalog()?;

    let output = test
        .update_command("fr", "AppBundle")
        .arg("--dump-messages")
        .output()?;

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(
        out.ends_with(
            "\nMerged messages\n## messages\nHello : Bonjour\nGoodbye : __Goodbye\n## admin\nSave : __Save\n"
        ),
        "unexpected output: {}",
        out
    );
    assert!(!out.contains("Writing files..."));
    assert!(
        !test
            .root()
            .join("AppBundle/Resources/translations/admin.fr.yml")
            .exists()
    );

    Ok(())
}

#[test]
fn test_prefix_option() -> Result<()> {
    let test = CliTest::with_file(
        "AppBundle/Resources/views/index.html.twig",
        "{{ 'Hello'|trans }}",
    )?;

    let output = test
        .update_command("de", "AppBundle")
        .args(["--prefix", "tr_", "--force"])
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        test.read_file("AppBundle/Resources/translations/messages.de.yml")?,
        "Hello: tr_Hello\n"
    );

    Ok(())
}

#[test]
fn test_broken_template_is_skipped() -> Result<()> {
    let test = bundle_with_catalog()?;
    test.write_file(
        "AppBundle/Resources/views/broken.html.twig",
        "{{ 'Oops'|trans }}{% if %}",
    )?;

    let output = test
        .update_command("fr", "AppBundle")
        .arg("--force")
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("1 template(s) could not be parsed"));
    let messages = test.read_file("AppBundle/Resources/translations/messages.fr.yml")?;
    assert!(messages.contains("Goodbye: __Goodbye"));
    assert!(!messages.contains("Oops"));

    let output = test
        .update_command("fr", "AppBundle")
        .args(["--dump-messages", "-v"])
        .output()?;
    assert!(stderr(&output).contains("Skipped ./AppBundle/Resources/views/broken.html.twig"));

    Ok(())
}

#[test]
fn test_malformed_catalog_is_an_error() -> Result<()> {
    let test = CliTest::with_file(
        "AppBundle/Resources/views/index.html.twig",
        "{{ 'Hello'|trans }}",
    )?;
    test.write_file(
        "AppBundle/Resources/translations/messages.fr.yml",
        "Hello: [unclosed\n",
    )?;

    let output = test
        .update_command("fr", "AppBundle")
        .arg("--force")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse YAML file"));
    assert_eq!(
        test.read_file("AppBundle/Resources/translations/messages.fr.yml")?,
        "Hello: [unclosed\n"
    );

    Ok(())
}

#[test]
fn test_bundle_from_config() -> Result<()> {
    let test = CliTest::with_file(
        ".trawlrc.json",
        r#"{
            "bundles": { "AppBundle": "src/App" },
            "viewsDir": "templates",
            "translationsDir": "translations"
        }"#,
    )?;
    test.write_file("src/App/templates/page.html.twig", "{{ 'Title'|trans }}")?;

    let output = test
        .update_command("fr", "AppBundle")
        .arg("--force")
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("src/App/translations/messages.fr.yml")?,
        "Title: __Title\n"
    );

    Ok(())
}

#[test]
fn test_missing_bundle_is_an_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .update_command("fr", "NoSuchBundle")
        .arg("--force")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("NoSuchBundle"));

    Ok(())
}

#[test]
fn test_invalid_locale_is_an_error() -> Result<()> {
    let test = bundle_with_catalog()?;

    let output = test
        .update_command("../fr", "AppBundle")
        .arg("--force")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid locale"));

    Ok(())
}

#[test]
fn test_backup_holds_previous_run() -> Result<()> {
    let test = bundle_with_catalog()?;

    for _ in 0..2 {
        let output = test
            .update_command("fr", "AppBundle")
            .arg("--force")
            .output()?;
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(!stdout(&output).contains("Writing ~"));
    }

    assert_eq!(
        test.read_file("AppBundle/Resources/translations/~messages.fr.yml")?,
        "Hello: Bonjour\nGoodbye: __Goodbye\n"
    );
    assert!(
        !test
            .root()
            .join("AppBundle/Resources/translations/~~messages.fr.yml")
            .exists()
    );

    Ok(())
}
