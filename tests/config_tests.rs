use std::fs;

use indoc::indoc;
use tempfile::tempdir;
use transpath::traits::Parser;
use transpath::{LocaleMapping, MappingRule, ProjectConfig, ProjectType};

const SAMPLE_XML: &str = indoc! {r#"
    <?xml version="1.0" encoding="utf-8"?>
    <config>
        <project-type>podir</project-type>
        <src-dir>pot</src-dir>
        <trans-dir>translations</trans-dir>
        <locales>
            <locale>fr</locale>
            <locale map-from="zh-Hans">zh-CN</locale>
        </locales>
        <rules>
            <rule pattern="**/*.pot">{path}/../{locale}/{filename}.po</rule>
        </rules>
    </config>
"#};

#[test]
fn loads_xml_config_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transpath.xml");
    fs::write(&path, SAMPLE_XML).unwrap();

    let config = ProjectConfig::load(&path).unwrap();
    assert_eq!(config.project_type, ProjectType::Podir);
    assert_eq!(config.src_dir.to_string_lossy(), "pot");
    assert_eq!(config.trans_dir.to_string_lossy(), "translations");
    assert_eq!(config.locales.len(), 2);
    assert_eq!(config.rules.len(), 1);
}

#[test]
fn xml_config_survives_a_save_load_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transpath.xml");

    let config = ProjectConfig::new(ProjectType::Gettext)
        .with_src_dir("pot")
        .with_locales(vec![
            LocaleMapping::new("fr"),
            LocaleMapping::with_mapped("zh-CN", "zh-Hans"),
        ])
        .with_rules(vec![MappingRule::new(
            Some("**/*.pot".to_string()),
            "{path}/{locale_with_underscore}.po",
        )]);

    config.save(&path).unwrap();
    let reloaded = ProjectConfig::load(&path).unwrap();
    assert_eq!(config, reloaded);
}

#[test]
fn json_config_survives_a_save_load_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transpath.json");

    let config = ProjectConfig::new(ProjectType::File)
        .with_trans_dir("out")
        .with_rules(vec![MappingRule::new(
            Some("**/*.odt".to_string()),
            "{locale}/{path}/{filename}.{extension}",
        )]);

    config.save(&path).unwrap();
    let reloaded = ProjectConfig::load(&path).unwrap();
    assert_eq!(config, reloaded);
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transpath.yaml");
    fs::write(&path, "project-type: gettext").unwrap();

    let err = ProjectConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("unsupported config"));
}

#[test]
fn bad_rule_in_config_file_names_the_template() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transpath.xml");
    fs::write(
        &path,
        indoc! {r#"
            <config>
                <project-type>gettext</project-type>
                <rules>
                    <rule pattern="**/*.pot">{path}/{filename}.po</rule>
                </rules>
            </config>
        "#},
    )
    .unwrap();

    let err = ProjectConfig::load(&path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("{path}/{filename}.po"), "{message}");
}

#[test]
fn config_drives_resolution_end_to_end() {
    let config = ProjectConfig::from_str(SAMPLE_XML).unwrap();
    let resolver = config.resolver().unwrap();

    let fr = &config.locales[0];
    let zh = &config.locales[1];
    assert_eq!(resolver.resolve_raw("pot/message.pot", fr), "fr/message.po");
    assert_eq!(
        resolver.resolve_raw("pot/message.pot", zh),
        "zh-Hans/message.po"
    );
}

#[test]
fn batch_resolution_over_documents_and_locales() {
    // The typical caller pattern: documents x configured locales, every
    // combination independent of the others.
    let config = ProjectConfig::from_str(SAMPLE_XML).unwrap();
    let resolver = config.resolver().unwrap();
    let documents = ["pot/message.pot", "pot/manual.pot"];

    let mut seen = std::collections::BTreeSet::new();
    for doc in documents {
        for locale in &config.locales {
            assert!(seen.insert(resolver.resolve_raw(doc, locale)));
        }
    }
    assert_eq!(seen.len(), documents.len() * config.locales.len());
}
