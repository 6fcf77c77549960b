//! Project configuration: project type, directories, locale mappings and
//! file mapping rules.
//!
//! The canonical on-disk form is a small XML document (`<config>` root with
//! `<locales>` and `<rules>` blocks); a JSON equivalent is supported for
//! toolchains that prefer it. Rules are validated as they are loaded, so a
//! bad template surfaces together with the file it came from instead of at
//! resolution time.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    placeholder,
    resolver::Resolver,
    traits::Parser,
    types::{LocaleMapping, MappingRule, ProjectType},
};

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Everything the resolver needs to know about one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(rename = "project-type")]
    pub project_type: ProjectType,

    /// Base directory of the source documents; globs match relative to it.
    #[serde(rename = "src-dir", default = "default_dir")]
    pub src_dir: PathBuf,

    /// Base directory translated files are joined with by the caller.
    #[serde(rename = "trans-dir", default = "default_dir")]
    pub trans_dir: PathBuf,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locales: Vec<LocaleMapping>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<MappingRule>,
}

impl ProjectConfig {
    /// Creates a config with `.` directories and no locales or rules.
    pub fn new(project_type: ProjectType) -> Self {
        ProjectConfig {
            project_type,
            src_dir: default_dir(),
            trans_dir: default_dir(),
            locales: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Sets the source directory.
    pub fn with_src_dir(mut self, src_dir: impl Into<PathBuf>) -> Self {
        self.src_dir = src_dir.into();
        self
    }

    /// Sets the translation directory.
    pub fn with_trans_dir(mut self, trans_dir: impl Into<PathBuf>) -> Self {
        self.trans_dir = trans_dir.into();
        self
    }

    /// Sets the locale mappings.
    pub fn with_locales(mut self, locales: Vec<LocaleMapping>) -> Self {
        self.locales = locales;
        self
    }

    /// Sets the mapping rules.
    pub fn with_rules(mut self, rules: Vec<MappingRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Checks the whole config: every rule template must validate, every
    /// locale tag must parse, and the project type must have a registered
    /// default template.
    pub fn validate(&self) -> Result<(), Error> {
        self.project_type
            .default_template()
            .ok_or(Error::UnresolvableProjectType(self.project_type))?;
        for rule in &self.rules {
            placeholder::parse_template(&rule.template)?;
        }
        for locale in &self.locales {
            if locale.language_identifier().is_none() {
                return Err(Error::invalid_config(format!(
                    "unrecognized locale `{}`",
                    locale.mapped_locale()
                )));
            }
        }
        Ok(())
    }

    /// Builds a validated [`Resolver`] from this config.
    pub fn resolver(&self) -> Result<Resolver, Error> {
        Resolver::new(self.project_type, self.src_dir.clone(), self.rules.clone())
    }

    /// Reads a config file, inferring the format from the file extension
    /// (`.xml` or `.json`).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        match path.as_ref().extension().and_then(|s| s.to_str()) {
            Some("xml") => Self::read_from(path),
            Some("json") => {
                let file = File::open(path)?;
                let config: ProjectConfig = serde_json::from_reader(BufReader::new(file))?;
                config.validate()?;
                Ok(config)
            }
            extension => Err(Error::UnsupportedFormat(format!(
                "unsupported config extension: {:?}",
                extension
            ))),
        }
    }

    /// Writes a config file, inferring the format from the file extension
    /// (`.xml` or `.json`).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        match path.as_ref().extension().and_then(|s| s.to_str()) {
            Some("xml") => self.write_to(path),
            Some("json") => {
                let file = File::create(path)?;
                serde_json::to_writer_pretty(BufWriter::new(file), self)?;
                Ok(())
            }
            extension => Err(Error::UnsupportedFormat(format!(
                "unsupported config extension: {:?}",
                extension
            ))),
        }
    }
}

impl Parser for ProjectConfig {
    /// Parse the XML form from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut project_type: Option<ProjectType> = None;
        let mut src_dir = default_dir();
        let mut trans_dir = default_dir();
        let mut locales = Vec::new();
        let mut rules = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"project-type" => {
                        project_type = Some(read_text(&mut xml_reader)?.parse()?);
                    }
                    b"src-dir" => src_dir = PathBuf::from(read_text(&mut xml_reader)?),
                    b"trans-dir" => trans_dir = PathBuf::from(read_text(&mut xml_reader)?),
                    b"locale" => locales.push(parse_locale(e, &mut xml_reader)?),
                    b"rule" => rules.push(parse_rule(e, &mut xml_reader)?),
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }

        let project_type = project_type
            .ok_or_else(|| Error::invalid_config("missing <project-type> element"))?;
        let config = ProjectConfig {
            project_type,
            src_dir,
            trans_dir,
            locales,
            rules,
        };
        config.validate()?;
        Ok(config)
    }

    /// Write the XML form to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::Start(BytesStart::new("config")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        write_text_element(&mut xml_writer, "project-type", &self.project_type.to_string())?;
        write_text_element(&mut xml_writer, "src-dir", &self.src_dir.to_string_lossy())?;
        write_text_element(&mut xml_writer, "trans-dir", &self.trans_dir.to_string_lossy())?;

        if !self.locales.is_empty() {
            xml_writer.write_event(Event::Start(BytesStart::new("locales")))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
            for locale in &self.locales {
                let mut elem = BytesStart::new("locale");
                if let Some(mapped) = &locale.mapped {
                    elem.push_attribute(("map-from", mapped.as_str()));
                }
                xml_writer.write_event(Event::Start(elem))?;
                xml_writer.write_event(Event::Text(BytesText::new(&locale.id)))?;
                xml_writer.write_event(Event::End(BytesEnd::new("locale")))?;
                xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("locales")))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        if !self.rules.is_empty() {
            xml_writer.write_event(Event::Start(BytesStart::new("rules")))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
            for rule in &self.rules {
                let mut elem = BytesStart::new("rule");
                if let Some(pattern) = &rule.pattern {
                    elem.push_attribute(("pattern", pattern.as_str()));
                }
                xml_writer.write_event(Event::Start(elem))?;
                xml_writer.write_event(Event::Text(BytesText::new(&rule.template)))?;
                xml_writer.write_event(Event::End(BytesEnd::new("rule")))?;
                xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("rules")))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("config")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
    Ok(())
}

/// Reads the text content of the element just opened, consuming up to its
/// closing tag.
fn read_text<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<String, Error> {
    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                return Ok(e.unescape().map_err(Error::XmlParse)?.trim().to_string());
            }
            Ok(Event::End(_)) => return Ok(String::new()),
            Ok(Event::Eof) => return Err(Error::invalid_config("unexpected EOF in config")),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
}

fn parse_locale<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<LocaleMapping, Error> {
    let mut mapped = None;
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::invalid_config(e.to_string()))?;
        if attr.key.as_ref() == b"map-from" {
            mapped = Some(attr.unescape_value()?.to_string());
        }
    }
    let id = read_text(xml_reader)?;
    if id.is_empty() {
        return Err(Error::invalid_config("locale element with no identifier"));
    }
    Ok(match mapped {
        Some(mapped) => LocaleMapping::with_mapped(id, mapped),
        None => LocaleMapping::new(id),
    })
}

fn parse_rule<R: BufRead>(e: &BytesStart, xml_reader: &mut Reader<R>) -> Result<MappingRule, Error> {
    let mut pattern = None;
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::invalid_config(e.to_string()))?;
        if attr.key.as_ref() == b"pattern" {
            pattern = Some(attr.unescape_value()?.to_string());
        }
    }
    let template = read_text(xml_reader)?;
    if template.is_empty() {
        return Err(Error::invalid_config("rule element with no template"));
    }
    Ok(MappingRule::new(pattern, template))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {r#"
        <?xml version="1.0" encoding="utf-8"?>
        <config>
            <project-type>podir</project-type>
            <src-dir>pot</src-dir>
            <trans-dir>.</trans-dir>
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
    fn test_parse_sample_config() {
        let config = ProjectConfig::from_str(SAMPLE).unwrap();
        assert_eq!(config.project_type, ProjectType::Podir);
        assert_eq!(config.src_dir, PathBuf::from("pot"));
        assert_eq!(config.trans_dir, PathBuf::from("."));
        assert_eq!(
            config.locales,
            vec![
                LocaleMapping::new("fr"),
                LocaleMapping::with_mapped("zh-CN", "zh-Hans"),
            ]
        );
        assert_eq!(
            config.rules,
            vec![MappingRule::new(
                Some("**/*.pot".to_string()),
                "{path}/../{locale}/{filename}.po",
            )]
        );
    }

    #[test]
    fn test_missing_project_type_is_rejected() {
        let xml = "<config><src-dir>.</src-dir></config>";
        let err = ProjectConfig::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("project-type"));
    }

    #[test]
    fn test_unknown_project_type_is_rejected() {
        let xml = "<config><project-type>frobnicate</project-type></config>";
        let err = ProjectConfig::from_str(xml).unwrap_err();
        assert!(matches!(err, Error::UnknownProjectType(_)));
    }

    #[test]
    fn test_bad_rule_surfaces_the_offending_template() {
        let xml = indoc! {r#"
            <config>
                <project-type>gettext</project-type>
                <rules>
                    <rule pattern="**/*.pot">{path}/{filename}.po</rule>
                </rules>
            </config>
        "#};
        let err = ProjectConfig::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("{path}/{filename}.po"));
    }

    #[test]
    fn test_unrecognized_locale_is_rejected() {
        let xml = indoc! {r#"
            <config>
                <project-type>gettext</project-type>
                <locales>
                    <locale>not a locale tag</locale>
                </locales>
            </config>
        "#};
        let err = ProjectConfig::from_str(xml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_xml_round_trip() {
        let config = ProjectConfig::from_str(SAMPLE).unwrap();
        let mut out = Vec::new();
        config.to_writer(&mut out).unwrap();
        let reparsed = ProjectConfig::from_str(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ProjectConfig::new(ProjectType::Gettext)
            .with_src_dir("pot")
            .with_locales(vec![LocaleMapping::with_mapped("zh-CN", "zh-Hans")])
            .with_rules(vec![MappingRule::new(
                None,
                "{path}/{locale_with_underscore}.po",
            )]);
        let json = serde_json::to_string(&config).unwrap();
        let reparsed: ProjectConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn test_resolver_from_config() {
        let config = ProjectConfig::from_str(SAMPLE).unwrap();
        let resolver = config.resolver().unwrap();
        let path = resolver.resolve_raw("pot/message.pot", &config.locales[0]);
        assert_eq!(path, "fr/message.po");
    }

    #[test]
    fn test_validate_rejects_bad_rule_built_in_code() {
        let config = ProjectConfig::new(ProjectType::Gettext)
            .with_rules(vec![MappingRule::new(None, "{path}.po")]);
        assert!(matches!(config.validate(), Err(Error::UnsafeRule(_))));
    }
}
