//! Core value types for transpath.
//! Resolution operates on these; all of them are cheap, immutable values.

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    str::FromStr,
};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::Error;

lazy_static! {
    /// Static mapping from project type → canonical default rule template,
    /// used when no explicit mapping rule covers a document.
    static ref DEFAULT_TEMPLATES: BTreeMap<ProjectType, &'static str> = {
        use ProjectType::*;
        let mut m: BTreeMap<ProjectType, &'static str> = BTreeMap::new();
        m.insert(File, "{locale}/{path}/{filename}.{extension}");
        m.insert(Gettext, "{path}/{locale_with_underscore}.po");
        m.insert(Podir, "{locale}/{path}/{filename}.po");
        m.insert(Properties, "{path}/{filename}_{locale_with_underscore}.properties");
        m.insert(Utf8Properties, "{path}/{filename}_{locale_with_underscore}.properties");
        m.insert(Xliff, "{path}/{filename}_{locale_with_underscore}.xml");
        m.insert(Xml, "{path}/{filename}_{locale_with_underscore}.xml");
        m
    };
}

/// The category of a translatable project, each bound to one canonical
/// default rule template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Utf8Properties,
    Properties,
    Gettext,
    Podir,
    Xliff,
    Xml,
    File,
}

impl ProjectType {
    /// The default rule template for this project type, if one is registered.
    pub fn default_template(self) -> Option<&'static str> {
        DEFAULT_TEMPLATES.get(&self).copied()
    }
}

impl Display for ProjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectType::Utf8Properties => write!(f, "utf8properties"),
            ProjectType::Properties => write!(f, "properties"),
            ProjectType::Gettext => write!(f, "gettext"),
            ProjectType::Podir => write!(f, "podir"),
            ProjectType::Xliff => write!(f, "xliff"),
            ProjectType::Xml => write!(f, "xml"),
            ProjectType::File => write!(f, "file"),
        }
    }
}

/// Accepts the lowercase tags used in project config files
/// (case-insensitive, underscores tolerated in `utf8_properties`).
impl FromStr for ProjectType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "utf8properties" | "utf8_properties" => Ok(ProjectType::Utf8Properties),
            "properties" => Ok(ProjectType::Properties),
            "gettext" => Ok(ProjectType::Gettext),
            "podir" => Ok(ProjectType::Podir),
            "xliff" => Ok(ProjectType::Xliff),
            "xml" => Ok(ProjectType::Xml),
            "file" => Ok(ProjectType::File),
            other => Err(Error::UnknownProjectType(other.to_string())),
        }
    }
}

/// The decomposed view of a raw source document identifier.
///
/// `path` is the directory portion (empty if none), `filename` the base name
/// without extension, `extension` the part after the last dot (empty if
/// none). Pure string decomposition; no file system access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocName {
    pub path: String,
    pub filename: String,
    pub extension: String,
}

impl DocName {
    /// Reconstructs `path/filename.extension`, omitting empty parts.
    pub fn full_name(&self) -> String {
        let mut name = String::with_capacity(
            self.path.len() + self.filename.len() + self.extension.len() + 2,
        );
        if !self.path.is_empty() {
            name.push_str(&self.path);
            name.push('/');
        }
        name.push_str(&self.filename);
        if !self.extension.is_empty() {
            name.push('.');
            name.push_str(&self.extension);
        }
        name
    }
}

impl From<&str> for DocName {
    /// Splits a raw document identifier. Total for every input: a leading
    /// `./` is stripped, then the last `/` separates the path and the last
    /// `.` separates the extension.
    fn from(raw: &str) -> Self {
        let trimmed = raw.strip_prefix("./").unwrap_or(raw);
        let (path, rest) = match trimmed.rsplit_once('/') {
            Some((path, rest)) => (path.to_string(), rest),
            None => (String::new(), trimmed),
        };
        let (filename, extension) = match rest.rsplit_once('.') {
            Some((filename, extension)) => (filename.to_string(), extension.to_string()),
            None => (rest.to_string(), String::new()),
        };
        DocName {
            path,
            filename,
            extension,
        }
    }
}

impl From<&String> for DocName {
    fn from(raw: &String) -> Self {
        DocName::from(raw.as_str())
    }
}

impl Display for DocName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// Association between a locale identifier and the form that appears in
/// output paths.
///
/// `mapped` is the on-disk display form (e.g. `zh-CN` mapped to `zh-Hans`);
/// when absent, the identifier itself is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleMapping {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub mapped: Option<String>,
}

impl LocaleMapping {
    /// A locale that appears in output paths under its own identifier.
    pub fn new(id: impl Into<String>) -> Self {
        LocaleMapping {
            id: id.into(),
            mapped: None,
        }
    }

    /// A locale with a distinct on-disk display form.
    pub fn with_mapped(id: impl Into<String>, mapped: impl Into<String>) -> Self {
        LocaleMapping {
            id: id.into(),
            mapped: Some(mapped.into()),
        }
    }

    /// The locale tag that appears in output paths.
    pub fn mapped_locale(&self) -> &str {
        self.mapped.as_deref().unwrap_or(&self.id)
    }

    /// The mapped tag with every `-` replaced by `_` (e.g. `de-DE` → `de_DE`).
    pub fn mapped_locale_with_underscore(&self) -> String {
        self.mapped_locale().replace('-', "_")
    }

    /// Structured view of the mapped tag (underscores tolerated).
    pub fn language_identifier(&self) -> Option<LanguageIdentifier> {
        self.mapped_locale().replace('_', "-").parse().ok()
    }
}

/// A `(pattern, template)` pair. The pattern restricts which documents the
/// template governs; `None` means always applicable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub pattern: Option<String>,

    pub template: String,
}

impl MappingRule {
    pub fn new(pattern: Option<String>, template: impl Into<String>) -> Self {
        MappingRule {
            pattern,
            template: template.into(),
        }
    }
}
