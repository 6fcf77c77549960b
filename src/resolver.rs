//! Mapping rule selection and translated-path resolution.
//!
//! A [`Resolver`] is configured once per project (project type, source
//! directory, ordered rule list) and validates every rule template up
//! front. Resolution itself is total: any document and locale produce a
//! deterministic relative path, with the project type's default template as
//! the last resort when no explicit rule applies.

use std::path::{Path, PathBuf};

use crate::{
    error::Error,
    glob,
    placeholder::{self, Segment},
    types::{DocName, LocaleMapping, MappingRule, ProjectType},
};

/// Resolves source documents to the relative paths of their translated
/// files. Purely functional over its configuration; safe to share across
/// threads.
#[derive(Debug, Clone)]
pub struct Resolver {
    project_type: ProjectType,
    src_dir: PathBuf,
    rules: Vec<CompiledRule>,
    default_template: Vec<Segment>,
}

/// A rule with its template parsed once at registration.
#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: Option<String>,
    segments: Vec<Segment>,
}

impl Resolver {
    /// Validates and compiles the rule list.
    ///
    /// Malformed or unsafe templates surface here with the offending
    /// template string, never during per-document resolution. The project
    /// type must have a registered default template.
    pub fn new(
        project_type: ProjectType,
        src_dir: impl Into<PathBuf>,
        rules: Vec<MappingRule>,
    ) -> Result<Self, Error> {
        let default = project_type
            .default_template()
            .ok_or(Error::UnresolvableProjectType(project_type))?;
        let default_template = placeholder::parse_template(default)?;

        let rules = rules
            .into_iter()
            .map(|rule| {
                let segments = placeholder::parse_template(&rule.template)?;
                Ok(CompiledRule {
                    pattern: rule.pattern,
                    segments,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Resolver {
            project_type,
            src_dir: src_dir.into(),
            rules,
            default_template,
        })
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// Relative path of the translated file for `doc` in `locale`.
    ///
    /// The first applicable rule in configured order wins; if none matches,
    /// the project type's default template is used. The result is a
    /// normalized, `/`-separated relative path suitable for joining with
    /// the caller's target directory.
    pub fn resolve(&self, doc: &DocName, locale: &LocaleMapping) -> String {
        let values = placeholder::placeholder_values(doc, locale);
        let relative = relative_doc_path(doc, &self.src_dir);
        let segments = self
            .rules
            .iter()
            .find(|rule| match &rule.pattern {
                None => true,
                Some(pattern) => glob::matches(pattern, &relative),
            })
            .map(|rule| &rule.segments)
            .unwrap_or(&self.default_template);
        normalize(&placeholder::substitute(segments, &values))
    }

    /// Splits a raw document identifier and resolves it in one call.
    pub fn resolve_raw(&self, raw: &str, locale: &LocaleMapping) -> String {
        self.resolve(&DocName::from(raw), locale)
    }
}

/// Whether `rule`'s pattern covers `doc`, matched against the document's
/// full name relative to `src_dir`. A `None` pattern always applies.
pub fn is_applicable(rule: &MappingRule, doc: &DocName, src_dir: &Path) -> bool {
    match &rule.pattern {
        None => true,
        Some(pattern) => glob::matches(pattern, &relative_doc_path(doc, src_dir)),
    }
}

/// The document's full name with any `src_dir` prefix stripped. String
/// level only; the file system is never consulted.
fn relative_doc_path(doc: &DocName, src_dir: &Path) -> String {
    let full = doc.full_name();
    let base = src_dir.to_string_lossy();
    let base = base.trim_end_matches('/');
    if base.is_empty() || base == "." {
        return full;
    }
    match full.strip_prefix(&format!("{base}/")) {
        Some(rest) => rest.to_string(),
        None => full,
    }
}

/// Logical relative-path normalization: empty and `.` segments are
/// dropped, `..` pops the previous segment when one exists and is kept
/// otherwise. No file-system resolution takes place.
fn normalize(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match out.last() {
                Some(&"..") | None => out.push(".."),
                Some(_) => {
                    out.pop();
                }
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        ".".to_string()
    } else {
        out.join("/")
    }
}
