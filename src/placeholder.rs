//! Rule template parsing, validation and substitution.
//!
//! A template mixes literal path text with `{placeholder}` spans. The
//! scanner is a single left-to-right pass tracking whether it is inside a
//! brace span; braces do not nest. Validation also enforces the semantic
//! invariant that a template carries at least one locale-disambiguating
//! placeholder, otherwise every locale of a document would resolve to the
//! same output path and translations would overwrite one another.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::{
    error::Error,
    types::{DocName, LocaleMapping},
};

/// A named token recognized inside a rule template. Closed set; anything
/// else between braces invalidates the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Placeholder {
    Path,
    Filename,
    Extension,
    Locale,
    LocaleWithUnderscore,
}

impl Placeholder {
    /// The token name as written between braces.
    pub fn name(self) -> &'static str {
        match self {
            Placeholder::Path => "path",
            Placeholder::Filename => "filename",
            Placeholder::Extension => "extension",
            Placeholder::Locale => "locale",
            Placeholder::LocaleWithUnderscore => "locale_with_underscore",
        }
    }

    /// Looks a token name up in the closed set.
    pub fn from_name(name: &str) -> Option<Placeholder> {
        match name {
            "path" => Some(Placeholder::Path),
            "filename" => Some(Placeholder::Filename),
            "extension" => Some(Placeholder::Extension),
            "locale" => Some(Placeholder::Locale),
            "locale_with_underscore" => Some(Placeholder::LocaleWithUnderscore),
            _ => None,
        }
    }

    /// True for tokens that make output paths differ between locales.
    pub fn is_locale_disambiguating(self) -> bool {
        matches!(self, Placeholder::Locale | Placeholder::LocaleWithUnderscore)
    }
}

impl Display for Placeholder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One parsed span of a rule template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Parses a template into segments.
///
/// Unbalanced braces and unknown token names yield
/// [`Error::InvalidRuleSyntax`]; a well-formed template without a locale
/// placeholder yields [`Error::UnsafeRule`].
pub fn parse_template(template: &str) -> Result<Vec<Segment>, Error> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut name = String::new();
    let mut in_token = false;

    for ch in template.chars() {
        if in_token {
            match ch {
                '{' => return Err(Error::rule_syntax(template, "nested `{`")),
                '}' => {
                    let placeholder = Placeholder::from_name(&name).ok_or_else(|| {
                        Error::rule_syntax(template, format!("unknown placeholder `{{{name}}}`"))
                    })?;
                    segments.push(Segment::Placeholder(placeholder));
                    name.clear();
                    in_token = false;
                }
                c => name.push(c),
            }
        } else {
            match ch {
                '{' => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    in_token = true;
                }
                '}' => return Err(Error::rule_syntax(template, "unmatched `}`")),
                c => literal.push(c),
            }
        }
    }
    if in_token {
        return Err(Error::rule_syntax(template, "unmatched `{`"));
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    let has_locale = segments.iter().any(|segment| {
        matches!(segment, Segment::Placeholder(p) if p.is_locale_disambiguating())
    });
    if !has_locale {
        return Err(Error::UnsafeRule(template.to_string()));
    }

    Ok(segments)
}

/// Boolean entry point for configuration loaders: syntax and semantic
/// checks in one call, never panics on malformed input.
pub fn is_rule_valid(template: &str) -> bool {
    parse_template(template).is_ok()
}

/// Builds the substitution map for one document/locale pair.
pub fn placeholder_values(doc: &DocName, locale: &LocaleMapping) -> BTreeMap<Placeholder, String> {
    BTreeMap::from([
        (Placeholder::Path, doc.path.clone()),
        (Placeholder::Filename, doc.filename.clone()),
        (Placeholder::Extension, doc.extension.clone()),
        (Placeholder::Locale, locale.mapped_locale().to_string()),
        (
            Placeholder::LocaleWithUnderscore,
            locale.mapped_locale_with_underscore(),
        ),
    ])
}

/// Expands parsed segments against a substitution map.
pub(crate) fn substitute(segments: &[Segment], values: &BTreeMap<Placeholder, String>) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(placeholder) => {
                out.push_str(values.get(placeholder).map(String::as_str).unwrap_or(""));
            }
        }
    }
    out
}
