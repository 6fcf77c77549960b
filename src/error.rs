//! All error types for the transpath crate.
//!
//! These are returned from all fallible operations (rule validation,
//! configuration loading, resolver construction).

use thiserror::Error;

use crate::types::ProjectType;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid rule syntax in `{template}`: {reason}")]
    InvalidRuleSyntax { template: String, reason: String },

    #[error("unsafe rule `{0}`: no locale placeholder, translated files would collide")]
    UnsafeRule(String),

    #[error("no default template registered for project type `{0}`")]
    UnresolvableProjectType(ProjectType),

    #[error("unknown project type `{0}`")]
    UnknownProjectType(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new rule syntax error carrying the offending template.
    pub fn rule_syntax(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidRuleSyntax {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }
}
