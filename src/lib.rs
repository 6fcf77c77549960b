#![forbid(unsafe_code)]
//! Translation file path mapping engine.
//!
//! Maps a source document identifier plus a target locale to the relative
//! path where the translated file lives, driven by per-project mapping
//! rules: `{placeholder}` templates scoped by Ant-style glob patterns, with
//! a canonical default template per project type as the last resort.
//!
//! # Quick Start
//!
//! ```rust
//! use transpath::{DocName, LocaleMapping, MappingRule, ProjectType, Resolver};
//!
//! let resolver = Resolver::new(
//!     ProjectType::Podir,
//!     ".",
//!     vec![MappingRule::new(
//!         Some("**/*.pot".to_string()),
//!         "{path}/../{locale}/{filename}.po",
//!     )],
//! )?;
//!
//! let path = resolver.resolve(&DocName::from("pot/message.pot"), &LocaleMapping::new("fr"));
//! assert_eq!(path, "fr/message.po");
//! # Ok::<(), transpath::Error>(())
//! ```
//!
//! # Design
//!
//! - Templates are validated at rule registration (unbalanced braces,
//!   unknown placeholders, missing locale placeholder); resolution itself
//!   never fails for a document.
//! - Both the template scanner and the glob matcher are explicit
//!   finite-state scans with exactly specified, linear behavior.
//! - Everything operates on immutable values: resolution is deterministic
//!   and safe to run concurrently without synchronization.

pub mod config;
pub mod error;
pub mod glob;
pub mod placeholder;
pub mod resolver;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    config::ProjectConfig,
    error::Error,
    placeholder::{Placeholder, is_rule_valid},
    resolver::{Resolver, is_applicable},
    types::{DocName, LocaleMapping, MappingRule, ProjectType},
};
