// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge for `snapdrift.toml`.
//!
//! Unknown sections and keys get "did you mean?" hints and point at the
//! offending line. Values of credential keys are never echoed back.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::loader::SECTIONS;

/// Jaro-Winkler score a valid name must beat to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Keys whose values are tokens or API keys.
const SECRET_KEYS: &[&str] = &["bot_token", "api_key", "admin_api_key"];

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A top-level table Snapdrift does not know.
    #[error("unknown section `[{section}]`")]
    #[diagnostic(
        code(snapdrift::config::unknown_section),
        help("{}", section_help(suggestion.as_deref()))
    )]
    UnknownSection {
        section: String,
        suggestion: Option<String>,
        #[label("not a snapdrift section")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// An unknown key inside a known section.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(snapdrift::config::unknown_key),
        help("{}", key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if one is similar enough.
        suggestion: Option<String>,
        /// Comma-separated valid keys for the section.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(snapdrift::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value was well-typed but not one of the accepted variants.
    #[error("invalid value for key `{key}`: {detail}")]
    #[diagnostic(code(snapdrift::config::invalid_value))]
    InvalidValue { key: String, detail: String },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(snapdrift::config::missing_key),
        help("add `{key} = <value>` to your snapdrift.toml")
    )]
    MissingKey { key: String },

    /// A semantic check failed after deserialization.
    #[error("validation error: {message}")]
    #[diagnostic(code(snapdrift::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(snapdrift::config::other))]
    Other(String),
}

fn section_help(suggestion: Option<&str>) -> String {
    let sections = SECTIONS
        .iter()
        .map(|s| format!("[{s}]"))
        .collect::<Vec<_>>()
        .join(", ");
    match suggestion {
        Some(s) => format!("did you mean `[{s}]`? snapdrift.toml sections: {sections}"),
        None => format!("snapdrift.toml sections: {sections}"),
    }
}

fn key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` pairs each file path with its contents so spans can be
/// attached.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    let sources = Sources(toml_sources);
    err.into_iter()
        .map(|error| convert(&error, &sources))
        .collect()
}

fn convert(error: &figment::Error, sources: &Sources<'_>) -> ConfigError {
    let path: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();

    match &error.kind {
        Kind::UnknownField(field, _) if path.is_empty() => {
            let (span, src) = sources.locate(error, |content| section_offset(content, field));
            ConfigError::UnknownSection {
                section: field.clone(),
                suggestion: suggest_key(field, SECTIONS),
                span,
                src,
            }
        }
        Kind::UnknownField(field, expected) => {
            let section = path.first().map(String::as_str);
            let (span, src) = sources.locate(error, |content| key_offset(content, section, field));
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, expected),
                valid_keys: expected.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => {
            let mut full = path;
            full.push(field.to_string());
            ConfigError::MissingKey {
                key: full.join("."),
            }
        }
        Kind::InvalidType(actual, expected) => {
            let field = path.last().map(String::as_str).unwrap_or_default();
            let section = path.len().checked_sub(2).map(|i| path[i].as_str());
            let (span, src) = sources.locate(error, |content| key_offset(content, section, field));
            let detail = if SECRET_KEYS.contains(&field) {
                format!("expected {expected}")
            } else {
                format!("found {actual}, expected {expected}")
            };
            ConfigError::InvalidType {
                key: path.join("."),
                detail,
                expected: expected.to_string(),
                span,
                src,
            }
        }
        Kind::UnknownVariant(actual, expected) => ConfigError::InvalidValue {
            key: path.join("."),
            detail: format!("`{actual}` is not one of: {}", expected.join(", ")),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// TOML file contents keyed by path.
struct Sources<'a>(&'a [(String, String)]);

impl Sources<'_> {
    /// Span that `find` reports inside the file the error came from.
    fn locate(
        &self,
        error: &figment::Error,
        find: impl Fn(&str) -> Option<(usize, usize)>,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        let Some(file) = error
            .metadata
            .as_ref()
            .and_then(|m| m.source.as_ref())
            .and_then(|s| match s {
                figment::Source::File(path) => Some(path.display().to_string()),
                _ => None,
            })
            .or_else(|| self.only_inline())
        else {
            return (None, None);
        };

        let Some((path, content)) = self.0.iter().find(|(p, _)| *p == file) else {
            return (None, None);
        };
        match find(content) {
            Some((offset, len)) => (
                Some(SourceSpan::new(offset.into(), len)),
                Some(NamedSource::new(path, content.clone())),
            ),
            None => (None, None),
        }
    }

    /// Inline strings carry no file metadata; a lone source is the one.
    fn only_inline(&self) -> Option<String> {
        match self.0 {
            [(path, _)] if path == "<inline>" => Some(path.clone()),
            _ => None,
        }
    }
}

/// Offset and length of `name` in its `[name]` header.
pub fn section_offset(content: &str, name: &str) -> Option<(usize, usize)> {
    let mut line_start = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix('[') {
            if let Some(after) = rest.strip_prefix(name) {
                if after.starts_with([']', '.']) {
                    let indent = line.len() - trimmed.len();
                    return Some((line_start + indent + 1, name.len()));
                }
            }
        }
        line_start += line.len();
    }
    None
}

/// Offset and length of `field` as a key below `[section]`, or from the top
/// of the file when there is no section.
pub fn key_offset(content: &str, section: Option<&str>, field: &str) -> Option<(usize, usize)> {
    let start = match section {
        None => 0,
        Some(section) => {
            let (offset, len) = section_offset(content, section)?;
            offset + len
        }
    };

    let mut line_start = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            return None;
        }
        if let Some(after) = trimmed.strip_prefix(field) {
            if after.trim_start().starts_with('=') {
                let indent = line.len() - trimmed.len();
                return Some((line_start + indent, field.len()));
            }
        }
        line_start += line.len();
    }
    None
}

/// The valid name most similar to `unknown`, if it scores above the threshold.
pub fn suggest_key(unknown: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|name| (strsim::jaro_winkler(unknown, name), *name))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, name)| name.to_string())
}

/// Render config errors to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_to_string(errors));
}

/// Graphical rendering of every error under a one-line summary.
pub fn render_to_string(errors: &[ConfigError]) -> String {
    use std::fmt::Write;

    let handler = miette::GraphicalReportHandler::new();
    let noun = if errors.len() == 1 { "problem" } else { "problems" };
    let mut out = format!("snapdrift: {} configuration {noun}\n", errors.len());
    for error in errors {
        if handler.render_report(&mut out, error as &dyn Diagnostic).is_err() {
            let _ = writeln!(out, "Error: {error}");
        }
    }
    out
}
