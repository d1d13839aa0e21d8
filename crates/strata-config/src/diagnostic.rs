// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics: figment errors and policy validation failures
//! rendered as miette reports with "did you mean?" suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// Catches `Extration` -> `Extraction` and `Storge` -> `Storage`.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown top-level key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(strata::config::unknown_key),
        help("{}", format_suggestion_help(suggestion.as_deref(), valid))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A policy section names a category the capability registry does not know.
    #[error("unknown plugin category `{category}` in [{section}]")]
    #[diagnostic(
        code(strata::config::unknown_category),
        help("{}", format_suggestion_help(suggestion.as_deref(), valid))
    )]
    UnknownCategory {
        section: String,
        category: String,
        suggestion: Option<String>,
        valid: String,
    },

    /// A plugin is listed twice in one `plugin_order` sequence.
    #[error("plugin `{plugin}` appears more than once in plugin_order.{category}")]
    #[diagnostic(
        code(strata::config::duplicate_order),
        help("each plugin may hold only one rank per category")
    )]
    DuplicateOrder { category: String, plugin: String },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(strata::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(strata::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(strata::config::other))]
    Other(String),
}

fn format_suggestion_help(suggestion: Option<&str>, valid: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid names: {valid}"),
        None => format!("valid names: {valid}"),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// `sources` holds `(path, content)` pairs used to attach source spans to
/// unknown-key errors.
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid: Vec<&str> = expected.to_vec();
                let (span, src) = locate_key(&error, field, sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, &valid),
                    valid: valid.join(", "),
                    span,
                    src,
                }
            }
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Find the span of `field` in whichever source file produced the error.
fn locate_key(
    error: &figment::error::Error,
    field: &str,
    sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let found = sources
        .iter()
        .find(|(path, _)| origin.as_deref() == Some(path.as_str()))
        .or_else(|| (sources.len() == 1).then(|| &sources[0]));

    // Figment reports an unknown field with the field itself as the last path element.
    let section = match error.path.split_last() {
        Some((last, parent)) if last == field => parent,
        _ => error.path.as_slice(),
    };

    if let Some((path, content)) = found
        && let Some(offset) = find_key_offset(content, section, field)
    {
        return (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        );
    }

    (None, None)
}

/// Find the byte offset of a key in TOML content, after its section header.
///
/// For `path = ["plugins"]` and `field = "mdoe"`, finds `[plugins]` and then
/// the first line starting with `mdoe`. Top-level keys search from the start.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field)
            && (after.starts_with([' ', '\t', '=']))
        {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }

    None
}

/// Suggest the closest valid name using Jaro-Winkler similarity.
pub fn suggest_key(unknown: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render a list of `ConfigError`s to a plain string using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) -> String {
    use miette::{GraphicalReportHandler, GraphicalTheme};

    // The output ends up inside error values, so it carries no ANSI styling.
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    for error in errors {
        let diagnostic: &dyn Diagnostic = error;
        let mut buf = String::new();
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            out.push_str(&buf);
        } else {
            out.push_str(&format!("Error: {error}\n"));
        }
    }
    out
}
