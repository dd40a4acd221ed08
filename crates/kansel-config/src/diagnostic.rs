// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Deserialization failures come back from figment as a flat error list;
//! this module turns each into a [`ConfigError`] diagnostic, pointing a
//! source span at the offending key in the TOML file and suggesting the
//! closest valid key by Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity floor below which no key suggestion is made. 0.75 admits
/// single-edit typos (`chanel`, `webook_url`) and rejects unrelated names.
const SUGGESTION_FLOOR: f64 = 0.75;

/// A configuration problem, rendered through miette with span, suggestion,
/// and the section's valid keys where available.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key the section's model does not declare.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(kansel::config::unknown_key),
        help("{}", unknown_key_hint(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest declared key, when one is similar enough.
        suggestion: Option<String>,
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(kansel::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A key the model requires but no source supplied.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(kansel::config::missing_key),
        help("add `{key} = <value>` to your kansel.toml")
    )]
    MissingKey { key: String },

    /// A value that parsed but fails a post-load check.
    #[error("validation error: {message}")]
    #[diagnostic(code(kansel::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(kansel::config::other))]
    Other(String),
}

fn unknown_key_hint(suggestion: Option<&str>, valid_keys: &str) -> String {
    if let Some(best) = suggestion {
        format!("did you mean `{best}`? Valid keys: {valid_keys}")
    } else {
        format!("valid keys: {valid_keys}")
    }
}

/// Explode a `figment::Error` into one [`ConfigError`] per underlying
/// failure. `toml_sources` pairs each loaded file's path with its raw
/// content so unknown keys can be annotated in place.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert_error(error, toml_sources))
        .collect()
}

fn convert_error(
    error: figment::error::Error,
    toml_sources: &[(String, String)],
) -> ConfigError {
    use figment::error::Kind;

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let valid: Vec<&str> = expected.to_vec();
            let located = locate_key(&error, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, &valid),
                valid_keys: valid.join(", "),
                span: located.as_ref().map(|(span, _)| *span),
                src: located.map(|(_, src)| src),
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: field.clone().into_owned(),
        },
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: error.path.join("."),
            detail: format!("found {actual}, expected {expected}"),
            expected: expected.to_string(),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Pin the unknown key to a span in the file it came from. Returns `None`
/// whenever the error has no file provenance or the key cannot be found
/// (env-sourced values, programmatic figments).
fn locate_key(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let path = match error.metadata.as_ref()?.source.as_ref()? {
        figment::Source::File(file) => file.display().to_string(),
        _ => return None,
    };
    let (_, content) = toml_sources.iter().find(|(p, _)| *p == path)?;

    // Figment reports `slack.chanel` with path ["slack"]; top-level keys
    // carry an empty path.
    let section = error.path.first().map(String::as_str);
    let offset = key_offset(content, section, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(path, content.clone()),
    ))
}

/// Byte offset of `field` within the `[section]` table (or the top level
/// when `section` is `None`). One pass over the lines, tracking which
/// table header was seen last.
fn key_offset(content: &str, section: Option<&str>, field: &str) -> Option<usize> {
    let mut current_table: Option<&str> = None;
    let mut line_start = 0;

    for line in content.lines() {
        let stripped = line.trim_start();
        if let Some(header) = stripped.strip_prefix('[') {
            current_table = header.trim_end().strip_suffix(']');
        } else if current_table == section {
            if let Some(rest) = stripped.strip_prefix(field) {
                // Reject longer keys sharing the prefix, e.g. `channel_id`.
                if rest.trim_start().starts_with('=') {
                    return Some(line_start + (line.len() - stripped.len()));
                }
            }
        }
        line_start += line.len() + 1;
    }

    None
}

/// Best declared key for an unknown one, or `None` when nothing clears
/// the similarity floor.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_FLOOR)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, key)| key.to_string())
}

/// Render every error to stderr through miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("configuration error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_chanel_for_channel() {
        let valid = &["webhook_url", "channel", "ticket_url_base"];
        assert_eq!(suggest_key("chanel", valid), Some("channel".to_string()));
    }

    #[test]
    fn suggest_webook_url_for_webhook_url() {
        let valid = &["webhook_url", "channel", "ticket_url_base"];
        assert_eq!(
            suggest_key("webook_url", valid),
            Some("webhook_url".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["webhook_url", "channel", "ticket_url_base"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn key_offset_in_section() {
        let content = "[slack]\nchanel = \"#x\"\n";
        let offset = key_offset(content, Some("slack"), "chanel").unwrap();
        assert_eq!(&content[offset..offset + 6], "chanel");
    }

    #[test]
    fn key_offset_skips_other_sections() {
        // The same key name in an earlier table must not be picked up.
        let content = "[agent]\nlevel = \"info\"\n\n[slack]\nlevel = \"#x\"\n";
        let offset = key_offset(content, Some("slack"), "level").unwrap();
        assert!(offset > content.find("[slack]").unwrap());
    }

    #[test]
    fn key_offset_at_top_level() {
        let content = "mystery = 1\n\n[slack]\nchannel = \"#x\"\n";
        assert_eq!(key_offset(content, None, "mystery"), Some(0));
    }

    #[test]
    fn key_offset_rejects_prefix_match() {
        let content = "[slack]\nchannel_id = \"C1\"\n";
        assert_eq!(key_offset(content, Some("slack"), "channel"), None);
    }

    #[test]
    fn unknown_field_produces_suggestion() {
        let err = crate::loader::load_config_from_str(
            r##"
[slack]
chanel = "#triage"
"##,
        )
        .unwrap_err();
        let errors = figment_to_config_errors(err, &[]);
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "chanel" && suggestion.as_deref() == Some("channel")
        )));
    }
}
