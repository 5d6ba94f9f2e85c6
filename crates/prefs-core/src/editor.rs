// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! External editor links: protocol allow-listing and placeholder expansion.
//!
//! A pattern such as `editor://open?file=%f&line=%l` is only accepted when its
//! scheme appears in [`PanelConfig::allowed_editor_protocols`]. Matching is exact
//! and case-sensitive.

use thiserror::Error;

use crate::config::{PanelConfig, ALLOWED_EDITOR_PROTOCOLS_KEY};

/// Rejection of an editor link pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorProtocolError {
    /// Scheme missing, or not on the allow-list.
    #[error(
        "Editor link has an invalid or missing protocol. You must use an allowed editor \
         protocol from this list: {}. To add protocols, update {}.",
        scheme_list(.allowed),
        ALLOWED_EDITOR_PROTOCOLS_KEY
    )]
    InvalidProtocol {
        /// Scheme names that would have been accepted.
        allowed: Vec<String>,
    },
}

fn scheme_list(allowed: &[String]) -> String {
    allowed
        .iter()
        .map(|p| format!("{p}://"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Scheme of `pattern`: the text before the first `://`.
///
/// Returns `None` when there is no `://` or nothing precedes it.
pub fn editor_protocol(pattern: &str) -> Option<&str> {
    let (scheme, _) = pattern.split_once("://")?;
    (!scheme.is_empty()).then_some(scheme)
}

/// Whether `pattern` names a scheme on the allow-list.
pub fn has_allowed_protocol(pattern: &str, config: &PanelConfig) -> bool {
    editor_protocol(pattern)
        .is_some_and(|scheme| config.allowed_editor_protocols.contains_key(scheme))
}

/// Check an editor link pattern. The empty pattern (no editor configured) is
/// always accepted.
pub fn validate_editor_pattern(pattern: &str, config: &PanelConfig) -> Result<(), EditorProtocolError> {
    if pattern.is_empty() || has_allowed_protocol(pattern, config) {
        return Ok(());
    }
    Err(EditorProtocolError::InvalidProtocol {
        allowed: config.allowed_protocol_names().map(str::to_owned).collect(),
    })
}

/// File location an editor link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorTarget {
    /// Repository-relative path; one or more space-separated paths when
    /// multi-file editing is enabled.
    pub path: String,
    /// 1-based line number.
    pub line: u32,
    /// Short repository identifier.
    pub repository: String,
}

/// Substitute placeholders in `pattern`.
///
/// `%f` becomes the percent-encoded path (slashes kept), `%l` the line number,
/// `%r` the repository, `%%` a literal `%`. Any other `%x` is copied verbatim.
pub fn expand_editor_link(pattern: &str, target: &EditorTarget) -> String {
    let mut out = String::with_capacity(pattern.len() + target.path.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('f') => out.push_str(&encode_path(&target.path)),
            Some('l') => out.push_str(&target.line.to_string()),
            Some('r') => out.push_str(&urlencoding::encode(&target.repository)),
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
