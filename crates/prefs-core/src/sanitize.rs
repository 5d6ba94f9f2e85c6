// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Character filter for the monospaced font override.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::unwrap_used)]
static DISALLOWED_FONT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^A-Za-z0-9 ,".]+"#).unwrap());

/// Drop every character outside `[A-Za-z0-9 ,".]` from a font override.
///
/// The value ends up inside CSS, so anything that could close a declaration
/// is removed silently rather than rejected.
pub fn sanitize_monospaced_font(raw: &str) -> String {
    DISALLOWED_FONT_CHARS.replace_all(raw, "").into_owned()
}
