// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-user preference bag plus the typed view the display panel reads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Preference keys interpreted by the display panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    /// Page-title style (`glyph` or `text`).
    Titles,
    /// External editor link pattern.
    Editor,
    /// Multi-file edit support (`""` or `disable`).
    MultiEdit,
    /// Monospaced font override.
    Monospaced,
    /// Whether textareas use the monospaced font (`enabled`/`disabled`).
    MonospacedTextareas,
}

impl PreferenceKey {
    /// Every key the panel reads and writes, in form order.
    pub const ALL: [Self; 5] = [
        Self::Titles,
        Self::Editor,
        Self::MultiEdit,
        Self::Monospaced,
        Self::MonospacedTextareas,
    ];

    /// Storage/form name of the key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Titles => "titles",
            Self::Editor => "editor",
            Self::MultiEdit => "multiedit",
            Self::Monospaced => "monospaced",
            Self::MonospacedTextareas => "monospaced-textareas",
        }
    }
}

/// A user's preferences as an opaque string-to-string mapping.
///
/// Keys the panel does not know about are preserved untouched so other
/// panels (or newer versions) can share the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceSet {
    user: UserId,
    #[serde(default)]
    values: BTreeMap<String, String>,
}

impl PreferenceSet {
    /// Empty preference set owned by `user`.
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            values: BTreeMap::new(),
        }
    }

    /// Preference set owned by `user` with the given stored values.
    pub fn from_values(user: UserId, values: BTreeMap<String, String>) -> Self {
        Self { user, values }
    }

    /// Owner of this set.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Raw lookup by key name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of a known key; a missing entry reads as the empty string.
    pub fn get_key(&self, key: PreferenceKey) -> &str {
        self.get(key.as_str()).unwrap_or_default()
    }

    /// Store `value` under `key`, overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Store `value` under a known key.
    pub fn set_key(&mut self, key: PreferenceKey, value: impl Into<String>) {
        self.set(key.as_str(), value);
    }

    /// Number of stored entries, known or not.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over stored entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Borrow the underlying mapping.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Consume the set and return the underlying mapping.
    pub fn into_values(self) -> BTreeMap<String, String> {
        self.values
    }
}

/// Value used for `monospaced-textareas` when nothing has been chosen yet.
pub const DEFAULT_MONOSPACED_TEXTAREAS: &str = "disabled";

/// Read-only typed view over the display keys of a [`PreferenceSet`].
///
/// Values stay strings: out-of-range choices are shown back as stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayPrefs {
    /// Page-title style.
    pub titles: String,
    /// Editor link pattern.
    pub editor: String,
    /// Multi-file edit mode.
    pub multiedit: String,
    /// Monospaced font override.
    pub monospaced: String,
    /// Monospaced textarea toggle, defaulted to `disabled`.
    pub monospaced_textareas: String,
}

impl DisplayPrefs {
    /// Extract the display keys from `set`.
    pub fn from_set(set: &PreferenceSet) -> Self {
        let textareas = match set.get_key(PreferenceKey::MonospacedTextareas) {
            "" => DEFAULT_MONOSPACED_TEXTAREAS,
            other => other,
        };
        Self {
            titles: set.get_key(PreferenceKey::Titles).to_owned(),
            editor: set.get_key(PreferenceKey::Editor).to_owned(),
            multiedit: set.get_key(PreferenceKey::MultiEdit).to_owned(),
            monospaced: set.get_key(PreferenceKey::Monospaced).to_owned(),
            monospaced_textareas: textareas.to_owned(),
        }
    }
}

/// How tool names appear in page titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTitleStyle {
    /// Unicode glyph per tool.
    Glyph,
    /// Bracketed plain-text tool name.
    Text,
}

impl PageTitleStyle {
    /// Options in display order.
    pub const ALL: [Self; 2] = [Self::Glyph, Self::Text];

    /// Stored value.
    pub const fn value(self) -> &'static str {
        match self {
            Self::Glyph => "glyph",
            Self::Text => "text",
        }
    }

    /// Human-readable option label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Glyph => "In page titles, show Tool names as unicode glyphs: \u{2699}",
            Self::Text => "In page titles, show Tool names as plain text: [Differential]",
        }
    }
}

/// Whether editor links may open several files at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiEditMode {
    /// Paths are passed space separated.
    Supported,
    /// One file per link.
    Disabled,
}

impl MultiEditMode {
    /// Options in display order.
    pub const ALL: [Self; 2] = [Self::Supported, Self::Disabled];

    /// Stored value.
    pub const fn value(self) -> &'static str {
        match self {
            Self::Supported => "",
            Self::Disabled => "disable",
        }
    }

    /// Human-readable option label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Supported => "Supported (paths separated by spaces)",
            Self::Disabled => "Not Supported",
        }
    }
}

/// Whether textareas render in the monospaced font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextareaFont {
    /// Monospaced textareas.
    Enabled,
    /// Proportional textareas.
    Disabled,
}

impl TextareaFont {
    /// Options in display order.
    pub const ALL: [Self; 2] = [Self::Enabled, Self::Disabled];

    /// Stored value.
    pub const fn value(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }

    /// Human-readable option label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
        }
    }

    /// Optional explanatory line shown under the option.
    pub const fn caption(self) -> Option<&'static str> {
        match self {
            Self::Enabled => Some("Show all textareas using the monospaced font defined above."),
            Self::Disabled => None,
        }
    }
}
