// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config storage port, the JSON config service on top of it, and the
//! configuration the display panel is constructed with.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Config key naming the allowed editor protocol map.
pub const ALLOWED_EDITOR_PROTOCOLS_KEY: &str = "uri.allowed-editor-protocols";
/// Config key naming the default monospaced font.
pub const MONOSPACE_FONT_KEY: &str = "style.monospace";

/// Storage port for raw config blobs (keyed by logical name).
///
/// Keys may contain `/` to group blobs (for example `prefs/alice`).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob, replacing any previous one.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// Key cannot be mapped onto the store.
    #[error("invalid config key {0:?}")]
    InvalidKey(String),
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Serializes config values as JSON and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize the value stored under `key`. Missing or empty
    /// blobs yield `Ok(None)`.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Like [`load`](Self::load) but falls back to `T::default()` when nothing is stored.
    pub fn load_or_default<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Serialize `value` as pretty JSON and persist it under `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}

/// Settings the display panel reads; injected at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Allowed editor URI schemes. Only membership of the key matters.
    #[serde(rename = "uri.allowed-editor-protocols")]
    pub allowed_editor_protocols: BTreeMap<String, serde_json::Value>,
    /// Site-wide monospaced font, shown as the default under the override field.
    #[serde(rename = "style.monospace")]
    pub default_monospace_font: String,
    /// Guide explaining editor link patterns.
    #[serde(rename = "doc.editor-guide")]
    pub editor_doc_link: String,
}

impl PanelConfig {
    /// Scheme names from the allow-list, sorted.
    pub fn allowed_protocol_names(&self) -> impl Iterator<Item = &str> {
        self.allowed_editor_protocols.keys().map(String::as_str)
    }

    /// Replace the allow-list with `protocols`, each mapped to `true`.
    pub fn with_allowed_protocols<I, P>(mut self, protocols: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.allowed_editor_protocols = protocols
            .into_iter()
            .map(|p| (p.into(), serde_json::Value::Bool(true)))
            .collect();
        self
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            allowed_editor_protocols: BTreeMap::new(),
            default_monospace_font: r#"10px "Menlo", "Consolas", "Monaco", monospace"#.to_owned(),
            editor_doc_link: "/docs/user-guide/external-editor/".to_owned(),
        }
        .with_allowed_protocols(["editor", "emacs", "mvim", "subl", "txmt", "vim", "vscode"])
    }
}
