// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Display preferences panel for the settings application.
//!
//! The crate is framework-agnostic: it owns the preference bag, the panel
//! configuration, the storage port and the request handler, and hands a
//! [`form::FormView`] back to whatever front end renders it.

pub mod config;
pub mod editor;
pub mod form;
pub mod panel;
pub mod prefs;
pub mod sanitize;
pub mod store;
pub mod user;

pub use config::{ConfigError, ConfigService, ConfigStore, PanelConfig};
pub use panel::{DisplayPreferencesPanel, PanelError, PanelRequest, PanelResponse, Submission};
pub use prefs::{DisplayPrefs, PreferenceKey, PreferenceSet};
pub use store::{ConfigPreferenceStore, MemoryPreferenceStore, PreferenceStore, StorageError};
pub use user::{UserId, UserIdError};
