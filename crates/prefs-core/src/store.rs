// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Storage port for per-user preference sets, with an in-memory fake and an
//! adapter over any [`ConfigStore`].

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::config::{ConfigError, ConfigService, ConfigStore};
use crate::prefs::PreferenceSet;
use crate::user::UserId;

/// Failure while loading or saving preferences.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying config store failed.
    #[error("config store: {0}")]
    Config(#[from] ConfigError),
    /// A previous writer panicked while holding the store lock.
    #[error("preference store lock poisoned")]
    Poisoned,
}

/// Load/save port the panel depends on.
///
/// Stores are expected to serialize writes per user; the panel itself does no
/// locking and the last save wins.
pub trait PreferenceStore {
    /// Load `user`'s preferences. A user with nothing stored gets an empty set.
    fn load(&self, user: &UserId) -> Result<PreferenceSet, StorageError>;
    /// Persist `prefs` for its owner, replacing what was stored.
    fn save(&self, prefs: &PreferenceSet) -> Result<(), StorageError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for &T {
    fn load(&self, user: &UserId) -> Result<PreferenceSet, StorageError> {
        (**self).load(user)
    }

    fn save(&self, prefs: &PreferenceSet) -> Result<(), StorageError> {
        (**self).save(prefs)
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn load(&self, user: &UserId) -> Result<PreferenceSet, StorageError> {
        (**self).load(user)
    }

    fn save(&self, prefs: &PreferenceSet) -> Result<(), StorageError> {
        (**self).save(prefs)
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Arc<T> {
    fn load(&self, user: &UserId) -> Result<PreferenceSet, StorageError> {
        (**self).load(user)
    }

    fn save(&self, prefs: &PreferenceSet) -> Result<(), StorageError> {
        (**self).save(prefs)
    }
}

/// Process-local store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    users: Mutex<HashMap<UserId, BTreeMap<String, String>>>,
    saves: AtomicUsize,
}

impl MemoryPreferenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Seed `prefs` without counting it as a save.
    pub fn insert(&self, prefs: PreferenceSet) -> Result<(), StorageError> {
        let user = prefs.user().clone();
        self.users
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .insert(user, prefs.into_values());
        Ok(())
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, user: &UserId) -> Result<PreferenceSet, StorageError> {
        let users = self.users.lock().map_err(|_| StorageError::Poisoned)?;
        let values = users.get(user).cloned().unwrap_or_default();
        Ok(PreferenceSet::from_values(user.clone(), values))
    }

    fn save(&self, prefs: &PreferenceSet) -> Result<(), StorageError> {
        self.users
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .insert(prefs.user().clone(), prefs.values().clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Keeps each user's preferences as a JSON blob under `prefs/<user>` in a
/// [`ConfigStore`].
pub struct ConfigPreferenceStore<S> {
    config: ConfigService<S>,
}

impl<S> ConfigPreferenceStore<S> {
    /// Wrap `store`.
    pub fn new(store: S) -> Self {
        Self {
            config: ConfigService::new(store),
        }
    }

    /// Config key holding `user`'s preferences.
    pub fn key_for(user: &UserId) -> String {
        format!("prefs/{user}")
    }

    /// Consume the adapter and return the inner store.
    pub fn into_inner(self) -> S {
        self.config.into_inner()
    }
}

impl<S: ConfigStore> PreferenceStore for ConfigPreferenceStore<S> {
    fn load(&self, user: &UserId) -> Result<PreferenceSet, StorageError> {
        let values: BTreeMap<String, String> = self.config.load_or_default(&Self::key_for(user))?;
        Ok(PreferenceSet::from_values(user.clone(), values))
    }

    fn save(&self, prefs: &PreferenceSet) -> Result<(), StorageError> {
        self.config.save(&Self::key_for(prefs.user()), prefs.values())?;
        Ok(())
    }
}
