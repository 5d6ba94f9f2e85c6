// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier of the account a preference set belongs to.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Longest accepted user identifier, in bytes.
pub const MAX_USER_ID_LEN: usize = 64;

/// Validated user identifier.
///
/// Ids double as storage keys, so only ASCII letters, digits, `-`, `_` and `.`
/// are accepted and a leading `.` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Reasons a user identifier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdError {
    /// The identifier was empty.
    #[error("user id is empty")]
    Empty,
    /// The identifier exceeded [`MAX_USER_ID_LEN`].
    #[error("user id is longer than {max} bytes", max = MAX_USER_ID_LEN)]
    TooLong,
    /// The identifier contained a character outside the allowed set.
    #[error("user id contains invalid character {0:?}")]
    InvalidChar(char),
    /// The identifier started with `.`.
    #[error("user id may not start with '.'")]
    LeadingDot,
}

impl UserId {
    /// Parse and validate a user identifier.
    pub fn parse(raw: &str) -> Result<Self, UserIdError> {
        if raw.is_empty() {
            return Err(UserIdError::Empty);
        }
        if raw.len() > MAX_USER_ID_LEN {
            return Err(UserIdError::TooLong);
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(UserIdError::InvalidChar(bad));
        }
        if raw.starts_with('.') {
            return Err(UserIdError::LeadingDot);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
