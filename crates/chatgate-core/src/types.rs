//! Identity newtypes for Chat Gate.
//!
//! The host platform hands us user and group identities as plain strings.
//! They are wrapped so a group id can never be passed where a user id is
//! expected. No structure is assumed beyond equality and ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a chat user, as reported by the host platform.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw user id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the raw id.
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Identity of a chat group.
///
/// Private conversations have no group; callers model that as
/// `Option<GroupId>::None`, never as an empty string.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Wrap a raw group id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the raw id.
    pub fn into_string(self) -> String {
        self.0
    }
}

macro_rules! impl_id_conversions {
    ($ty:ident) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($ty), self.0)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $ty {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $ty {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

impl_id_conversions!(UserId);
impl_id_conversions!(GroupId);
