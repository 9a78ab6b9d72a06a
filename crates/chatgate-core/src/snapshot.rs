//! Persisted form of the ban state.
//!
//! The state is written as four independently keyed values: the global ban
//! list, the group ban mapping, the group allow mapping, and the enable flag.
//! Sets become unordered lists at this boundary and are turned back into
//! sets on load, so list order carries no meaning.
//!
//! Values are encoded as CBOR.

use std::collections::{BTreeMap, BTreeSet};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::state::BanState;
use crate::types::{GroupId, UserId};

/// Prefix used for storage keys when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "ban_plugin";

/// Names of the four persisted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub global_ban: String,
    pub group_ban: String,
    pub group_allow: String,
    pub enable: String,
}

impl StorageKeys {
    /// Derive the four key names from a namespace prefix.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            global_ban: format!("{prefix}_global_ban"),
            group_ban: format!("{prefix}_group_ban"),
            group_allow: format!("{prefix}_group_allow"),
            enable: format!("{prefix}_enable"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

/// A full, list-shaped copy of the ban state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanSnapshot {
    pub global_ban: Vec<String>,
    pub group_ban: BTreeMap<String, Vec<String>>,
    pub group_allow: BTreeMap<String, Vec<String>>,
    pub enable: bool,
}

impl BanSnapshot {
    /// Capture `state`.
    pub fn capture(state: &BanState) -> Self {
        Self {
            global_ban: ids_to_list(state.global_bans()),
            group_ban: groups_to_lists(state.group_bans()),
            group_allow: groups_to_lists(state.group_allows()),
            enable: state.enabled(),
        }
    }

    /// Rebuild a [`BanState`].
    ///
    /// Duplicate list entries collapse and empty group lists are dropped.
    pub fn into_state(self) -> BanState {
        BanState::from_parts(
            self.global_ban.into_iter().map(UserId::from).collect(),
            lists_to_groups(self.group_ban),
            lists_to_groups(self.group_allow),
            self.enable,
        )
    }

    /// Encode into `(key, value)` pairs, one per persisted entity.
    pub fn encode(&self, keys: &StorageKeys) -> Result<Vec<(String, Bytes)>> {
        Ok(vec![
            (keys.global_ban.clone(), encode_value(&self.global_ban)?),
            (keys.group_ban.clone(), encode_value(&self.group_ban)?),
            (keys.group_allow.clone(), encode_value(&self.group_allow)?),
            (keys.enable.clone(), encode_value(&self.enable)?),
        ])
    }
}

/// Encode a single persisted value as CBOR.
pub fn encode_value<T: Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf)
        .map_err(|e| CoreError::EncodingError(e.to_string()))?;
    Ok(Bytes::from(buf))
}

/// Decode a single persisted value stored under `key`.
pub fn decode_value<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn ids_to_list(ids: &BTreeSet<UserId>) -> Vec<String> {
    ids.iter().map(|id| id.as_str().to_string()).collect()
}

fn groups_to_lists(map: &BTreeMap<GroupId, BTreeSet<UserId>>) -> BTreeMap<String, Vec<String>> {
    map.iter()
        .map(|(group, users)| (group.as_str().to_string(), ids_to_list(users)))
        .collect()
}

fn lists_to_groups(map: BTreeMap<String, Vec<String>>) -> BTreeMap<GroupId, BTreeSet<UserId>> {
    map.into_iter()
        .map(|(group, users)| {
            (
                GroupId::from(group),
                users.into_iter().map(UserId::from).collect(),
            )
        })
        .collect()
}
