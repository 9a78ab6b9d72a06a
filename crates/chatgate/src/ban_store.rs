//! The ban store: shared, persisted ban state.
//!
//! [`BanStore`] wraps a [`BanState`] in a read-write lock and writes a full
//! snapshot to its [`KvStore`] on every mutation. A mutation is applied to a
//! copy of the state, the copy is persisted, and only then does it replace
//! the live state. The write lock is held for the whole sequence, so readers
//! never see a half-applied change and concurrent mutations never interleave.

use std::collections::{BTreeMap, BTreeSet};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use chatgate_core::{BanListing, BanSnapshot, BanState, GroupId, StorageKeys, UserId};
use chatgate_store::{KvStore, KvStoreExt, StoreError};

use crate::config::GateConfig;
use crate::error::{GateError, Result};
use crate::event::{Event, GateDecision};

/// Lock-guarded ban state backed by durable storage.
pub struct BanStore<S: KvStore> {
    /// The storage backend.
    store: S,
    /// Key names for the four persisted values.
    keys: StorageKeys,
    /// The live state.
    state: RwLock<BanState>,
}

impl<S: KvStore> BanStore<S> {
    /// Load the ban sets from `store` and take the enable flag from `config`.
    ///
    /// Missing keys load as empty. A value that cannot be decoded fails with
    /// [`GateError::CorruptState`] instead of loading as empty, since the
    /// next mutation would overwrite it. Storage errors are returned as-is.
    pub async fn open(store: S, config: &GateConfig) -> Result<Self> {
        config.validate()?;
        let keys = config.storage_keys();

        let global_ban: Vec<String> = load_or_default(&store, &keys.global_ban).await?;
        let group_ban: BTreeMap<String, Vec<String>> =
            load_or_default(&store, &keys.group_ban).await?;
        let group_allow: BTreeMap<String, Vec<String>> =
            load_or_default(&store, &keys.group_allow).await?;

        let persisted_enable: Option<bool> = load_or_default(&store, &keys.enable).await?;
        if persisted_enable.is_some_and(|flag| flag != config.enable) {
            debug!(
                configured = config.enable,
                "runtime enable toggle from a previous run is not restored"
            );
        }

        let state = BanSnapshot {
            global_ban,
            group_ban,
            group_allow,
            enable: config.enable,
        }
        .into_state();

        debug!(
            global = state.global_bans().len(),
            groups_banned = state.group_bans().len(),
            groups_allowed = state.group_allows().len(),
            enabled = state.enabled(),
            "loaded ban state"
        );

        Ok(Self {
            store,
            keys,
            state: RwLock::new(state),
        })
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Key names this store persists under.
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether `user` is banned in `group` (or in private context).
    pub async fn is_banned(&self, user: &UserId, group: Option<&GroupId>) -> bool {
        self.state.read().await.is_banned(user, group)
    }

    /// Whether the gate is currently active.
    pub async fn enabled(&self) -> bool {
        self.state.read().await.enabled()
    }

    /// Group and global bans for display.
    pub async fn list_banned(&self, group: Option<&GroupId>) -> BanListing {
        self.state.read().await.list_banned(group)
    }

    /// A copy of the current state.
    pub async fn state(&self) -> BanState {
        self.state.read().await.clone()
    }

    /// Decide whether `event` may reach the rest of the bot.
    ///
    /// Must run before any other handler. On [`GateDecision::Drop`] the
    /// event's propagation has already been stopped.
    pub async fn gate<E: Event>(&self, event: &mut E) -> GateDecision {
        let sender = event.sender_id();
        let group = event.group_id();

        let banned = {
            let state = self.state.read().await;
            state.enabled() && state.is_banned(&sender, group.as_ref())
        };

        if banned {
            debug!(sender = %sender, group = ?group, "dropping event from banned sender");
            event.stop_propagation();
            GateDecision::Drop
        } else {
            GateDecision::Pass
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Ban `users` in `group`, overriding any allow-exception they had there.
    pub async fn ban_in_group(&self, group: &GroupId, users: &[UserId]) -> Result<()> {
        self.mutate(|state| state.ban_in_group(group, users)).await?;
        info!(group = %group, users = %join(users), "banned in group");
        Ok(())
    }

    /// Ban `users` in every group and in private context.
    pub async fn ban_globally(&self, users: &[UserId]) -> Result<()> {
        self.mutate(|state| state.ban_globally(users)).await?;
        info!(users = %join(users), "banned globally");
        Ok(())
    }

    /// Lift the group ban on `users` in `group` and exempt them from any
    /// global ban there.
    pub async fn unban_in_group(&self, group: &GroupId, users: &[UserId]) -> Result<()> {
        self.mutate(|state| state.unban_in_group(group, users)).await?;
        info!(group = %group, users = %join(users), "allowed in group");
        Ok(())
    }

    /// Clear every ban and allow-exception for `users`.
    pub async fn unban_everywhere(&self, users: &[UserId]) -> Result<()> {
        self.mutate(|state| state.unban_everywhere(users)).await?;
        info!(users = %join(users), "cleared all bans");
        Ok(())
    }

    /// Turn the gate on or off for the rest of this process's lifetime.
    pub async fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.mutate(|state| state.set_enabled(enabled)).await?;
        info!(enabled, "gate toggled");
        Ok(())
    }

    /// Apply `f` to a copy of the state, persist the copy, then commit it.
    ///
    /// The write lock is held across the storage write. If the write fails
    /// the live state is untouched.
    async fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BanState),
    {
        let mut live = self.state.write().await;

        let mut next = live.clone();
        f(&mut next);

        let entries = BanSnapshot::capture(&next).encode(&self.keys)?;
        if let Err(e) = self.store.put_batch(&entries).await {
            warn!(error = %e, "failed to persist ban state; change discarded");
            return Err(e.into());
        }

        *live = next;
        Ok(())
    }
}

/// Load a value, treating a missing entry as its default.
async fn load_or_default<S, T>(store: &S, key: &str) -> Result<T>
where
    S: KvStore,
    T: serde::de::DeserializeOwned + Default + Send,
{
    match store.get_decoded::<T>(key).await {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(StoreError::Codec(e)) => {
            warn!(key, error = %e, "refusing to load undecodable persisted value");
            Err(GateError::CorruptState {
                key: key.to_string(),
                reason: e.to_string(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn join(users: &[UserId]) -> String {
    users
        .iter()
        .map(UserId::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(",")
}
