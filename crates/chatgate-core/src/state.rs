//! Ban state and its precedence rules.
//!
//! [`BanState`] holds the four entities that decide whether a sender may
//! reach the bot: the global ban set, per-group ban sets, per-group
//! allow-exceptions, and the enable flag. It is a plain value; locking and
//! persistence live one layer up.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{GroupId, UserId};

/// In-memory ban state.
///
/// Invariant: neither group mapping ever holds an empty set. A missing key
/// is the only encoding of "no entries for this group".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanState {
    /// Users banned in every group and in private context.
    global_ban: BTreeSet<UserId>,

    /// Users banned in one specific group.
    group_ban: BTreeMap<GroupId, BTreeSet<UserId>>,

    /// Users exempted from the global ban within one specific group.
    group_allow: BTreeMap<GroupId, BTreeSet<UserId>>,

    /// When false the gate lets everything through.
    enabled: bool,
}

/// Result of a `banlist` query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BanListing {
    /// Users banned in the queried group. Empty when no group was given.
    pub group_banned: BTreeSet<UserId>,

    /// Users banned globally.
    pub global_banned: BTreeSet<UserId>,
}

impl Default for BanState {
    fn default() -> Self {
        Self::new()
    }
}

impl BanState {
    /// Create an empty, enabled ban state.
    pub fn new() -> Self {
        Self {
            global_ban: BTreeSet::new(),
            group_ban: BTreeMap::new(),
            group_allow: BTreeMap::new(),
            enabled: true,
        }
    }

    /// Assemble a state from loaded parts, dropping empty group entries.
    pub fn from_parts(
        global_ban: BTreeSet<UserId>,
        group_ban: BTreeMap<GroupId, BTreeSet<UserId>>,
        group_allow: BTreeMap<GroupId, BTreeSet<UserId>>,
        enabled: bool,
    ) -> Self {
        let mut state = Self {
            global_ban,
            group_ban,
            group_allow,
            enabled,
        };
        state.group_ban.retain(|_, users| !users.is_empty());
        state.group_allow.retain(|_, users| !users.is_empty());
        state
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Decide whether `user` is banned in `group` (or in private context).
    ///
    /// Evaluated in this order:
    /// 1. an allow-exception for `user` in `group` means not banned,
    /// 2. a global ban means banned,
    /// 3. a group ban in `group` means banned,
    /// 4. otherwise not banned.
    pub fn is_banned(&self, user: &UserId, group: Option<&GroupId>) -> bool {
        if let Some(group) = group {
            if contains(&self.group_allow, group, user) {
                return false;
            }
        }

        if self.global_ban.contains(user) {
            return true;
        }

        match group {
            Some(group) => contains(&self.group_ban, group, user),
            None => false,
        }
    }

    /// Whether the gate is active.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Group and global bans for display.
    pub fn list_banned(&self, group: Option<&GroupId>) -> BanListing {
        let group_banned = group
            .and_then(|g| self.group_ban.get(g))
            .cloned()
            .unwrap_or_default();

        BanListing {
            group_banned,
            global_banned: self.global_ban.clone(),
        }
    }

    /// The global ban set.
    pub fn global_bans(&self) -> &BTreeSet<UserId> {
        &self.global_ban
    }

    /// All per-group ban sets.
    pub fn group_bans(&self) -> &BTreeMap<GroupId, BTreeSet<UserId>> {
        &self.group_ban
    }

    /// All per-group allow-exceptions.
    pub fn group_allows(&self) -> &BTreeMap<GroupId, BTreeSet<UserId>> {
        &self.group_allow
    }

    /// True if `user` appears in none of the three containers.
    pub fn is_neutral(&self, user: &UserId) -> bool {
        !self.global_ban.contains(user)
            && !self.group_ban.values().any(|users| users.contains(user))
            && !self.group_allow.values().any(|users| users.contains(user))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Ban `users` in `group`, clearing any allow-exception they held there.
    pub fn ban_in_group(&mut self, group: &GroupId, users: &[UserId]) {
        for user in users {
            remove(&mut self.group_allow, group, user);
            self.group_ban
                .entry(group.clone())
                .or_default()
                .insert(user.clone());
        }
    }

    /// Ban `users` everywhere. Existing allow-exceptions keep overriding.
    pub fn ban_globally(&mut self, users: &[UserId]) {
        self.global_ban.extend(users.iter().cloned());
    }

    /// Lift the group ban on `users` in `group` and record an
    /// allow-exception so a global ban does not apply there either.
    pub fn unban_in_group(&mut self, group: &GroupId, users: &[UserId]) {
        for user in users {
            remove(&mut self.group_ban, group, user);
            self.group_allow
                .entry(group.clone())
                .or_default()
                .insert(user.clone());
        }
    }

    /// Return `users` to a fully neutral state: no global ban, no group
    /// bans, and no allow-exceptions anywhere.
    pub fn unban_everywhere(&mut self, users: &[UserId]) {
        for user in users {
            self.global_ban.remove(user);
            remove_everywhere(&mut self.group_ban, user);
            remove_everywhere(&mut self.group_allow, user);
        }
    }

    /// Toggle the gate.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

fn contains(map: &BTreeMap<GroupId, BTreeSet<UserId>>, group: &GroupId, user: &UserId) -> bool {
    map.get(group).is_some_and(|users| users.contains(user))
}

/// Remove `user` from `map[group]`, dropping the key once the set is empty.
fn remove(map: &mut BTreeMap<GroupId, BTreeSet<UserId>>, group: &GroupId, user: &UserId) {
    if let Some(users) = map.get_mut(group) {
        users.remove(user);
        if users.is_empty() {
            map.remove(group);
        }
    }
}

fn remove_everywhere(map: &mut BTreeMap<GroupId, BTreeSet<UserId>>, user: &UserId) {
    map.retain(|_, users| {
        users.remove(user);
        !users.is_empty()
    });
}
