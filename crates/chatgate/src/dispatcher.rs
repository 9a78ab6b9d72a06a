//! Admin command handling.
//!
//! The host parses the command text and checks that the caller is an
//! admin. The dispatcher validates the invocation, calls into the
//! [`BanStore`], and renders the reply shown to the admin.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chatgate_core::UserId;
use chatgate_store::KvStore;

use crate::ban_store::BanStore;
use crate::config::GateConfig;
use crate::error::{GateError, Result, Usage};
use crate::event::Event;

/// Admin commands understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Ban mentioned users in the current group.
    Ban,
    /// Ban mentioned users everywhere.
    BanAll,
    /// Lift a group ban and exempt from the global ban in the current group.
    Pass,
    /// Clear every ban and exemption for mentioned users.
    PassAll,
    /// Turn the gate on until restart.
    BanEnable,
    /// Turn the gate off until restart.
    BanDisable,
    /// Show group and global bans.
    BanList,
    /// Show command help.
    BanHelp,
}

impl Command {
    /// Every command, in help order.
    pub const ALL: [Command; 8] = [
        Command::Ban,
        Command::BanAll,
        Command::Pass,
        Command::PassAll,
        Command::BanEnable,
        Command::BanDisable,
        Command::BanList,
        Command::BanHelp,
    ];

    /// Resolve a command name, with or without a leading `/`.
    ///
    /// `ban_enable` and `ban_disable` are accepted as aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().trim_start_matches('/') {
            "ban" => Some(Command::Ban),
            "ban-all" => Some(Command::BanAll),
            "pass" => Some(Command::Pass),
            "pass-all" => Some(Command::PassAll),
            "ban-enable" | "ban_enable" => Some(Command::BanEnable),
            "ban-disable" | "ban_disable" => Some(Command::BanDisable),
            "banlist" => Some(Command::BanList),
            "ban-help" => Some(Command::BanHelp),
            _ => None,
        }
    }

    /// Canonical name, without the leading `/`.
    pub fn name(self) -> &'static str {
        match self {
            Command::Ban => "ban",
            Command::BanAll => "ban-all",
            Command::Pass => "pass",
            Command::PassAll => "pass-all",
            Command::BanEnable => "ban-enable",
            Command::BanDisable => "ban-disable",
            Command::BanList => "banlist",
            Command::BanHelp => "ban-help",
        }
    }

    /// Whether the command acts on mentioned users.
    pub fn takes_targets(self) -> bool {
        matches!(
            self,
            Command::Ban | Command::BanAll | Command::Pass | Command::PassAll
        )
    }

    /// Whether the command only makes sense inside a group chat.
    pub fn requires_group(self) -> bool {
        matches!(self, Command::Ban | Command::Pass)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Help text for `/ban-help`.
pub const HELP_TEXT: &str = "\
[ban plugin commands]
1. /ban @user...: ban the mentioned users in this group
2. /ban-all @user...: ban the mentioned users everywhere
3. /pass @user...: lift the ban on the mentioned users in this group (also overrides a global ban here)
4. /pass-all @user...: lift every ban on the mentioned users, globally and in all groups
5. /ban-enable: turn ban checks on
6. /ban-disable: turn ban checks off
7. /banlist: list users banned in this group and globally
8. /ban-help: show this help";

/// Runs admin commands against a shared [`BanStore`].
pub struct CommandDispatcher<S: KvStore> {
    bans: Arc<BanStore<S>>,
    ignore_self_mention: bool,
}

impl<S: KvStore> CommandDispatcher<S> {
    /// Create a dispatcher over `bans`.
    pub fn new(bans: Arc<BanStore<S>>, config: &GateConfig) -> Self {
        Self {
            bans,
            ignore_self_mention: config.ignore_self_mention,
        }
    }

    /// The ban store this dispatcher mutates.
    pub fn bans(&self) -> &Arc<BanStore<S>> {
        &self.bans
    }

    /// Run `command` for `event` and return the reply text.
    ///
    /// Invalid invocations are answered with a usage message and change
    /// nothing. Only persistence failures are returned as errors.
    pub async fn dispatch<E: Event>(&self, command: Command, event: &E) -> Result<String> {
        match self.execute(command, event).await {
            Err(GateError::InvalidInvocation(usage)) => {
                tracing::debug!(%command, %usage, "rejected command invocation");
                Ok(usage.to_string())
            }
            other => other,
        }
    }

    /// Run `command`, reporting invalid invocations as errors.
    pub async fn execute<E: Event>(&self, command: Command, event: &E) -> Result<String> {
        let group = event.group_id();

        let targets = if command.takes_targets() {
            let targets = self.targets(command, event);
            if targets.is_empty() {
                return Err(Usage::MissingTargets { command }.into());
            }
            targets
        } else {
            Vec::new()
        };

        if command.requires_group() && group.is_none() {
            return Err(Usage::GroupOnly { command }.into());
        }

        let ids = join_ids(&targets);
        match (command, group) {
            (Command::Ban, Some(group)) => {
                self.bans.ban_in_group(&group, &targets).await?;
                Ok(format!("Banned {ids} in this group."))
            }
            (Command::BanAll, _) => {
                self.bans.ban_globally(&targets).await?;
                Ok(format!("Banned {ids} globally."))
            }
            (Command::Pass, Some(group)) => {
                self.bans.unban_in_group(&group, &targets).await?;
                Ok(format!("Lifted the ban on {ids} in this group."))
            }
            (Command::PassAll, _) => {
                self.bans.unban_everywhere(&targets).await?;
                Ok(format!("Lifted all bans on {ids}, globally and in every group."))
            }
            (Command::BanEnable, _) => {
                self.bans.set_enabled(true).await?;
                Ok("Ban checks enabled until restart. Set `enable` in the configuration to make this permanent.".to_string())
            }
            (Command::BanDisable, _) => {
                self.bans.set_enabled(false).await?;
                Ok("Ban checks disabled until restart. Set `enable` in the configuration to make this permanent.".to_string())
            }
            (Command::BanList, group) => {
                let listing = self.bans.list_banned(group.as_ref()).await;
                let mut reply = String::new();
                if group.is_some() {
                    reply.push_str(&format!(
                        "Banned in this group: {}\n",
                        list_or_none(&listing.group_banned)
                    ));
                }
                reply.push_str(&format!(
                    "Banned globally: {}",
                    list_or_none(&listing.global_banned)
                ));
                Ok(reply)
            }
            (Command::BanHelp, _) => Ok(HELP_TEXT.to_string()),
            (Command::Ban | Command::Pass, None) => Err(Usage::GroupOnly { command }.into()),
        }
    }

    /// Mentioned users, deduplicated in mention order.
    ///
    /// For `ban`, the issuing admin is dropped when `ignore_self_mention`
    /// is set.
    fn targets<E: Event>(&self, command: Command, event: &E) -> Vec<UserId> {
        let sender = event.sender_id();
        let skip_sender = self.ignore_self_mention && command == Command::Ban;

        let mut seen = BTreeSet::new();
        event
            .mentioned_user_ids()
            .into_iter()
            .filter(|user| !(skip_sender && *user == sender))
            .filter(|user| seen.insert(user.clone()))
            .collect()
    }
}

fn join_ids(users: &[UserId]) -> String {
    users
        .iter()
        .map(UserId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn list_or_none(users: &BTreeSet<UserId>) -> String {
    if users.is_empty() {
        "none".to_string()
    } else {
        users.iter().map(UserId::as_str).collect::<Vec<_>>().join(", ")
    }
}
