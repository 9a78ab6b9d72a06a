//! Host platform boundary.
//!
//! The chat platform owns message ingestion, command parsing, and mention
//! extraction. Chat Gate only needs to read a few facts off an inbound
//! event and, when it drops one, tell the host to stop dispatching it.

use chatgate_core::{GroupId, UserId};

/// An inbound chat event as seen by the gate.
pub trait Event {
    /// The user who sent the message.
    fn sender_id(&self) -> UserId;

    /// The group the message was sent in, or `None` for private context.
    fn group_id(&self) -> Option<GroupId>;

    /// Users mentioned in the message, in message order. May be empty.
    fn mentioned_user_ids(&self) -> Vec<UserId>;

    /// Stop the host from handing this event to any further handler.
    fn stop_propagation(&mut self);
}

/// Outcome of running an event through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the event continue to the rest of the bot.
    Pass,
    /// The sender is banned here; propagation has been stopped.
    Drop,
}

impl GateDecision {
    /// Whether the event may proceed.
    pub fn is_pass(self) -> bool {
        matches!(self, GateDecision::Pass)
    }
}
