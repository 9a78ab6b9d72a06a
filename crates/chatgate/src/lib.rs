//! # Chat Gate
//!
//! An access-control gate for chat bots: decides per inbound message whether
//! the sender may trigger the bot at all, and handles the admin commands
//! that manage who is banned where.
//!
//! ## Overview
//!
//! Three kinds of entries decide whether a sender gets through:
//!
//! - **Global ban**: the user is blocked in every group and in private chat
//! - **Group ban**: the user is blocked in one group
//! - **Allow-exception**: the user is exempt from their global ban in one group
//!
//! An allow-exception beats a global ban, which beats a group ban. The whole
//! gate can be switched off at runtime.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chatgate::{BanStore, Command, CommandDispatcher, GateConfig};
//! use chatgate::store::SqliteStore;
//!
//! async fn example() {
//!     let config = GateConfig::from_json(r#"{"enable": true}"#).unwrap();
//!
//!     // Open storage and load persisted bans
//!     let store = SqliteStore::open("chatgate.db").unwrap();
//!     let bans = Arc::new(BanStore::open(store, &config).await.unwrap());
//!
//!     // Wire admin commands
//!     let dispatcher = CommandDispatcher::new(Arc::clone(&bans), &config);
//!
//!     // For every inbound event, before any other handler:
//!     // if bans.gate(&mut event).await.is_pass() { ... }
//!
//!     // For admin commands parsed by the host:
//!     // let reply = dispatcher.dispatch(Command::Ban, &event).await?;
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `chatgate::core` - Identities, ban state, persisted snapshot layout
//! - `chatgate::store` - Key-value storage abstraction and SQLite

pub mod ban_store;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;

// Re-export component crates
pub use chatgate_core as core;
pub use chatgate_store as store;

// Re-export main types for convenience
pub use ban_store::BanStore;
pub use config::GateConfig;
pub use dispatcher::{Command, CommandDispatcher, HELP_TEXT};
pub use error::{GateError, Result, Usage};
pub use event::{Event, GateDecision};

// Re-export commonly used core types
pub use chatgate_core::{BanListing, BanState, GroupId, UserId};
