//! # Chat Gate Core
//!
//! Pure ban-state model for Chat Gate: identities, the three-tier precedence
//! rules, and the persisted snapshot layout.
//!
//! This crate contains no I/O, no storage, no locking. It is pure computation
//! over sets of opaque identities.
//!
//! ## Key Types
//!
//! - [`UserId`] / [`GroupId`] - Opaque identity tokens supplied by the host platform
//! - [`BanState`] - Global bans, per-group bans, per-group allow-exceptions and the enable flag
//! - [`BanListing`] - Result of a `banlist` query
//! - [`BanSnapshot`] - The persisted form of a [`BanState`]
//! - [`StorageKeys`] - The four key names a snapshot is written under
//!
//! ## Precedence
//!
//! A per-group allow-exception beats a global ban, which beats a per-group
//! ban. See [`BanState::is_banned`].

pub mod error;
pub mod snapshot;
pub mod state;
pub mod types;

pub use error::{CoreError, Result};
pub use snapshot::{decode_value, encode_value, BanSnapshot, StorageKeys, DEFAULT_KEY_PREFIX};
pub use state::{BanListing, BanState};
pub use types::{GroupId, UserId};
