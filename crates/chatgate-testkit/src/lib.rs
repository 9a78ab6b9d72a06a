//! # Chat Gate Testkit
//!
//! Testing utilities for Chat Gate.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a scriptable [`TestEvent`] and a [`TestFixture`] wiring a
//!   ban store and dispatcher over an in-memory backend
//! - **Generators**: proptest strategies for identities and ban operations
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use chatgate_testkit::generators::{ban_ops, apply_op};
//! use chatgate_core::BanState;
//!
//! proptest! {
//!     #[test]
//!     fn no_empty_groups(ops in ban_ops(32)) {
//!         let mut state = BanState::new();
//!         for op in &ops {
//!             apply_op(&mut state, op);
//!         }
//!         prop_assert!(state.group_bans().values().all(|s| !s.is_empty()));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use chatgate::Event;
//! use chatgate_testkit::fixtures::TestEvent;
//!
//! let event = TestEvent::in_group("10001", "A").mentioning(&["222"]);
//! assert_eq!(event.mentioned_user_ids().len(), 1);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{TestEvent, TestFixture};
pub use generators::{apply_op, ban_ops, BanOp};
