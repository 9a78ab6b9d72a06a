//! Proptest generators for property-based testing.

use proptest::prelude::*;

use chatgate_core::{BanState, GroupId, UserId};

/// Generate a user id from a small pool so operations collide often.
pub fn user_id() -> impl Strategy<Value = UserId> {
    (1u16..=12).prop_map(|n| UserId::from(format!("{}", 100 + n)))
}

/// Generate a group id from a small pool.
pub fn group_id() -> impl Strategy<Value = GroupId> {
    prop_oneof![Just("A"), Just("B"), Just("C"), Just("D")].prop_map(GroupId::from)
}

/// Generate a non-empty target list, duplicates allowed.
pub fn user_ids() -> impl Strategy<Value = Vec<UserId>> {
    prop::collection::vec(user_id(), 1..=4)
}

/// One state mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BanOp {
    BanInGroup(GroupId, Vec<UserId>),
    BanGlobally(Vec<UserId>),
    UnbanInGroup(GroupId, Vec<UserId>),
    UnbanEverywhere(Vec<UserId>),
    SetEnabled(bool),
}

impl Arbitrary for BanOp {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            3 => (group_id(), user_ids()).prop_map(|(g, u)| BanOp::BanInGroup(g, u)),
            2 => user_ids().prop_map(BanOp::BanGlobally),
            3 => (group_id(), user_ids()).prop_map(|(g, u)| BanOp::UnbanInGroup(g, u)),
            1 => user_ids().prop_map(BanOp::UnbanEverywhere),
            1 => any::<bool>().prop_map(BanOp::SetEnabled),
        ]
        .boxed()
    }
}

/// Generate a sequence of up to `max_len` operations.
pub fn ban_ops(max_len: usize) -> impl Strategy<Value = Vec<BanOp>> {
    prop::collection::vec(any::<BanOp>(), 0..=max_len)
}

/// Apply `op` to a plain state.
pub fn apply_op(state: &mut BanState, op: &BanOp) {
    match op {
        BanOp::BanInGroup(group, users) => state.ban_in_group(group, users),
        BanOp::BanGlobally(users) => state.ban_globally(users),
        BanOp::UnbanInGroup(group, users) => state.unban_in_group(group, users),
        BanOp::UnbanEverywhere(users) => state.unban_everywhere(users),
        BanOp::SetEnabled(enabled) => state.set_enabled(*enabled),
    }
}
