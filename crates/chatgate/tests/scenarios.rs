//! End-to-end scenarios: admin commands, the gate, and persistence.

use std::sync::Arc;

use proptest::prelude::*;

use chatgate::store::{KvStore, SqliteStore};
use chatgate::{BanStore, Command, GateConfig, GateDecision, GateError, HELP_TEXT};
use chatgate_testkit::fixtures::{group, user, TestEvent, TestFixture};
use chatgate_testkit::generators::{ban_ops, group_id, user_id, BanOp};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Global ban on 111, group ban on 222 in A, then `/pass 111` in A.
async fn scenario_fixture() -> TestFixture {
    let fixture = TestFixture::new().await;
    fixture
        .run("ban-all", &TestEvent::in_group("admin", "A").mentioning(&["111"]))
        .await;
    fixture
        .run("ban", &TestEvent::in_group("admin", "A").mentioning(&["222"]))
        .await;
    fixture
        .run("pass", &TestEvent::in_group("admin", "A").mentioning(&["111"]))
        .await;
    fixture
}

#[tokio::test]
async fn test_precedence_scenario() {
    init_tracing();
    let fixture = scenario_fixture().await;
    let bans = &fixture.bans;

    assert!(!bans.is_banned(&user("111"), Some(&group("A"))).await);
    assert!(bans.is_banned(&user("111"), Some(&group("B"))).await);
    assert!(bans.is_banned(&user("111"), None).await);
    assert!(bans.is_banned(&user("222"), Some(&group("A"))).await);
    assert!(!bans.is_banned(&user("222"), Some(&group("B"))).await);
}

#[tokio::test]
async fn test_banlist_scenario() {
    let fixture = scenario_fixture().await;

    let listing = fixture.bans.list_banned(Some(&group("A"))).await;
    assert_eq!(listing.group_banned.into_iter().collect::<Vec<_>>(), vec![user("222")]);
    assert_eq!(listing.global_banned.into_iter().collect::<Vec<_>>(), vec![user("111")]);

    let reply = fixture.run("banlist", &TestEvent::in_group("admin", "A")).await;
    assert_eq!(reply, "Banned in this group: 222\nBanned globally: 111");

    let reply = fixture.run("banlist", &TestEvent::in_group("admin", "C")).await;
    assert_eq!(reply, "Banned in this group: none\nBanned globally: 111");

    let reply = fixture.run("banlist", &TestEvent::private("admin")).await;
    assert_eq!(reply, "Banned globally: 111");
}

#[tokio::test]
async fn test_banlist_empty() {
    let fixture = TestFixture::new().await;
    let reply = fixture.run("/banlist", &TestEvent::private("admin")).await;
    assert_eq!(reply, "Banned globally: none");
}

#[tokio::test]
async fn test_gate_drops_banned_sender() {
    let fixture = scenario_fixture().await;

    let mut event = TestEvent::in_group("222", "A");
    assert_eq!(fixture.bans.gate(&mut event).await, GateDecision::Drop);
    assert!(event.stopped);

    let mut event = TestEvent::in_group("222", "B");
    assert_eq!(fixture.bans.gate(&mut event).await, GateDecision::Pass);
    assert!(!event.stopped);

    let mut event = TestEvent::in_group("111", "A");
    assert!(fixture.bans.gate(&mut event).await.is_pass());

    let mut event = TestEvent::private("111");
    assert_eq!(fixture.bans.gate(&mut event).await, GateDecision::Drop);
}

#[tokio::test]
async fn test_disable_bypasses_gate() {
    let fixture = scenario_fixture().await;

    let reply = fixture.run("ban-disable", &TestEvent::private("admin")).await;
    assert!(reply.starts_with("Ban checks disabled until restart"));

    let mut event = TestEvent::private("111");
    assert_eq!(fixture.bans.gate(&mut event).await, GateDecision::Pass);
    assert!(!event.stopped);

    // Ban state itself is unchanged.
    assert!(fixture.bans.is_banned(&user("111"), None).await);

    fixture.run("ban_enable", &TestEvent::private("admin")).await;
    let mut event = TestEvent::private("111");
    assert_eq!(fixture.bans.gate(&mut event).await, GateDecision::Drop);
}

#[tokio::test]
async fn test_toggle_does_not_survive_restart() {
    let fixture = TestFixture::new().await;
    fixture.run("ban-disable", &TestEvent::private("admin")).await;
    assert!(!fixture.bans.enabled().await);

    let restarted = fixture.restart().await;
    assert!(restarted.bans.enabled().await);

    let config = GateConfig {
        enable: false,
        ..GateConfig::default()
    };
    let fixture = TestFixture::with_config(config).await;
    fixture.run("ban-enable", &TestEvent::private("admin")).await;
    assert!(!fixture.restart().await.bans.enabled().await);
}

#[tokio::test]
async fn test_missing_targets_is_usage_without_write() {
    let fixture = TestFixture::new().await;

    for name in ["ban", "ban-all", "pass", "pass-all"] {
        let reply = fixture.run(name, &TestEvent::in_group("admin", "A")).await;
        assert_eq!(reply, format!("Mention one or more users after /{name}."));
    }

    assert_eq!(fixture.backend.write_count(), 0);
    assert!(fixture.backend.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_group_commands_refused_in_private() {
    let fixture = TestFixture::new().await;

    let reply = fixture
        .run("ban", &TestEvent::private("admin").mentioning(&["222"]))
        .await;
    assert_eq!(reply, "/ban can only be used in a group chat.");

    let reply = fixture
        .run("pass", &TestEvent::private("admin").mentioning(&["222"]))
        .await;
    assert_eq!(reply, "/pass can only be used in a group chat.");

    assert_eq!(fixture.backend.write_count(), 0);

    let err = fixture
        .dispatcher
        .execute(Command::Ban, &TestEvent::private("admin").mentioning(&["222"]))
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::InvalidInvocation(_)));
}

#[tokio::test]
async fn test_ban_ignores_admin_self_mention() {
    let fixture = TestFixture::new().await;

    let reply = fixture
        .run("ban", &TestEvent::in_group("admin", "A").mentioning(&["admin", "333"]))
        .await;
    assert_eq!(reply, "Banned 333 in this group.");
    assert!(!fixture.bans.is_banned(&user("admin"), Some(&group("A"))).await);

    let reply = fixture
        .run("ban", &TestEvent::in_group("admin", "A").mentioning(&["admin"]))
        .await;
    assert_eq!(reply, "Mention one or more users after /ban.");

    // Only `ban` filters the sender.
    fixture
        .run("ban-all", &TestEvent::in_group("admin", "A").mentioning(&["admin"]))
        .await;
    assert!(fixture.bans.is_banned(&user("admin"), None).await);
}

#[tokio::test]
async fn test_self_mention_kept_when_configured() {
    let config = GateConfig {
        ignore_self_mention: false,
        ..GateConfig::default()
    };
    let fixture = TestFixture::with_config(config).await;

    fixture
        .run("ban", &TestEvent::in_group("admin", "A").mentioning(&["admin"]))
        .await;
    assert!(fixture.bans.is_banned(&user("admin"), Some(&group("A"))).await);
}

#[tokio::test]
async fn test_duplicate_mentions_are_harmless() {
    let fixture = TestFixture::new().await;

    let reply = fixture
        .run("ban-all", &TestEvent::private("admin").mentioning(&["5", "5", "6"]))
        .await;
    assert_eq!(reply, "Banned 5, 6 globally.");
    assert_eq!(fixture.bans.state().await.global_bans().len(), 2);
}

#[tokio::test]
async fn test_ban_overrides_stale_exception() {
    let fixture = scenario_fixture().await;

    fixture
        .run("ban", &TestEvent::in_group("admin", "A").mentioning(&["111"]))
        .await;

    assert!(fixture.bans.is_banned(&user("111"), Some(&group("A"))).await);
    assert!(fixture.bans.state().await.group_allows().is_empty());
}

#[tokio::test]
async fn test_pass_all_restores_neutral_state() {
    let fixture = scenario_fixture().await;
    fixture
        .run("ban", &TestEvent::in_group("admin", "B").mentioning(&["111"]))
        .await;

    let reply = fixture
        .run("pass-all", &TestEvent::private("admin").mentioning(&["111", "222"]))
        .await;
    assert_eq!(reply, "Lifted all bans on 111, 222, globally and in every group.");

    let state = fixture.bans.state().await;
    assert!(state.is_neutral(&user("111")));
    assert!(state.is_neutral(&user("222")));
    assert!(state.group_bans().is_empty());
    assert!(state.group_allows().is_empty());
    assert!(state.global_bans().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_is_hard_error() {
    init_tracing();
    let fixture = scenario_fixture().await;
    let before = fixture.bans.state().await;

    fixture.backend.set_fail_writes(true);
    let err = fixture
        .dispatcher
        .dispatch(
            Command::PassAll,
            &TestEvent::private("admin").mentioning(&["111"]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::Persistence(_)));
    assert_eq!(fixture.bans.state().await, before);

    fixture.backend.set_fail_writes(false);
    let restarted = fixture.restart().await;
    assert_eq!(restarted.bans.state().await, before);
}

#[tokio::test]
async fn test_help_text() {
    let fixture = TestFixture::new().await;
    let reply = fixture.run("ban-help", &TestEvent::private("admin")).await;
    assert_eq!(reply, HELP_TEXT);
    for command in Command::ALL {
        assert!(reply.contains(&format!("/{}", command.name())));
    }
}

#[tokio::test]
async fn test_sqlite_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gate.db");
    let config = GateConfig::default();

    let before = {
        let bans = BanStore::open(SqliteStore::open(&path).unwrap(), &config)
            .await
            .unwrap();
        bans.ban_globally(&[user("111")]).await.unwrap();
        bans.ban_in_group(&group("A"), &[user("222"), user("333")]).await.unwrap();
        bans.unban_in_group(&group("A"), &[user("111"), user("333")]).await.unwrap();
        bans.state().await
    };

    let bans = BanStore::open(SqliteStore::open(&path).unwrap(), &config)
        .await
        .unwrap();
    assert_eq!(bans.state().await, before);
    assert_eq!(
        bans.store().keys().await.unwrap(),
        vec![
            "ban_plugin_enable",
            "ban_plugin_global_ban",
            "ban_plugin_group_allow",
            "ban_plugin_group_ban",
        ]
    );
}

#[tokio::test]
async fn test_key_prefix_namespaces_storage() {
    let backend = Arc::new(chatgate::store::MemoryStore::new());
    let config = GateConfig::from_json(r#"{"key_prefix": "other"}"#).unwrap();

    let bans = BanStore::open(Arc::clone(&backend), &config).await.unwrap();
    bans.ban_globally(&[user("1")]).await.unwrap();

    let default_view = BanStore::open(Arc::clone(&backend), &GateConfig::default())
        .await
        .unwrap();
    assert!(!default_view.is_banned(&user("1"), None).await);
    assert!(backend.keys().await.unwrap().contains(&"other_global_ban".to_string()));
}

async fn apply(bans: &BanStore<Arc<chatgate::store::MemoryStore>>, op: &BanOp) {
    let result = match op {
        BanOp::BanInGroup(group, users) => bans.ban_in_group(group, users).await,
        BanOp::BanGlobally(users) => bans.ban_globally(users).await,
        BanOp::UnbanInGroup(group, users) => bans.unban_in_group(group, users).await,
        BanOp::UnbanEverywhere(users) => bans.unban_everywhere(users).await,
        BanOp::SetEnabled(enabled) => bans.set_enabled(*enabled).await,
    };
    result.unwrap();
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_disabled_gate_never_drops(
        ops in ban_ops(24),
        sender in user_id(),
        in_group in prop::option::of(group_id()),
    ) {
        runtime().block_on(async {
            let fixture = TestFixture::new().await;
            for op in &ops {
                apply(&fixture.bans, op).await;
            }
            fixture.bans.set_enabled(false).await.unwrap();

            let mut event = match &in_group {
                Some(g) => TestEvent::in_group(sender.as_str(), g.as_str()),
                None => TestEvent::private(sender.as_str()),
            };
            assert_eq!(fixture.bans.gate(&mut event).await, GateDecision::Pass);
            assert!(!event.stopped);
        });
    }

    #[test]
    fn prop_reload_preserves_decisions(
        ops in ban_ops(24),
        samples in prop::collection::vec((user_id(), prop::option::of(group_id())), 1..16),
    ) {
        runtime().block_on(async {
            let fixture = TestFixture::new().await;
            for op in &ops {
                apply(&fixture.bans, op).await;
            }

            let restarted = fixture.restart().await;
            for (user, group) in &samples {
                assert_eq!(
                    fixture.bans.is_banned(user, group.as_ref()).await,
                    restarted.bans.is_banned(user, group.as_ref()).await,
                );
            }
        });
    }
}
