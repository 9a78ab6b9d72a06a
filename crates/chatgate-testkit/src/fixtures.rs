//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use chatgate::{BanStore, CommandDispatcher, Event, GateConfig};
use chatgate_core::{GroupId, UserId};
use chatgate_store::MemoryStore;

/// A scripted inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEvent {
    pub sender: UserId,
    pub group: Option<GroupId>,
    pub mentions: Vec<UserId>,
    /// Set once the gate stops propagation.
    pub stopped: bool,
}

impl TestEvent {
    /// An event sent in private context.
    pub fn private(sender: &str) -> Self {
        Self {
            sender: UserId::from(sender),
            group: None,
            mentions: Vec::new(),
            stopped: false,
        }
    }

    /// An event sent in `group`.
    pub fn in_group(sender: &str, group: &str) -> Self {
        Self {
            group: Some(GroupId::from(group)),
            ..Self::private(sender)
        }
    }

    /// Add mentions, in order.
    pub fn mentioning(mut self, users: &[&str]) -> Self {
        self.mentions.extend(users.iter().copied().map(UserId::from));
        self
    }
}

impl Event for TestEvent {
    fn sender_id(&self) -> UserId {
        self.sender.clone()
    }

    fn group_id(&self) -> Option<GroupId> {
        self.group.clone()
    }

    fn mentioned_user_ids(&self) -> Vec<UserId> {
        self.mentions.clone()
    }

    fn stop_propagation(&mut self) {
        self.stopped = true;
    }
}

/// A ban store and dispatcher over a shared in-memory backend.
pub struct TestFixture {
    pub backend: Arc<MemoryStore>,
    pub config: GateConfig,
    pub bans: Arc<BanStore<Arc<MemoryStore>>>,
    pub dispatcher: CommandDispatcher<Arc<MemoryStore>>,
}

impl TestFixture {
    /// Create a fixture with default configuration and empty storage.
    pub async fn new() -> Self {
        Self::with_config(GateConfig::default()).await
    }

    /// Create a fixture with `config` and empty storage.
    pub async fn with_config(config: GateConfig) -> Self {
        Self::over(Arc::new(MemoryStore::new()), config).await
    }

    /// Load a fresh ban store from this fixture's backend, as a restart would.
    pub async fn restart(&self) -> Self {
        Self::over(Arc::clone(&self.backend), self.config.clone()).await
    }

    /// Run a command and return the reply, panicking on persistence errors.
    pub async fn run(&self, command: &str, event: &TestEvent) -> String {
        let command = chatgate::Command::from_name(command)
            .unwrap_or_else(|| panic!("unknown command {command}"));
        self.dispatcher
            .dispatch(command, event)
            .await
            .unwrap_or_else(|e| panic!("{command} failed: {e}"))
    }

    async fn over(backend: Arc<MemoryStore>, config: GateConfig) -> Self {
        let bans = BanStore::open(Arc::clone(&backend), &config)
            .await
            .unwrap_or_else(|e| panic!("failed to open ban store: {e}"));
        let bans = Arc::new(bans);
        let dispatcher = CommandDispatcher::new(Arc::clone(&bans), &config);
        Self {
            backend,
            config,
            bans,
            dispatcher,
        }
    }
}

/// Shorthand for a user id.
pub fn user(id: &str) -> UserId {
    UserId::from(id)
}

/// Shorthand for a group id.
pub fn group(id: &str) -> GroupId {
    GroupId::from(id)
}
