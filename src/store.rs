//! Known-user registry and per-user rate limiting.
//!
//! State is owned by a single actor task; [`InMemoryUserStore`] is a
//! cloneable handle that talks to it over a channel.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Telegram user identifier.
pub type UserId = u64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user store has shut down")]
    Shutdown,
}

/// Result of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The query may proceed; its timestamp has been recorded.
    Allowed,
    /// The user queried too recently.
    Limited { retry_after: Duration },
}

/// Store of known users and their last query time.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Remembers a user. Returns true if the user was not known before.
    async fn register(&self, user: UserId) -> Result<bool, StoreError>;

    /// Returns every known user.
    async fn users(&self) -> Result<Vec<UserId>, StoreError>;

    /// Returns the number of known users.
    async fn count(&self) -> Result<usize, StoreError>;

    /// Allows a query if the previous allowed one is older than `window`.
    async fn check_rate(&self, user: UserId, window: Duration) -> Result<RateDecision, StoreError>;
}

enum StoreCommand {
    Register { user: UserId, responder: oneshot::Sender<bool> },
    Users { responder: oneshot::Sender<Vec<UserId>> },
    Count { responder: oneshot::Sender<usize> },
    CheckRate { user: UserId, window: Duration, responder: oneshot::Sender<RateDecision> },
}

#[derive(Default)]
struct StoreState {
    users: HashSet<UserId>,
    last_query: HashMap<UserId, Instant>,
}

impl StoreState {
    fn handle(&mut self, command: StoreCommand) {
        // A dropped responder means the caller went away; nothing to do.
        match command {
            StoreCommand::Register { user, responder } => {
                let _ = responder.send(self.users.insert(user));
            }
            StoreCommand::Users { responder } => {
                let mut users: Vec<UserId> = self.users.iter().copied().collect();
                users.sort_unstable();
                let _ = responder.send(users);
            }
            StoreCommand::Count { responder } => {
                let _ = responder.send(self.users.len());
            }
            StoreCommand::CheckRate { user, window, responder } => {
                let _ = responder.send(self.check_rate(user, window, Instant::now()));
            }
        }
    }

    fn check_rate(&mut self, user: UserId, window: Duration, now: Instant) -> RateDecision {
        if let Some(last) = self.last_query.get(&user) {
            let elapsed = now.saturating_duration_since(*last);
            if elapsed < window {
                return RateDecision::Limited { retry_after: window - elapsed };
            }
        }

        self.last_query.insert(user, now);
        RateDecision::Allowed
    }
}

/// Handle to the in-memory store actor.
#[derive(Clone)]
pub struct InMemoryUserStore {
    sender: mpsc::Sender<StoreCommand>,
}

impl InMemoryUserStore {
    /// Spawns the actor task and returns a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        let (sender, mut receiver) = mpsc::channel(64);

        tokio::spawn(async move {
            let mut state = StoreState::default();
            while let Some(command) = receiver.recv().await {
                state.handle(command);
            }
            debug!("User store actor stopped");
        });

        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> StoreCommand,
    ) -> Result<T, StoreError> {
        let (responder, rx) = oneshot::channel();
        self.sender.send(make(responder)).await.map_err(|_| StoreError::Shutdown)?;
        rx.await.map_err(|_| StoreError::Shutdown)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn register(&self, user: UserId) -> Result<bool, StoreError> {
        self.request(|responder| StoreCommand::Register { user, responder }).await
    }

    async fn users(&self) -> Result<Vec<UserId>, StoreError> {
        self.request(|responder| StoreCommand::Users { responder }).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.request(|responder| StoreCommand::Count { responder }).await
    }

    async fn check_rate(&self, user: UserId, window: Duration) -> Result<RateDecision, StoreError> {
        if window.is_zero() {
            return Ok(RateDecision::Allowed);
        }
        self.request(|responder| StoreCommand::CheckRate { user, window, responder }).await
    }
}
