//! Deterministic simulation harness for Stagelink.
//!
//! Provides a virtual-clock [`Environment`] so the link's reconnect timing
//! can be tested to the millisecond without sleeping, plus builders for the
//! push records tests feed through the pipeline. The same state-machine code
//! that runs against the production clock runs here against [`SimEnv`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::{
    ops::Sub,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use stagelink_core::env::Environment;
use stagelink_proto::{ReplyFragment, ServerPush};

/// Virtual instant, measured from simulation start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// Instant at simulation start.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Offset from simulation start.
    pub fn since_start(self) -> Duration {
        self.0
    }
}

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0 - rhs.0
    }
}

/// Deterministic environment with a manually advanced clock.
///
/// Clones share one clock, so a supervisor under test and the test driving
/// it observe the same virtual time.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    now: Arc<Mutex<Duration>>,
}

impl SimEnv {
    /// Create an environment with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the virtual clock.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        SimInstant(*self.now.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        // Virtual time never blocks; tests advance the clock explicitly.
        std::future::ready(())
    }
}

/// Build a reply fragment with defaults suitable for tests.
pub fn fragment(id: &str, username: &str, kind: &str, content: &str) -> ReplyFragment {
    ReplyFragment {
        id: id.into(),
        uid: 0,
        username: username.into(),
        content: content.into(),
        kind: kind.into(),
        is_adopted: false,
    }
}

/// Build a push carrying only a reply fragment.
pub fn reply_push(id: &str, username: &str, kind: &str, content: &str) -> ServerPush {
    ServerPush { panel_reply: Some(fragment(id, username, kind, content)), ..ServerPush::default() }
}
