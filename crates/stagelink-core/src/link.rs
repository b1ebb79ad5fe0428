//! Connection lifecycle state machine.
//!
//! Maintains at most one live socket to the backend and guarantees it is
//! re-established after any termination, so the rest of the client never
//! distinguishes "first connect" from "reconnect". Any closure, whether
//! network failure or server-initiated, is treated as transient: the link is
//! expected to be always-on for the lifetime of the panel.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────────┐ connect ┌────────────┐  on_open   ┌───────────┐
//! │ Disconnected │────────>│ Connecting │───────────>│ Connected │
//! └──────────────┘         └────────────┘            └───────────┘
//!                                │                         │
//!                                │ on_close                │ on_close
//!                                ↓                         ↓
//!                         ┌──────────────────┐  tick (after fixed delay)
//!                         │ ReconnectPending │──────> Connecting
//!                         └──────────────────┘
//! ```
//!
//! Retry is infinite and unthrottled beyond the fixed delay: no backoff,
//! no attempt cap. A superseded socket is fenced by a generation counter:
//! every (re)connect increments the generation, and events carrying a stale
//! generation are dropped, which is what guarantees no duplicate event
//! delivery across a reconnect.

use std::{
    ops::Sub,
    time::{Duration, Instant},
};

use stagelink_proto::ServerPush;

/// Fixed delay between a closure and the single reconnect attempt it
/// schedules.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(5000);

/// Link lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No socket has been opened yet.
    Disconnected,
    /// A socket is being dialed.
    Connecting,
    /// The socket is open and delivering messages.
    Connected,
    /// The socket closed; a reconnect is scheduled.
    ReconnectPending,
}

/// Actions returned by the link state machine.
///
/// The driver executes these; the state machine itself performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Open a new socket to the endpoint.
    ///
    /// The driver MUST tear down any previously opened socket before
    /// dialing, and MUST tag every event from the new socket with the given
    /// generation.
    Open {
        /// Endpoint URL to dial.
        endpoint: String,
        /// Generation fencing events from this socket.
        generation: u64,
    },
}

/// Connection lifecycle state machine.
///
/// Pure state machine: time is passed as a parameter, sockets live in the
/// driver. Generic over `Instant` to support both real time and virtual
/// time for deterministic testing.
#[derive(Debug, Clone)]
pub struct Link<I = Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Current lifecycle state.
    state: LinkState,
    /// Endpoint URL, fixed for the lifetime of the link.
    endpoint: String,
    /// Generation of the most recently requested socket.
    generation: u64,
    /// When the current socket closed. `None` unless a reconnect is pending.
    closed_at: Option<I>,
    /// Delay between closure and reconnect.
    reconnect_delay: Duration,
}

impl<I> Link<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create a new link for the given endpoint, in
    /// [`LinkState::Disconnected`].
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_reconnect_delay(endpoint, RECONNECT_DELAY)
    }

    /// Create a new link with a non-default reconnect delay.
    pub fn with_reconnect_delay(endpoint: impl Into<String>, delay: Duration) -> Self {
        Self {
            state: LinkState::Disconnected,
            endpoint: endpoint.into(),
            generation: 0,
            closed_at: None,
            reconnect_delay: delay,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Generation of the most recently requested socket.
    ///
    /// Events from sockets with an older generation are stale and ignored.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Endpoint URL this link dials.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request a (re)connect now, superseding any existing socket.
    ///
    /// Cancels a pending reconnect and bumps the generation, so events from
    /// the superseded socket no longer reach this link.
    pub fn connect(&mut self) -> Vec<LinkAction> {
        self.begin_connect()
    }

    /// Socket with the given generation finished opening.
    pub fn on_open(&mut self, generation: u64) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale open ignored");
            return;
        }

        if self.state == LinkState::Connecting {
            tracing::info!(endpoint = %self.endpoint, "link connected");
            self.state = LinkState::Connected;
        } else {
            tracing::warn!(state = ?self.state, "unexpected open ignored");
        }
    }

    /// Socket with the given generation closed, cleanly or not.
    ///
    /// Clean close and error close are deliberately not distinguished: both
    /// schedule exactly one reconnect after the fixed delay.
    pub fn on_close(&mut self, generation: u64, now: I) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale close ignored");
            return;
        }

        if self.state == LinkState::Disconnected {
            return;
        }

        tracing::info!(
            endpoint = %self.endpoint,
            delay_ms = self.reconnect_delay.as_millis() as u64,
            "link closed, reconnect scheduled"
        );
        self.state = LinkState::ReconnectPending;
        self.closed_at = Some(now);
    }

    /// Socket with the given generation reported an error.
    ///
    /// Logged and nothing else: the transport always follows an errored
    /// socket with a close, and the close is what drives reconnection.
    pub fn on_error(&self, generation: u64, detail: &str) {
        if generation != self.generation {
            return;
        }
        tracing::warn!(endpoint = %self.endpoint, detail, "socket error");
    }

    /// Text frame received on the socket with the given generation.
    ///
    /// Returns the parsed push record, or `None` if the frame is stale or
    /// malformed. A malformed frame is logged and dropped; it never reaches
    /// the reducer and never mutates state.
    pub fn on_message(&self, generation: u64, raw: &str) -> Option<ServerPush> {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale message dropped");
            return None;
        }

        match ServerPush::parse(raw) {
            Ok(push) => Some(push),
            Err(e) => {
                tracing::warn!(error = %e, "malformed push dropped");
                None
            },
        }
    }

    /// Process periodic maintenance.
    ///
    /// Fires the pending reconnect once its deadline has passed. The
    /// deadline is consumed on firing, so one closure yields exactly one
    /// reconnect attempt regardless of tick frequency.
    pub fn tick(&mut self, now: I) -> Vec<LinkAction> {
        if self.state != LinkState::ReconnectPending {
            return vec![];
        }

        let Some(closed_at) = self.closed_at else {
            return vec![];
        };

        if now - closed_at < self.reconnect_delay {
            return vec![];
        }

        tracing::info!(endpoint = %self.endpoint, "reconnecting");
        self.begin_connect()
    }

    fn begin_connect(&mut self) -> Vec<LinkAction> {
        self.generation += 1;
        self.state = LinkState::Connecting;
        self.closed_at = None;

        vec![LinkAction::Open { endpoint: self.endpoint.clone(), generation: self.generation }]
    }
}
