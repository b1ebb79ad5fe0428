//! Connection supervisor.
//!
//! Drives the [`Link`] lifecycle machine, the socket task, and the
//! [`Panel`] reducer together: lifecycle actions open sockets, socket
//! events feed the link, accepted messages feed the panel, and the panel's
//! rendering actions flow out to the embedding UI over a channel.
//!
//! Teardown is by drop: closing the [`SupervisorHandle`] intent channel
//! ends the loop and aborts the socket task. There is no way to stop the
//! reconnect policy while the supervisor runs; the link is always-on by
//! design.

use std::time::Duration;

use chrono::Local;
use stagelink_core::{Link, LinkAction, env::Environment};
use stagelink_proto::{ClientCommand, rest::HistoryItem};
use tokio::sync::mpsc;

use crate::{
    Panel, PanelAction,
    transport::{self, Socket, SocketEvent},
};

/// How often the link's maintenance tick fires.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Depth of the action and intent channels.
const CHANNEL_CAPACITY: usize = 32;

/// User intents routed into the panel.
///
/// Collaborators perform their own I/O (REST fetches) and hand the results
/// here, so every state mutation still goes through the reducer.
#[derive(Debug, Clone)]
pub enum PanelIntent {
    /// Select the active counterparty.
    SelectUser {
        /// Username to make active.
        username: String,
    },

    /// Replace the roster with a fetched member list.
    LoadRoster {
        /// `(uid, username)` pairs in server order.
        members: Vec<(i64, String)>,
    },

    /// Replace the visible transcript with a fetched history page.
    LoadHistory {
        /// Rows, oldest first.
        items: Vec<HistoryItem>,
    },

    /// Prepend an older history page (pagination).
    ExtendHistory {
        /// Rows, oldest first.
        items: Vec<HistoryItem>,
    },

    /// Flip a reply's adoption flag after a successful adopt/unadopt call.
    SetAdopted {
        /// Message id.
        id: String,
        /// New adoption state.
        adopted: bool,
    },
}

/// Embedding-side handle to a running supervisor.
pub struct SupervisorHandle {
    /// Rendering actions produced by the panel. Must be drained.
    pub actions: mpsc::Receiver<PanelAction>,
    /// User intents. Dropping this sender tears the supervisor down.
    pub intents: mpsc::Sender<PanelIntent>,
}

/// Supervisor owning the link, the socket, and the panel.
pub struct Supervisor<E: Environment> {
    env: E,
    link: Link<E::Instant>,
    panel: Panel,
    socket: Option<Socket>,
    actions_tx: mpsc::Sender<PanelAction>,
    intents_rx: mpsc::Receiver<PanelIntent>,
}

/// What woke the supervisor loop.
enum Wake {
    Tick,
    Socket(Option<SocketEvent>),
    Intent(Option<PanelIntent>),
}

impl<E: Environment> Supervisor<E> {
    /// Create a supervisor for the given socket endpoint.
    pub fn new(env: E, endpoint: impl Into<String>) -> (Self, SupervisorHandle) {
        let (actions_tx, actions_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (intents_tx, intents_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let supervisor = Self {
            env,
            link: Link::new(endpoint),
            panel: Panel::new(),
            socket: None,
            actions_tx,
            intents_rx,
        };
        let handle = SupervisorHandle { actions: actions_rx, intents: intents_tx };

        (supervisor, handle)
    }

    /// The panel this supervisor drives.
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Run until the intent channel closes.
    pub async fn run(mut self) {
        let actions = self.link.connect();
        self.execute_link_actions(actions).await;

        loop {
            let wake = tokio::select! {
                () = self.env.sleep(TICK_INTERVAL) => Wake::Tick,
                event = next_socket_event(&mut self.socket) => Wake::Socket(event),
                intent = self.intents_rx.recv() => Wake::Intent(intent),
            };

            match wake {
                Wake::Tick => {
                    let now = self.env.now();
                    let actions = self.link.tick(now);
                    self.execute_link_actions(actions).await;
                },
                Wake::Socket(event) => self.handle_socket_event(event).await,
                Wake::Intent(Some(intent)) => self.handle_intent(intent).await,
                // Handle dropped: tear down.
                Wake::Intent(None) => break,
            }
        }

        if let Some(socket) = self.socket.take() {
            socket.stop();
        }
    }

    async fn handle_socket_event(&mut self, event: Option<SocketEvent>) {
        let Some(socket) = self.socket.as_ref() else {
            return;
        };
        let generation = socket.generation();

        match event {
            Some(SocketEvent::Opened) => self.link.on_open(generation),
            Some(SocketEvent::Message(text)) => {
                if let Some(push) = self.link.on_message(generation, &text) {
                    let actions = self.panel.apply(push, Local::now());
                    self.dispatch_panel_actions(actions).await;
                }
            },
            Some(SocketEvent::Closed) | None => {
                self.socket = None;
                self.link.on_close(generation, self.env.now());
            },
        }
    }

    async fn handle_intent(&mut self, intent: PanelIntent) {
        let actions = match intent {
            PanelIntent::SelectUser { username } => self.panel.select_user(&username),
            PanelIntent::LoadRoster { members } => self.panel.load_roster(members),
            PanelIntent::LoadHistory { items } => self.panel.load_history(items),
            PanelIntent::ExtendHistory { items } => self.panel.extend_history(items),
            PanelIntent::SetAdopted { id, adopted } => self.panel.set_adopted(&id, adopted),
        };
        self.dispatch_panel_actions(actions).await;
    }

    async fn dispatch_panel_actions(&mut self, actions: Vec<PanelAction>) {
        for action in actions {
            match action {
                PanelAction::SendCommand(command) => self.send_command(&command).await,
                other => {
                    if self.actions_tx.send(other).await.is_err() {
                        tracing::debug!("panel action receiver dropped");
                    }
                },
            }
        }
    }

    async fn send_command(&self, command: &ClientCommand) {
        let Some(socket) = self.socket.as_ref() else {
            tracing::warn!("command dropped, socket not connected");
            return;
        };

        match command.encode() {
            Ok(text) => {
                if socket.commands.send(text).await.is_err() {
                    tracing::warn!("command dropped, socket task gone");
                }
            },
            Err(e) => tracing::warn!(error = %e, "command encode failed"),
        }
    }

    async fn execute_link_actions(&mut self, actions: Vec<LinkAction>) {
        for action in actions {
            match action {
                LinkAction::Open { endpoint, generation } => {
                    // Detach the superseded socket before dialing: aborting
                    // its task drops any residual events on the floor.
                    if let Some(old) = self.socket.take() {
                        old.stop();
                    }

                    match transport::connect(&endpoint, generation).await {
                        Ok(socket) => self.socket = Some(socket),
                        Err(e) => {
                            tracing::warn!(error = %e, endpoint = %endpoint, "dial failed");
                            self.link.on_close(generation, self.env.now());
                        },
                    }
                },
            }
        }
    }
}

/// Next event from the current socket, or pend forever while disconnected.
async fn next_socket_event(socket: &mut Option<Socket>) -> Option<SocketEvent> {
    match socket {
        Some(s) => s.events.recv().await,
        None => std::future::pending().await,
    }
}
