//! Panel state machine and incoming-event reducer.
//!
//! The panel is the client-side view of a digital-human streaming backend:
//! a chat transcript assembled from streamed reply fragments, a roster of
//! known counterparties, and a handful of presence and run-state flags.
//!
//! # Architecture
//!
//! The crate follows the same Sans-IO and action patterns as
//! [`stagelink_core`]: [`Panel`] consumes parsed push records and user
//! intents, mutates its observable [`PanelState`], and returns
//! [`PanelAction`]s for the embedding UI to execute. Nothing in the reducer
//! touches a socket or a clock, which is what makes the streaming-merge
//! rules unit-testable.
//!
//! # Components
//!
//! - [`Panel`]: the reducer over [`PanelState`]
//! - [`PanelAction`]: rendering and I/O instructions produced by the reducer
//! - [`PanelState`]: the externally observed store collaborators render from
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`supervisor::Supervisor`]: drives the link, socket, and panel together
//! - [`transport`]: the WebSocket socket task
//! - [`api::PanelApi`]: the REST client collaborators issue requests through

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod panel;
mod state;

#[cfg(feature = "transport")]
pub mod api;
#[cfg(feature = "transport")]
pub mod supervisor;
#[cfg(feature = "transport")]
mod system_env;
#[cfg(feature = "transport")]
pub mod transport;

pub use action::PanelAction;
pub use panel::Panel;
pub use stagelink_core::env::Environment;
pub use stagelink_proto::{ClientCommand, ReplyFragment, RunState, ServerPush};
pub use state::{PanelState, RosterEntry, SelectOption, TranscriptEntry};
#[cfg(feature = "transport")]
pub use system_env::SystemEnv;
