//! Wire schema for the Stagelink panel protocol.
//!
//! The backend speaks JSON on both channels: a persistent WebSocket that
//! pushes partial state updates to the panel, and a small REST surface the
//! panel calls for configuration, history, and run control. Every type here
//! is a boundary type: raw text comes in, validated structs go out, and
//! anything malformed is rejected before it can touch client state.
//!
//! # Components
//!
//! - [`ServerPush`]: the optional-field push record; absent fields mean
//!   "leave that part of the state alone"
//! - [`ReplyFragment`]: one streamed chunk of a reply, merged by `(id, kind)`
//! - [`ClientCommand`]: commands the panel writes back on the socket
//! - [`rest`]: payload types for the REST endpoints
//! - [`markers`]: embedded reasoning-section marker scanning
//!
//! # Normalization
//!
//! Backend variants disagree on small things: reply ids arrive as JSON
//! numbers or strings, adoption flags as booleans or integers. Both are
//! normalized here so the rest of the client only ever sees `String` ids and
//! `bool` flags.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod de;
mod error;
pub mod markers;
mod push;
pub mod rest;

pub use command::ClientCommand;
pub use error::ProtocolError;
pub use push::{ReplyFragment, RunState, ServerPush, VoiceInfo};
