//! Core connection lifecycle for the Stagelink panel.
//!
//! Pure state machine plus an environment abstraction, following the Sans-IO
//! and action patterns: the [`Link`] consumes lifecycle callbacks and time
//! ticks, and returns [`LinkAction`]s for a driver to execute. No sockets,
//! no clocks, no runtime: the always-on reconnect policy is a testable
//! contract instead of a side effect buried in callbacks.
//!
//! # Components
//!
//! - [`Link`]: connection lifecycle state machine with fixed-delay reconnect
//! - [`env::Environment`]: time abstraction enabling virtual clocks in tests

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
mod link;

pub use link::{Link, LinkAction, LinkState, RECONNECT_DELAY};
