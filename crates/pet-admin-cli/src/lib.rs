//! Pet Admin CLI
//!
//! Wires the core workflow to the HTTP adapters and the route guard:
//! - `serve`: guarded admin HTTP surface
//! - `edit`: one edit session driven by command-line flags
//! - `breeds`: print the flattened breed options

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod edits;
pub mod in_flight;
pub mod logging;
pub mod server;

pub use cli::command;
pub use edits::{read_image, EditsError, FormEdits, LogNavigator};
pub use in_flight::{InFlight, InFlightGuard};
pub use logging::init_tracing;
pub use server::{routes, AppState};
