//! fwsim - Firewall policy simulator
//!
//! An ordered list of allow/deny rules over IPv4 TCP/UDP flows with a default
//! action. Packets are resolved first-match-wins.
//!
//! # Architecture
//!
//! - [`core`] - Policy engine: packet matcher, rule store, resolution, rendering
//! - [`grammar`] - Lexer and parser for the command language
//! - [`command`] - Decoded commands and their execution
//! - [`session`] - Interactive prompt and batch rule-file loops
//! - [`validators`] - Numeric field validation
//! - [`config`] - Configuration persistence
//! - [`utils`] - Utility functions (XDG directories, atomic writes)

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]

pub mod command;
pub mod config;
pub mod core;
pub mod grammar;
pub mod session;
pub mod utils;
pub mod validators;

// Re-export commonly used types
pub use core::error::{Error, Result};
pub use core::packet::{MatchPattern, Packet, PortSpec, Protocol};
pub use core::policy::{Action, Policy, Rule, Verdict};
