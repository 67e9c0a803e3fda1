//! Firewall policy engine
//!
//! This module contains the core types and logic of the simulator:
//!
//! - [`packet`]: Packets, match patterns and the packet matcher
//! - [`policy`]: The ordered rule store and first-match-wins resolution
//! - [`render`]: Canonical text form of rules and policies
//! - [`error`]: Error types for engine and command operations

pub mod error;
pub mod packet;
pub mod policy;
pub mod render;

#[cfg(test)]
pub mod test_helpers;
