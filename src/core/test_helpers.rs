//! Shared test utilities for core module tests
//!
//! Provides common test helpers to avoid duplication across test suites.
//! This module is only compiled in test mode.

use crate::core::packet::{MatchPattern, Packet, PortSpec, Protocol};
use crate::core::policy::{Action, Policy, Rule};
use std::net::Ipv4Addr;

fn addr(text: &str) -> Ipv4Addr {
    text.parse().expect("test address must be valid IPv4")
}

/// Creates a TCP rule. `src_port: None` is the `*` wildcard.
pub fn rule(action: Action, src: &str, src_port: Option<u16>, dst: &str, dst_port: u16) -> Rule {
    rule_with(Protocol::Tcp, action, src, src_port, dst, dst_port)
}

/// Creates a rule for any protocol.
pub fn rule_with(
    protocol: Protocol,
    action: Action,
    src: &str,
    src_port: Option<u16>,
    dst: &str,
    dst_port: u16,
) -> Rule {
    Rule::new(
        action,
        MatchPattern::new(
            protocol,
            addr(src),
            src_port.map_or(PortSpec::Any, PortSpec::Exact),
            addr(dst),
            PortSpec::Exact(dst_port),
        ),
    )
}

/// Creates a concrete TCP packet.
pub fn tcp_packet(src: &str, src_port: u16, dst: &str, dst_port: u16) -> Packet {
    Packet::new(Protocol::Tcp, addr(src), src_port, addr(dst), dst_port)
}

/// Two-rule policy used by rendering tests:
///
/// ```text
/// default deny
/// [1] deny tcp 1.1.1.1:* 2.2.2.2:80
/// [2] allow udp 10.0.0.1:53 10.0.0.2:53
/// ```
pub fn sample_policy() -> Policy {
    let mut policy = Policy::new();
    policy.append(rule(Action::Deny, "1.1.1.1", None, "2.2.2.2", 80));
    policy.append(rule_with(
        Protocol::Udp,
        Action::Allow,
        "10.0.0.1",
        Some(53),
        "10.0.0.2",
        53,
    ));
    policy
}
