//! Packets, match patterns and the packet matcher
//!
//! A [`Packet`] is a concrete transport-layer flow being tested. A
//! [`MatchPattern`] is the condition half of a rule; its ports may be
//! wildcarded with [`PortSpec::Any`].
//!
//! # Matching
//!
//! [`MatchPattern::matches`] compares protocol, both addresses and both ports.
//! A wildcard source port matches every packet. The destination port is always
//! compared against the packet's concrete port, so a wildcard destination port
//! never matches. Existing rule files depend on this.

use std::fmt;
use std::net::Ipv4Addr;

/// Transport protocol of a packet or pattern
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
pub enum Protocol {
    /// Transmission Control Protocol
    #[strum(serialize = "tcp")]
    Tcp,
    /// User Datagram Protocol
    #[strum(serialize = "udp")]
    Udp,
}

/// Port constraint of a match pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortSpec {
    /// Any port (`*`)
    Any,
    /// Exactly this port
    Exact(u16),
}

impl PortSpec {
    /// Returns true if a concrete `port` satisfies this constraint.
    pub const fn admits(self, port: u16) -> bool {
        match self {
            PortSpec::Any => true,
            PortSpec::Exact(p) => p == port,
        }
    }

    /// Strict equality against a concrete port; `Any` never equals a port.
    pub const fn equals(self, port: u16) -> bool {
        match self {
            PortSpec::Any => false,
            PortSpec::Exact(p) => p == port,
        }
    }
}

impl From<u16> for PortSpec {
    fn from(port: u16) -> Self {
        PortSpec::Exact(port)
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Any => f.write_str("*"),
            PortSpec::Exact(port) => write!(f, "{port}"),
        }
    }
}

/// A concrete packet submitted to `test`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packet {
    pub protocol: Protocol,
    pub src_addr: Ipv4Addr,
    pub src_port: u16,
    pub dst_addr: Ipv4Addr,
    pub dst_port: u16,
}

impl Packet {
    pub const fn new(
        protocol: Protocol,
        src_addr: Ipv4Addr,
        src_port: u16,
        dst_addr: Ipv4Addr,
        dst_port: u16,
    ) -> Self {
        Self {
            protocol,
            src_addr,
            src_port,
            dst_addr,
            dst_port,
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} {}:{}",
            self.protocol, self.src_addr, self.src_port, self.dst_addr, self.dst_port
        )
    }
}

/// Condition half of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchPattern {
    pub protocol: Protocol,
    pub src_addr: Ipv4Addr,
    pub src_port: PortSpec,
    pub dst_addr: Ipv4Addr,
    pub dst_port: PortSpec,
}

impl MatchPattern {
    pub const fn new(
        protocol: Protocol,
        src_addr: Ipv4Addr,
        src_port: PortSpec,
        dst_addr: Ipv4Addr,
        dst_port: PortSpec,
    ) -> Self {
        Self {
            protocol,
            src_addr,
            src_port,
            dst_addr,
            dst_port,
        }
    }

    /// Returns true if `packet` satisfies this pattern.
    pub fn matches(&self, packet: &Packet) -> bool {
        self.protocol == packet.protocol
            && self.src_addr == packet.src_addr
            && self.src_port.admits(packet.src_port)
            && self.dst_addr == packet.dst_addr
            && self.dst_port.equals(packet.dst_port)
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} {}:{}",
            self.protocol, self.src_addr, self.src_port, self.dst_addr, self.dst_port
        )
    }
}

/// Free-function form of [`MatchPattern::matches`].
pub fn matches(pattern: &MatchPattern, packet: &Packet) -> bool {
    pattern.matches(packet)
}
