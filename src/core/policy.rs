//! Rule store and first-match-wins resolution
//!
//! A [`Policy`] is a default [`Action`] plus an ordered list of [`Rule`]s.
//! Positions are 1-indexed at the API boundary and always dense: after any
//! successful mutation the rules occupy positions `1..=len()`.
//!
//! # Example
//!
//! ```
//! use fwsim::core::packet::{MatchPattern, Packet, PortSpec, Protocol};
//! use fwsim::core::policy::{Action, Policy, Rule};
//! use std::net::Ipv4Addr;
//!
//! let mut policy = Policy::new();
//! policy.append(Rule::new(
//!     Action::Allow,
//!     MatchPattern::new(
//!         Protocol::Tcp,
//!         Ipv4Addr::new(10, 0, 0, 1),
//!         PortSpec::Any,
//!         Ipv4Addr::new(10, 0, 0, 2),
//!         PortSpec::Exact(443),
//!     ),
//! ));
//!
//! let packet = Packet::new(
//!     Protocol::Tcp,
//!     Ipv4Addr::new(10, 0, 0, 1),
//!     9999,
//!     Ipv4Addr::new(10, 0, 0, 2),
//!     443,
//! );
//! let verdict = policy.test(&packet);
//! assert_eq!(verdict.action, Action::Allow);
//! assert_eq!(verdict.position, Some(1));
//! ```

use super::error::{Error, PolicyOp, Result};
use super::packet::{MatchPattern, Packet};
use serde::{Deserialize, Serialize};

/// What happens to a packet matched by a rule or by the default policy
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Let the packet through
    #[strum(serialize = "allow")]
    Allow,
    /// Drop the packet
    #[default]
    #[strum(serialize = "deny")]
    Deny,
}

impl Action {
    /// Past-tense verb used when reporting a verdict
    pub const fn verdict_verb(self) -> &'static str {
        match self {
            Action::Allow => "Allowed",
            Action::Deny => "Denied",
        }
    }
}

/// An action paired with a match pattern
///
/// Rules are never edited in place; the policy replaces or shifts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule {
    pub action: Action,
    pub pattern: MatchPattern,
}

impl Rule {
    pub const fn new(action: Action, pattern: MatchPattern) -> Self {
        Self { action, pattern }
    }

    pub fn matches(&self, packet: &Packet) -> bool {
        self.pattern.matches(packet)
    }
}

/// Outcome of [`Policy::test`]
///
/// `position` is `Some` when a rule matched and `None` when the default
/// action applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub action: Action,
    pub position: Option<usize>,
}

impl Verdict {
    pub const fn is_default(&self) -> bool {
        self.position.is_none()
    }
}

/// Ordered rule list with a default action
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Policy {
    default_action: Action,
    rules: Vec<Rule>,
}

impl Policy {
    /// Empty policy denying by default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty policy with the given default action.
    pub fn with_default(default_action: Action) -> Self {
        Self {
            default_action,
            rules: Vec::new(),
        }
    }

    pub fn default_action(&self) -> Action {
        self.default_action
    }

    pub fn set_default(&mut self, action: Action) {
        tracing::debug!("Default policy set to {action}");
        self.default_action = action;
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in position order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Iterates `(position, rule)` pairs starting at position 1.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Rule)> {
        self.rules.iter().enumerate().map(|(i, rule)| (i + 1, rule))
    }

    /// Appends `rule`; it takes position `len() + 1`.
    pub fn append(&mut self, rule: Rule) -> usize {
        self.rules.push(rule);
        let position = self.rules.len();
        tracing::debug!("Appended rule at position {position}");
        position
    }

    /// Inserts `rule` at `position`, shifting later rules down by one.
    ///
    /// Positions past the end append. Returns the position the rule landed at.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if `position` is 0.
    pub fn insert(&mut self, rule: Rule, position: usize) -> Result<usize> {
        if position == 0 {
            return Err(Error::InvalidPosition {
                op: PolicyOp::Insert,
                position,
            });
        }
        if position > self.rules.len() {
            return Ok(self.append(rule));
        }
        self.rules.insert(position - 1, rule);
        tracing::debug!("Inserted rule at position {position}");
        Ok(position)
    }

    /// Removes and returns the rule at `position`; later rules shift up.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if `position` is outside `1..=len()`.
    pub fn delete(&mut self, position: usize) -> Result<Rule> {
        if !self.contains_position(position) {
            return Err(Error::InvalidPosition {
                op: PolicyOp::Delete,
                position,
            });
        }
        let removed = self.rules.remove(position - 1);
        tracing::debug!("Deleted rule at position {position}");
        Ok(removed)
    }

    /// Returns the rule at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::RuleNotFound`] if `position` is outside `1..=len()`.
    pub fn get(&self, position: usize) -> Result<&Rule> {
        position
            .checked_sub(1)
            .and_then(|index| self.rules.get(index))
            .ok_or(Error::RuleNotFound(position))
    }

    /// Resolves `packet`: the lowest-numbered matching rule decides,
    /// otherwise the default action applies.
    pub fn test(&self, packet: &Packet) -> Verdict {
        let verdict = self
            .iter()
            .find(|(_, rule)| rule.matches(packet))
            .map_or(
                Verdict {
                    action: self.default_action,
                    position: None,
                },
                |(position, rule)| Verdict {
                    action: rule.action,
                    position: Some(position),
                },
            );
        tracing::debug!(
            "Tested {packet}: {} (rule {:?})",
            verdict.action,
            verdict.position
        );
        verdict
    }

    fn contains_position(&self, position: usize) -> bool {
        (1..=self.rules.len()).contains(&position)
    }
}
