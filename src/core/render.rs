//! Canonical text form of rules and policies
//!
//! Rule lines look like `[3] allow tcp 10.0.0.1:* 10.0.0.2:443`. A policy
//! listing starts with `default <action>` followed by every rule line.
//!
//! [`Policy::write_rule`] writes the `[pos] ` prefix before the position is
//! checked, so a failed lookup leaves `[pos] ` followed by a line break in the
//! stream.

use super::error::Result;
use super::policy::{Policy, Rule, Verdict};
use std::fmt::{self, Write as _};
use std::io;

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.pattern)
    }
}

/// The `[pos] ` prefix that starts every rule line
struct RulePrefix(usize);

impl fmt::Display for RulePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.0)
    }
}

impl Policy {
    /// Renders the rule at `position` as `[pos] <rule>`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::RuleNotFound`] if `position` is outside `1..=len()`.
    pub fn render_rule(&self, position: usize) -> Result<String> {
        let rule = self.get(position)?;
        Ok(format!("{}{rule}", RulePrefix(position)))
    }

    /// Renders `default <action>` followed by every rule line.
    pub fn render_policy(&self) -> String {
        let mut out = format!("default {}\n", self.default_action());
        for line in (1..=self.len()).filter_map(|position| self.render_rule(position).ok()) {
            // Writing into a String cannot fail
            let _ = writeln!(out, "{line}");
        }
        out
    }

    /// Renders the policy as commands that rebuild it when replayed.
    pub fn to_rule_file(&self) -> String {
        let mut out = format!("default {}\n", self.default_action());
        for rule in self.rules() {
            let _ = writeln!(out, "append {rule}");
        }
        out
    }

    /// Human-readable description of a verdict produced by this policy.
    pub fn describe(&self, verdict: &Verdict) -> String {
        let verb = verdict.action.verdict_verb();
        match verdict.position.map(|position| self.render_rule(position)) {
            Some(Ok(line)) => format!("{verb} via {line}"),
            _ => format!("{verb} via default policy."),
        }
    }

    /// Writes the rule line for `position` to `out`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::RuleNotFound`] after writing the `[pos] ` prefix and a
    /// line break, or [`crate::Error::Io`] if the stream fails.
    pub fn write_rule<W: io::Write>(&self, out: &mut W, position: usize) -> Result<()> {
        write!(out, "{}", RulePrefix(position))?;
        match self.get(position) {
            Ok(rule) => {
                writeln!(out, "{rule}")?;
                Ok(())
            }
            Err(err) => {
                writeln!(out)?;
                Err(err)
            }
        }
    }

    /// Writes [`Policy::render_policy`] output to `out`.
    pub fn write_policy<W: io::Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(self.render_policy().as_bytes())?;
        Ok(())
    }
}
