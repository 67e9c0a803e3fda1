//! Decoded commands and their execution against a policy
//!
//! A [`Command`] is the structured form of one line of the command language
//! (see [`crate::grammar`] for the text form). [`execute`] applies it to a
//! [`Policy`] and writes the textual response the user sees.
//!
//! # Example
//!
//! ```
//! use fwsim::command::{execute, Command, Flow};
//! use fwsim::core::policy::{Action, Policy};
//!
//! let mut policy = Policy::new();
//! let mut out = Vec::new();
//!
//! let flow = execute(&mut policy, Command::Default(Action::Allow), &mut out).unwrap();
//! assert_eq!(flow, Flow::Continue);
//! assert_eq!(policy.default_action(), Action::Allow);
//! ```

use crate::core::error::Result;
use crate::core::packet::Packet;
use crate::core::policy::{Action, Policy, Rule};
use std::io::Write;

/// Grammar listing printed by `help`
pub const HELP_TEXT: &str = "\
Firewall Command Language:

default (allow|deny)
insert <pos> (allow|deny) (tcp|udp) <src_ip>:(*|<src_port>) <dst_ip>:(*|<dst_port>)
append (allow|deny) (tcp|udp) <src_ip>:(*|<src_port>) <dst_ip>:(*|<dst_port>)
delete <pos>
test (tcp|udp) <src_ip>:<src_port> <dst_ip>:<dst_port>
print (all|<pos>)
help
quit
";

/// What `print` should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintTarget {
    All,
    Position(usize),
}

/// One decoded line of the command language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Default(Action),
    Insert { position: usize, rule: Rule },
    Append(Rule),
    Delete(usize),
    Test(Packet),
    Print(PrintTarget),
    Quit,
}

/// Whether the host loop should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies `command` to `policy`, writing its response to `out`.
///
/// # Errors
///
/// Rule store errors ([`crate::Error::InvalidPosition`],
/// [`crate::Error::RuleNotFound`]) leave the policy unchanged and are returned
/// for the caller to report. `print <pos>` writes the `[pos] ` prefix before
/// failing. Stream failures surface as [`crate::Error::Io`].
pub fn execute<W: Write>(policy: &mut Policy, command: Command, out: &mut W) -> Result<Flow> {
    match command {
        Command::Help => out.write_all(HELP_TEXT.as_bytes())?,
        Command::Default(action) => policy.set_default(action),
        Command::Insert { position, rule } => {
            policy.insert(rule, position)?;
        }
        Command::Append(rule) => {
            policy.append(rule);
        }
        Command::Delete(position) => {
            policy.delete(position)?;
        }
        Command::Test(packet) => {
            let verdict = policy.test(&packet);
            writeln!(out, "{}", policy.describe(&verdict))?;
        }
        Command::Print(PrintTarget::All) => policy.write_policy(out)?,
        Command::Print(PrintTarget::Position(position)) => policy.write_rule(out, position)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
