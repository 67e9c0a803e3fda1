//! Command loops around a policy
//!
//! The interactive prompt and the batch rule-file loader share
//! [`process_line`]: parse, execute, report. Rejected lines print an
//! `Error: ...` message and processing moves on; only stream failures stop a
//! loop early, and `quit` ends it normally. Lines are read as raw bytes, so a
//! line that is not UTF-8 is rejected like any other malformed command.

use crate::command::{self, Flow};
use crate::core::error::{Error, ParseError, Result};
use crate::core::policy::Policy;
use crate::grammar::parse_command;
use crate::utils::write_atomic;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Runs one line of the command language against `policy`.
///
/// Blank lines and `#` comments are ignored.
///
/// # Errors
///
/// Only [`Error::Io`] from writing to `out`; command errors are reported on
/// `out` and swallowed.
pub fn process_line<W: Write>(policy: &mut Policy, line: &str, out: &mut W) -> Result<Flow> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Flow::Continue);
    }

    let command = match parse_command(line) {
        Ok(command) => command,
        Err(reason) => {
            tracing::warn!("Rejected command '{line}': {reason}");
            report(out, &Error::Parse(reason))?;
            return Ok(Flow::Continue);
        }
    };

    match command::execute(policy, command, out) {
        Ok(flow) => Ok(flow),
        Err(Error::Io(e)) => Err(Error::Io(e)),
        Err(e) => {
            tracing::warn!("Command '{line}' failed: {e}");
            report(out, &e)?;
            Ok(Flow::Continue)
        }
    }
}

/// [`process_line`] for a line read as bytes, without its line break.
///
/// # Errors
///
/// Only [`Error::Io`] from writing to `out`.
pub fn process_bytes<W: Write>(policy: &mut Policy, raw: &[u8], out: &mut W) -> Result<Flow> {
    match std::str::from_utf8(raw) {
        Ok(line) => process_line(policy, line, out),
        Err(_) if raw.trim_ascii_start().starts_with(b"#") => Ok(Flow::Continue),
        Err(e) => {
            tracing::warn!("Rejected line that is not UTF-8: {e}");
            report(out, &Error::Parse(ParseError::InvalidEncoding))?;
            Ok(Flow::Continue)
        }
    }
}

fn report<W: Write>(out: &mut W, error: &Error) -> Result<()> {
    writeln!(out, "Error: {error}")?;
    Ok(())
}

/// Processes commands from `reader` until end of input or `quit`.
///
/// # Errors
///
/// [`Error::Io`] if reading or writing fails.
pub fn run_batch<R: BufRead, W: Write>(
    policy: &mut Policy,
    reader: R,
    out: &mut W,
) -> Result<Flow> {
    for line in reader.split(b'\n') {
        if process_bytes(policy, &line?, out)? == Flow::Quit {
            return Ok(Flow::Quit);
        }
    }
    Ok(Flow::Continue)
}

/// Opens a rule file and runs it as a batch.
///
/// # Errors
///
/// [`Error::OpenRules`] if the file cannot be opened (nothing has run yet),
/// [`Error::Io`] if reading fails part way through.
pub fn load_rules<W: Write>(policy: &mut Policy, path: &Path, out: &mut W) -> Result<Flow> {
    let file = open_rules(path).map_err(|source| Error::OpenRules {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Loading rules from {}", path.display());
    let flow = run_batch(policy, BufReader::new(file), out)?;
    tracing::info!("Loaded {} rules from {}", policy.len(), path.display());
    Ok(flow)
}

fn open_rules(path: &Path) -> std::io::Result<File> {
    let file = File::open(path)?;
    if file.metadata()?.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::IsADirectory,
            format!("{} is a directory", path.display()),
        ));
    }
    Ok(file)
}

/// Prompts on `out` and processes lines from `input` until end of input or
/// `quit`.
///
/// # Errors
///
/// [`Error::Io`] if reading or writing fails.
pub fn run_interactive<R: BufRead, W: Write>(
    policy: &mut Policy,
    mut input: R,
    out: &mut W,
    prompt: &str,
) -> Result<Flow> {
    let mut line = Vec::new();
    loop {
        write!(out, "{prompt}")?;
        out.flush()?;

        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(Flow::Continue);
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if process_bytes(policy, &line, out)? == Flow::Quit {
            return Ok(Flow::Quit);
        }
    }
}

/// Writes the policy as a replayable rule file at `path`.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be written.
pub fn export_policy(policy: &Policy, path: &Path) -> Result<()> {
    write_atomic(path, policy.to_rule_file().as_bytes())?;
    tracing::info!("Exported {} rules to {}", policy.len(), path.display());
    Ok(())
}
