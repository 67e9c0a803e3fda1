//! fwsim - Firewall policy simulator
//!
//! Reads commands from an optional rule file, then from an interactive
//! prompt, and applies them to a single in-memory policy.
//!
//! # Usage
//!
//! ```bash
//! fwsim                          # Interactive prompt
//! fwsim -r rules.txt             # Load a rule file first, then prompt
//! fwsim -r rules.txt --export out.txt  # Save the final policy on exit
//! ```

use clap::Parser;
use fwsim::command::Flow;
use fwsim::{Error, Policy, config, session, utils};
use shadow_rs::shadow;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

shadow!(build);

#[derive(Parser)]
#[command(name = "fwsim")]
#[command(about = "Firewall policy simulator - ordered allow/deny rules, first match wins", long_about = None)]
#[command(version = build::PKG_VERSION, long_version = build::CLAP_LONG_VERSION)]
struct Cli {
    /// Rule file to process before the interactive prompt
    #[arg(short, long, value_name = "RULE_FILE")]
    rules: Option<PathBuf>,

    /// Configuration file (default: config.json in the data directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the final policy as a rule file on exit
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Log debug output (overrides the configured level)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref());
    init_logging(&config, cli.verbose);

    let mut policy = Policy::with_default(config.default_action);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(path) = &cli.rules {
        match session::load_rules(&mut policy, path, &mut out) {
            Ok(Flow::Quit) => return finish(&policy, cli.export.as_deref(), &mut out),
            Ok(Flow::Continue) => {}
            Err(e @ Error::OpenRules { .. }) => {
                tracing::error!("Failed to open {}: {e:?}", path.display());
                let _ = writeln!(out, "{e}");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                tracing::error!("Stopped reading {}: {e}", path.display());
                let _ = writeln!(out, "Error: {e}");
            }
        }
    }

    let stdin = io::stdin();
    if let Err(e) = session::run_interactive(&mut policy, stdin.lock(), &mut out, &config.prompt) {
        tracing::error!("Command loop stopped: {e}");
        return ExitCode::FAILURE;
    }

    finish(&policy, cli.export.as_deref(), &mut out)
}

fn finish(
    policy: &Policy,
    export: Option<&std::path::Path>,
    out: &mut impl Write,
) -> ExitCode {
    let _ = out.flush();
    if let Some(path) = export
        && let Err(e) = session::export_policy(policy, path)
    {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Installs the global `tracing` subscriber.
///
/// Logs go to `fwsim.log` in the state directory when enabled and available,
/// otherwise to stderr. Stdout is reserved for command output.
fn init_logging(config: &config::AppConfig, verbose: bool) {
    let (level, level_error) = config.effective_level(verbose);
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    if config.log_to_file
        && let Ok(Some(mut log_path)) = utils::ensure_state_dir()
    {
        log_path.push("fwsim.log");
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            builder.with_ansi(false).with_writer(std::sync::Mutex::new(file)).init();
            warn_level_fallback(level_error.as_ref());
            return;
        }
    }
    builder.with_writer(io::stderr).init();
    warn_level_fallback(level_error.as_ref());
}

fn warn_level_fallback(error: Option<&Error>) {
    if let Some(e) = error {
        eprintln!("Warning: {e}; logging at warn level");
        tracing::warn!("{e}; logging at warn level");
    }
}
