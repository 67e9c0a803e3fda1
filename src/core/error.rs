use thiserror::Error;

/// Core error types for fwsim
///
/// The `Display` text of the engine variants is the message the command loop
/// shows after `Error: `.
#[derive(Debug, Error)]
pub enum Error {
    /// Command text could not be decoded
    #[error("Could not parse command.")]
    Parse(#[from] ParseError),

    /// Insert or delete at a position the policy cannot accept
    #[error("Could not {op} rule.")]
    InvalidPosition { op: PolicyOp, position: usize },

    /// Lookup of a position outside `1..=len`
    #[error("Rule {0} does not exist.")]
    RuleNotFound(usize),

    /// Rule file given at startup could not be opened
    #[error("Could not open file.")]
    OpenRules {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be applied
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Policy mutation that rejected a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PolicyOp {
    #[strum(serialize = "add")]
    Insert,
    #[strum(serialize = "delete")]
    Delete,
}

/// Why a command line was rejected
///
/// Only surfaced in debug logs; users see the generic parse message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("expected {expected}, found end of line")]
    MissingToken { expected: &'static str },

    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error("octet {0} out of range 0-255")]
    OctetOutOfRange(String),

    #[error("port {0} out of range 0-65535")]
    PortOutOfRange(String),

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),

    #[error("line is not valid UTF-8")]
    InvalidEncoding,
}

pub type Result<T> = std::result::Result<T, Error>;
