//! Numeric field validation for the command language
//!
//! Every numeric token of a command passes through one of these functions.
//! Only plain ASCII decimal digits are accepted: no sign, no whitespace, no
//! hex. Leading zeros are allowed (`010` is octet 10).

use crate::core::error::ParseError;

/// Returns true if `token` is a non-empty run of ASCII digits.
pub fn is_number(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Validates one IPv4 octet (0-255).
///
/// # Errors
///
/// [`ParseError::InvalidNumber`] for non-digit input,
/// [`ParseError::OctetOutOfRange`] above 255.
pub fn validate_octet(token: &str) -> Result<u8, ParseError> {
    if !is_number(token) {
        return Err(ParseError::InvalidNumber(token.to_string()));
    }
    token
        .parse::<u8>()
        .map_err(|_| ParseError::OctetOutOfRange(token.to_string()))
}

/// Validates a port number (0-65535).
///
/// Port 0 is accepted; the simulator treats ports as plain numbers.
///
/// # Errors
///
/// [`ParseError::InvalidNumber`] for non-digit input,
/// [`ParseError::PortOutOfRange`] above 65535.
pub fn validate_port(token: &str) -> Result<u16, ParseError> {
    if !is_number(token) {
        return Err(ParseError::InvalidNumber(token.to_string()));
    }
    token
        .parse::<u16>()
        .map_err(|_| ParseError::PortOutOfRange(token.to_string()))
}

/// Validates a rule position.
///
/// Range checks against the policy happen in the rule store, so 0 and
/// positions past the end are accepted here.
///
/// # Errors
///
/// [`ParseError::InvalidNumber`] for non-digit input or values that do not
/// fit a `usize`.
pub fn validate_position(token: &str) -> Result<usize, ParseError> {
    if !is_number(token) {
        return Err(ParseError::InvalidNumber(token.to_string()));
    }
    token
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))
}
