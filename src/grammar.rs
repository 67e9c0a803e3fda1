//! Text form of the command language
//!
//! A line is split on whitespace into words. The first word names the
//! command; every following word is one field, decoded by a small `nom`
//! parser that must consume the whole word.
//!
//! ```text
//! default (allow|deny)
//! insert <pos> (allow|deny) (tcp|udp) <ip>:(*|<port>) <ip>:(*|<port>)
//! append (allow|deny) (tcp|udp) <ip>:(*|<port>) <ip>:(*|<port>)
//! delete <pos>
//! test (tcp|udp) <ip>:<port> <ip>:<port>
//! print (all|<pos>)
//! help
//! quit
//! ```
//!
//! Keywords are lowercase. A line with any malformed, out of range or extra
//! word is rejected as a whole.

use crate::command::{Command, PrintTarget};
use crate::core::error::ParseError;
use crate::core::packet::{MatchPattern, Packet, PortSpec, Protocol};
use crate::core::policy::{Action, Rule};
use crate::validators::{validate_octet, validate_port, validate_position};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, value},
    error::{ErrorKind, FromExternalError},
    sequence::{separated_pair, tuple},
    IResult,
};
use std::net::Ipv4Addr;
use std::str::{FromStr, SplitWhitespace};

/// Failure of a field parser.
///
/// `reason` is set when a number was well formed but out of range; otherwise
/// the word simply did not have the expected shape.
#[derive(Debug)]
pub struct FieldError {
    reason: Option<ParseError>,
}

impl<'a> nom::error::ParseError<&'a str> for FieldError {
    fn from_error_kind(_input: &'a str, _kind: ErrorKind) -> Self {
        FieldError { reason: None }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn or(self, other: Self) -> Self {
        if self.reason.is_some() { self } else { other }
    }
}

impl<'a> FromExternalError<&'a str, ParseError> for FieldError {
    fn from_external_error(_input: &'a str, _kind: ErrorKind, e: ParseError) -> Self {
        FieldError { reason: Some(e) }
    }
}

pub type FieldResult<'a, O> = IResult<&'a str, O, FieldError>;

/// r"[0-9]+" as a rule position
pub fn parse_position(input: &str) -> FieldResult<'_, usize> {
    map_res(digit1, validate_position)(input)
}

/// r"[0-9]+" as a port, 0-65535
pub fn parse_port(input: &str) -> FieldResult<'_, u16> {
    map_res(digit1, validate_port)(input)
}

/// r"\*|[0-9]+"
pub fn parse_port_spec(input: &str) -> FieldResult<'_, PortSpec> {
    alt((value(PortSpec::Any, char('*')), map(parse_port, PortSpec::Exact)))(input)
}

/// r"[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+", each octet 0-255
pub fn parse_ipv4_dotted(input: &str) -> FieldResult<'_, Ipv4Addr> {
    fn parse_octet(input: &str) -> FieldResult<'_, u8> {
        map_res(digit1, validate_octet)(input)
    }

    let (rest, (o1, _, o2, _, o3, _, o4)) = tuple((
        parse_octet,
        char('.'),
        parse_octet,
        char('.'),
        parse_octet,
        char('.'),
        parse_octet,
    ))(input)?;
    Ok((rest, Ipv4Addr::new(o1, o2, o3, o4)))
}

/// `<ip>:(*|<port>)` as written in a rule
pub fn parse_rule_endpoint(input: &str) -> FieldResult<'_, (Ipv4Addr, PortSpec)> {
    separated_pair(parse_ipv4_dotted, char(':'), parse_port_spec)(input)
}

/// `<ip>:<port>` as written in a test packet
pub fn parse_packet_endpoint(input: &str) -> FieldResult<'_, (Ipv4Addr, u16)> {
    separated_pair(parse_ipv4_dotted, char(':'), parse_port)(input)
}

/// `all` or a rule position
pub fn parse_print_target(input: &str) -> FieldResult<'_, PrintTarget> {
    alt((
        value(PrintTarget::All, tag("all")),
        map(parse_position, PrintTarget::Position),
    ))(input)
}

/// Decodes one line of the command language.
///
/// # Errors
///
/// A [`ParseError`] describing the first problem found.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let mut words = Words {
        inner: line.split_whitespace(),
    };
    let keyword = words.inner.next().ok_or(ParseError::Empty)?;

    let command = match keyword {
        "help" => Command::Help,
        "quit" => Command::Quit,
        "default" => Command::Default(words.keyword("allow or deny")?),
        "insert" => {
            let position = words.field("position", parse_position)?;
            let rule = words.rule()?;
            Command::Insert { position, rule }
        }
        "append" => Command::Append(words.rule()?),
        "delete" => Command::Delete(words.field("position", parse_position)?),
        "test" => Command::Test(words.packet()?),
        "print" => Command::Print(words.field("all or a position", parse_print_target)?),
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    words.finish()?;
    Ok(command)
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_command(s)
    }
}

struct Words<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Words<'a> {
    /// `(allow|deny) (tcp|udp) <ip>:(*|<port>) <ip>:(*|<port>)`
    fn rule(&mut self) -> Result<Rule, ParseError> {
        let action: Action = self.keyword("allow or deny")?;
        let protocol: Protocol = self.keyword("tcp or udp")?;
        let (src_addr, src_port) = self.field("source <ip>:<port>", parse_rule_endpoint)?;
        let (dst_addr, dst_port) = self.field("destination <ip>:<port>", parse_rule_endpoint)?;
        Ok(Rule::new(
            action,
            MatchPattern::new(protocol, src_addr, src_port, dst_addr, dst_port),
        ))
    }

    /// `(tcp|udp) <ip>:<port> <ip>:<port>`
    fn packet(&mut self) -> Result<Packet, ParseError> {
        let protocol: Protocol = self.keyword("tcp or udp")?;
        let (src_addr, src_port) = self.field("source <ip>:<port>", parse_packet_endpoint)?;
        let (dst_addr, dst_port) = self.field("destination <ip>:<port>", parse_packet_endpoint)?;
        Ok(Packet::new(protocol, src_addr, src_port, dst_addr, dst_port))
    }

    /// A word parsed through `T`'s `FromStr` (strum keyword enums).
    fn keyword<T: FromStr>(&mut self, expected: &'static str) -> Result<T, ParseError> {
        let word = self.next(expected)?;
        word.parse().map_err(|_| ParseError::UnexpectedToken {
            expected,
            found: word.to_string(),
        })
    }

    /// Runs `parser` over the next word, which it must consume entirely.
    fn field<O, P>(&mut self, expected: &'static str, parser: P) -> Result<O, ParseError>
    where
        P: FnMut(&'a str) -> FieldResult<'a, O>,
    {
        let word = self.next(expected)?;
        let unexpected = || ParseError::UnexpectedToken {
            expected,
            found: word.to_string(),
        };
        match all_consuming(parser)(word) {
            Ok((_, out)) => Ok(out),
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(e.reason.unwrap_or_else(unexpected)),
            Err(nom::Err::Incomplete(_)) => Err(unexpected()),
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        self.inner.next().ok_or(ParseError::MissingToken { expected })
    }

    fn finish(mut self) -> Result<(), ParseError> {
        match self.inner.next() {
            None => Ok(()),
            Some(extra) => Err(ParseError::TrailingInput(extra.to_string())),
        }
    }
}
