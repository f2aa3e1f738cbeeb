//! Nom-based IRC line parser.
//!
//! Produces borrowed slices into the input; [`super::parse`] turns them into
//! an owned [`super::Message`].

use nom::{
    IResult,
    bytes::complete::{take_while_m_n, take_while1},
    character::complete::char,
    combinator::opt,
    error::ErrorKind,
    sequence::{preceded, terminated},
};

/// RFC 2812 allows 14 middle parameters before the rest of the line becomes
/// the trailing parameter, colon or not.
pub(crate) const MAX_MIDDLE_PARAMS: usize = 14;

/// Parse message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    terminated(
        preceded(char(':'), take_while1(|c| c != ' ')),
        take_while1(|c| c == ' '),
    )(input)
}

/// Parse the command name (1*letter or 3digit).
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let (_, digits) = opt(take_while_m_n(3, 3, |c: char| c.is_ascii_digit()))(cmd)?;
    let is_three_digits = digits.is_some_and(|d| d.len() == cmd.len());

    if is_all_letters || is_three_digits {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Parse parameters from the remaining input after the command.
///
/// Multiple consecutive spaces act as one separator. A parameter starting
/// with `:` opens the trailing parameter, as does anything left once the
/// middle parameter limit is reached.
fn parse_params(input: &str) -> IResult<&str, (Vec<&str>, Option<&str>)> {
    let mut middle = Vec::new();
    let mut rest = input;

    while rest.starts_with(' ') {
        rest = rest.trim_start_matches(' ');

        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            return Ok(("", (middle, Some(trailing))));
        }

        if middle.len() == MAX_MIDDLE_PARAMS {
            return Ok(("", (middle, Some(rest))));
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        middle.push(&rest[..end]);
        rest = &rest[end..];
    }

    Ok((rest, (middle, None)))
}

/// Parse a complete IRC line (terminator already removed).
///
/// ```text
/// [:prefix] <command> [middle...] [:trailing]
/// ```
pub(crate) fn parse_message(input: &str) -> IResult<&str, RawMessage<'_>> {
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, command) = parse_command(input)?;
    let (rest, (middle, trailing)) = parse_params(input)?;

    Ok((
        rest,
        RawMessage {
            prefix,
            command,
            middle,
            trailing,
        },
    ))
}

/// A parsed IRC line with borrowed string slices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawMessage<'a> {
    /// Raw prefix string (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command word or numeric, as written.
    pub command: &'a str,
    /// Middle parameters.
    pub middle: Vec<&'a str>,
    /// Trailing parameter (without the leading `:`), if present.
    pub trailing: Option<&'a str>,
}

impl<'a> RawMessage<'a> {
    /// Parse a line, reporting the byte position of the first failure.
    pub fn parse(input: &'a str) -> Result<Self, (usize, ErrorKind)> {
        match parse_message(input) {
            Ok(("", msg)) => Ok(msg),
            Ok((rest, _)) => Err((input.len() - rest.len(), ErrorKind::Eof)),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                Err((input.len() - e.input.len(), e.code))
            }
            Err(nom::Err::Incomplete(_)) => Err((input.len(), ErrorKind::Eof)),
        }
    }
}
