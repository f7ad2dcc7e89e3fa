//! Command parser using nom
//!
//! Parses PyMOL-style command strings into [`ParsedCommand`] values.
//!
//! # Supported Syntax
//!
//! - Bare commands: `colorama`
//! - Positional arguments: `color_grad prot, resi, hist`
//! - Named arguments: `color_grad prot, gradient=bwr, nbins=20`
//! - Quoted strings: `color_grad "prot and chain A"`
//! - Selections containing commas inside parentheses: `color_grad (resi 1,2,3)`
//! - Several commands: `colorama; color_grad prot`

use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, opt, recognize},
    error::ErrorKind,
    multi::separated_list1,
    sequence::{delimited, pair, preceded, separated_pair, tuple},
    IResult,
};

use crate::args::{ArgValue, ParsedCommand};
use crate::error::ParseError;

/// Parse a single command from a string
///
/// # Example
/// ```
/// use pymol_colorama::parse_command;
///
/// let cmd = parse_command("color_grad prot, gradient=bwr").unwrap();
/// assert_eq!(cmd.name, "color_grad");
/// assert_eq!(cmd.positional(0).and_then(|v| v.as_text()), Some("prot".to_string()));
/// ```
pub fn parse_command(input: &str) -> Result<ParsedCommand, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::EmptyCommand);
    }
    check_balance(input)?;

    let cmd = match command(input) {
        Ok(("", cmd)) => cmd,
        Ok((remaining, _)) => {
            return Err(ParseError::Generic(format!(
                "unexpected trailing input: '{}'",
                remaining
            )))
        }
        Err(e) => return Err(e.into()),
    };

    let mut seen: Vec<&str> = Vec::new();
    for name in cmd.args.iter().filter_map(|(name, _)| name.as_deref()) {
        if seen.contains(&name) {
            return Err(ParseError::DuplicateArgument(name.to_string()));
        }
        seen.push(name);
    }
    Ok(cmd)
}

/// Parse commands separated by semicolons or newlines, skipping `#` comments
pub fn parse_commands(input: &str) -> Result<Vec<ParsedCommand>, ParseError> {
    let mut commands = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let end = top_level_end(rest, |c| c == ';' || c == '\n');
        let chunk = rest[..end].trim();
        rest = rest.get(end + 1..).unwrap_or("");

        if chunk.is_empty() || chunk.starts_with('#') {
            continue;
        }
        commands.push(parse_command(chunk)?);
    }

    Ok(commands)
}

/// Byte offset of the first `stop` character outside quotes and brackets
fn top_level_end(input: &str, stop: impl Fn(char) -> bool) -> usize {
    let mut depth: usize = 0;
    let mut quote: Option<char> = None;

    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                c if depth == 0 && stop(c) => return i,
                _ => {}
            },
        }
    }

    input.len()
}

/// Reject unterminated quotes and unbalanced parentheses up front
fn check_balance(input: &str) -> Result<(), ParseError> {
    let mut depth: i32 = 0;
    let mut quote: Option<(char, usize)> = None;

    for (i, c) in input.char_indices() {
        match quote {
            Some((q, _)) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some((c, i)),
                '(' | '[' => depth += 1,
                ')' | ']' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(ParseError::UnbalancedParens);
                    }
                }
                _ => {}
            },
        }
    }

    if let Some((_, start)) = quote {
        return Err(ParseError::UnterminatedString(start));
    }
    if depth != 0 {
        return Err(ParseError::UnbalancedParens);
    }
    Ok(())
}

/// Command name and optional argument list
fn command(input: &str) -> IResult<&str, ParsedCommand> {
    let (input, name) = identifier(input)?;
    let (input, args) = opt(preceded(multispace1, arguments))(input)?;
    let (input, _) = multispace0(input)?;

    Ok((
        input,
        ParsedCommand {
            name: name.to_string(),
            args: args.unwrap_or_default(),
        },
    ))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

/// Comma-separated arguments
fn arguments(input: &str) -> IResult<&str, Vec<(Option<String>, ArgValue)>> {
    separated_list1(delimited(multispace0, char(','), multispace0), argument)(input)
}

/// A single argument, named (`name=value`) or positional
fn argument(input: &str) -> IResult<&str, (Option<String>, ArgValue)> {
    alt((
        map(
            separated_pair(identifier, tuple((multispace0, char('='), multispace0)), value),
            |(name, value)| (Some(name.to_string()), value),
        ),
        map(value, |value| (None, value)),
    ))(input)
}

fn value(input: &str) -> IResult<&str, ArgValue> {
    alt((
        map(quoted, |s: &str| ArgValue::String(s.to_string())),
        map(bare, ArgValue::from_token),
    ))(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
        delimited(char('\''), take_till(|c| c == '\''), char('\'')),
    ))(input)
}

/// Unquoted text up to the next top-level comma
fn bare(input: &str) -> IResult<&str, &str> {
    let end = top_level_end(input, |c| c == ',');
    let text = input[..end].trim();
    if text.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(input, ErrorKind::TakeWhile1)));
    }
    Ok((&input[end..], text))
}
