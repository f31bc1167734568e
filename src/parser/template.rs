use crate::parser::error::ParseError;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::combinator::{map, recognize};
use nom::sequence::{delimited, preceded};
use nom::IResult;

type ParseResult<'a, T> = IResult<&'a str, T, ParseError>;

/// A `$` token in a replacement template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateToken<'a> {
    /// `$$`, a literal dollar sign.
    Dollar,
    Numbered(usize),
    Named(&'a str),
}

/// Parses one token at the start of `input`, which must begin with `$`.
/// Returns the token and the exact text it was parsed from.
pub fn template_token(input: &str) -> ParseResult<(TemplateToken, &str)> {
    let (rest, token) = alt((escaped_dollar, braced_reference, bare_reference))(input)?;
    let consumed = &input[..input.len() - rest.len()];
    Ok((rest, (token, consumed)))
}

fn escaped_dollar(input: &str) -> ParseResult<TemplateToken> {
    map(tag("$$"), |_| TemplateToken::Dollar)(input)
}

fn braced_reference(input: &str) -> ParseResult<TemplateToken> {
    map(delimited(tag("${"), reference_name, tag("}")), to_token)(input)
}

fn bare_reference(input: &str) -> ParseResult<TemplateToken> {
    map(preceded(tag("$"), reference_name), to_token)(input)
}

fn reference_name(input: &str) -> ParseResult<&str> {
    recognize(take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'))(input)
}

fn to_token(name: &str) -> TemplateToken {
    match name.parse::<usize>() {
        Ok(index) => TemplateToken::Numbered(index),
        Err(_) => TemplateToken::Named(name),
    }
}
