use nom::error::{Error, ErrorKind};

/// The template parser only reports that a token did not parse; the caller
/// treats the `$` as a literal in that case.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    InvalidSyntax,
}

impl<'a> nom::error::ParseError<&'a str> for ParseError {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        ParseError::from(Error::new(input, kind))
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> From<Error<&'a str>> for ParseError {
    fn from(_value: Error<&'a str>) -> Self {
        // any error that nom internally generates (ErrorKind) will always be a syntax error
        Self::InvalidSyntax
    }
}
