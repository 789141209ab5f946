use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{map, opt, recognize, value},
    multi::many0_count,
    sequence::{pair, tuple},
};

use crate::RuleError;

/// Punctuation that may start an operator
pub const OPERATOR_CHARS: &str = "+-*/<>=!&|";

/// A classified lexical unit borrowed from the rule text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    GroupOpen,
    GroupClose,
    IntLiteral(&'a str),
    FloatLiteral(&'a str),
    IdentFragment(&'a str),
    Dot,
    Operator(char),
    EndOfInput,
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::GroupOpen => write!(f, "("),
            Token::GroupClose => write!(f, ")"),
            Token::IntLiteral(text) | Token::FloatLiteral(text) | Token::IdentFragment(text) => {
                write!(f, "{}", text)
            }
            Token::Dot => write!(f, "."),
            Token::Operator(c) => write!(f, "{}", c),
            Token::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// Exponent suffix: e, E, optional sign, digits
fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

/// Parse a floating-point literal (needs a decimal point or an exponent)
fn float_literal(input: &str) -> IResult<&str, &str> {
    let with_point = alt((
        recognize(tuple((digit1, char('.'), digit0))),
        recognize(pair(char('.'), digit1)),
    ));

    recognize(pair(
        opt(char('-')),
        alt((
            recognize(pair(with_point, opt(exponent))),
            recognize(pair(digit1, exponent)),
        )),
    ))(input)
}

/// Parse a decimal integer literal
fn int_literal(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(char('-')), digit1))(input)
}

/// Parse one identifier fragment; dots between fragments are separate tokens
fn ident_fragment(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Parse any single token, assuming leading whitespace is already skipped
fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        map(float_literal, Token::FloatLiteral),
        map(int_literal, Token::IntLiteral),
        map(ident_fragment, Token::IdentFragment),
        value(Token::GroupOpen, char('(')),
        value(Token::GroupClose, char(')')),
        value(Token::Dot, char('.')),
        map(one_of(OPERATOR_CHARS), Token::Operator),
    ))(input)
}

/// Pull-based scanner over rule text.
///
/// The parser asks for one token at a time and may peek at the raw character
/// that immediately follows the last token, which is how two-character
/// operators such as `>=` are recognised.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Scanner { input, rest: input }
    }

    /// Byte offset of the next unread character
    pub fn position(&self) -> usize {
        self.input.len() - self.rest.len()
    }

    /// Scan the next token, returning it with its starting byte offset
    pub fn next_token(&mut self) -> Result<(Token<'a>, usize), RuleError> {
        let (rest, _) = multispace0::<&str, nom::error::Error<&str>>(self.rest)
            .unwrap_or((self.rest, ""));
        self.rest = rest;

        let position = self.position();
        if self.rest.is_empty() {
            return Ok((Token::EndOfInput, position));
        }

        match token(self.rest) {
            Ok((rest, token)) => {
                self.rest = rest;
                Ok((token, position))
            }
            Err(_) => Err(RuleError::UnexpectedCharacter {
                ch: self.rest.chars().next().unwrap_or_default(),
                position,
            }),
        }
    }

    /// The raw character right after the last token, without skipping whitespace
    pub fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Consume the character returned by [`Scanner::peek_char`]
    pub fn bump(&mut self) {
        if let Some(c) = self.peek_char() {
            self.rest = &self.rest[c.len_utf8()..];
        }
    }
}
