use log::debug;

use crate::RuleError;
use crate::ast::Expr;
use crate::operators::{Operator, find_operator};
use crate::scanner::{Scanner, Token};

/// Options controlling how strictly rule text is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Accept input that ends before every group is closed, returning the
    /// groups built so far instead of failing
    pub allow_unterminated: bool,
    /// Maximum group nesting depth; `None` means unbounded
    pub max_depth: Option<usize>,
}

impl ParseOptions {
    pub fn lenient() -> Self {
        ParseOptions {
            allow_unterminated: true,
            ..Default::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Parse a complete rule with default options
pub fn parse(input: &str) -> Result<Expr, RuleError> {
    parse_with_options(input, ParseOptions::default())
}

/// Parse a complete rule: one parenthesized group and nothing after it
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<Expr, RuleError> {
    let mut parser = Parser {
        scanner: Scanner::new(input),
        options,
    };

    match parser.scanner.next_token()? {
        (Token::GroupOpen, _) => {}
        (token, position) => return Err(unexpected(token, position)),
    }

    let rule = parser.parse_group(1)?;

    match parser.scanner.next_token()? {
        (Token::EndOfInput, _) => {}
        (_, position) => return Err(RuleError::TrailingInput(position)),
    }

    debug!("parsed rule {}", rule);
    Ok(rule)
}

fn unexpected(token: Token<'_>, position: usize) -> RuleError {
    RuleError::UnexpectedToken {
        token: token.to_string(),
        position,
    }
}

/// Second character that extends a punctuation operator, if any
fn doubled_form(first: char) -> Option<char> {
    match first {
        '>' | '<' | '=' | '!' => Some('='),
        '&' => Some('&'),
        '|' => Some('|'),
        _ => None,
    }
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    options: ParseOptions,
}

impl Parser<'_> {
    /// Read the operator that follows an opening parenthesis
    fn parse_operator(&mut self) -> Result<Operator, RuleError> {
        let spelling = match self.scanner.next_token()? {
            (Token::Operator(first), _) => {
                let mut spelling = first.to_string();
                if let Some(second) = doubled_form(first) {
                    if self.scanner.peek_char() == Some(second) {
                        self.scanner.bump();
                        spelling.push(second);
                    }
                }
                spelling
            }
            (Token::IdentFragment(word), _) => word.to_string(),
            (token, position) => return Err(unexpected(token, position)),
        };

        find_operator(&spelling).ok_or(RuleError::InvalidOperator(spelling))
    }

    /// Parse the rest of a group whose opening parenthesis was already consumed
    fn parse_group(&mut self, depth: usize) -> Result<Expr, RuleError> {
        let op = self.parse_operator()?;
        let mut operands = Vec::new();
        let mut ident = PendingIdent::default();

        loop {
            let (token, position) = self.scanner.next_token()?;
            match token {
                Token::GroupOpen => {
                    ident.flush(&mut operands)?;
                    if let Some(max_depth) = self.options.max_depth {
                        if depth >= max_depth {
                            return Err(RuleError::NestingTooDeep(max_depth));
                        }
                    }
                    operands.push(self.parse_group(depth + 1)?);
                }
                Token::IntLiteral(text) => {
                    ident.flush(&mut operands)?;
                    operands.push(Expr::int(text));
                }
                Token::FloatLiteral(text) => {
                    ident.flush(&mut operands)?;
                    operands.push(Expr::float(text));
                }
                Token::IdentFragment(text) => ident.push_fragment(text, position, &mut operands)?,
                Token::Dot => ident.push_dot(position)?,
                Token::GroupClose => {
                    ident.flush(&mut operands)?;
                    return Ok(Expr::operation(op, operands));
                }
                Token::EndOfInput if self.options.allow_unterminated => {
                    ident.flush(&mut operands)?;
                    return Ok(Expr::operation(op, operands));
                }
                Token::EndOfInput => return Err(RuleError::UnterminatedGroup(op.symbol())),
                Token::Operator(_) => return Err(unexpected(token, position)),
            }
        }
    }
}

/// A variable name being assembled from fragments and dots.
///
/// A name has no terminator of its own; it ends when a sibling operand or
/// the closing parenthesis arrives, or when a fragment follows without a dot.
/// Dots join only pieces that touch in the source: `a.b` is one name, while
/// `a .b` and `a. b` are malformed.
#[derive(Debug, Default)]
struct PendingIdent {
    name: String,
    after_dot: bool,
    /// Byte offset just past the last fragment or dot
    end: usize,
}

impl PendingIdent {
    fn push_fragment(
        &mut self,
        fragment: &str,
        position: usize,
        operands: &mut Vec<Expr>,
    ) -> Result<(), RuleError> {
        if self.after_dot {
            if position != self.end {
                self.name.push(' ');
                self.name.push_str(fragment);
                return Err(RuleError::MalformedIdentifier(std::mem::take(&mut self.name)));
            }
        } else {
            self.flush(operands)?;
        }
        self.name.push_str(fragment);
        self.after_dot = false;
        self.end = position + fragment.len();
        Ok(())
    }

    fn push_dot(&mut self, position: usize) -> Result<(), RuleError> {
        if !self.name.is_empty() && position != self.end {
            self.name.push(' ');
            self.name.push('.');
            return Err(RuleError::MalformedIdentifier(std::mem::take(&mut self.name)));
        }
        if self.name.is_empty() || self.after_dot {
            self.name.push('.');
            return Err(RuleError::MalformedIdentifier(std::mem::take(&mut self.name)));
        }
        self.name.push('.');
        self.after_dot = true;
        self.end = position + 1;
        Ok(())
    }

    fn flush(&mut self, operands: &mut Vec<Expr>) -> Result<(), RuleError> {
        if self.after_dot {
            return Err(RuleError::MalformedIdentifier(std::mem::take(&mut self.name)));
        }
        if !self.name.is_empty() {
            operands.push(Expr::variable(std::mem::take(&mut self.name)));
        }
        Ok(())
    }
}
