use std::fmt::Display;

use itertools::Itertools;
use nom::{
    branch::alt,
    character::complete::{char, one_of, satisfy},
    combinator::{all_consuming, map, value},
    multi::many0,
    IResult,
};

use crate::{parser::ParserError, utils::is_symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Symbol(char),
    Union,
    Star,
    Concat,
    Open,
    Close,
}

impl Token {
    /// Binding strength used by the shunting-yard pass; grouping tokens and symbols have none.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Token::Star => Some(3),
            Token::Concat => Some(2),
            Token::Union => Some(1),
            Token::Symbol(_) | Token::Open | Token::Close => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Symbol(c) => write!(f, "{}", c),
            Token::Union => write!(f, "|"),
            Token::Star => write!(f, "*"),
            Token::Concat => write!(f, "."),
            Token::Open => write!(f, "("),
            Token::Close => write!(f, ")"),
        }
    }
}

/// Renders a token sequence back to its textual form, e.g. `aab|.a.b*.`.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().join("")
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        map(satisfy(is_symbol), Token::Symbol),
        value(Token::Union, one_of("|+")),
        value(Token::Star, char('*')),
        value(Token::Concat, char('.')),
        value(Token::Open, char('(')),
        value(Token::Close, char(')')),
    ))(input)
}

pub fn tokenize(pattern: &str) -> Result<Vec<Token>, ParserError> {
    match all_consuming(many0(token))(pattern) {
        Ok((_, tokens)) => Ok(tokens),
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
            let consumed = pattern.len() - err.input.len();
            let position = pattern[..consumed].chars().count();
            match err.input.chars().next() {
                Some(character) => Err(ParserError::UnexpectedCharacter {
                    position,
                    character,
                }),
                None => Err(ParserError::EmptyPattern),
            }
        }
        Err(nom::Err::Incomplete(_)) => {
            unreachable!("complete parsers never ask for more input")
        }
    }
}

/// Tokenizes text that is already in postfix order, e.g. `ab.c.`.
pub fn parse_postfix(postfix: &str) -> Result<Vec<Token>, ParserError> {
    tokenize(postfix)
}
