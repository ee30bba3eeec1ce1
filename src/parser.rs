use log::{debug, info};
use thiserror::Error;

use crate::{
    lexer::{render, tokenize, Token},
    utils::CompileFlags,
};

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ParserError {
    #[error("unexpected character {character:?} at position {position}")]
    UnexpectedCharacter { position: usize, character: char },
    #[error("')' without a matching '('")]
    UnmatchedClose,
    #[error("'(' is never closed")]
    UnclosedGroup,
    #[error("pattern is empty")]
    EmptyPattern,
}

/// Makes implicit concatenation explicit by inserting [`Token::Concat`] between
/// adjacent operand-like tokens.
pub fn insert_concatenation(tokens: &[Token]) -> Vec<Token> {
    let mut expanded = Vec::with_capacity(tokens.len() * 2);
    let mut iter = tokens.iter().peekable();
    while let Some(&token) = iter.next() {
        expanded.push(token);
        let Some(&&next) = iter.peek() else {
            break;
        };
        let left_open = matches!(token, Token::Open | Token::Union | Token::Concat);
        let right_closed = matches!(
            next,
            Token::Close | Token::Star | Token::Union | Token::Concat
        );
        if !left_open && !right_closed {
            expanded.push(Token::Concat);
        }
    }
    expanded
}

/// Wraps single-symbol alternation operands found at group depth zero in an
/// explicit group, so `a|b` becomes `(a|b)` and `a.b|c` becomes `a.(b|c)`.
///
/// Only single-symbol operands are handled: `aa|bb` is read as `a(a|b)b` and
/// must be written `(aa|bb)` to mean the union of the two words. A trailing
/// star stays attached to the right operand.
pub fn bracket_alternation(tokens: &[Token]) -> Vec<Token> {
    let mut bracketed: Vec<Token> = Vec::with_capacity(tokens.len() + 2);
    let mut depth: usize = 0;
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        match token {
            Token::Open => depth += 1,
            Token::Close => depth = depth.saturating_sub(1),
            _ => {}
        }
        let wrappable = token == Token::Union
            && depth == 0
            && matches!(bracketed.last(), Some(Token::Symbol(_)))
            && matches!(tokens.get(i + 1), Some(Token::Symbol(_)));
        if !wrappable {
            bracketed.push(token);
            i += 1;
            continue;
        }

        bracketed.insert(bracketed.len() - 1, Token::Open);
        bracketed.push(Token::Union);
        bracketed.push(tokens[i + 1]);
        i += 2;
        while let Some(Token::Star) = tokens.get(i) {
            bracketed.push(Token::Star);
            i += 1;
        }
        bracketed.push(Token::Close);
    }
    bracketed
}

/// Shunting-yard conversion of an operator-explicit infix sequence to postfix.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>, ParserError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for &token in tokens {
        match token {
            Token::Symbol(_) => output.push(token),
            Token::Union | Token::Concat | Token::Star => {
                while let Some(&top) = stack.last() {
                    if top == Token::Open || top.precedence() < token.precedence() {
                        break;
                    }
                    output.push(top);
                    stack.pop();
                }
                stack.push(token);
            }
            Token::Open => stack.push(token),
            Token::Close => loop {
                match stack.pop() {
                    Some(Token::Open) => break,
                    Some(operator) => output.push(operator),
                    None => return Err(ParserError::UnmatchedClose),
                }
            },
        }
    }

    while let Some(token) = stack.pop() {
        if token == Token::Open {
            return Err(ParserError::UnclosedGroup);
        }
        output.push(token);
    }
    Ok(output)
}

/// Runs the whole front end: tokenize, expand concatenation, bracket
/// alternation (when enabled) and convert to postfix.
pub fn run_parse(pattern: &str, flags: CompileFlags) -> Result<Vec<Token>, ParserError> {
    let tokens = tokenize(pattern)?;
    if tokens.is_empty() {
        return Err(ParserError::EmptyPattern);
    }
    let mut infix = insert_concatenation(&tokens);
    if flags.contains(CompileFlags::BRACKET_ALTERNATION) {
        infix = bracket_alternation(&infix);
    }
    debug!("expanded {:?} to {}", pattern, render(&infix));

    let postfix = to_postfix(&infix)?;
    if flags.contains(CompileFlags::DEBUG) {
        info!("infix: {}, postfix: {}", render(&infix), render(&postfix));
    }
    Ok(postfix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(pattern: &str) -> String {
        render(&insert_concatenation(&tokenize(pattern).unwrap()))
    }

    fn bracket(pattern: &str) -> String {
        render(&bracket_alternation(&insert_concatenation(
            &tokenize(pattern).unwrap(),
        )))
    }

    fn postfix(pattern: &str) -> String {
        render(&run_parse(pattern, CompileFlags::default()).unwrap())
    }

    #[test]
    fn test_insert_concatenation() {
        assert_eq!(expand("a(a|b)ab*"), "a.(a|b).a.b*");
        assert_eq!(expand("(ab)*"), "(a.b)*");
        assert_eq!(expand("a*b*abb"), "a*.b*.a.b.b");
        assert_eq!(expand("a"), "a");
        assert_eq!(expand("(a)(b)"), "(a).(b)");
    }

    #[test]
    fn test_explicit_concatenation_is_kept() {
        assert_eq!(expand("a.b"), "a.b");
        assert_eq!(expand("(a.b).c"), "(a.b).c");
    }

    #[test]
    fn test_bracket_single_symbol_alternation() {
        assert_eq!(bracket("a|b"), "(a|b)");
        assert_eq!(bracket("a+b"), "(a|b)");
        assert_eq!(bracket("a|b*"), "(a|b*)");
        assert_eq!(bracket("a|b|c"), "(a|b)|c");
    }

    #[test]
    fn test_bracket_leaves_grouped_alternation_alone() {
        assert_eq!(bracket("(aa|bb)"), "(a.a|b.b)");
        assert_eq!(bracket("a(a|b)ab*"), "a.(a|b).a.b*");
        assert_eq!(bracket("(a)|b"), "(a)|b");
    }

    #[test]
    fn test_bracket_multi_symbol_operands_is_unsupported() {
        // only the symbols adjacent to the operator are grouped
        assert_eq!(bracket("aa|bb"), "a.(a|b).b");
        assert_eq!(bracket("ab|c"), "a.(b|c)");
    }

    #[test]
    fn test_postfix_precedence() {
        assert_eq!(postfix("a(a|b)ab*"), "aab|.a.b*.");
        assert_eq!(postfix("a|b"), "ab|");
        assert_eq!(postfix("(ab)*"), "ab.*");
        assert_eq!(postfix("a*b*abb"), "a*b*.a.b.b.");
        assert_eq!(postfix("a**"), "a**");
    }

    #[test]
    fn test_postfix_left_associative() {
        let tokens = tokenize("a.b.c").unwrap();
        assert_eq!(render(&to_postfix(&tokens).unwrap()), "ab.c.");
        let tokens = tokenize("(a|b)|c").unwrap();
        assert_eq!(render(&to_postfix(&tokens).unwrap()), "ab|c|");
    }

    #[test]
    fn test_unbalanced_groups() {
        assert_eq!(
            run_parse("(ab", CompileFlags::default()),
            Err(ParserError::UnclosedGroup)
        );
        assert_eq!(
            run_parse("ab)", CompileFlags::default()),
            Err(ParserError::UnmatchedClose)
        );
    }

    #[test]
    fn test_empty_pattern() {
        assert_eq!(
            run_parse("", CompileFlags::default()),
            Err(ParserError::EmptyPattern)
        );
    }

    #[test]
    fn test_bracketing_can_be_disabled() {
        let tokens = run_parse("ab|c", CompileFlags::NO_FLAG).unwrap();
        assert_eq!(render(&tokens), "ab.c|");
        let tokens = run_parse("ab|c", CompileFlags::BRACKET_ALTERNATION).unwrap();
        assert_eq!(render(&tokens), "abc|.");
    }
}
