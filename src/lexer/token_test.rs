use fallible_iterator::FallibleIterator;

use super::*;
use crate::error::{Error, LexError, SyntaxError};

fn assert_next(code: &str, token: Token) {
    let result = Tokenizer::new(code)
        .and_then(|mut t| t.next_token())
        .expect("valid token");
    println!("{:?}", result);
    assert_eq!(result, token);
}

fn assert_tokens(code: &str, tokens: Vec<Token>) {
    let result: Vec<Token> = Tokenizer::new(code)
        .and_then(|t| t.collect())
        .expect("valid tokens");
    println!("{:?}", result);
    assert_eq!(result, tokens);
}

fn assert_error(code: &str, error: LexError) {
    let result = Tokenizer::new(code).and_then(|t| t.collect::<Vec<_>>());
    assert_eq!(result, Err(Error::Lexical(error)));
}

fn sym(name: &str) -> Token {
    Token::Symbol(name.to_string())
}

#[test]
fn whitespace_test() {
    assert_next(" (", Token::Open);
    assert_next("\n\t (", Token::Open);
    assert_tokens("   ", vec![]);
    assert_tokens("", vec![]);
}

#[test]
fn clopen_test() {
    assert_next("(asdd", Token::Open);
    assert_next(")12", Token::Close);
}

#[test]
fn booleans_test() {
    assert_next("#t 13", Token::Boolean(true));
    assert_next("#f)", Token::Boolean(false));
    assert_tokens("#t1", vec![sym("#t1")]);
}

#[test]
fn quote_test() {
    assert_next("'x", Token::Quote);
    assert_next("quote", Token::Quote);
    assert_tokens("quoted", vec![sym("quoted")]);
}

#[test]
fn dot_test() {
    assert_tokens("(1 . 2)", vec![
        Token::Open,
        Token::Constant(1),
        Token::Dot,
        Token::Constant(2),
        Token::Close,
    ]);
    assert_tokens("a.b", vec![sym("a"), Token::Dot, sym("b")]);
}

#[test]
fn numbers_test() {
    assert_next("42", Token::Constant(42));
    assert_next("-2", Token::Constant(-2));
    assert_next("+7", Token::Constant(7));
    assert_tokens("1abc", vec![Token::Constant(1), sym("abc")]);
    assert_tokens("12(", vec![Token::Constant(12), Token::Open]);
    assert_tokens("-5-3", vec![Token::Constant(-5), Token::Constant(-3)]);
}

#[test]
fn identifiers_test() {
    assert_tokens("+ - <= set! null? list-ref", vec![
        sym("+"),
        sym("-"),
        sym("<="),
        sym("set!"),
        sym("null?"),
        sym("list-ref"),
    ]);
    assert_tokens("a1", vec![sym("a1")]);
    assert_tokens("x+1", vec![sym("x+1")]);
}

#[test]
fn expression_test() {
    assert_tokens("(+ 1 -2)", vec![
        Token::Open,
        sym("+"),
        Token::Constant(1),
        Token::Constant(-2),
        Token::Close,
    ]);
    assert_tokens("'(a)", vec![Token::Quote, Token::Open, sym("a"), Token::Close]);
}

#[test]
fn invalid_character_test() {
    assert_error("@", LexError::UnexpectedCharacter('@'));
    assert_error("(foo \"bar\")", LexError::UnexpectedCharacter('"'));
    assert_error("a,b", LexError::UnexpectedCharacter(','));
}

#[test]
fn bad_number_test() {
    assert_error(
        "99999999999999999999",
        LexError::BadNumber("99999999999999999999".to_string()),
    );
}

#[test]
fn end_test() {
    let mut tokenizer = Tokenizer::new("x").expect("valid input");
    assert!(!tokenizer.is_end());
    assert_eq!(tokenizer.next_token(), Ok(sym("x")));
    assert!(tokenizer.is_end());
    assert_eq!(tokenizer.peek(), &Token::End);
    assert_eq!(
        tokenizer.next_token(),
        Err(Error::Syntax(SyntaxError::UnexpectedEof))
    );
}
