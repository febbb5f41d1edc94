//! Failure kinds of a single `run`
use thiserror::Error;

/// Anything that aborts evaluation of a form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("name error: {0}")]
    Name(#[from] NameError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// The possible errors while tokenizing the input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("bad number {0:?}")]
    BadNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("close bracket without open")]
    UnexpectedClose,
    #[error("misplaced dot")]
    UnexpectedDot,
    #[error("expected close bracket")]
    MissingClose,
    #[error("unexpected tokens after expression")]
    TrailingTokens,
    #[error("malformed {0}")]
    MalformedForm(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("unbound variable {0}")]
    UnboundVar(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("{0} is not a procedure")]
    NonCallable(String),
    #[error("wrong number of arguments to {0}")]
    BadArgc(&'static str),
    #[error("wrong argument type to {0}")]
    BadArgType(&'static str),
    #[error("{0} is not a list")]
    NotAList(String),
    #[error("{0} of empty list")]
    EmptyList(&'static str),
    #[error("index {0} out of range")]
    IndexOutOfRange(i64),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in {0}")]
    Overflow(&'static str),
    #[error("list has more than {0} links")]
    WalkLimit(usize),
    #[error("nothing to evaluate")]
    EmptyProgram,
}

pub type Result<T> = ::std::result::Result<T, Error>;
