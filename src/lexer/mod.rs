//! Convert source text into tokens
#[macro_use]
mod macros;

mod chars;
mod token;

#[cfg(test)]
mod token_test;

pub use self::token::{Token, Tokenizer};
