use std::fmt;
use std::mem;

use fallible_iterator::FallibleIterator;

use super::chars::Chars;
use crate::error::{Error, LexError, Result, SyntaxError};

/**
    Tokenizer

    A token is whatever runs up to the next whitespace, with two
    exceptions that need no delimiter at all:

    * brackets, quote marks and dots end the current token and
      then form a token of their own
    * a number ends at its first non-digit, so `1abc` is the
      number `1` followed by the symbol `abc`
*/

/// A token of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Constant(i64),
    Open,
    Close,
    Quote,
    Dot,
    Boolean(bool),
    Symbol(String),
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Token::Constant(n) => write!(f, "{}", n),
            Token::Open => f.write_str("("),
            Token::Close => f.write_str(")"),
            Token::Quote => f.write_str("'"),
            Token::Dot => f.write_str("."),
            Token::Boolean(b) => f.write_str(if b { "#t" } else { "#f" }),
            Token::Symbol(ref name) => f.write_str(name),
            Token::End => f.write_str("<end>"),
        }
    }
}

/// A token stream with one token of lookahead
#[derive(Debug)]
pub struct Tokenizer {
    chars: Chars,
    current: Token,
}

impl Tokenizer {
    pub fn new(source: &str) -> Result<Tokenizer> {
        let mut chars = Chars::from_str(source);
        let current = next_token(&mut chars)?;
        Ok(Tokenizer { chars, current })
    }

    pub fn is_end(&self) -> bool {
        self.current == Token::End
    }

    /// The token `next_token` would return, without consuming it
    pub fn peek(&self) -> &Token {
        &self.current
    }

    pub fn next_token(&mut self) -> Result<Token> {
        if self.is_end() {
            return Err(SyntaxError::UnexpectedEof.into());
        }
        let next = next_token(&mut self.chars)?;
        Ok(mem::replace(&mut self.current, next))
    }
}

impl FallibleIterator for Tokenizer {
    type Item = Token;
    type Error = Error;

    fn next(&mut self) -> Result<Option<Token>> {
        if self.is_end() {
            return Ok(None);
        }
        self.next_token().map(Some)
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
enum ParsingState {
    Normal,
    Identifier,
    Number,
}

fn next_token(stream: &mut Chars) -> Result<Token> {
    stream.skip_whitespace();

    let mut state = ParsingState::Normal;
    let mut buf = String::new();

    while let Some(c) = stream.peek() {
        if c.is_whitespace() {
            break;
        }
        match state {
            ParsingState::Normal => {}
            _ if is_single!(c) => break,
            ParsingState::Number if !c.is_ascii_digit() => break,
            _ => {}
        }

        stream.next();
        if !is_legal!(c) {
            ret_err!(LexError::UnexpectedCharacter(c));
        }

        match c {
            '(' => return Ok(Token::Open),
            ')' => return Ok(Token::Close),
            '\'' => return Ok(Token::Quote),
            '.' => return Ok(Token::Dot),
            _ => {}
        }

        state = match state {
            ParsingState::Normal if c.is_ascii_digit() => ParsingState::Number,
            ParsingState::Normal => ParsingState::Identifier,
            // A sign followed by a digit starts a number
            ParsingState::Identifier if c.is_ascii_digit() && (buf == "+" || buf == "-") => {
                ParsingState::Number
            }
            s => s,
        };
        buf.push(c);
    }

    let token = match state {
        ParsingState::Normal => Token::End,
        ParsingState::Number => match buf.parse() {
            Ok(n) => Token::Constant(n),
            Err(_) => ret_err!(LexError::BadNumber(buf)),
        },
        ParsingState::Identifier if buf == "#t" => Token::Boolean(true),
        ParsingState::Identifier if buf == "#f" => Token::Boolean(false),
        ParsingState::Identifier if buf == "quote" => Token::Quote,
        ParsingState::Identifier => Token::Symbol(buf),
    };

    trace!("token {:?}", token);
    Ok(token)
}
