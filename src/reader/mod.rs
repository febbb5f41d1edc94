//! Convert tokens into expression trees
use crate::error::{Result, SyntaxError};
use crate::eval::{Expr, ListBuilder};
use crate::lexer::{Token, Tokenizer};

/// Text of the empty list wherever it has to stand as a value
pub const EMPTY_LIST: &str = "()";

/// Reads one expression. `Ok(None)` is the empty list.
pub fn read(tokens: &mut Tokenizer) -> Result<Option<Expr>> {
    match tokens.next_token()? {
        Token::Constant(n) => ok_some!(Expr::Integer(n)),
        Token::Boolean(b) => ok_some!(Expr::Boolean(b)),
        Token::Symbol(name) => ok_some!(Expr::Symbol(name)),
        Token::Quote => {
            let datum = element(tokens)?;
            ok_some!(Expr::cons(Expr::symbol("quote"), Some(datum)))
        }
        Token::Open => read_list(tokens),
        Token::Close => Err(SyntaxError::UnexpectedClose.into()),
        Token::Dot => Err(SyntaxError::UnexpectedDot.into()),
        Token::End => Err(SyntaxError::UnexpectedEof.into()),
    }
}

/// Reads exactly one expression, which must use up every token
pub fn read_all(tokens: &mut Tokenizer) -> Result<Option<Expr>> {
    let expr = read(tokens)?;
    if !tokens.is_end() {
        return Err(SyntaxError::TrailingTokens.into());
    }
    Ok(expr)
}

// An empty list inside another form stands for its text
fn element(tokens: &mut Tokenizer) -> Result<Expr> {
    Ok(read(tokens)?.unwrap_or_else(|| Expr::symbol(EMPTY_LIST)))
}

// Assumes the opening bracket has been consumed
fn read_list(tokens: &mut Tokenizer) -> Result<Option<Expr>> {
    let mut list = ListBuilder::default();

    loop {
        match *tokens.peek() {
            Token::Close => {
                tokens.next_token()?;
                return Ok(list.finish());
            }
            Token::Dot if list.is_empty() => return Err(SyntaxError::UnexpectedDot.into()),
            Token::Dot => {
                tokens.next_token()?;
                let tail = element(tokens)?;
                return match tokens.next_token()? {
                    Token::Close => Ok(list.finish_with(Some(tail))),
                    _ => Err(SyntaxError::MissingClose.into()),
                };
            }
            _ => list.push(element(tokens)?),
        }
    }
}
