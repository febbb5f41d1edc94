//! An interpreter for a small Lisp
#[macro_use]
extern crate gc;
#[macro_use]
extern crate log;

#[macro_use]
mod helpers;

pub mod error;
pub mod eval;
pub mod interpreter;
pub mod lexer;
pub mod reader;

pub use crate::error::Error;
pub use crate::interpreter::Interpreter;
