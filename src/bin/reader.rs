extern crate env_logger;
extern crate minischeme;

use minischeme::lexer::*;
use minischeme::reader::*;
use std::io::{stdin, stdout, Write};

fn main() {
    env_logger::init();

    let mut buffer = String::new();
    loop {
        buffer.clear();

        if stdout().write(b"> ").and(stdout().flush()).is_err() {
            return;
        }

        match stdin().read_line(&mut buffer) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }

        if buffer.trim().is_empty() {
            continue;
        }

        match Tokenizer::new(&buffer).and_then(|mut tokens| read_all(&mut tokens)) {
            Ok(Some(expr)) => println!("{}\n{:?}", expr.datum_text(), expr),
            Ok(None) => println!("{}", EMPTY_LIST),
            Err(e) => println!("Invalid expression: {}", e),
        }
    }
}
