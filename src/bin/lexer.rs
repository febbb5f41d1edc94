extern crate env_logger;
extern crate fallible_iterator;
extern crate minischeme;

use fallible_iterator::FallibleIterator;
use minischeme::lexer::*;
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

        match Tokenizer::new(&buffer).and_then(|tokens| tokens.collect::<Vec<_>>()) {
            Ok(tokens) => println!("{:?}", tokens),
            Err(e) => println!("Invalid input: {}", e),
        }
    }
}
