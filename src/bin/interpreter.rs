extern crate env_logger;
#[macro_use]
extern crate log;
extern crate minischeme;
extern crate rustyline;

use std::env::args;
use std::fs;
use std::process;

use minischeme::Interpreter;
use rustyline::error::ReadlineError;

fn main() {
    env_logger::init();

    match args().nth(1) {
        Some(file) => run_file(&file),
        None => run_repl(),
    }
}

fn run_file(file_path: &str) {
    let source = match fs::read_to_string(file_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Unable to read {}: {}", file_path, e);
            process::exit(1);
        }
    };
    let mut interpreter = Interpreter::new();

    for line in source.lines().filter(|line| !line.trim().is_empty()) {
        match interpreter.run(line) {
            Ok(value) => println!("{}", value),
            Err(e) => {
                println!("Error: {}", e);
                process::exit(1);
            }
        }
    }
}

fn run_repl() {
    let mut rl = match rustyline::Editor::<()>::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Unable to start the editor: {}", e);
            process::exit(1);
        }
    };
    let mut interpreter = Interpreter::new();

    loop {
        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(e) => {
                debug!("readline: {}", e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        rl.add_history_entry(line.as_str());

        match interpreter.run(&line) {
            Ok(value) => println!("{}", value),
            Err(e) => println!("Error: {}", e),
        }
    }
}
