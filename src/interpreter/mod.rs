use crate::error::{Result, RuntimeError};
use crate::eval::{default_env, Environment, GcShared};
use crate::lexer::Tokenizer;
use crate::reader::read_all;

/// Runs forms one at a time against a private top-level environment
pub struct Interpreter {
    environment: GcShared<Environment>,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter {
            environment: default_env(),
        }
    }

    /// Reads exactly one form from `source`, evaluates it and renders the
    /// result. Bindings made by `define` outlive a failure later in the form.
    pub fn run(&mut self, source: &str) -> Result<String> {
        let mut tokens = Tokenizer::new(source)?;
        let expr = read_all(&mut tokens)?.ok_or(RuntimeError::EmptyProgram)?;
        debug!("read {}", expr.datum_text());

        let value = expr.evaluate(&self.environment)?;
        debug!("value {}", value);
        Ok(value.to_string())
    }

    #[cfg(test)]
    pub fn environment(&self) -> &GcShared<Environment> {
        &self.environment
    }
}

impl Default for Interpreter {
    fn default() -> Interpreter {
        Interpreter::new()
    }
}
