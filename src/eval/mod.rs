//! Tree-walking evaluation of expressions
pub use self::gc::{shared, GcShared};
pub use self::stdlib::LIST_WALK_LIMIT;
pub use self::value::{Builtin, Environment, Expr, ListBuilder, NatFn, NumericPair, Pair,
                      PairHandle, Procedure};

use crate::error::{NameError, Result, RuntimeError};

mod environment;
mod gc;
mod stdlib;
mod value;

impl Expr {
    pub fn evaluate(&self, env: &GcShared<Environment>) -> Result<Expr> {
        match *self {
            Expr::Symbol(ref name) => {
                let bound = env.borrow().get(name);
                bound
                    .map(Expr::Procedure)
                    .ok_or_else(|| NameError::UnboundVar(name.clone()).into())
            }
            Expr::Pair(ref pair) => {
                let (head, tail) = pair.parts();

                // `(quote x)` reads as a one-element list around `'x`
                if tail.is_none() && head.is_quotation() {
                    return head.evaluate(env);
                }

                match head.evaluate(env)? {
                    Expr::Procedure(procedure) => procedure.apply(tail.as_ref(), env),
                    other => Err(RuntimeError::NonCallable(other.to_string()).into()),
                }
            }
            Expr::Boolean(_) | Expr::Integer(_) | Expr::NumericPair(_) | Expr::Procedure(_) => {
                Ok(self.clone())
            }
        }
    }

    fn is_quotation(&self) -> bool {
        match *self {
            Expr::Pair(ref pair) => pair.head().is_symbol("quote"),
            _ => false,
        }
    }
}

impl Procedure {
    pub fn apply(&self, argument: Option<&Expr>, env: &GcShared<Environment>) -> Result<Expr> {
        match *self {
            Procedure::Builtin(Builtin { name, fun }) => {
                trace!("apply {} to {:?}", name, argument.map(Expr::to_string));
                fun(argument, env)
            }
            Procedure::Variable(ref value) => Ok((**value).clone()),
        }
    }
}

/// Evaluates an operand, reading through variable bindings
pub fn operand(element: &Expr, env: &GcShared<Environment>) -> Result<Expr> {
    match element.evaluate(env)? {
        Expr::Procedure(Procedure::Variable(value)) => Ok(*value),
        value => Ok(value),
    }
}

/// Flattens an unevaluated argument tree into the values of its leaves.
///
/// Nested calls and quotations are evaluated and kept whole; any other nested list is
/// flattened into its elements, so `(+ 1 (2 3))` sums three numbers.
pub fn eval_args(argument: Option<&Expr>, env: &GcShared<Environment>) -> Result<Vec<Expr>> {
    let mut values = vec![];
    flatten(argument, env, &mut values)?;
    Ok(values)
}

fn flatten(argument: Option<&Expr>, env: &GcShared<Environment>, values: &mut Vec<Expr>) -> Result<()> {
    let mut cursor = argument.cloned();

    while let Some(node) = cursor {
        cursor = match node {
            Expr::Pair(ref pair) => {
                let (head, tail) = pair.parts();
                flatten_element(&head, env, values)?;
                tail
            }
            // Dotted argument list
            ref atom => {
                flatten_element(atom, env, values)?;
                None
            }
        };
    }
    Ok(())
}

fn flatten_element(element: &Expr, env: &GcShared<Environment>, values: &mut Vec<Expr>) -> Result<()> {
    match *element {
        Expr::Pair(ref pair) => {
            let (head, tail) = pair.parts();
            match head {
                // Symbols in call position always name a procedure
                Expr::Symbol(_) => match head.evaluate(env)? {
                    Expr::Procedure(procedure) => values.push(procedure.apply(tail.as_ref(), env)?),
                    other => values.push(other),
                },
                Expr::Pair(_) if tail.is_none() && head.is_quotation() => {
                    values.push(element.evaluate(env)?);
                }
                _ => flatten(Some(element), env, values)?,
            }
            Ok(())
        }
        Expr::Symbol(_) => {
            values.push(operand(element, env)?);
            Ok(())
        }
        _ => {
            values.push(element.clone());
            Ok(())
        }
    }
}

/// The top-level elements of an argument list, unevaluated
pub fn compact_args(argument: Option<&Expr>) -> Vec<Expr> {
    let mut elements = vec![];
    let mut cursor = argument.cloned();

    while let Some(node) = cursor {
        cursor = match node {
            Expr::Pair(ref pair) => {
                let (head, tail) = pair.parts();
                elements.push(head);
                tail
            }
            atom => {
                elements.push(atom);
                None
            }
        };
    }
    elements
}

#[cfg(test)]
pub fn null_env() -> GcShared<Environment> {
    shared(Environment::default())
}

/// A top-level environment holding every builtin
pub fn default_env() -> GcShared<Environment> {
    let mut env = Environment::default();

    for &(name, fun) in stdlib::STDLIB.iter() {
        env.define(name.into(), Procedure::Builtin(Builtin { name, fun }));
    }

    shared(env)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    fn ints(values: &[i64]) -> Option<Expr> {
        values.iter().map(|&n| Expr::Integer(n)).collect::<ListBuilder>().finish()
    }

    #[test]
    fn self_evaluating() {
        let env = null_env();
        assert_eq!(Expr::Integer(3).evaluate(&env), Ok(Expr::Integer(3)));
        assert_eq!(Expr::Boolean(false).evaluate(&env), Ok(Expr::Boolean(false)));
        let numeric = Expr::NumericPair(NumericPair { head: 1, tail: 2 });
        assert_eq!(numeric.evaluate(&env), Ok(numeric.clone()));
    }

    #[test]
    fn unbound_symbol() {
        let env = null_env();
        assert_eq!(
            Expr::symbol("x").evaluate(&env),
            Err(Error::Name(NameError::UnboundVar("x".into())))
        );
    }

    #[test]
    fn non_callable_head() {
        let env = null_env();
        let call = Expr::cons(Expr::Integer(1), ints(&[2]));
        assert_eq!(
            call.evaluate(&env),
            Err(Error::Runtime(RuntimeError::NonCallable("1".into())))
        );
    }

    #[test]
    fn variable_ignores_argument() {
        let env = null_env();
        env.borrow_mut().define("x".into(), Procedure::Variable(Box::new(Expr::Integer(7))));
        let call = Expr::cons(Expr::symbol("x"), ints(&[1, 2]));
        assert_eq!(call.evaluate(&env), Ok(Expr::Integer(7)));
        assert_eq!(operand(&Expr::symbol("x"), &env), Ok(Expr::Integer(7)));
    }

    #[test]
    fn flatten_nested_lists() {
        let env = default_env();
        let nested = Expr::cons(Expr::Integer(1), Some(Expr::cons(ints(&[2, 3]).unwrap(), None)));
        let values = eval_args(Some(&nested), &env).expect("values");
        assert_eq!(values, vec![Expr::Integer(1), Expr::Integer(2), Expr::Integer(3)]);
    }

    #[test]
    fn flatten_evaluates_calls() {
        let env = default_env();
        let call = Expr::cons(Expr::symbol("+"), ints(&[2, 3]));
        let args = Expr::cons(Expr::Integer(1), Some(Expr::cons(call, None)));
        let values = eval_args(Some(&args), &env).expect("values");
        assert_eq!(values, vec![Expr::Integer(1), Expr::Integer(5)]);
    }

    #[test]
    fn compact_keeps_elements_whole() {
        let inner = ints(&[2, 3]).unwrap();
        let args = Expr::cons(Expr::Integer(1), Some(Expr::cons(inner.clone(), None)));
        assert_eq!(compact_args(Some(&args)), vec![Expr::Integer(1), inner]);
        assert!(compact_args(None).is_empty());
    }

    #[test]
    fn default_env_has_builtins() {
        let env = default_env();
        for name in &["quote", "+", "car", "define", "set!", "list-tail"] {
            assert!(env.borrow().get(name).is_some(), "{} is missing", name);
        }
    }
}
