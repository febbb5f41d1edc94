use super::value::{Environment, Expr, ListBuilder, NatFn, Pair, PairHandle, Procedure};
use super::{compact_args, eval_args, operand, GcShared};
use crate::error::{Error, NameError, Result, RuntimeError, SyntaxError};
use crate::lexer::Tokenizer;
use crate::reader::{read_all, EMPTY_LIST};

/// How many links `list?` follows before giving up
pub const LIST_WALK_LIMIT: usize = 100;

pub(super) static STDLIB: &[(&str, NatFn)] = &[
    ("quote", quote),
    ("boolean?", is_boolean),
    ("number?", is_number),
    ("symbol?", is_symbol),
    ("pair?", is_pair),
    ("null?", is_null),
    ("list?", is_list),
    ("=", equals),
    ("<", less),
    (">", greater),
    ("<=", less_equals),
    (">=", greater_equals),
    ("+", add),
    ("-", subtract),
    ("*", multiply),
    ("/", divide),
    ("max", max),
    ("min", min),
    ("abs", abs),
    ("not", not),
    ("and", and),
    ("or", or),
    ("cons", cons),
    ("car", car),
    ("cdr", cdr),
    ("list", list),
    ("list-ref", list_ref),
    ("list-tail", list_tail),
    ("define", define),
    ("set!", set),
];

type Env = GcShared<Environment>;

//
// Argument helpers
//

fn single(argument: Option<&Expr>, env: &Env, name: &'static str) -> Result<Expr> {
    let mut values = eval_args(argument, env)?;
    match values.pop() {
        Some(value) if values.is_empty() => Ok(value),
        _ => Err(RuntimeError::BadArgc(name).into()),
    }
}

fn two(argument: Option<&Expr>, env: &Env, name: &'static str) -> Result<(Expr, Expr)> {
    let mut values = eval_args(argument, env)?;
    if values.len() != 2 {
        return Err(RuntimeError::BadArgc(name).into());
    }
    let second = values.pop();
    let first = values.pop();
    match (first, second) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(RuntimeError::BadArgc(name).into()),
    }
}

fn integer(value: &Expr, name: &'static str) -> Result<i64> {
    match *value {
        Expr::Integer(n) => Ok(n),
        _ => Err(RuntimeError::BadArgType(name).into()),
    }
}

fn integers(argument: Option<&Expr>, env: &Env, name: &'static str) -> Result<Vec<i64>> {
    eval_args(argument, env)?
        .iter()
        .map(|value| integer(value, name))
        .collect()
}

fn index(value: &Expr, name: &'static str) -> Result<usize> {
    let n = integer(value, name)?;
    if n < 0 {
        return Err(RuntimeError::IndexOutOfRange(n).into());
    }
    Ok(n as usize)
}

/// Turns reader data into a value: atoms stand for themselves, lists
/// become their printed text
fn datum(data: Option<&Expr>) -> Expr {
    match data {
        None => Expr::symbol(EMPTY_LIST),
        Some(pair @ &Expr::Pair(_)) => Expr::Symbol(pair.datum_text()),
        Some(atom) => atom.clone(),
    }
}

/// Reads a symbol's text back into an expression. Only symbols can hold
/// list text.
fn reread(value: &Expr) -> Result<Option<Expr>> {
    let text = match *value {
        Expr::Symbol(ref text) => text,
        _ => return Err(RuntimeError::NotAList(value.to_string()).into()),
    };
    let mut tokens = Tokenizer::new(text)?;
    read_all(&mut tokens)
}

/// Recovers the structure of a list from its printed text.
/// `Ok(None)` is the empty list.
fn unpack(value: &Expr) -> Result<Option<GcShared<Pair>>> {
    match reread(value)? {
        None => Ok(None),
        Some(Expr::Pair(pair)) => Ok(Some(pair)),
        Some(_) => Err(RuntimeError::NotAList(value.to_string()).into()),
    }
}

/// Every atom of a tree, nested lists and dotted tails included
fn leaves(expr: &Expr, out: &mut Vec<Expr>) {
    let mut cursor = Some(expr.clone());

    while let Some(node) = cursor {
        cursor = match node {
            Expr::Pair(ref pair) => {
                let (head, tail) = pair.parts();
                leaves(&head, out);
                tail
            }
            atom => {
                out.push(atom);
                None
            }
        };
    }
}

/// The elements of a proper list
fn elements(value: &Expr) -> Result<Vec<Expr>> {
    let mut elements = vec![];
    let mut cell = unpack(value)?;

    while let Some(pair) = cell {
        let (head, tail) = pair.parts();
        elements.push(head);
        cell = match tail {
            None => None,
            Some(Expr::Pair(next)) => Some(next),
            Some(_) => return Err(RuntimeError::NotAList(value.to_string()).into()),
        };
    }
    Ok(elements)
}

//
// Quotation and predicates
//

fn quote(argument: Option<&Expr>, _: &Env) -> Result<Expr> {
    Ok(datum(argument))
}

fn is_boolean(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let value = single(argument, env, "boolean?")?;
    Ok(Expr::Boolean(match value {
        Expr::Boolean(_) => true,
        _ => false,
    }))
}

fn is_number(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let value = single(argument, env, "number?")?;
    Ok(Expr::Boolean(match value {
        Expr::Integer(_) => true,
        _ => false,
    }))
}

// List text is a symbol to the evaluator but not to the program
fn is_symbol(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let value = single(argument, env, "symbol?")?;
    Ok(Expr::Boolean(match value {
        Expr::Symbol(_) => unpack(&value).is_err(),
        _ => false,
    }))
}

// A pair is data holding two numbers, `(1 2)` or `(1 . 2)`
fn is_pair(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let value = single(argument, env, "pair?")?;
    let data = match reread(&value)? {
        Some(data @ Expr::Pair(_)) => data,
        _ => return Ok(Expr::Boolean(false)),
    };

    let mut atoms = vec![];
    leaves(&data, &mut atoms);
    Ok(Expr::Boolean(match atoms[..] {
        [Expr::Integer(_), Expr::Integer(_)] => true,
        _ => false,
    }))
}

fn is_null(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let value = single(argument, env, "null?")?;
    Ok(Expr::Boolean(reread(&value)?.is_none()))
}

fn is_list(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let value = single(argument, env, "list?")?;
    let mut cell = match reread(&value)? {
        Some(Expr::Pair(pair)) => pair,
        None => return Ok(Expr::Boolean(true)),
        Some(_) => return Ok(Expr::Boolean(false)),
    };

    for _ in 0..LIST_WALK_LIMIT {
        cell = match cell.tail() {
            None => return Ok(Expr::Boolean(true)),
            Some(Expr::Pair(next)) => next,
            Some(_) => return Ok(Expr::Boolean(false)),
        };
    }
    match cell.tail() {
        None => Ok(Expr::Boolean(true)),
        Some(Expr::Pair(_)) => Err(RuntimeError::WalkLimit(LIST_WALK_LIMIT).into()),
        Some(_) => Ok(Expr::Boolean(false)),
    }
}

//
// Numbers
//

macro_rules! comparison {
    ($fun:ident, $name:expr, $op:tt) => (
        fn $fun(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
            let numbers = integers(argument, env, $name)?;
            if numbers.is_empty() {
                return Err(RuntimeError::BadArgc($name).into());
            }
            Ok(Expr::Boolean(numbers.windows(2).all(|w| w[0] $op w[1])))
        }
    )
}

comparison!(equals, "=", ==);
comparison!(less, "<", <);
comparison!(greater, ">", >);
comparison!(less_equals, "<=", <=);
comparison!(greater_equals, ">=", >=);

type Op = fn(i64, i64) -> ::std::result::Result<i64, RuntimeError>;

/// Folds the operands with `op`, starting from `seed` or, without one,
/// from the first operand
fn fold(argument: Option<&Expr>, env: &Env, name: &'static str, seed: Option<i64>, op: Op) -> Result<Expr> {
    let mut numbers = integers(argument, env, name)?.into_iter();
    let first = match seed.or_else(|| numbers.next()) {
        Some(n) => n,
        None => return Err(RuntimeError::BadArgc(name).into()),
    };
    Ok(Expr::Integer(numbers.try_fold(first, op)?))
}

fn add(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    fold(argument, env, "+", Some(0), |a, b| {
        a.checked_add(b).ok_or(RuntimeError::Overflow("+"))
    })
}

fn multiply(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    fold(argument, env, "*", Some(1), |a, b| {
        a.checked_mul(b).ok_or(RuntimeError::Overflow("*"))
    })
}

fn subtract(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    fold(argument, env, "-", None, |a, b| {
        a.checked_sub(b).ok_or(RuntimeError::Overflow("-"))
    })
}

fn divide(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    fold(argument, env, "/", None, |a, b| {
        if b == 0 {
            return Err(RuntimeError::DivisionByZero);
        }
        a.checked_div(b).ok_or(RuntimeError::Overflow("/"))
    })
}

fn max(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    fold(argument, env, "max", None, |a, b| Ok(a.max(b)))
}

fn min(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    fold(argument, env, "min", None, |a, b| Ok(a.min(b)))
}

fn abs(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let value = single(argument, env, "abs")?;
    let n = integer(&value, "abs")?;
    n.checked_abs()
        .map(Expr::Integer)
        .ok_or_else(|| RuntimeError::Overflow("abs").into())
}

//
// Booleans
//

fn not(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let value = single(argument, env, "not")?;
    Ok(Expr::Boolean(!bool::from(&value)))
}

// A lone operand is not evaluated: `(and x)` is `#t` and `(or x)` is `#f`
fn and(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let elements = compact_args(argument);
    if elements.len() <= 1 {
        return Ok(Expr::Boolean(true));
    }

    let mut result = Expr::Boolean(true);
    for element in elements {
        result = operand(&element, env)?;
        if !bool::from(&result) {
            break;
        }
    }
    Ok(result)
}

fn or(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let elements = compact_args(argument);
    if elements.len() <= 1 {
        return Ok(Expr::Boolean(false));
    }

    let mut result = Expr::Boolean(false);
    for element in elements {
        result = operand(&element, env)?;
        if bool::from(&result) {
            break;
        }
    }
    Ok(result)
}

//
// Lists
//

fn cons(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let (car, cdr) = two(argument, env, "cons")?;
    Ok(Expr::Symbol(format!("({} . {})", car.datum_text(), cdr.datum_text())))
}

fn car(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let value = single(argument, env, "car")?;
    match unpack(&value)? {
        Some(pair) => Ok(datum(Some(&pair.head()))),
        None => Err(RuntimeError::EmptyList("car").into()),
    }
}

fn cdr(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let value = single(argument, env, "cdr")?;
    match unpack(&value)? {
        Some(pair) => Ok(datum(pair.tail().as_ref())),
        None => Err(RuntimeError::EmptyList("cdr").into()),
    }
}

fn list(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let values = eval_args(argument, env)?;
    let list = values.into_iter().collect::<ListBuilder>().finish();
    Ok(datum(list.as_ref()))
}

fn list_ref(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let (list, k) = two(argument, env, "list-ref")?;
    let k = index(&k, "list-ref")?;
    elements(&list)?
        .get(k)
        .map(|element| datum(Some(element)))
        .ok_or_else(|| RuntimeError::IndexOutOfRange(k as i64).into())
}

// The suffix is shared with the re-read list, not copied
fn list_tail(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let (list, k) = two(argument, env, "list-tail")?;
    let k = index(&k, "list-tail")?;
    let mut rest = unpack(&list)?.map(Expr::Pair);

    for _ in 0..k {
        rest = match rest {
            Some(Expr::Pair(pair)) => pair.tail(),
            _ => return Err(RuntimeError::IndexOutOfRange(k as i64).into()),
        };
    }
    match rest {
        None | Some(Expr::Pair(_)) => Ok(datum(rest.as_ref())),
        Some(_) => Err(RuntimeError::NotAList(list.to_string()).into()),
    }
}

//
// Bindings
//

/// Splits `(name value-expr)` and evaluates the value
fn binding(argument: Option<&Expr>, env: &Env, form: &'static str) -> Result<(String, Expr)> {
    let malformed = || Error::from(SyntaxError::MalformedForm(form));

    let (head, tail) = match argument {
        Some(&Expr::Pair(ref pair)) => pair.parts(),
        _ => return Err(malformed()),
    };
    let name = match head {
        Expr::Symbol(name) => name,
        _ => return Err(malformed()),
    };
    let mut values = eval_args(tail.as_ref(), env)?;
    match (values.pop(), values.is_empty()) {
        (Some(value), true) => Ok((name, value)),
        _ => Err(malformed()),
    }
}

fn define(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let (name, value) = binding(argument, env, "define")?;
    debug!("define {} = {}", name, value);
    env.borrow_mut().define(name, Procedure::Variable(Box::new(value)));
    Ok(Expr::symbol("defined!"))
}

fn set(argument: Option<&Expr>, env: &Env) -> Result<Expr> {
    let (name, value) = binding(argument, env, "set!")?;
    debug!("set! {} = {}", name, value);
    if !env.borrow_mut().set(&name, Procedure::Variable(Box::new(value))) {
        return Err(NameError::UnboundVar(name).into());
    }
    Ok(Expr::symbol("set!"))
}

#[cfg(test)]
mod test {
    use super::*;

    fn text(s: &str) -> Expr {
        Expr::symbol(s)
    }

    #[test]
    fn datum_of_atoms_and_lists() {
        assert_eq!(datum(None), text("()"));
        assert_eq!(datum(Some(&Expr::Integer(5))), Expr::Integer(5));
        let list = Expr::cons(Expr::Integer(1), Some(Expr::cons(Expr::Integer(2), None)));
        assert_eq!(datum(Some(&list)), text("(1 2)"));
    }

    #[test]
    fn unpack_list_text() {
        let pair = unpack(&text("(1 2)")).expect("list").expect("non-empty");
        assert_eq!(pair.head(), Expr::Integer(1));
        assert_eq!(reread(&text("()")), Ok(None));
    }

    #[test]
    fn unpack_rejects_non_lists() {
        assert_eq!(
            unpack(&text("abc")).err(),
            Some(Error::Runtime(RuntimeError::NotAList("abc".into())))
        );
        assert_eq!(
            unpack(&Expr::Integer(4)).err(),
            Some(Error::Runtime(RuntimeError::NotAList("4".into())))
        );
    }

    #[test]
    fn elements_of_dotted_list() {
        assert_eq!(
            elements(&text("(1 2 3)")),
            Ok(vec![Expr::Integer(1), Expr::Integer(2), Expr::Integer(3)])
        );
        assert!(elements(&text("(1 . 2)")).is_err());
    }

    #[test]
    fn reread_requires_symbols() {
        assert_eq!(reread(&text("a")), Ok(Some(text("a"))));
        assert_eq!(
            reread(&Expr::Boolean(true)),
            Err(Error::Runtime(RuntimeError::NotAList("#t".into())))
        );
    }

    #[test]
    fn leaves_of_nested_and_dotted_data() {
        let data = reread(&text("(1 (2 3) . 4)")).expect("valid").expect("non-empty");
        let mut atoms = vec![];
        leaves(&data, &mut atoms);
        assert_eq!(
            atoms,
            vec![Expr::Integer(1), Expr::Integer(2), Expr::Integer(3), Expr::Integer(4)]
        );
    }

    #[test]
    fn registry_names_are_unique() {
        let mut names: Vec<_> = STDLIB.iter().map(|&(name, _)| name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), STDLIB.len());
    }
}
