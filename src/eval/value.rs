use std::convert::TryFrom;
use std::fmt::{self, Debug, Display, Formatter};
use std::iter::FromIterator;

use ::gc::{Finalize, Trace};

use super::environment::Environment as GenericEnvironment;
use super::gc::{shared, GcShared};
use crate::error::{Error, Result, RuntimeError};

pub type Environment = GenericEnvironment<Procedure>;

/// Expressions, which double as the values they evaluate to
#[derive(Debug, Clone)]
pub enum Expr {
    /// An identifier, or the printed text of quoted data (`(1 2)`)
    Symbol(String),
    /// `#t` or `#f`
    Boolean(bool),
    /// A 64-bit integer
    Integer(i64),
    /// A cons cell
    Pair(GcShared<Pair>),
    /// A dotted pair of two integers
    NumericPair(NumericPair),
    /// Anything that can sit in call position
    Procedure(Procedure),
}

/// A cons cell. The head is always present; an empty tail ends a list.
#[derive(Debug, Clone)]
pub struct Pair {
    head: Expr,
    tail: Option<Expr>,
}

impl Pair {
    pub fn new(head: Expr, tail: Option<Expr>) -> Pair {
        Pair { head, tail }
    }

    pub fn head(&self) -> &Expr {
        &self.head
    }

    pub fn tail(&self) -> Option<&Expr> {
        self.tail.as_ref()
    }

    #[cfg(test)]
    pub fn set_head(&mut self, head: Expr) {
        self.head = head;
    }

    pub fn set_tail(&mut self, tail: Option<Expr>) {
        self.tail = tail;
    }
}

/// Slot access through a shared pair, without holding a borrow
pub trait PairHandle {
    fn head(&self) -> Expr;
    fn tail(&self) -> Option<Expr>;
    fn parts(&self) -> (Expr, Option<Expr>);
    fn set_tail(&self, tail: Option<Expr>);
}

impl PairHandle for GcShared<Pair> {
    fn head(&self) -> Expr {
        self.borrow().head.clone()
    }

    fn tail(&self) -> Option<Expr> {
        self.borrow().tail.clone()
    }

    fn parts(&self) -> (Expr, Option<Expr>) {
        let pair = self.borrow();
        (pair.head.clone(), pair.tail.clone())
    }

    fn set_tail(&self, tail: Option<Expr>) {
        self.borrow_mut().set_tail(tail);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericPair {
    pub head: i64,
    pub tail: i64,
}

impl<'a> TryFrom<&'a Pair> for NumericPair {
    type Error = Error;

    fn try_from(pair: &Pair) -> Result<NumericPair> {
        match (&pair.head, &pair.tail) {
            (&Expr::Integer(head), &Some(Expr::Integer(tail))) => Ok(NumericPair { head, tail }),
            _ => Err(RuntimeError::BadArgType("numeric pair").into()),
        }
    }
}

pub type NatFn = fn(Option<&Expr>, &GcShared<Environment>) -> Result<Expr>;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub fun: NatFn,
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

#[derive(Debug, Clone)]
pub enum Procedure {
    /// A natively implemented procedure
    Builtin(Builtin),
    /// A bound value; applying it ignores the argument and yields the value
    Variable(Box<Expr>),
}

impl Finalize for Expr {}
unsafe impl Trace for Expr {
    custom_trace!(this, {
        match *this {
            Expr::Pair(ref pair) => mark(pair),
            Expr::Procedure(ref procedure) => mark(procedure),
            Expr::Symbol(_) | Expr::Boolean(_) | Expr::Integer(_) | Expr::NumericPair(_) => {}
        }
    });
}

impl Finalize for Pair {}
unsafe impl Trace for Pair {
    custom_trace!(this, {
        mark(&this.head);
        mark(&this.tail);
    });
}

impl Finalize for Procedure {}
unsafe impl Trace for Procedure {
    custom_trace!(this, {
        if let Procedure::Variable(ref value) = *this {
            mark(value);
        }
    });
}

impl Expr {
    pub fn cons(head: Expr, tail: Option<Expr>) -> Expr {
        Expr::Pair(shared(Pair::new(head, tail)))
    }

    pub fn symbol(name: &str) -> Expr {
        Expr::Symbol(name.to_owned())
    }

    pub fn is_symbol(&self, name: &str) -> bool {
        match *self {
            Expr::Symbol(ref s) => s == name,
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn pair(&self) -> Option<GcShared<Pair>> {
        match *self {
            Expr::Pair(ref pair) => Some(pair.clone()),
            _ => None,
        }
    }

    /// Prints the value in list syntax, the way `quote` shows data
    pub fn datum_text(&self) -> String {
        let mut out = String::new();
        write_datum(self, &mut out);
        out
    }
}

fn write_datum(expr: &Expr, out: &mut String) {
    let mut cell = match *expr {
        Expr::Pair(ref pair) => pair.clone(),
        _ => {
            out.push_str(&expr.to_string());
            return;
        }
    };

    out.push('(');
    loop {
        let numeric = NumericPair::try_from(&*cell.borrow());
        if let Ok(numeric) = numeric {
            out.push_str(&Expr::NumericPair(numeric).to_string());
            break;
        }

        let (head, tail) = cell.parts();
        write_datum(&head, out);
        cell = match tail {
            None => break,
            Some(Expr::Pair(next)) => {
                out.push(' ');
                next
            }
            Some(atom) => {
                out.push_str(" . ");
                write_datum(&atom, out);
                break;
            }
        };
    }
    out.push(')');
}

/// Builds a list front to back by rebinding the last tail in place
#[derive(Debug, Default)]
pub struct ListBuilder {
    first: Option<Expr>,
    last: Option<GcShared<Pair>>,
}

impl ListBuilder {
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    pub fn push(&mut self, value: Expr) {
        let cell = shared(Pair::new(value, None));
        match self.last {
            Some(ref last) => last.set_tail(Some(Expr::Pair(cell.clone()))),
            None => self.first = Some(Expr::Pair(cell.clone())),
        }
        self.last = Some(cell);
    }

    pub fn finish(self) -> Option<Expr> {
        self.first
    }

    /// Ends the list with `tail` instead of the empty list
    pub fn finish_with(self, tail: Option<Expr>) -> Option<Expr> {
        match self.last {
            Some(ref last) => last.set_tail(tail),
            None => return tail,
        }
        self.first
    }
}

impl FromIterator<Expr> for ListBuilder {
    fn from_iter<I: IntoIterator<Item = Expr>>(values: I) -> ListBuilder {
        let mut list = ListBuilder::default();
        for value in values {
            list.push(value);
        }
        list
    }
}

// Only `#f` is false
impl<'a> From<&'a Expr> for bool {
    fn from(v: &Expr) -> bool {
        match *v {
            Expr::Boolean(false) => false,
            _ => true,
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Expr) -> bool {
        match (self, other) {
            (&Expr::Symbol(ref x), &Expr::Symbol(ref y)) => x == y,
            (&Expr::Boolean(x), &Expr::Boolean(y)) => x == y,
            (&Expr::Integer(n), &Expr::Integer(m)) => n == m,
            (&Expr::Pair(ref x), &Expr::Pair(ref y)) => x.parts() == y.parts(),
            (&Expr::NumericPair(x), &Expr::NumericPair(y)) => x == y,
            (&Expr::Procedure(ref x), &Expr::Procedure(ref y)) => x == y,
            _ => false,
        }
    }
}

impl PartialEq for Procedure {
    fn eq(&self, other: &Procedure) -> bool {
        match (self, other) {
            (&Procedure::Builtin(x), &Procedure::Builtin(y)) => x.name == y.name,
            (&Procedure::Variable(ref x), &Procedure::Variable(ref y)) => x == y,
            _ => false,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Expr::Symbol(ref name) => f.write_str(name),
            Expr::Boolean(b) => f.write_str(if b { "#t" } else { "#f" }),
            Expr::Integer(n) => write!(f, "{}", n),
            // Mirrors the cell shape rather than list syntax
            Expr::Pair(ref pair) => match pair.parts() {
                (head, None) => write!(f, "{}", head),
                (head, Some(tail)) => write!(f, "({} {})", head, tail),
            },
            Expr::NumericPair(NumericPair { head, tail }) => write!(f, "{} . {}", head, tail),
            Expr::Procedure(ref procedure) => write!(f, "{}", procedure),
        }
    }
}

impl Display for Procedure {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Procedure::Builtin(Builtin { name, .. }) => write!(f, "<procedure {}>", name),
            Procedure::Variable(ref value) => write!(f, "{}", value),
        }
    }
}
