macro_rules! ret_err {
    ($err:expr) => ({
        return Err(crate::error::Error::Lexical($err))
    })
}

// Characters that always form a token of their own
macro_rules! is_single {
    ($x:expr) => (
        match $x {
            '(' | ')' | '\'' | '.' => true,
            _ => false
        }
    )
}

macro_rules! is_special {
    ($x:expr) => (
        match $x {
            '<' | '=' | '>' | '*' | '/' | '#' | '+' | '-' | '!' | '?' => true,
            _ => false
        }
    )
}

macro_rules! is_legal {
    ($x:expr) => ($x.is_ascii_alphanumeric() || is_special!($x) || is_single!($x))
}
