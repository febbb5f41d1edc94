//
// Macros
//
macro_rules! ok_some {
    ($x:expr) => (Ok(Some($x)))
}
