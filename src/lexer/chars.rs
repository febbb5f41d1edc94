#[derive(Debug)]
pub struct Chars {
    vec: Vec<char>,
    index: usize,
}

impl Iterator for Chars {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let r = self.peek();
        self.index += 1;
        r
    }
}

impl Chars {
    pub fn peek(&self) -> Option<char> {
        self.vec.get(self.index).cloned()
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.index += 1;
        }
    }

    pub fn from_vec(v: Vec<char>) -> Chars {
        Chars { vec: v, index: 0 }
    }

    pub fn from_str(s: &str) -> Chars {
        Chars::from_vec(s.chars().collect())
    }
}
