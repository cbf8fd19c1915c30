/// Forward-only view over a byte slice with one byte of lookahead.
pub struct Peek<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Peek<'a> {
    /// Starts at `pos`, which must not exceed `input.len()`.
    pub fn new(input: &'a [u8], pos: usize) -> Self {
        debug_assert!(pos <= input.len());
        Self { input, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// The byte `n` positions ahead, without consuming anything.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.input.get(self.pos + n).copied()
    }

    /// Skip `n` bytes, stopping at the end of input.
    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Consume `b` if it is next.
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `literal` if the input continues with it. Nothing is consumed
    /// on a partial match.
    pub fn eat_literal(&mut self, literal: &[u8]) -> bool {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Read while `predicate` accepts the next byte. Returns the bytes read.
    pub fn read_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        let len = self.input[start..]
            .iter()
            .take_while(|&&b| predicate(b))
            .count();
        self.pos += len;
        &self.input[start..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek() {
        let mut p = Peek::new(b"xx123.5e", 2);
        assert_eq!(p.peek(), Some(b'1'));
        assert_eq!(p.peek_at(3), Some(b'.'));
        assert_eq!(p.peek_at(6), None);

        assert_eq!(p.read_while(|b| b.is_ascii_digit()), b"123");
        assert_eq!(p.pos(), 5);
        assert!(!p.eat(b'e'));
        assert!(p.eat(b'.'));
        assert_eq!(p.read_while(|b| b.is_ascii_digit()), b"5");
        assert_eq!(p.read_while(|b| b.is_ascii_digit()), b"");

        p.skip(10);
        assert!(p.is_eof());
        assert_eq!(p.peek(), None);
    }

    #[test]
    fn test_eat_literal() {
        let mut p = Peek::new(b"Inf", 0);
        assert!(!p.eat_literal(b"Infinity"));
        assert_eq!(p.pos(), 0);
        assert!(p.eat_literal(b"In"));
        assert_eq!(p.peek(), Some(b'f'));
    }
}
