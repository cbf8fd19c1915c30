use std::fmt;

const CAPACITY: usize = 18;

/// Decimal digits produced by a shortest-digit generator.
///
/// The value represented is `0.d1d2...dn * 10^decimal_point`, so `1.5` is
/// stored as `"15"` with `decimal_point == 1` and `0.015` as `"15"` with
/// `decimal_point == -1`.
#[derive(Clone, Copy)]
pub(crate) struct DigitBuffer {
    digits: [u8; CAPACITY],
    len: usize,
    pub decimal_point: i32,
}

impl Default for DigitBuffer {
    fn default() -> Self {
        Self {
            digits: [0; CAPACITY],
            len: 0,
            decimal_point: 0,
        }
    }
}

impl DigitBuffer {
    /// Append a digit (0-9). Returns `false` if the buffer is full.
    pub fn push(&mut self, digit: u8) -> bool {
        debug_assert!(digit < 10);
        match self.digits.get_mut(self.len) {
            Some(slot) => {
                *slot = b'0' + digit;
                self.len += 1;
                true
            }
            None => false,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.digits[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Decrement the last digit. The caller makes sure it is not `0`.
    pub fn decrement_last(&mut self) {
        if let Some(last) = self.len.checked_sub(1).and_then(|i| self.digits.get_mut(i)) {
            debug_assert!(*last > b'0');
            *last -= 1;
        }
    }

    pub fn last_digit(&self) -> Option<u8> {
        self.as_bytes().last().map(|&b| b - b'0')
    }

    /// Add one unit to the last digit, propagating carries. `"999"` becomes
    /// `"1"` with the decimal point moved one place to the right.
    pub fn round_up(&mut self) {
        let mut i = self.len;
        while i > 0 {
            i -= 1;
            if self.digits[i] == b'9' {
                self.len = i;
            } else {
                self.digits[i] += 1;
                return;
            }
        }
        self.digits[0] = b'1';
        self.len = 1;
        self.decimal_point += 1;
    }
}

impl PartialEq for DigitBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes() && self.decimal_point == other.decimal_point
    }
}

impl Eq for DigitBuffer {}

impl fmt::Debug for DigitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0.{}e{}",
            String::from_utf8_lossy(self.as_bytes()),
            self.decimal_point
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(digits: &[u8], decimal_point: i32) -> DigitBuffer {
        let mut b = DigitBuffer::default();
        for &d in digits {
            assert!(b.push(d));
        }
        b.decimal_point = decimal_point;
        b
    }

    #[test]
    fn test_push_until_full() {
        let mut b = DigitBuffer::default();
        for _ in 0..CAPACITY {
            assert!(b.push(7));
        }
        assert!(!b.push(7));
        assert_eq!(b.len(), CAPACITY);
    }

    #[test]
    fn test_round_up() {
        let mut b = buffer(&[1, 2, 9], 0);
        b.round_up();
        assert_eq!(b.as_bytes(), b"13");

        let mut b = buffer(&[9, 9], 3);
        b.round_up();
        assert_eq!(b.as_bytes(), b"1");
        assert_eq!(b.decimal_point, 4);

        let mut b = buffer(&[4], -2);
        b.round_up();
        assert_eq!(b.as_bytes(), b"5");
        assert_eq!(format!("{:?}", b), "0.5e-2");
    }

    #[test]
    fn test_decrement_last() {
        let mut b = buffer(&[3, 5], 0);
        b.decrement_last();
        assert_eq!(b.as_bytes(), b"34");
        assert_eq!(b.last_digit(), Some(4));
    }
}
