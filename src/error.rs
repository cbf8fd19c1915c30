use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Generic(String),

    #[error("no number at offset {0}")]
    InvalidNumber(usize),

    #[error("offset {offset} is out of bounds (len {len})")]
    OutOfBounds { offset: usize, len: usize },

    #[error("unexpected trailing characters at offset {0}")]
    TrailingCharacters(usize),
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Generic(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::Error as _;

    #[test]
    fn test_display() {
        assert_eq!(Error::InvalidNumber(3).to_string(), "no number at offset 3");
        assert_eq!(
            Error::OutOfBounds { offset: 9, len: 4 }.to_string(),
            "offset 9 is out of bounds (len 4)"
        );
        assert_eq!(Error::custom("bad float").to_string(), "bad float");
    }
}
