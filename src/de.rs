use crate::ieee754::IeeeFloat;
use crate::peek::Peek;
use crate::strtod;
use crate::strtod::MAX_SIGNIFICANT_DIGITS;
use crate::Error;
use crate::Result;
use serde::de::Visitor;

/// Decimal exponents are clamped to this magnitude. Anything beyond
/// overflows or underflows regardless of the digits.
const MAX_EXPONENT_MAGNITUDE: i64 = 1_000_000;

/// Parses the whole of `s` as a double.
pub fn from_str_f64(s: &str) -> Result<f64> {
    Parser::strict().read_f64(s.as_bytes(), 0).map(|(v, _)| v)
}

/// Parses the whole of `s` as a single.
pub fn from_str_f32(s: &str) -> Result<f32> {
    Parser::strict().read_f32(s.as_bytes(), 0).map(|(v, _)| v)
}

/// Parses a double at `offset` and hands it to `visitor`. Returns the
/// visitor's value and the number of bytes consumed.
pub fn visit_double<'de, V: Visitor<'de>>(
    buf: &[u8],
    offset: usize,
    visitor: V,
) -> Result<(V::Value, usize)> {
    let (v, consumed) = Parser::new().read_f64(buf, offset)?;
    Ok((visitor.visit_f64::<Error>(v)?, consumed))
}

/// Parses a single at `offset` and hands it to `visitor`.
pub fn visit_single<'de, V: Visitor<'de>>(
    buf: &[u8],
    offset: usize,
    visitor: V,
) -> Result<(V::Value, usize)> {
    let (v, consumed) = Parser::new().read_f32(buf, offset)?;
    Ok((visitor.visit_f32::<Error>(v)?, consumed))
}

#[derive(Debug, Clone)]
pub struct Config {
    allow_leading_spaces: bool,
    allow_trailing_junk: bool,
    allow_special_values: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allow_leading_spaces: false,
            allow_trailing_junk: true,
            allow_special_values: true,
        }
    }
}

impl Config {
    /// Skip ASCII whitespace before the number.
    pub fn allow_leading_spaces(mut self, value: bool) -> Self {
        self.allow_leading_spaces = value;
        self
    }

    /// When disabled, the number must extend to the end of the input.
    pub fn allow_trailing_junk(mut self, value: bool) -> Self {
        self.allow_trailing_junk = value;
        self
    }

    /// Accept `NaN` and `Infinity`.
    pub fn allow_special_values(mut self, value: bool) -> Self {
        self.allow_special_values = value;
        self
    }
}

/// Reads the text written by `ser::Formatter`, and any other decimal
/// notation, back into the nearest value.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: Config,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    fn strict() -> Self {
        Self::new().with_config(Config::default().allow_trailing_junk(false))
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Parses the number starting at `offset`. Returns the value and the
    /// number of bytes consumed.
    pub fn read_f64(&self, buf: &[u8], offset: usize) -> Result<(f64, usize)> {
        self.read(buf, offset)
    }

    pub fn read_f32(&self, buf: &[u8], offset: usize) -> Result<(f32, usize)> {
        self.read(buf, offset)
    }

    fn read<F: IeeeFloat>(&self, buf: &[u8], offset: usize) -> Result<(F, usize)> {
        if offset > buf.len() {
            return Err(Error::OutOfBounds {
                offset,
                len: buf.len(),
            });
        }
        let mut peek = Peek::new(buf, offset);
        if self.config.allow_leading_spaces {
            peek.read_while(|b| b.is_ascii_whitespace());
        }

        let negative = peek.eat(b'-');
        if !negative {
            peek.eat(b'+');
        }

        let value = match peek.peek() {
            Some(b'N') if self.config.allow_special_values => {
                if !peek.eat_literal(b"NaN") {
                    return Err(Error::InvalidNumber(offset));
                }
                // NaN carries no sign.
                return self.finish(&peek, offset, F::NAN);
            }
            Some(b'I') if self.config.allow_special_values => {
                if !peek.eat_literal(b"Infinity") {
                    return Err(Error::InvalidNumber(offset));
                }
                F::INFINITY
            }
            _ => {
                let decimal = Decimal::scan(&mut peek).ok_or(Error::InvalidNumber(offset))?;
                strtod::strtod(decimal.digits(), decimal.exponent)
            }
        };
        self.finish(&peek, offset, if negative { -value } else { value })
    }

    fn finish<F>(&self, peek: &Peek, offset: usize, value: F) -> Result<(F, usize)> {
        if !self.config.allow_trailing_junk && !peek.is_eof() {
            return Err(Error::TrailingCharacters(peek.pos()));
        }
        Ok((value, peek.pos() - offset))
    }
}

/// Significant digits of a decimal literal and the power of ten they are
/// scaled by. Leading zeros are dropped. Past the capacity only the
/// presence of a nonzero digit is kept, as a trailing `1`.
struct Decimal {
    buf: [u8; MAX_SIGNIFICANT_DIGITS],
    len: usize,
    exponent: i32,
}

impl Decimal {
    /// Scans `digits ["." [digits]] [exp]` or `"." digits [exp]`. Returns
    /// `None`, having consumed nothing useful, if there are no digits.
    fn scan(peek: &mut Peek) -> Option<Self> {
        let mut decimal = Decimal {
            buf: [0; MAX_SIGNIFICANT_DIGITS],
            len: 0,
            exponent: 0,
        };
        let mut exponent: i64 = 0;
        let mut nonzero_dropped = false;

        let integral = peek.read_while(|b| b.is_ascii_digit());
        for &d in integral {
            if decimal.len == 0 && d == b'0' {
                continue;
            }
            if !decimal.push(d) {
                nonzero_dropped |= d != b'0';
                exponent += 1;
            }
        }

        let mut fraction: &[u8] = &[];
        if peek.peek() == Some(b'.') && (!integral.is_empty() || next_is_digit(peek, 1)) {
            peek.skip(1);
            fraction = peek.read_while(|b| b.is_ascii_digit());
            for &d in fraction {
                if decimal.len == 0 && d == b'0' {
                    exponent -= 1;
                    continue;
                }
                if decimal.push(d) {
                    exponent -= 1;
                } else {
                    nonzero_dropped |= d != b'0';
                }
            }
        }
        if integral.is_empty() && fraction.is_empty() {
            return None;
        }

        exponent += scan_exponent(peek);

        if nonzero_dropped {
            decimal.buf[decimal.len] = b'1';
            decimal.len += 1;
            exponent -= 1;
        }
        decimal.exponent =
            exponent.clamp(-MAX_EXPONENT_MAGNITUDE, MAX_EXPONENT_MAGNITUDE) as i32;
        Some(decimal)
    }

    /// Keeps room for the sticky digit.
    fn push(&mut self, d: u8) -> bool {
        if self.len + 1 < MAX_SIGNIFICANT_DIGITS {
            self.buf[self.len] = d;
            self.len += 1;
            true
        } else {
            false
        }
    }

    fn digits(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

fn next_is_digit(peek: &Peek, n: usize) -> bool {
    peek.peek_at(n).map_or(false, |b| b.is_ascii_digit())
}

/// `(e|E) [+|-] digits`, saturating. Nothing is consumed unless at least one
/// exponent digit follows the marker.
fn scan_exponent(peek: &mut Peek) -> i64 {
    if !matches!(peek.peek(), Some(b'e') | Some(b'E')) {
        return 0;
    }
    let (negative, sign_len) = match peek.peek_at(1) {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    if !next_is_digit(peek, 1 + sign_len) {
        return 0;
    }
    peek.skip(1 + sign_len);
    let value = peek
        .read_while(|b| b.is_ascii_digit())
        .iter()
        .fold(0i64, |acc, &d| {
            (acc * 10 + (d - b'0') as i64).min(MAX_EXPONENT_MAGNITUDE)
        });
    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de;
    use std::fmt;

    fn r(s: &str) -> (f64, usize) {
        Parser::new().read_f64(s.as_bytes(), 0).unwrap()
    }

    fn err(s: &str) -> Error {
        Parser::new().read_f64(s.as_bytes(), 0).unwrap_err()
    }

    #[test]
    fn test_grammar() {
        assert_eq!(r("0"), (0.0, 1));
        assert_eq!(r("-12.5"), (-12.5, 5));
        assert_eq!(r("+3"), (3.0, 2));
        assert_eq!(r("1."), (1.0, 2));
        assert_eq!(r(".5"), (0.5, 2));
        assert_eq!(r("-.25e1"), (-2.5, 6));
        assert_eq!(r("1.e2"), (100.0, 4));
        assert_eq!(r("1E+15"), (1e15, 5));
        assert_eq!(r("1e-05"), (1e-5, 5));
        assert_eq!(r("007"), (7.0, 3));
        assert_eq!(r("0.000123"), (0.000123, 8));
    }

    #[test]
    fn test_partial_exponent() {
        assert_eq!(r("1e"), (1.0, 1));
        assert_eq!(r("1e+"), (1.0, 1));
        assert_eq!(r("2E-x"), (2.0, 1));
        assert_eq!(r("2.5ex"), (2.5, 3));
    }

    #[test]
    fn test_trailing_junk() {
        assert_eq!(r("1.5,"), (1.5, 3));
        assert_eq!(r("1.2.3"), (1.2, 3));
        assert_eq!(r("3]"), (3.0, 1));

        let strict = Parser::new().with_config(Config::default().allow_trailing_junk(false));
        assert_eq!(
            strict.read_f64(b"1.5,", 0),
            Err(Error::TrailingCharacters(3))
        );
        assert_eq!(strict.read_f64(b"[1.5", 1), Ok((1.5, 3)));
    }

    #[test]
    fn test_specials() {
        assert!(r("NaN").0.is_nan());
        assert_eq!(r("NaN").1, 3);
        assert!(r("-NaN").0.is_nan());
        assert_eq!(r("Infinity"), (f64::INFINITY, 8));
        assert_eq!(r("-Infinity"), (f64::NEG_INFINITY, 9));
        assert_eq!(r("+Infinityx"), (f64::INFINITY, 9));
        assert_eq!(err("Inf"), Error::InvalidNumber(0));
        assert_eq!(err("Na"), Error::InvalidNumber(0));
        assert_eq!(err("nan"), Error::InvalidNumber(0));

        let plain = Parser::new().with_config(Config::default().allow_special_values(false));
        assert_eq!(plain.read_f64(b"NaN", 0), Err(Error::InvalidNumber(0)));
        assert_eq!(plain.read_f64(b"-Infinity", 0), Err(Error::InvalidNumber(0)));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(err(""), Error::InvalidNumber(0));
        assert_eq!(err("."), Error::InvalidNumber(0));
        assert_eq!(err("-"), Error::InvalidNumber(0));
        assert_eq!(err("+-1"), Error::InvalidNumber(0));
        assert_eq!(err("e5"), Error::InvalidNumber(0));
        assert_eq!(err(".e1"), Error::InvalidNumber(0));
        assert_eq!(err(" 1"), Error::InvalidNumber(0));
        assert_eq!(
            Parser::new().read_f64(b"12", 3),
            Err(Error::OutOfBounds { offset: 3, len: 2 })
        );
        assert_eq!(Parser::new().read_f64(b"12", 2), Err(Error::InvalidNumber(2)));
    }

    #[test]
    fn test_leading_spaces() {
        let p = Parser::new().with_config(Config::default().allow_leading_spaces(true));
        assert_eq!(p.read_f64(b" \t\n 1.5", 0), Ok((1.5, 7)));
        assert_eq!(p.read_f64(b"   ", 0), Err(Error::InvalidNumber(0)));
    }

    #[test]
    fn test_exponent_saturation() {
        assert_eq!(r("1e99999999999999999999"), (f64::INFINITY, 22));
        assert_eq!(r("1e-99999999999999999999").0, 0.0);
        assert_eq!(r("0e99999999999999999999").0, 0.0);
        assert_eq!(r("-1e400"), (f64::NEG_INFINITY, 6));
        assert!(r("-1e-400").0.is_sign_negative());
        // Leading fractional zeros and a large exponent cancel out.
        let s = format!("0.{}1e1000", "0".repeat(999));
        assert_eq!(r(&s).0, 1.0);
    }

    #[test]
    fn test_long_input() {
        let digits = format!("1{}", "0".repeat(1000));
        assert_eq!(r(&format!("{}e-1000", digits)).0, 1.0);
        let s = format!("{}.{}", "9".repeat(800), "9".repeat(800));
        assert_eq!(r(&s).0, s.parse::<f64>().unwrap());
        // Halfway between 1 and its successor, pushed past the digit capacity.
        let s = format!(
            "1.00000000000000011102230246251565404236316680908203125{}1",
            "0".repeat(800)
        );
        assert_eq!(r(&s).0, 1.0000000000000002);
    }

    #[test]
    fn test_single() {
        let p = Parser::new();
        assert_eq!(p.read_f32(b"0.1", 0), Ok((0.1f32, 3)));
        assert_eq!(p.read_f32(b"3.4028235E+38", 0), Ok((f32::MAX, 13)));
        assert_eq!(p.read_f32(b"3.5e38", 0), Ok((f32::INFINITY, 6)));
        assert_eq!(p.read_f32(b"1E-45", 0), Ok((1e-45f32, 5)));
        assert_eq!(from_str_f32("16777217"), Ok(16777216.0));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(from_str_f64("2.5"), Ok(2.5));
        assert_eq!(from_str_f64("2.5 "), Err(Error::TrailingCharacters(3)));
        assert_eq!(from_str_f64("x"), Err(Error::InvalidNumber(0)));
    }

    struct FiniteVisitor;

    impl<'de> de::Visitor<'de> for FiniteVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a finite number")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<f64, E> {
            if v.is_finite() {
                Ok(v)
            } else {
                Err(E::custom("not finite"))
            }
        }
    }

    #[test]
    fn test_visitor() {
        assert_eq!(visit_double(b"[0.5]", 1, FiniteVisitor), Ok((0.5, 3)));
        assert_eq!(visit_single(b"0.5", 0, FiniteVisitor), Ok((0.5, 3)));
        assert_eq!(
            visit_double(b"Infinity", 0, FiniteVisitor),
            Err(Error::Generic("not finite".into()))
        );
        assert_eq!(
            visit_double(b"]", 0, FiniteVisitor),
            Err(Error::InvalidNumber(0))
        );
    }
}
