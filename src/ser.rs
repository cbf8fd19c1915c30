use crate::bignum_dtoa;
use crate::buffer::ByteSink;
use crate::digits::DigitBuffer;
use crate::grisu;
use crate::ieee754::FloatClass;
use crate::ieee754::IeeeFloat;

pub fn to_vec_f64(v: f64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(32);
    Formatter::new().write_f64(&mut buf, 0, v);
    buf
}

pub fn to_vec_f32(v: f32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(24);
    Formatter::new().write_f32(&mut buf, 0, v);
    buf
}

pub fn to_string_f64(v: f64) -> String {
    let vec = to_vec_f64(v);
    unsafe {
        // We do not emit invalid UTF-8.
        String::from_utf8_unchecked(vec)
    }
}

pub fn to_string_f32(v: f32) -> String {
    let vec = to_vec_f32(v);
    unsafe {
        // We do not emit invalid UTF-8.
        String::from_utf8_unchecked(vec)
    }
}

/// Notation and symbols used by the `Formatter`.
///
/// The scientific exponent of the first digit decides the notation: fixed
/// when `decimal_in_shortest_low <= exponent < decimal_in_shortest_high`,
/// scientific otherwise.
#[derive(Debug, Clone)]
pub struct Config {
    decimal_in_shortest_low: i32,
    decimal_in_shortest_high: i32,
    exponent_marker: u8,
    emit_positive_exponent_sign: bool,
    min_exponent_digits: usize,
    unique_zero: bool,
    infinity_symbol: &'static str,
    nan_symbol: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decimal_in_shortest_low: -4,
            decimal_in_shortest_high: 15,
            exponent_marker: b'E',
            emit_positive_exponent_sign: true,
            min_exponent_digits: 2,
            unique_zero: true,
            infinity_symbol: "Infinity",
            nan_symbol: "NaN",
        }
    }
}

impl Config {
    pub fn decimal_in_shortest_low(mut self, value: i32) -> Self {
        self.decimal_in_shortest_low = value;
        self
    }

    pub fn decimal_in_shortest_high(mut self, value: i32) -> Self {
        self.decimal_in_shortest_high = value;
        self
    }

    /// Must be ASCII.
    pub fn exponent_marker(mut self, value: u8) -> Self {
        debug_assert!(value.is_ascii());
        self.exponent_marker = value;
        self
    }

    pub fn emit_positive_exponent_sign(mut self, value: bool) -> Self {
        self.emit_positive_exponent_sign = value;
        self
    }

    pub fn min_exponent_digits(mut self, value: usize) -> Self {
        self.min_exponent_digits = value;
        self
    }

    /// Print `-0` as `0`.
    pub fn unique_zero(mut self, value: bool) -> Self {
        self.unique_zero = value;
        self
    }

    pub fn infinity_symbol(mut self, value: &'static str) -> Self {
        self.infinity_symbol = value;
        self
    }

    pub fn nan_symbol(mut self, value: &'static str) -> Self {
        self.nan_symbol = value;
        self
    }
}

/// Writes the shortest text that reads back to the same value.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: Config,
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Writes `v` at `offset`, growing `sink` as needed. Returns the number
    /// of bytes written.
    pub fn write_f64(&self, sink: &mut impl ByteSink, offset: usize, v: f64) -> usize {
        self.write(sink, offset, v)
    }

    pub fn write_f32(&self, sink: &mut impl ByteSink, offset: usize, v: f32) -> usize {
        self.write(sink, offset, v)
    }

    fn write<F: IeeeFloat>(&self, sink: &mut impl ByteSink, offset: usize, v: F) -> usize {
        let negative = v.is_sign_negative();
        match v.classify() {
            FloatClass::Nan => self.write_symbol(sink, offset, false, self.config.nan_symbol),
            FloatClass::Infinity => {
                self.write_symbol(sink, offset, negative, self.config.infinity_symbol)
            }
            FloatClass::Zero => {
                self.write_symbol(sink, offset, negative && !self.config.unique_zero, "0")
            }
            FloatClass::Finite => self.write_digits(sink, offset, negative, &shortest_digits(v)),
        }
    }

    fn write_symbol(
        &self,
        sink: &mut impl ByteSink,
        offset: usize,
        negative: bool,
        symbol: &str,
    ) -> usize {
        let len = negative as usize + symbol.len();
        let mut out = Cursor::new(sink.reserve_at(offset, len));
        if negative {
            out.put_byte(b'-');
        }
        out.put(symbol.as_bytes());
        out.finish()
    }

    fn write_digits(
        &self,
        sink: &mut impl ByteSink,
        offset: usize,
        negative: bool,
        digits: &DigitBuffer,
    ) -> usize {
        let notation = self.notation(digits);
        let len = negative as usize + notation.len(digits);
        let mut out = Cursor::new(sink.reserve_at(offset, len));
        if negative {
            out.put_byte(b'-');
        }
        let bytes = digits.as_bytes();
        let decimal_point = digits.decimal_point;
        match notation {
            Notation::Fixed if decimal_point <= 0 => {
                out.put(b"0.");
                out.fill(b'0', (-decimal_point) as usize);
                out.put(bytes);
            }
            Notation::Fixed if decimal_point as usize >= bytes.len() => {
                out.put(bytes);
                out.fill(b'0', decimal_point as usize - bytes.len());
            }
            Notation::Fixed => {
                let (integral, fraction) = bytes.split_at(decimal_point as usize);
                out.put(integral);
                out.put_byte(b'.');
                out.put(fraction);
            }
            Notation::Scientific {
                exponent,
                exponent_sign,
                exponent_digits,
            } => {
                out.put(&bytes[..1]);
                if bytes.len() > 1 {
                    out.put_byte(b'.');
                    out.put(&bytes[1..]);
                }
                out.put_byte(self.config.exponent_marker);
                if let Some(sign) = exponent_sign {
                    out.put_byte(sign);
                }
                let mut exponent = exponent.unsigned_abs();
                let start = out.pos;
                out.fill(b'0', exponent_digits);
                for slot in out.buf[start..start + exponent_digits].iter_mut().rev() {
                    *slot = b'0' + (exponent % 10) as u8;
                    exponent /= 10;
                    if exponent == 0 {
                        break;
                    }
                }
            }
        }
        out.finish()
    }

    fn notation(&self, digits: &DigitBuffer) -> Notation {
        let exponent = digits.decimal_point - 1;
        if self.config.decimal_in_shortest_low <= exponent
            && exponent < self.config.decimal_in_shortest_high
        {
            return Notation::Fixed;
        }
        let exponent_sign = if exponent < 0 {
            Some(b'-')
        } else if self.config.emit_positive_exponent_sign {
            Some(b'+')
        } else {
            None
        };
        Notation::Scientific {
            exponent,
            exponent_sign,
            exponent_digits: decimal_len(exponent.unsigned_abs()).max(self.config.min_exponent_digits),
        }
    }
}

/// Shortest digits of a finite nonzero value, sign ignored.
pub(crate) fn shortest_digits<F: IeeeFloat>(v: F) -> DigitBuffer {
    let digits = grisu::shortest(v).unwrap_or_else(|| {
        log::trace!("grisu cannot decide {:?}, falling back to exact digits", v);
        bignum_dtoa::shortest(v)
    });
    debug_assert!(digits.len() <= F::MAX_SHORTEST_DIGITS);
    digits
}

enum Notation {
    Fixed,
    Scientific {
        exponent: i32,
        exponent_sign: Option<u8>,
        exponent_digits: usize,
    },
}

impl Notation {
    /// Output length, sign excluded.
    fn len(&self, digits: &DigitBuffer) -> usize {
        let n = digits.len();
        let decimal_point = digits.decimal_point;
        match *self {
            Notation::Fixed if decimal_point <= 0 => 2 + (-decimal_point) as usize + n,
            Notation::Fixed if decimal_point as usize >= n => decimal_point as usize,
            Notation::Fixed => n + 1,
            Notation::Scientific {
                exponent_sign,
                exponent_digits,
                ..
            } => n + (n > 1) as usize + 1 + exponent_sign.is_some() as usize + exponent_digits,
        }
    }
}

fn decimal_len(mut v: u32) -> usize {
    let mut len = 1;
    while v >= 10 {
        v /= 10;
        len += 1;
    }
    len
}

// Writes into a region whose length was computed up front.
struct Cursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn put_byte(&mut self, b: u8) {
        self.buf[self.pos] = b;
        self.pos += 1;
    }

    fn fill(&mut self, b: u8, n: usize) {
        for slot in &mut self.buf[self.pos..self.pos + n] {
            *slot = b;
        }
        self.pos += n;
    }

    fn finish(self) -> usize {
        debug_assert_eq!(self.pos, self.buf.len());
        self.pos
    }
}
