//! Locale-independent conversion between binary floating point values and
//! their shortest round-trip decimal text.
//!
//! Writing produces the fewest digits that read back to the identical value.
//! Reading rounds any decimal text to the nearest value, ties to even.

mod bignum_dtoa;
pub mod buffer;
mod cached_powers;
pub mod de;
mod digits;
mod diy_fp;
pub mod error;
mod grisu;
mod ieee754;
mod peek;
pub mod ser;
mod strtod;


pub use buffer::ByteSink;
pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use de::from_str_f32;
pub use de::from_str_f64;
pub use ser::to_string_f32;
pub use ser::to_string_f64;
pub use ser::to_vec_f32;
pub use ser::to_vec_f64;

/// Writes the shortest representation of `value` into `buf` at `offset`.
/// Returns the number of bytes written.
pub fn write_double(buf: &mut impl ByteSink, offset: usize, value: f64) -> usize {
    ser::Formatter::new().write_f64(buf, offset, value)
}

pub fn write_single(buf: &mut impl ByteSink, offset: usize, value: f32) -> usize {
    ser::Formatter::new().write_f32(buf, offset, value)
}

/// Reads a number from `buf` at `offset`. Returns the value and the number
/// of bytes consumed. Trailing bytes are left to the caller.
pub fn read_double(buf: &[u8], offset: usize) -> Result<(f64, usize)> {
    de::Parser::new().read_f64(buf, offset)
}

pub fn read_single(buf: &[u8], offset: usize) -> Result<(f32, usize)> {
    de::Parser::new().read_f32(buf, offset)
}
