//! Correctly rounded conversion of `digits * 10^exponent` to binary.
//!
//! Three tiers, cheapest first:
//! 1. short inputs scaled by an exactly representable power of ten need a
//!    single IEEE multiplication or division;
//! 2. up to 20 digits are read into a `DiyFp` and scaled by a cached power,
//!    tracking the accumulated error so that only results too close to a
//!    rounding boundary are rejected;
//! 3. everything else is decided exactly with big integers.

use crate::bignum_dtoa::pow10;
use crate::cached_powers;
use crate::diy_fp::DiyFp;
use crate::ieee754::IeeeFloat;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::ToPrimitive;
use std::cmp::Ordering;

/// Digits beyond this cannot change the rounding once the last kept digit
/// is known to be followed by something nonzero.
pub(crate) const MAX_SIGNIFICANT_DIGITS: usize = 780;

/// Digits that always fit in a `u64`.
const MAX_U64_DECIMAL_DIGITS: i32 = 19;

/// Errors of the extended-precision path are counted in `1/8` ulp.
const DENOMINATOR_LOG: i32 = 3;
const DENOMINATOR: u64 = 1 << DENOMINATOR_LOG;

/// Converts the ASCII decimal digits `digits` scaled by `10^exponent` to the
/// nearest `F`, ties to even. Leading and trailing zeros are allowed.
pub(crate) fn strtod<F: IeeeFloat>(digits: &[u8], exponent: i32) -> F {
    let (digits, exponent) = trim(digits, exponent);
    if digits.is_empty() {
        return F::ZERO;
    }

    let mut cut = [0u8; MAX_SIGNIFICANT_DIGITS];
    let (digits, exponent) = if digits.len() > MAX_SIGNIFICANT_DIGITS {
        // The dropped tail is nonzero: a trailing `1` keeps it sticky.
        let kept = MAX_SIGNIFICANT_DIGITS - 1;
        cut[..kept].copy_from_slice(&digits[..kept]);
        cut[kept] = b'1';
        let dropped = (digits.len() - MAX_SIGNIFICANT_DIGITS) as i32;
        (&cut[..], exponent.saturating_add(dropped))
    } else {
        (digits, exponent)
    };

    let len = digits.len() as i32;
    if exponent.saturating_add(len - 1) >= F::MAX_DECIMAL_POWER {
        return F::INFINITY;
    }
    if exponent.saturating_add(len) <= F::MIN_DECIMAL_POWER {
        return F::ZERO;
    }

    if let Some(v) = exact_strtod(digits, exponent) {
        return v;
    }
    match diy_fp_strtod(digits, exponent) {
        (v, true) => v,
        (guess, false) => {
            log::trace!(
                "extended precision too close to a boundary near {:?}, using big integers",
                guess
            );
            bignum_strtod(digits, exponent)
        }
    }
}

fn trim(digits: &[u8], exponent: i32) -> (&[u8], i32) {
    let start = digits
        .iter()
        .position(|&d| d != b'0')
        .unwrap_or(digits.len());
    let digits = &digits[start..];
    let end = digits
        .iter()
        .rposition(|&d| d != b'0')
        .map_or(0, |i| i + 1);
    let trailing = (digits.len() - end) as i32;
    (&digits[..end], exponent.saturating_add(trailing))
}

/// Reads digits while the result cannot overflow. Returns the value and
/// the number of digits consumed.
fn read_u64(digits: &[u8]) -> (u64, usize) {
    let mut value = 0u64;
    let mut read = 0;
    for &d in digits {
        if value > u64::MAX / 10 - 1 {
            break;
        }
        value = value * 10 + (d - b'0') as u64;
        read += 1;
    }
    (value, read)
}

/// Exact when the digits fit in the significand and the power of ten is
/// exactly representable: the single rounding of IEEE arithmetic is then
/// the correct rounding.
fn exact_strtod<F: IeeeFloat>(digits: &[u8], exponent: i32) -> Option<F> {
    if digits.len() > F::MAX_EXACT_DIGITS {
        return None;
    }
    let value = F::from_u64(read_u64(digits).0);
    if exponent < 0 && -exponent <= F::MAX_EXACT_POW10 {
        return Some(value / F::exact_pow10((-exponent) as usize));
    }
    if exponent >= 0 && exponent <= F::MAX_EXACT_POW10 {
        return Some(value * F::exact_pow10(exponent as usize));
    }
    // Short digit strings can absorb part of the exponent and stay exact.
    let remaining_digits = (F::MAX_EXACT_DIGITS - digits.len()) as i32;
    if exponent >= 0 && exponent - remaining_digits <= F::MAX_EXACT_POW10 {
        let value = value * F::exact_pow10(remaining_digits as usize);
        return Some(value * F::exact_pow10((exponent - remaining_digits) as usize));
    }
    None
}

/// `10^n` for `1 <= n < DECIMAL_EXPONENT_DISTANCE`, normalized. Exact.
fn adjustment_power(n: i32) -> DiyFp {
    debug_assert!(0 < n && n < cached_powers::DECIMAL_EXPONENT_DISTANCE);
    DiyFp::new(10u64.pow(n as u32), 0).normalize()
}

/// Returns the rounded result and whether it is proven correct. When it is
/// not, the result is either correct or the next lower value.
fn diy_fp_strtod<F: IeeeFloat>(digits: &[u8], exponent: i32) -> (F, bool) {
    let (mut significand, read) = read_u64(digits);
    let remaining_decimals = (digits.len() - read) as i32;
    if remaining_decimals > 0 && digits[read] >= b'5' {
        significand += 1;
    }
    let exponent = exponent + remaining_decimals;
    let mut error: u64 = if remaining_decimals == 0 {
        0
    } else {
        DENOMINATOR / 2
    };

    let mut input = DiyFp::new(significand, 0);
    let old_e = input.e;
    input = input.normalize();
    error <<= old_e - input.e;

    if exponent < cached_powers::MIN_DECIMAL_EXPONENT {
        return (F::ZERO, true);
    }
    let (cached_power, cached_exponent) = cached_powers::for_decimal_exponent(exponent);
    if cached_exponent != exponent {
        let adjustment = exponent - cached_exponent;
        input = input.times(adjustment_power(adjustment));
        if MAX_U64_DECIMAL_DIGITS - (digits.len() as i32) < adjustment {
            // The product no longer fits in 64 bits: half an ulp lost.
            error += DENOMINATOR / 2;
        }
    }

    input = input.times(cached_power);
    // error(a*b) <= error_a + error_b + error_a*error_b/2^64 + 0.5, the cached
    // power being off by at most half an ulp.
    let error_b = DENOMINATOR / 2;
    let error_ab = if error == 0 { 0 } else { 1 };
    let fixed_error = DENOMINATOR / 2;
    error += error_b + error_ab + fixed_error;

    let old_e = input.e;
    input = input.normalize();
    error <<= old_e - input.e;

    let order_of_magnitude = DiyFp::SIGNIFICAND_SIZE + input.e;
    let effective_significand_size = F::significand_size_for_order_of_magnitude(order_of_magnitude);
    let mut precision_digits_count = DiyFp::SIGNIFICAND_SIZE - effective_significand_size;
    if precision_digits_count + DENOMINATOR_LOG >= DiyFp::SIGNIFICAND_SIZE {
        // Tiny subnormals: the scaled half-way point would not fit.
        let shift = precision_digits_count + DENOMINATOR_LOG - DiyFp::SIGNIFICAND_SIZE + 1;
        input = DiyFp::new(input.f >> shift, input.e + shift);
        error = (error >> shift) + 1 + DENOMINATOR;
        precision_digits_count -= shift;
    }

    let precision_bits_mask = (1u64 << precision_digits_count) - 1;
    let precision_bits = (input.f & precision_bits_mask) * DENOMINATOR;
    let half_way = (1u64 << (precision_digits_count - 1)) * DENOMINATOR;
    let mut rounded = DiyFp::new(
        input.f >> precision_digits_count,
        input.e + precision_digits_count,
    );
    if precision_bits >= half_way + error {
        rounded.f += 1;
    }

    let v = F::from_diy_fp(rounded);
    let ambiguous = half_way - error < precision_bits && precision_bits < half_way + error;
    (v, !ambiguous)
}

/// Exact ratio `numerator / denominator`, scaled by `2^-e2` until the
/// quotient has exactly the precision of `F`, then rounded half to even.
fn bignum_strtod<F: IeeeFloat>(digits: &[u8], exponent: i32) -> F {
    let mut numerator = digits.iter().fold(BigUint::default(), |acc, &d| {
        acc * 10u32 + (d - b'0') as u32
    });
    let mut denominator = BigUint::from(1u32);
    if exponent >= 0 {
        numerator *= pow10(exponent as u32);
    } else {
        denominator *= pow10((-exponent) as u32);
    }

    let precision = F::SIGNIFICAND_BITS as i32 + 1;
    let min_exponent = F::denormal_exponent();
    let mut e2 = (numerator.bits() as i32 - denominator.bits() as i32 - precision).max(min_exponent);

    let (mut quotient, remainder, divisor) = loop {
        let (n, d) = if e2 >= 0 {
            (numerator.clone(), &denominator << e2 as usize)
        } else {
            (&numerator << (-e2) as usize, denominator.clone())
        };
        let (q, r) = n.div_rem(&d);
        let bits = q.bits() as i32;
        if bits > precision {
            e2 += 1;
        } else if bits < precision && e2 > min_exponent {
            e2 -= 1;
        } else {
            break (q, r, d);
        }
    };

    let round_up = match (&remainder << 1usize).cmp(&divisor) {
        Ordering::Greater => true,
        Ordering::Equal => quotient.is_odd(),
        Ordering::Less => false,
    };
    if round_up {
        quotient += 1u32;
        if quotient.bits() as i32 > precision {
            quotient >>= 1usize;
            e2 += 1;
        }
    }

    let significand = quotient.to_u64().unwrap_or(0);
    F::from_diy_fp(DiyFp::new(significand, e2))
}
