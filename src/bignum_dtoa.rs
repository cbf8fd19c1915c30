//! Exact shortest digit generation.
//!
//! Used when Grisu cannot decide. The value and the distances to both
//! rounding boundaries are kept as exact fractions over a common
//! denominator, so every digit and the final rounding are correct.

use crate::digits::DigitBuffer;
use crate::ieee754::IeeeFloat;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use std::cmp::Ordering;

const LOG10_2: f64 = 0.30102999566398114;

/// `10^n` as a big integer.
pub(crate) fn pow10(n: u32) -> BigUint {
    BigUint::from(10u32).pow(n)
}

/// Shortest digits of a positive finite value.
pub(crate) fn shortest<F: IeeeFloat>(v: F) -> DigitBuffer {
    log::trace!("exact digit generation for {:?}", v);

    let significand = v.significand();
    let exponent = v.exponent();
    debug_assert!(significand > 0);
    let is_even = significand & 1 == 0;
    let estimated_power = estimate_power(significand, exponent);

    // numerator / denominator == v / 10^estimated_power
    let mut numerator = BigUint::from(significand);
    let mut denominator = BigUint::one();
    let mut delta_minus = BigUint::one();
    if exponent >= 0 {
        numerator <<= exponent as usize;
        delta_minus <<= exponent as usize;
    } else {
        denominator <<= (-exponent) as usize;
    }
    if estimated_power >= 0 {
        denominator *= pow10(estimated_power as u32);
    } else {
        let scale = pow10((-estimated_power) as u32);
        numerator *= &scale;
        delta_minus *= &scale;
    }

    // Deltas are half the gaps to the neighbours. The lower gap is half as
    // wide when the boundary is closer.
    let closer = v.lower_boundary_is_closer();
    let shift = if closer { 2usize } else { 1 };
    numerator <<= shift;
    denominator <<= shift;
    let mut delta_plus = if closer {
        &delta_minus << 1usize
    } else {
        delta_minus.clone()
    };

    let mut buffer = DigitBuffer::default();
    if reaches(&numerator, &delta_plus, &denominator, is_even) {
        buffer.decimal_point = estimated_power + 1;
    } else {
        buffer.decimal_point = estimated_power;
        numerator *= 10u32;
        delta_minus *= 10u32;
        delta_plus *= 10u32;
    }

    loop {
        let (digit, remainder) = numerator.div_rem(&denominator);
        numerator = remainder;
        let digit = digit.to_u32_digits().first().copied().unwrap_or(0) as u8;
        if !buffer.push(digit) {
            break;
        }

        let in_room_minus = match numerator.cmp(&delta_minus) {
            Ordering::Less => true,
            Ordering::Equal => is_even,
            Ordering::Greater => false,
        };
        let in_room_plus = reaches(&numerator, &delta_plus, &denominator, is_even);

        match (in_room_minus, in_room_plus) {
            (false, false) => {
                numerator *= 10u32;
                delta_minus *= 10u32;
                delta_plus *= 10u32;
            }
            (true, false) => break,
            (false, true) => {
                buffer.round_up();
                break;
            }
            (true, true) => {
                // Both neighbours are acceptable: pick the closer one.
                match (&numerator << 1usize).cmp(&denominator) {
                    Ordering::Less => {}
                    Ordering::Greater => buffer.round_up(),
                    Ordering::Equal => {
                        if buffer.last_digit().map_or(false, |d| d % 2 == 1) {
                            buffer.round_up();
                        }
                    }
                }
                break;
            }
        }
    }
    buffer
}

/// Whether `(numerator + delta) / denominator` reaches one. The boundary
/// itself rounds to the value when its significand is even.
fn reaches(numerator: &BigUint, delta: &BigUint, denominator: &BigUint, is_even: bool) -> bool {
    match (numerator + delta).cmp(denominator) {
        Ordering::Greater => true,
        Ordering::Equal => is_even,
        Ordering::Less => false,
    }
}

/// `k` or `k - 1`, where `10^(k-1) <= f * 2^e < 10^k`.
fn estimate_power(significand: u64, exponent: i32) -> i32 {
    let bits = 64 - significand.leading_zeros() as i32;
    ((exponent + bits - 1) as f64 * LOG10_2 - 1e-10).ceil() as i32
}
