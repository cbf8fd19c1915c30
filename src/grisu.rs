//! Shortest digit generation with Grisu3.
//!
//! Florian Loitsch, "Printing Floating-Point Numbers Quickly and Accurately
//! with Integers", PLDI 2010. The value and its rounding boundaries are scaled
//! by a cached power of ten so that the integral part fits in 32 bits, then
//! digits are cut until the remainder falls inside the boundaries. All of this
//! is done in 64-bit arithmetic with a tracked imprecision of one `unit`; when
//! that imprecision makes the last digit ambiguous, generation gives up.

use crate::cached_powers;
use crate::diy_fp::DiyFp;
use crate::digits::DigitBuffer;
use crate::ieee754::IeeeFloat;

const MINIMAL_TARGET_EXPONENT: i32 = -60;
const MAXIMAL_TARGET_EXPONENT: i32 = -32;

static SMALL_POWERS_OF_TEN: [u32; 11] = [
    0, 1, 10, 100, 1000, 10000, 100000, 1000000, 10000000, 100000000, 1000000000,
];

/// Shortest digits of a positive finite value, or `None` if the result
/// cannot be proven correct with 64-bit arithmetic.
pub(crate) fn shortest<F: IeeeFloat>(v: F) -> Option<DigitBuffer> {
    let w = v.as_normalized_diy_fp();
    let (boundary_minus, boundary_plus) = v.normalized_boundaries();
    debug_assert_eq!(boundary_plus.e, w.e);

    let ten_mk_minimal_binary_exponent = MINIMAL_TARGET_EXPONENT - (w.e + DiyFp::SIGNIFICAND_SIZE);
    let ten_mk_maximal_binary_exponent = MAXIMAL_TARGET_EXPONENT - (w.e + DiyFp::SIGNIFICAND_SIZE);
    let (ten_mk, mk) = cached_powers::for_binary_exponent_range(
        ten_mk_minimal_binary_exponent,
        ten_mk_maximal_binary_exponent,
    );

    let scaled_w = w.times(ten_mk);
    let scaled_boundary_minus = boundary_minus.times(ten_mk);
    let scaled_boundary_plus = boundary_plus.times(ten_mk);

    let mut buffer = DigitBuffer::default();
    let kappa = digit_gen(
        scaled_boundary_minus,
        scaled_w,
        scaled_boundary_plus,
        &mut buffer,
    )?;
    buffer.decimal_point = buffer.len() as i32 - mk + kappa;
    Some(buffer)
}

/// Returns `(power, exponent_plus_one)` with `power = 10^(exponent_plus_one - 1)`
/// being the largest power of ten not above `number`. `number` must be below
/// `2^(number_bits + 1)`.
fn biggest_power_ten(number: u32, number_bits: i32) -> (u32, i32) {
    debug_assert!((number as u64) < (1u64 << (number_bits + 1)));
    let mut guess = ((number_bits + 1) * 1233 >> 12) + 1;
    if number < SMALL_POWERS_OF_TEN[guess as usize] {
        guess -= 1;
    }
    (SMALL_POWERS_OF_TEN[guess as usize], guess)
}

/// Generates digits of `too_high` (the upper boundary plus one unit) until
/// the remainder is within the unsafe interval, then lets `round_weed` pick
/// the last digit. Returns `kappa`: the value is `digits * 10^kappa` scaled
/// by the cached power.
///
/// `low`, `w` and `high` share the exponent, which must be within the target
/// window so that one `unit` can be represented and multiplied by ten without
/// overflow.
fn digit_gen(low: DiyFp, w: DiyFp, high: DiyFp, buffer: &mut DigitBuffer) -> Option<i32> {
    debug_assert!(low.e == w.e && w.e == high.e);
    debug_assert!(low.f + 1 <= high.f - 1);
    debug_assert!(MINIMAL_TARGET_EXPONENT <= w.e && w.e <= MAXIMAL_TARGET_EXPONENT);

    let mut unit = 1u64;
    let too_low = DiyFp::new(low.f - unit, low.e);
    let too_high = DiyFp::new(high.f + unit, high.e);
    let mut unsafe_interval = too_high.minus(too_low);
    let one = DiyFp::new(1 << -w.e, w.e);
    let mut integrals = (too_high.f >> -one.e) as u32;
    let mut fractionals = too_high.f & (one.f - 1);
    let (mut divisor, divisor_exponent_plus_one) =
        biggest_power_ten(integrals, DiyFp::SIGNIFICAND_SIZE - (-one.e));
    let mut kappa = divisor_exponent_plus_one;

    while kappa > 0 {
        let digit = integrals / divisor;
        if !buffer.push(digit as u8) {
            return None;
        }
        integrals %= divisor;
        kappa -= 1;
        let rest = ((integrals as u64) << -one.e) + fractionals;
        if rest < unsafe_interval.f {
            return round_weed(
                buffer,
                too_high.minus(w).f,
                unsafe_interval.f,
                rest,
                (divisor as u64) << -one.e,
                unit,
            )
            .then(|| kappa);
        }
        divisor /= 10;
    }

    debug_assert!(one.e >= -60);
    debug_assert!(fractionals < one.f);
    loop {
        fractionals *= 10;
        unit *= 10;
        unsafe_interval.f *= 10;
        let digit = (fractionals >> -one.e) as u8;
        if !buffer.push(digit) {
            return None;
        }
        fractionals &= one.f - 1;
        kappa -= 1;
        if fractionals < unsafe_interval.f {
            return round_weed(
                buffer,
                too_high.minus(w).f * unit,
                unsafe_interval.f,
                fractionals,
                one.f,
                unit,
            )
            .then(|| kappa);
        }
    }
}

/// Moves the last digit towards `w` while the candidate stays inside the
/// unsafe interval and gets closer, then checks that the result is
/// unambiguous given an imprecision of `unit` on every quantity.
///
/// All distances are measured downwards from `too_high`:
/// - `distance_too_high_w`: `too_high - w`
/// - `unsafe_interval`: `too_high - too_low`
/// - `rest`: `too_high - buffer`
/// - `ten_kappa`: the weight of the last digit
fn round_weed(
    buffer: &mut DigitBuffer,
    distance_too_high_w: u64,
    unsafe_interval: u64,
    mut rest: u64,
    ten_kappa: u64,
    unit: u64,
) -> bool {
    let small_distance = distance_too_high_w - unit;
    let big_distance = distance_too_high_w + unit;
    debug_assert!(rest <= unsafe_interval);

    while rest < small_distance
        && unsafe_interval - rest >= ten_kappa
        && (rest + ten_kappa < small_distance
            || small_distance - rest >= rest + ten_kappa - small_distance)
    {
        buffer.decrement_last();
        rest += ten_kappa;
    }

    // If the next lower candidate could still be closer to the real value,
    // the imprecision does not allow to choose.
    if rest < big_distance
        && unsafe_interval - rest >= ten_kappa
        && (rest + ten_kappa < big_distance
            || big_distance - rest > rest + ten_kappa - big_distance)
    {
        return false;
    }

    // The candidate must be safely inside the interval.
    2 * unit <= rest && rest <= unsafe_interval - 4 * unit
}
