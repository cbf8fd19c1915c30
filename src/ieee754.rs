use crate::diy_fp::DiyFp;
use std::fmt;
use std::ops;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FloatClass {
    Nan,
    Infinity,
    Zero,
    Finite,
}

/// Bit-level view of a binary IEEE-754 value.
///
/// Everything is derived from `SIGNIFICAND_BITS` and `EXPONENT_BITS`, the
/// widths of the stored fields. The value is decomposed as `f * 2^e` where
/// `f` includes the hidden bit for normal numbers.
pub(crate) trait IeeeFloat:
    Copy
    + PartialEq
    + fmt::Debug
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
    + ops::Neg<Output = Self>
{
    /// Stored significand bits, excluding the hidden bit.
    const SIGNIFICAND_BITS: u32;
    const EXPONENT_BITS: u32;

    /// Upper bound of the shortest round-trip digit count.
    const MAX_SHORTEST_DIGITS: usize;

    /// Decimal digits that always fit in the significand exactly.
    const MAX_EXACT_DIGITS: usize;

    /// Largest `n` such that `10^n` is exactly representable.
    const MAX_EXACT_POW10: i32;

    /// A value `d.ddd * 10^n` overflows once `n` reaches this.
    const MAX_DECIMAL_POWER: i32;

    /// A value `0.d1d2.. * 10^n` rounds to zero when `n` is at most this.
    const MIN_DECIMAL_POWER: i32;

    const INFINITY: Self;
    const NAN: Self;
    const ZERO: Self;

    fn to_u64_bits(self) -> u64;
    fn from_u64_bits(bits: u64) -> Self;

    /// Exact for `v < 2^(SIGNIFICAND_BITS + 1)`.
    fn from_u64(v: u64) -> Self;

    /// `10^n` for `0 <= n <= MAX_EXACT_POW10`.
    fn exact_pow10(n: usize) -> Self;

    fn hidden_bit() -> u64 {
        1 << Self::SIGNIFICAND_BITS
    }

    fn significand_mask() -> u64 {
        Self::hidden_bit() - 1
    }

    fn exponent_mask() -> u64 {
        ((1 << Self::EXPONENT_BITS) - 1) << Self::SIGNIFICAND_BITS
    }

    /// Bias such that `value = f * 2^(biased_exponent - EXPONENT_BIAS)`.
    fn exponent_bias() -> i32 {
        (1 << (Self::EXPONENT_BITS - 1)) - 1 + Self::SIGNIFICAND_BITS as i32
    }

    fn denormal_exponent() -> i32 {
        1 - Self::exponent_bias()
    }

    fn max_exponent() -> i32 {
        (1 << Self::EXPONENT_BITS) - 1 - Self::exponent_bias()
    }

    fn sign_bit(self) -> bool {
        (self.to_u64_bits() >> (Self::SIGNIFICAND_BITS + Self::EXPONENT_BITS)) & 1 == 1
    }

    fn biased_exponent(self) -> u64 {
        (self.to_u64_bits() & Self::exponent_mask()) >> Self::SIGNIFICAND_BITS
    }

    fn significand_bits(self) -> u64 {
        self.to_u64_bits() & Self::significand_mask()
    }

    fn is_sign_negative(self) -> bool {
        self.sign_bit()
    }

    fn classify(self) -> FloatClass {
        let all_ones = (1 << Self::EXPONENT_BITS) - 1;
        match (self.biased_exponent(), self.significand_bits()) {
            (e, 0) if e == all_ones => FloatClass::Infinity,
            (e, _) if e == all_ones => FloatClass::Nan,
            (0, 0) => FloatClass::Zero,
            _ => FloatClass::Finite,
        }
    }

    fn is_denormal(self) -> bool {
        self.biased_exponent() == 0
    }

    /// 2-based exponent such that the value is `significand() * 2^exponent()`.
    fn exponent(self) -> i32 {
        if self.is_denormal() {
            Self::denormal_exponent()
        } else {
            self.biased_exponent() as i32 - Self::exponent_bias()
        }
    }

    /// Significand including the hidden bit for normal numbers.
    fn significand(self) -> u64 {
        if self.is_denormal() {
            self.significand_bits()
        } else {
            self.significand_bits() + Self::hidden_bit()
        }
    }

    /// Absolute value as an unnormalized `DiyFp`. Finite values only.
    fn as_diy_fp(self) -> DiyFp {
        debug_assert_eq!(IeeeFloat::classify(self), FloatClass::Finite);
        DiyFp::new(self.significand(), self.exponent())
    }

    fn as_normalized_diy_fp(self) -> DiyFp {
        self.as_diy_fp().normalize()
    }

    /// The gap to the next lower value is half the gap to the next higher
    /// one when the significand is a power of two, except at the smallest
    /// normal exponent where both gaps are equal.
    fn lower_boundary_is_closer(self) -> bool {
        self.significand_bits() == 0 && self.exponent() != Self::denormal_exponent()
    }

    /// Returns `(m_minus, m_plus)`, the midpoints to the neighbouring values.
    /// Both share the exponent of the normalized `m_plus`, which is also the
    /// exponent of `as_normalized_diy_fp()`.
    fn normalized_boundaries(self) -> (DiyFp, DiyFp) {
        let v = self.as_diy_fp();
        let m_plus = DiyFp::new((v.f << 1) + 1, v.e - 1).normalize();
        let m_minus = if self.lower_boundary_is_closer() {
            DiyFp::new((v.f << 2) - 1, v.e - 2)
        } else {
            DiyFp::new((v.f << 1) - 1, v.e - 1)
        };
        let m_minus = DiyFp::new(m_minus.f << (m_minus.e - m_plus.e), m_plus.e);
        (m_minus, m_plus)
    }

    /// Builds the value `f * 2^e`. Bits of `f` that do not fit are expected
    /// to be zero. Overflows to infinity, underflows to zero.
    fn from_diy_fp(fp: DiyFp) -> Self {
        let mut significand = fp.f;
        let mut exponent = fp.e;
        while significand > Self::hidden_bit() + Self::significand_mask() {
            significand >>= 1;
            exponent += 1;
        }
        if exponent >= Self::max_exponent() {
            return Self::INFINITY;
        }
        if exponent < Self::denormal_exponent() {
            let shift = (Self::denormal_exponent() - exponent) as u32;
            if shift >= 64 || significand.trailing_zeros() < shift {
                return Self::ZERO;
            }
            significand >>= shift;
            exponent = Self::denormal_exponent();
        }
        while exponent > Self::denormal_exponent() && significand & Self::hidden_bit() == 0 {
            significand <<= 1;
            exponent -= 1;
        }
        let biased_exponent =
            if exponent == Self::denormal_exponent() && significand & Self::hidden_bit() == 0 {
                0
            } else {
                (exponent + Self::exponent_bias()) as u64
            };
        Self::from_u64_bits(
            (significand & Self::significand_mask()) | (biased_exponent << Self::SIGNIFICAND_BITS),
        )
    }

    /// Number of significand bits available to a value whose normalized
    /// `DiyFp` would have exponent `order - 64`. Less than the full precision
    /// for subnormals.
    fn significand_size_for_order_of_magnitude(order: i32) -> i32 {
        let denormal = Self::denormal_exponent();
        let full = Self::SIGNIFICAND_BITS as i32 + 1;
        if order >= denormal + full {
            full
        } else if order <= denormal {
            0
        } else {
            order - denormal
        }
    }
}

static F64_POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

static F32_POW10: [f32; 11] = [1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10];

impl IeeeFloat for f64 {
    const SIGNIFICAND_BITS: u32 = 52;
    const EXPONENT_BITS: u32 = 11;
    const MAX_SHORTEST_DIGITS: usize = 17;
    const MAX_EXACT_DIGITS: usize = 15;
    const MAX_EXACT_POW10: i32 = 22;
    const MAX_DECIMAL_POWER: i32 = 309;
    const MIN_DECIMAL_POWER: i32 = -324;
    const INFINITY: Self = f64::INFINITY;
    const NAN: Self = f64::NAN;
    const ZERO: Self = 0.0;

    fn to_u64_bits(self) -> u64 {
        self.to_bits()
    }

    fn from_u64_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    fn from_u64(v: u64) -> Self {
        v as f64
    }

    fn exact_pow10(n: usize) -> Self {
        F64_POW10[n]
    }
}

impl IeeeFloat for f32 {
    const SIGNIFICAND_BITS: u32 = 23;
    const EXPONENT_BITS: u32 = 8;
    const MAX_SHORTEST_DIGITS: usize = 9;
    const MAX_EXACT_DIGITS: usize = 7;
    const MAX_EXACT_POW10: i32 = 10;
    const MAX_DECIMAL_POWER: i32 = 39;
    const MIN_DECIMAL_POWER: i32 = -46;
    const INFINITY: Self = f32::INFINITY;
    const NAN: Self = f32::NAN;
    const ZERO: Self = 0.0;

    fn to_u64_bits(self) -> u64 {
        self.to_bits() as u64
    }

    fn from_u64_bits(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }

    fn from_u64(v: u64) -> Self {
        v as f32
    }

    fn exact_pow10(n: usize) -> Self {
        F32_POW10[n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(f64::exponent_bias(), 1075);
        assert_eq!(f64::denormal_exponent(), -1074);
        assert_eq!(f64::max_exponent(), 972);
        assert_eq!(f32::exponent_bias(), 150);
        assert_eq!(f32::denormal_exponent(), -149);
        assert_eq!(f32::max_exponent(), 105);
    }

    #[test]
    fn test_classify() {
        assert_eq!(IeeeFloat::classify(f64::NAN), FloatClass::Nan);
        assert_eq!(IeeeFloat::classify(f64::INFINITY), FloatClass::Infinity);
        assert_eq!(IeeeFloat::classify(f64::NEG_INFINITY), FloatClass::Infinity);
        assert_eq!(IeeeFloat::classify(0.0f64), FloatClass::Zero);
        assert_eq!(IeeeFloat::classify(-0.0f64), FloatClass::Zero);
        assert_eq!(IeeeFloat::classify(5e-324f64), FloatClass::Finite);
        assert_eq!(IeeeFloat::classify(f32::NAN), FloatClass::Nan);
        assert_eq!(IeeeFloat::classify(f32::NEG_INFINITY), FloatClass::Infinity);
        assert_eq!(IeeeFloat::classify(f32::MIN_POSITIVE), FloatClass::Finite);

        assert!(IeeeFloat::is_sign_negative(f64::NEG_INFINITY));
        assert!(IeeeFloat::is_sign_negative(-0.0f64));
        assert!(!IeeeFloat::is_sign_negative(0.0f32));
        assert!(IeeeFloat::is_sign_negative(-f32::NAN));
    }

    #[test]
    fn test_decompose() {
        let one = 1.0f64;
        assert_eq!(one.significand(), 1 << 52);
        assert_eq!(one.exponent(), -52);
        assert_eq!(one.biased_exponent(), 1023);

        let min = 5e-324f64;
        assert_eq!(min.as_diy_fp(), DiyFp::new(1, -1074));

        let one = 1.0f32;
        assert_eq!(one.as_diy_fp(), DiyFp::new(1 << 23, -23));
        assert_eq!(f32::from_bits(1).as_diy_fp(), DiyFp::new(1, -149));
    }

    #[test]
    fn test_boundaries() {
        // 1.0 sits at a power of two, so its lower neighbour is closer.
        let (m_minus, m_plus) = 1.0f64.normalized_boundaries();
        assert_eq!(m_plus.e, 1.0f64.as_normalized_diy_fp().e);
        assert_eq!(m_plus.f - (1 << 63), 1 << 10);
        assert_eq!((1 << 63) - m_minus.f, 1 << 9);

        let (m_minus, m_plus) = 1.5f64.normalized_boundaries();
        let w = 1.5f64.as_normalized_diy_fp();
        assert_eq!(m_plus.f - w.f, w.f - m_minus.f);

        // Smallest normal: both gaps equal.
        assert!(!f64::MIN_POSITIVE.lower_boundary_is_closer());
        assert!(2.0f32.lower_boundary_is_closer());
    }

    #[test]
    fn test_from_diy_fp() {
        for &v in &[1.0f64, 0.1, 5e-324, 2.2250738585072014e-308, f64::MAX, 123.456] {
            assert_eq!(f64::from_diy_fp(v.as_diy_fp()), v);
            assert_eq!(f64::from_diy_fp(v.as_normalized_diy_fp()), v);
        }
        for &v in &[1.0f32, 0.1, 1e-45, f32::MAX] {
            assert_eq!(f32::from_diy_fp(v.as_normalized_diy_fp()), v);
        }
        assert_eq!(f64::from_diy_fp(DiyFp::new(1 << 53, 971)), f64::INFINITY);
        assert_eq!(f64::from_diy_fp(DiyFp::new(1, -1075)), 0.0);
    }

    #[test]
    fn test_significand_size() {
        assert_eq!(f64::significand_size_for_order_of_magnitude(0), 53);
        assert_eq!(f64::significand_size_for_order_of_magnitude(-1074), 0);
        assert_eq!(f64::significand_size_for_order_of_magnitude(-1070), 4);
        assert_eq!(f32::significand_size_for_order_of_magnitude(-140), 9);
    }
}
