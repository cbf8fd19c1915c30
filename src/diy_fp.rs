/// "Do it yourself" floating point: `f * 2^e` with a full 64-bit significand
/// and no hidden bit. Used as the extended-precision scratch type by both the
/// shortest digit generator and the decimal parser.
///
/// Arithmetic is not exact. `times` rounds to the upper 64 bits of the
/// product, so each multiplication adds at most half a unit in the last place.
/// Callers account for that in their own error bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DiyFp {
    pub f: u64,
    pub e: i32,
}

impl DiyFp {
    pub const SIGNIFICAND_SIZE: i32 = 64;

    pub fn new(f: u64, e: i32) -> Self {
        Self { f, e }
    }

    /// `self - other`. Both must share the exponent and `self.f >= other.f`.
    pub fn minus(self, other: Self) -> Self {
        debug_assert_eq!(self.e, other.e);
        debug_assert!(self.f >= other.f);
        Self::new(self.f - other.f, self.e)
    }

    /// Rounded product. The lower 64 bits of the 128-bit product are only
    /// used to round the upper half.
    pub fn times(self, other: Self) -> Self {
        let product = (self.f as u128) * (other.f as u128) + (1u128 << 63);
        Self::new((product >> 64) as u64, self.e + other.e + Self::SIGNIFICAND_SIZE)
    }

    /// Shift left until the top bit is set.
    pub fn normalize(self) -> Self {
        debug_assert_ne!(self.f, 0);
        let shift = self.f.leading_zeros();
        Self::new(self.f << shift, self.e - shift as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minus() {
        let d = DiyFp::new(3, 0).minus(DiyFp::new(1, 0));
        assert_eq!(d, DiyFp::new(2, 0));
    }

    #[test]
    fn test_times() {
        let d = DiyFp::new(3, 0).times(DiyFp::new(1 << 63, 4));
        assert_eq!(d, DiyFp::new(2, 68));

        let d = DiyFp::new(0x8000_0000_0000_0000, 11).times(DiyFp::new(2, 13));
        assert_eq!(d, DiyFp::new(1, 88));

        // Rounds half up.
        let d = DiyFp::new(0x8000_0000_0000_0001, 11).times(DiyFp::new(1, 13));
        assert_eq!(d, DiyFp::new(1, 88));
        let d = DiyFp::new(0x7fff_ffff_ffff_ffff, 11).times(DiyFp::new(1, 13));
        assert_eq!(d, DiyFp::new(0, 88));

        let d = DiyFp::new(u64::MAX, 11).times(DiyFp::new(u64::MAX, 13));
        assert_eq!(d, DiyFp::new(0xffff_ffff_ffff_fffe, 88));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(DiyFp::new(1, 0).normalize(), DiyFp::new(1 << 63, -63));
        assert_eq!(
            DiyFp::new(0x0010_0000_0000_0000, -1074).normalize(),
            DiyFp::new(1 << 63, -1085)
        );
        let n = DiyFp::new(u64::MAX, 5).normalize();
        assert_eq!(n, DiyFp::new(u64::MAX, 5));
    }
}
