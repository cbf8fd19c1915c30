/// Output region that the writers fill at an explicit offset.
///
/// The writer computes the exact length of its output first and asks the
/// sink for that many bytes, so a sink grows at most once per value.
pub trait ByteSink {
    /// Returns `offset..offset + len` as writable bytes, growing the sink if
    /// needed. Bytes before `offset` are left untouched. Bytes between the
    /// old end and `offset` are zero-filled.
    fn reserve_at(&mut self, offset: usize, len: usize) -> &mut [u8];
}

impl ByteSink for Vec<u8> {
    fn reserve_at(&mut self, offset: usize, len: usize) -> &mut [u8] {
        let end = offset + len;
        if self.len() < end {
            self.resize(end, 0);
        }
        &mut self[offset..end]
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn reserve_at(&mut self, offset: usize, len: usize) -> &mut [u8] {
        (**self).reserve_at(offset, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_grows() {
        let mut v = Vec::new();
        v.reserve_at(0, 3).copy_from_slice(b"abc");
        assert_eq!(v, b"abc");
        v.reserve_at(5, 1).copy_from_slice(b"z");
        assert_eq!(v, b"abc\0\0z");
    }

    #[test]
    fn test_vec_overwrites_in_place() {
        let mut v = b"0123456789".to_vec();
        v.reserve_at(2, 3).copy_from_slice(b"xyz");
        assert_eq!(v, b"01xyz56789");

        fn bang<S: ByteSink>(mut sink: S, offset: usize) {
            sink.reserve_at(offset, 2).copy_from_slice(b"!!");
        }
        bang(&mut v, 9);
        assert_eq!(v, b"01xyz5678!!");
    }
}
