//! Leading/trailing zero window shared by the encoder and decoder.

/// Width of the leading-zero count field in a new-window record.
pub const LEADING_ZEROS_BITS: u8 = 5;

/// Width of the significant-bit count field in a new-window record.
/// A stored value of zero stands for 64.
pub const SIGNIFICANT_BITS_BITS: u8 = 6;

/// Largest leading-zero count that fits in [`LEADING_ZEROS_BITS`].
pub const MAX_LEADING_ZEROS: u8 = (1 << LEADING_ZEROS_BITS) - 1;

/// The span of bit positions in a 64-bit XOR delta that holds all of its
/// non-zero bits.
///
/// `leading` is the (clamped) count of high-order zero bits, `trailing` the
/// count of low-order zero bits. The clamp only ever under-reports leading
/// zeros, so the bits it gives up are still zero and the window stays exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitWindow {
    pub leading: u8,
    pub trailing: u8,
}

impl BitWindow {
    /// Computes the window of a non-zero delta, clamping the leading count to
    /// [`MAX_LEADING_ZEROS`].
    #[inline]
    pub fn of(delta: u64) -> Self {
        debug_assert!(delta != 0);
        Self {
            leading: (delta.leading_zeros() as u8).min(MAX_LEADING_ZEROS),
            trailing: delta.trailing_zeros() as u8,
        }
    }

    /// Number of bits between the leading and trailing zeros.
    #[inline]
    pub fn significant_bits(&self) -> u8 {
        64 - self.leading - self.trailing
    }

    /// Returns `true` if `other`'s non-zero bits lie within this window.
    #[inline]
    pub fn contains(&self, other: &BitWindow) -> bool {
        other.leading >= self.leading && other.trailing >= self.trailing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_leading_zeros() {
        let w = BitWindow::of((1 << 23) | 1);
        assert_eq!(w.leading, 31);
        assert_eq!(w.trailing, 0);
        assert_eq!(w.significant_bits(), 33);
    }

    #[test]
    fn test_full_width_delta() {
        let w = BitWindow::of(0x8000_0000_0000_0001);
        assert_eq!(w, BitWindow { leading: 0, trailing: 0 });
        assert_eq!(w.significant_bits(), 64);
    }

    #[test]
    fn test_sign_bit_only() {
        let w = BitWindow::of(1 << 63);
        assert_eq!(w, BitWindow { leading: 0, trailing: 63 });
        assert_eq!(w.significant_bits(), 1);
    }

    #[test]
    fn test_lowest_bit_only() {
        // 63 real leading zeros, stored as 31.
        let w = BitWindow::of(1);
        assert_eq!(w, BitWindow { leading: 31, trailing: 0 });
        assert_eq!(w.significant_bits(), 33);
    }

    #[test]
    fn test_contains() {
        let w = BitWindow { leading: 10, trailing: 8 };
        assert!(w.contains(&BitWindow { leading: 10, trailing: 8 }));
        assert!(w.contains(&BitWindow { leading: 12, trailing: 20 }));
        assert!(!w.contains(&BitWindow { leading: 9, trailing: 20 }));
        assert!(!w.contains(&BitWindow { leading: 12, trailing: 7 }));
    }
}
