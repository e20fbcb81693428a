//! Canonical reference pattern.

use crate::BitVector;

/// Side length of the ring bitmap.
pub const RING_COLUMNS: usize = 16;

/// Number of bits in the ring bitmap.
pub const RING_BITS: usize = RING_COLUMNS * RING_COLUMNS;

#[rustfmt::skip]
const RING: [u8; RING_BITS] = [
    0,0,0,0,0,1,1,1,1,1,1,0,0,0,0,0,
    0,0,0,1,1,1,1,1,1,1,1,1,1,0,0,0,
    0,0,1,1,1,1,0,0,0,0,1,1,1,1,0,0,
    0,1,1,1,1,0,0,0,0,0,0,1,1,1,1,0,
    0,1,1,1,0,0,0,0,0,0,0,0,1,1,1,0,
    1,1,1,0,0,0,0,0,0,0,0,0,0,1,1,1,
    1,1,1,0,0,0,0,0,0,0,0,0,0,1,1,1,
    1,1,1,0,0,0,0,0,0,0,0,0,0,1,1,1,
    1,1,1,0,0,0,0,0,0,0,0,0,0,1,1,1,
    1,1,1,0,0,0,0,0,0,0,0,0,0,1,1,1,
    1,1,1,0,0,0,0,0,0,0,0,0,0,1,1,1,
    0,1,1,1,0,0,0,0,0,0,0,0,1,1,1,0,
    0,1,1,1,1,0,0,0,0,0,0,1,1,1,1,0,
    0,0,1,1,1,1,0,0,0,0,1,1,1,1,0,0,
    0,0,0,1,1,1,1,1,1,1,1,1,1,0,0,0,
    0,0,0,0,0,1,1,1,1,1,1,0,0,0,0,0,
];

/// The 16x16 ring bitmap, row-major, as a 256-bit vector.
pub fn ring() -> BitVector {
    let bits: Vec<bool> = RING.iter().map(|&b| b == 1).collect();
    BitVector::from_bools(&bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_shape() {
        let r = ring();
        assert_eq!(r.len(), RING_BITS);
        assert_eq!(r.popcount(), RING.iter().filter(|&&b| b == 1).count());
        // corners empty, left edge of the middle row set
        assert!(!r.get_bit(0));
        assert!(!r.get_bit(RING_BITS - 1));
        assert!(r.get_bit(7 * RING_COLUMNS));
    }

    #[test]
    fn test_ring_is_symmetric() {
        let r = ring();
        for row in 0..RING_COLUMNS {
            for col in 0..RING_COLUMNS {
                let mirrored = row * RING_COLUMNS + (RING_COLUMNS - 1 - col);
                assert_eq!(r.get_bit(row * RING_COLUMNS + col), r.get_bit(mirrored));
            }
        }
    }
}
