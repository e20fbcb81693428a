//! Noise injection and the Hamming metric.

use crate::{BitVector, Result, SdmError};
use rand::Rng;

/// Reject probabilities outside `[0, 1]`, NaN included.
pub fn validate_probability(probability: f64) -> Result<()> {
    if (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err(SdmError::InvalidProbability(probability))
    }
}

/// Number of positions where `a` and `b` differ.
///
/// Both vectors must have the same length.
pub fn hamming_distance(a: &BitVector, b: &BitVector) -> Result<usize> {
    if a.len() != b.len() {
        return Err(SdmError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.distance(b))
}

/// Copy of `v` with every bit flipped independently with `probability`.
///
/// A bit flips when a uniform draw from `[0, 1)` falls below `probability`,
/// so `0.0` yields an exact copy and `1.0` the exact complement. The input
/// is left untouched.
pub fn noisy_copy<R: Rng + ?Sized>(
    v: &BitVector,
    probability: f64,
    rng: &mut R,
) -> Result<BitVector> {
    validate_probability(probability)?;

    let mut noisy = v.clone();
    for i in 0..v.len() {
        if rng.gen::<f64>() < probability {
            noisy.flip_bit(i);
        }
    }
    Ok(noisy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_zero_probability_is_exact_copy() {
        let mut rng = seeded_rng();
        let v = BitVector::random(300, &mut rng);
        assert_eq!(noisy_copy(&v, 0.0, &mut rng).unwrap(), v);
    }

    #[test]
    fn test_full_probability_is_complement() {
        let mut rng = seeded_rng();
        let v = BitVector::random(300, &mut rng);
        assert_eq!(noisy_copy(&v, 1.0, &mut rng).unwrap(), v.complement());
    }

    #[test]
    fn test_out_of_range_probability() {
        let mut rng = seeded_rng();
        let v = BitVector::zeros(8);
        assert_eq!(
            noisy_copy(&v, 1.5, &mut rng),
            Err(SdmError::InvalidProbability(1.5))
        );
        assert!(noisy_copy(&v, -0.1, &mut rng).is_err());
        assert!(noisy_copy(&v, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn test_expected_flip_rate() {
        let mut rng = seeded_rng();
        let n = 20_000;
        let v = BitVector::random(n, &mut rng);
        let noisy = noisy_copy(&v, 0.2, &mut rng).unwrap();
        let d = v.distance(&noisy) as f64;
        // sd = sqrt(n * p * (1 - p)) ~ 56.6; allow roughly 5 sd
        assert!((d - 0.2 * n as f64).abs() < 300.0, "distance {d}");
    }

    #[test]
    fn test_hamming_distance_length_check() {
        let a = BitVector::zeros(4);
        let b = BitVector::zeros(5);
        assert_eq!(
            hamming_distance(&a, &b),
            Err(SdmError::DimensionMismatch { expected: 4, actual: 5 })
        );
    }
}
