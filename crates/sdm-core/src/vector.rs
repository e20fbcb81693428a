//! Bit vector implementation.
//!
//! Fixed-length binary vectors packed into `u64` words, used as addresses,
//! data and results alike.

use crate::{Result, SdmError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ops::{BitXor, Not};

const WORD_BITS: usize = 64;

/// A fixed-length binary vector stored in packed `u64` words.
///
/// The length is chosen at construction and never changes. Bits past the
/// length in the last word are always zero, so word-wise operations such as
/// XOR and popcount never see garbage.
///
/// # Example
/// ```
/// use sdm_core::BitVector;
///
/// let a = BitVector::from_bits(&[1, 0, 1, 1]).unwrap();
/// let b = BitVector::from_bits(&[1, 1, 1, 0]).unwrap();
///
/// assert_eq!(a.distance(&b), 2);
/// assert_eq!((!a.clone()).to_bits(), vec![0, 1, 0, 0]);
/// ```
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BitVectorRepr", into = "BitVectorRepr")]
pub struct BitVector {
    len: usize,
    words: Box<[u64]>,
}

#[inline]
fn words_for(len: usize) -> usize {
    len.div_ceil(WORD_BITS)
}

impl BitVector {
    /// Create an all-zero vector of `len` bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            words: vec![0u64; words_for(len)].into_boxed_slice(),
        }
    }

    /// Create a vector of `len` bits, all set to 1.
    pub fn ones(len: usize) -> Self {
        let mut v = Self {
            len,
            words: vec![u64::MAX; words_for(len)].into_boxed_slice(),
        };
        v.mask_tail();
        v
    }

    /// Draw every bit independently and uniformly from `rng`.
    pub fn random<R: rand::Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut v = Self::zeros(len);
        for word in v.words.iter_mut() {
            *word = rng.gen();
        }
        v.mask_tail();
        v
    }

    /// Derive a vector deterministically from a seed string.
    ///
    /// The seed is hashed with SHA-256 together with a running chunk index
    /// and the digests are laid end to end until `len` bits are filled.
    pub fn from_seed(seed: &str, len: usize) -> Self {
        let mut v = Self::zeros(len);
        let word_count = v.words.len();
        let mut hasher = Sha256::new();

        for chunk_idx in 0..(word_count * 8).div_ceil(32) {
            hasher.update(seed.as_bytes());
            hasher.update((chunk_idx as u64).to_le_bytes());
            let hash = hasher.finalize_reset();

            let start_word = chunk_idx * 4;
            for (i, chunk) in hash.chunks(8).enumerate() {
                let word_idx = start_word + i;
                if word_idx < word_count {
                    let mut arr = [0u8; 8];
                    arr.copy_from_slice(chunk);
                    v.words[word_idx] = u64::from_le_bytes(arr);
                }
            }
        }

        v.mask_tail();
        v
    }

    /// Build a vector from a slice of 0/1 values.
    ///
    /// Any other value is rejected rather than coerced.
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        let mut v = Self::zeros(bits.len());
        for (index, &value) in bits.iter().enumerate() {
            match value {
                0 => {}
                1 => v.words[index / WORD_BITS] |= 1u64 << (index % WORD_BITS),
                _ => return Err(SdmError::InvalidBit { index, value }),
            }
        }
        Ok(v)
    }

    /// Build a vector from booleans.
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut v = Self::zeros(bits.len());
        for (index, &bit) in bits.iter().enumerate() {
            if bit {
                v.words[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
            }
        }
        v
    }

    /// Unpack into one 0/1 byte per bit.
    pub fn to_bits(&self) -> Vec<u8> {
        self.iter().map(u8::from).collect()
    }

    /// Iterate over the bits in index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1)
    }

    /// Decode `len` bits from little-endian packed bytes.
    pub fn from_bytes(bytes: &[u8], len: usize) -> Result<Self> {
        let expected = len.div_ceil(8);
        if bytes.len() != expected {
            return Err(SdmError::InvalidSize {
                expected,
                actual: bytes.len(),
            });
        }

        let mut v = Self::zeros(len);
        for (i, chunk) in bytes.chunks(8).enumerate() {
            let mut arr = [0u8; 8];
            arr[..chunk.len()].copy_from_slice(chunk);
            v.words[i] = u64::from_le_bytes(arr);
        }
        v.mask_tail();
        Ok(v)
    }

    /// Encode as little-endian packed bytes (`ceil(len / 8)` of them).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * 8);
        for word in self.words.iter() {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes.truncate(self.len.div_ceil(8));
        bytes
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for the zero-length vector.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Hamming distance to a vector of the same length.
    ///
    /// Compares word by word, so a longer `other` contributes only its
    /// overlapping words. Use [`crate::hamming_distance`] when the lengths
    /// are not already known to match.
    #[inline]
    pub fn distance(&self, other: &Self) -> usize {
        debug_assert_eq!(self.len, other.len);
        self.words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| (a ^ b).count_ones() as usize)
            .sum()
    }

    /// Similarity score in `[0, 1]`; 1.0 for identical vectors.
    #[inline]
    pub fn similarity(&self, other: &Self) -> f64 {
        if self.len == 0 {
            return 1.0;
        }
        1.0 - (self.distance(other) as f64 / self.len as f64)
    }

    /// Count the number of set bits.
    #[inline]
    pub fn popcount(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Read a bit. Out-of-range indices read as 0.
    #[inline]
    pub fn get_bit(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// Write a bit. Out-of-range indices are ignored.
    #[inline]
    pub fn set_bit(&mut self, index: usize, value: bool) {
        if index >= self.len {
            return;
        }
        let mask = 1u64 << (index % WORD_BITS);
        if value {
            self.words[index / WORD_BITS] |= mask;
        } else {
            self.words[index / WORD_BITS] &= !mask;
        }
    }

    /// Invert a bit in place. Out-of-range indices are ignored.
    #[inline]
    pub fn flip_bit(&mut self, index: usize) {
        if index < self.len {
            self.words[index / WORD_BITS] ^= 1u64 << (index % WORD_BITS);
        }
    }

    /// Bitwise complement.
    pub fn complement(&self) -> Self {
        let mut v = Self {
            len: self.len,
            words: self.words.iter().map(|w| !w).collect(),
        };
        v.mask_tail();
        v
    }

    /// Hex encoding of [`to_bytes`](Self::to_bytes).
    pub fn to_hex(&self) -> String {
        self.to_bytes().iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Decode `len` bits from a hex string produced by [`to_hex`](Self::to_hex).
    pub fn from_hex(hex: &str, len: usize) -> Result<Self> {
        if hex.len() % 2 != 0 || !hex.is_ascii() {
            return Err(SdmError::InvalidHex(hex.to_string()));
        }

        let bytes: std::result::Result<Vec<u8>, _> = (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
            .collect();

        match bytes {
            Ok(b) => Self::from_bytes(&b, len),
            Err(_) => Err(SdmError::InvalidHex(hex.to_string())),
        }
    }

    /// Clear the unused high bits of the last word.
    fn mask_tail(&mut self) {
        let valid_bits_in_last_word = self.len % WORD_BITS;
        if valid_bits_in_last_word > 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << valid_bits_in_last_word) - 1;
            }
        }
    }
}

impl BitXor for &BitVector {
    type Output = BitVector;

    fn bitxor(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.len, rhs.len);
        BitVector {
            len: self.len,
            words: self
                .words
                .iter()
                .zip(rhs.words.iter())
                .map(|(a, b)| a ^ b)
                .collect(),
        }
    }
}

impl Not for BitVector {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.complement()
    }
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitVector(len={}, popcount={}, hex={})",
            self.len,
            self.popcount(),
            self.to_hex()
        )
    }
}

/// Wire form: bit length plus packed hex, so lengths that are not a
/// multiple of eight survive a round trip.
#[derive(Serialize, Deserialize)]
struct BitVectorRepr {
    bits: usize,
    hex: String,
}

impl From<BitVector> for BitVectorRepr {
    fn from(v: BitVector) -> Self {
        Self {
            bits: v.len,
            hex: v.to_hex(),
        }
    }
}

impl TryFrom<BitVectorRepr> for BitVector {
    type Error = SdmError;

    fn try_from(repr: BitVectorRepr) -> Result<Self> {
        BitVector::from_hex(&repr.hex, repr.bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zeros_and_ones() {
        let z = BitVector::zeros(70);
        let o = BitVector::ones(70);
        assert_eq!(z.popcount(), 0);
        assert_eq!(o.popcount(), 70);
        assert_eq!(z.distance(&o), 70);
    }

    #[test]
    fn test_tail_stays_masked() {
        let mut rng = StdRng::seed_from_u64(42);
        let v = BitVector::random(67, &mut rng);
        assert!(v.popcount() <= 67);
        assert_eq!(v.complement().popcount(), 67 - v.popcount());
    }

    #[test]
    fn test_from_bits_rejects_non_binary() {
        let err = BitVector::from_bits(&[0, 1, 2]).unwrap_err();
        assert_eq!(err, SdmError::InvalidBit { index: 2, value: 2 });
    }

    #[test]
    fn test_bits_round_trip() {
        let bits = [1u8, 0, 0, 1, 1, 0, 1];
        let v = BitVector::from_bits(&bits).unwrap();
        assert_eq!(v.to_bits(), bits.to_vec());
        assert_eq!(v, BitVector::from_bools(&[true, false, false, true, true, false, true]));
    }

    #[test]
    fn test_seeded_vectors() {
        let a = BitVector::from_seed("ring", 256);
        let b = BitVector::from_seed("ring", 256);
        let c = BitVector::from_seed("square", 256);
        assert_eq!(a, b);
        assert!(a.distance(&c) > 0);
    }

    #[test]
    fn test_set_get_flip() {
        let mut v = BitVector::zeros(10);
        v.set_bit(3, true);
        assert!(v.get_bit(3));
        v.flip_bit(3);
        assert!(!v.get_bit(3));
        v.set_bit(10, true);
        assert_eq!(v.popcount(), 0);
        assert!(!v.get_bit(99));
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(BitVector::from_hex("abc", 12).is_err());
        assert!(BitVector::from_hex("zz", 8).is_err());
        assert!(matches!(
            BitVector::from_hex("ff", 16),
            Err(SdmError::InvalidSize { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_serde_keeps_length() {
        let v = BitVector::from_bits(&[1, 1, 0, 1, 0]).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let back: BitVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 5);
        assert_eq!(back, v);
    }

    #[test]
    fn test_xor_counts_differences() {
        let a = BitVector::from_seed("a", 256);
        let b = BitVector::from_seed("b", 256);
        assert_eq!((&a ^ &b).popcount(), a.distance(&b));
    }

    #[test]
    fn test_empty_vector() {
        let v = BitVector::zeros(0);
        assert!(v.is_empty());
        assert_eq!(v.distance(&BitVector::ones(0)), 0);
        assert_eq!(v.similarity(&v), 1.0);
    }
}
