//! The hard location table and its read/write operations.
//!
//! Every location pairs a fixed random address with a vector of signed
//! counters. Writes fan out to all locations whose address lies within the
//! Hamming radius of the written vector; reads sum the counters of the same
//! neighbourhood around the probe and threshold the sums back to bits.

use crate::noise::{noisy_copy, validate_probability};
use crate::pattern::ring;
use crate::{BitVector, Result, SdmError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

/// Activation radius as a fraction of the vector dimension.
pub const RADIUS_FRACTION: f64 = 0.451;

/// One hard location: a fixed address and the counters written through it.
#[derive(Clone)]
struct HardLocation {
    address: BitVector,
    /// Unbounded signed counters, one per dimension. Never clamped or decayed.
    counters: Box<[i64]>,
    /// Number of writes that activated this location.
    hits: u64,
}

impl HardLocation {
    fn new(address: BitVector) -> Self {
        let counters = vec![0i64; address.len()].into_boxed_slice();
        Self {
            address,
            counters,
            hits: 0,
        }
    }
}

/// An auto-associative sparse distributed memory over `n`-bit vectors.
///
/// The table holds `p` hard locations and a radius of `0.451 * n`, both
/// fixed for the table's lifetime. The same vector acts as the address that
/// selects locations and as the data stored in them.
///
/// Writes take `&mut self` and reads take `&self`; wrap the memory in
/// [`SharedMemory`](crate::SharedMemory) to share it across threads.
///
/// # Example
/// ```
/// use sdm_core::{ring, SparseDistributedMemory};
///
/// let mut sdm = SparseDistributedMemory::seeded(2000, 256, 7);
/// let key = ring();
/// sdm.enter(&key).unwrap();
/// assert_eq!(sdm.lookup(&key).unwrap(), key);
/// ```
#[derive(Clone)]
pub struct SparseDistributedMemory<R = StdRng> {
    locations: Vec<HardLocation>,
    dimension: usize,
    radius: f64,
    writes: u64,
    rng: R,
}

impl SparseDistributedMemory<StdRng> {
    /// Build a memory of `p` locations over `n` bits from an entropy-seeded RNG.
    pub fn new(p: usize, n: usize) -> Self {
        Self::with_rng(p, n, StdRng::from_entropy())
    }

    /// Build a reproducible memory: the same seed yields the same addresses
    /// and the same training noise.
    pub fn seeded(p: usize, n: usize, seed: u64) -> Self {
        Self::with_rng(p, n, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SparseDistributedMemory<R> {
    /// Build a memory drawing addresses (and later training noise) from `rng`.
    ///
    /// `p = 0` or `n = 0` produce a valid memory that stores nothing.
    pub fn with_rng(p: usize, n: usize, mut rng: R) -> Self {
        let locations = (0..p)
            .map(|_| HardLocation::new(BitVector::random(n, &mut rng)))
            .collect();
        let sdm = Self::assemble(locations, n, rng);
        debug!(locations = p, dimension = n, radius = sdm.radius, "Memory initialized");
        sdm
    }

    /// Build a memory over caller-chosen addresses.
    ///
    /// All addresses must share one length, which becomes the dimension.
    /// An empty list yields a zero-dimensional memory.
    pub fn from_addresses(addresses: Vec<BitVector>, rng: R) -> Result<Self> {
        let n = addresses.first().map_or(0, BitVector::len);
        if let Some(bad) = addresses.iter().find(|a| a.len() != n) {
            return Err(SdmError::DimensionMismatch {
                expected: n,
                actual: bad.len(),
            });
        }
        let locations = addresses.into_iter().map(HardLocation::new).collect();
        Ok(Self::assemble(locations, n, rng))
    }

    fn assemble(locations: Vec<HardLocation>, n: usize, rng: R) -> Self {
        Self {
            locations,
            dimension: n,
            radius: RADIUS_FRACTION * n as f64,
            writes: 0,
            rng,
        }
    }

    /// Number of hard locations (`p`).
    pub fn locations(&self) -> usize {
        self.locations.len()
    }

    /// Vector dimension (`n`).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Activation radius, `0.451 * n`.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of successful `enter` calls so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn check_dimension(&self, v: &BitVector) -> Result<()> {
        if v.len() != self.dimension {
            return Err(SdmError::DimensionMismatch {
                expected: self.dimension,
                actual: v.len(),
            });
        }
        Ok(())
    }

    #[inline]
    fn within_radius(radius: f64, location: &HardLocation, v: &BitVector) -> bool {
        location.address.distance(v) as f64 <= radius
    }

    /// Indices of the locations whose address lies within the radius of `probe`.
    ///
    /// This is the exact set that `enter` writes to and `lookup` reads from.
    pub fn activated(&self, probe: &BitVector) -> Result<Vec<usize>> {
        self.check_dimension(probe)?;
        Ok(self
            .locations
            .iter()
            .enumerate()
            .filter(|(_, loc)| Self::within_radius(self.radius, loc, probe))
            .map(|(i, _)| i)
            .collect())
    }

    /// Write `v` into every location within the radius of `v`.
    ///
    /// Each activated counter moves up by one where `v` has a 1 and down by
    /// one where it has a 0. Returns the number of activated locations; zero
    /// is a valid no-op.
    pub fn enter(&mut self, v: &BitVector) -> Result<usize> {
        self.check_dimension(v)?;

        let radius = self.radius;
        let mut activated = 0;
        for loc in self
            .locations
            .iter_mut()
            .filter(|loc| Self::within_radius(radius, loc, v))
        {
            for (counter, bit) in loc.counters.iter_mut().zip(v.iter()) {
                if bit {
                    *counter += 1;
                } else {
                    *counter -= 1;
                }
            }
            loc.hits += 1;
            activated += 1;
        }

        self.writes += 1;
        trace!(activated, writes = self.writes, "Entered vector");
        Ok(activated)
    }

    /// Sum the counters of every location within the radius of `probe`.
    ///
    /// Also returns how many writes the activated locations have absorbed
    /// in total.
    fn accumulate(&self, probe: &BitVector) -> Result<(Vec<i64>, u64)> {
        self.check_dimension(probe)?;

        let mut sums = vec![0i64; self.dimension];
        let mut hits = 0u64;
        let mut activated = 0usize;
        for loc in self
            .locations
            .iter()
            .filter(|loc| Self::within_radius(self.radius, loc, probe))
        {
            for (sum, counter) in sums.iter_mut().zip(loc.counters.iter()) {
                *sum += counter;
            }
            hits += loc.hits;
            activated += 1;
        }

        trace!(activated, hits, "Accumulated neighbourhood");
        Ok((sums, hits))
    }

    /// Raw per-dimension counter sums over the probe's neighbourhood.
    pub fn lookup_sums(&self, probe: &BitVector) -> Result<Vec<i64>> {
        self.accumulate(probe).map(|(sums, _)| sums)
    }

    /// Read the vector stored around `probe`.
    ///
    /// Bit `j` is 1 when the neighbourhood's summed counter `j` is `>= 0`,
    /// so exact ties read as 1. A neighbourhood that no write has reached
    /// (nothing activated, or nothing ever entered) reads as all zeros.
    pub fn lookup(&self, probe: &BitVector) -> Result<BitVector> {
        let (sums, hits) = self.accumulate(probe)?;
        if hits == 0 {
            return Ok(BitVector::zeros(self.dimension));
        }

        let mut out = BitVector::zeros(self.dimension);
        for (j, &sum) in sums.iter().enumerate() {
            if sum >= 0 {
                out.set_bit(j, true);
            }
        }
        Ok(out)
    }

    /// Read-through to [`lookup`](Self::lookup).
    pub fn test(&self, probe: &BitVector) -> Result<BitVector> {
        self.lookup(probe)
    }

    /// Train on `iterations` independently corrupted copies of `reference`.
    ///
    /// Each round flips every bit of `reference` with `probability` using
    /// the memory's own RNG and enters the result. Arguments are validated
    /// before the first write; an out-of-range probability is rejected, not
    /// clamped. Returns the total number of activations across rounds.
    pub fn learn(
        &mut self,
        reference: &BitVector,
        iterations: usize,
        probability: f64,
    ) -> Result<usize> {
        self.check_dimension(reference)?;
        validate_probability(probability)?;

        let mut activations = 0;
        for _ in 0..iterations {
            let noisy = noisy_copy(reference, probability, &mut self.rng)?;
            activations += self.enter(&noisy)?;
        }

        info!(iterations, probability, activations, "Learned noisy pattern");
        Ok(activations)
    }

    /// [`learn`](Self::learn) on the canonical ring pattern.
    ///
    /// Only valid for a memory whose dimension matches the ring.
    pub fn learn_ring(&mut self, iterations: usize, probability: f64) -> Result<usize> {
        self.learn(&ring(), iterations, probability)
    }
}

impl<R> std::fmt::Debug for SparseDistributedMemory<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseDistributedMemory")
            .field("locations", &self.locations.len())
            .field("dimension", &self.dimension)
            .field("radius", &self.radius)
            .field("writes", &self.writes)
            .finish()
    }
}
