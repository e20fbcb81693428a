//! Thread-shareable handle over a memory.

use crate::{BitVector, Result, SparseDistributedMemory};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

/// A cloneable handle that serializes writes and lets reads run together.
///
/// `enter` and `learn` hold the write lock for the whole operation, so no
/// counter update is ever interleaved with another write or with a read.
/// `lookup`, `test` and `activated` share the read lock.
pub struct SharedMemory<R = StdRng> {
    inner: Arc<RwLock<SparseDistributedMemory<R>>>,
}

impl<R> Clone for SharedMemory<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Rng> SharedMemory<R> {
    pub fn new(memory: SparseDistributedMemory<R>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(memory)),
        }
    }

    pub fn enter(&self, v: &BitVector) -> Result<usize> {
        self.inner.write().enter(v)
    }

    pub fn learn(&self, reference: &BitVector, iterations: usize, probability: f64) -> Result<usize> {
        self.inner.write().learn(reference, iterations, probability)
    }

    pub fn lookup(&self, probe: &BitVector) -> Result<BitVector> {
        self.inner.read().lookup(probe)
    }

    pub fn test(&self, probe: &BitVector) -> Result<BitVector> {
        self.inner.read().test(probe)
    }

    pub fn activated(&self, probe: &BitVector) -> Result<Vec<usize>> {
        self.inner.read().activated(probe)
    }

    pub fn writes(&self) -> u64 {
        self.inner.read().writes()
    }

    /// Run `f` with shared access to the underlying memory.
    pub fn with_memory<T>(&self, f: impl FnOnce(&SparseDistributedMemory<R>) -> T) -> T {
        f(&self.inner.read())
    }
}

impl<R> From<SparseDistributedMemory<R>> for SharedMemory<R> {
    fn from(memory: SparseDistributedMemory<R>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(memory)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring;
    use std::thread;

    #[test]
    fn test_concurrent_writes_are_not_lost() {
        let shared = SharedMemory::new(SparseDistributedMemory::seeded(500, 256, 42));
        let key = ring();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                let key = key.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.enter(&key).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(shared.writes(), 100);

        let activated = shared.activated(&key).unwrap().len() as i64;
        let sums = shared.with_memory(|m| m.lookup_sums(&key).unwrap());
        for (j, sum) in sums.iter().enumerate() {
            let polarity = if key.get_bit(j) { 100 } else { -100 };
            let expected = polarity * activated;
            assert_eq!(*sum, expected);
        }
        assert_eq!(shared.test(&key).unwrap(), key);
    }
}
