//! # sdm-core
//!
//! Sparse distributed memory over bitpacked binary vectors.
//!
//! A memory scatters each written vector across every randomly placed hard
//! location within a Hamming radius of it, and reconstructs a stored vector
//! from a corrupted probe by majority vote over the probe's neighbourhood.
//!
//! Features:
//! - Fixed-length bit vectors packed into `u64` words, XOR/popcount distance
//! - Radius-based fan-out writes into unbounded signed counters
//! - Counter-sum majority reads with ties resolved to 1
//! - Seedable randomness for addresses and noise injection
//! - A read/write locked handle for sharing one memory across threads

pub mod error;
pub mod memory;
pub mod noise;
pub mod pattern;
pub mod shared;
pub mod vector;

pub use error::*;
pub use memory::*;
pub use noise::*;
pub use pattern::*;
pub use shared::*;
pub use vector::*;
