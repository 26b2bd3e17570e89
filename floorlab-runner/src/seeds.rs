//! Deterministic seed hierarchy for scenario generation.
//!
//! A master seed is expanded into per-(label, index) sub-seeds via BLAKE3
//! hashing. Derivation is hash-based rather than order-dependent, so the
//! same master seed produces identical panels no matter in which order the
//! runner asks for them — or on how many threads.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic seed hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for a labelled stream (e.g.
    /// `("risky", 0)` for the growth-asset panel).
    pub fn sub_seed(&self, label: &str, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(label.as_bytes());
        hasher.update(&index.to_le_bytes());
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap())
    }

    /// A seeded StdRng for one labelled stream.
    pub fn rng_for(&self, label: &str, index: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(label, index))
    }
}
