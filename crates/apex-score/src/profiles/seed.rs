//! Identifier hashing and the seeded pseudo-random streams used by synthesis.
//!
//! The SHA-256 digest of the normalized identifier is the only entropy source a
//! profile ever sees. Each synthesis stage reads from its own ChaCha20 stream
//! number, so adding a draw to one stage never shifts the values drawn by
//! another. Draws go through `next_u64` directly rather than distribution
//! helpers so the mapping from seed to values stays fixed across library
//! upgrades.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

/// Lower-cases and trims an identifier before hashing or caching.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// 256-bit seed derived from an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed([u8; 32]);

impl Seed {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Integer reduction of the digest: its first eight bytes, big-endian.
    pub fn as_u64(&self) -> u64 {
        let mut head = [0u8; 8];
        head.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(head)
    }

    /// Opens the stream reserved for `stage`.
    pub fn stream(&self, stage: Stage) -> SeededStream {
        let mut inner = ChaCha20Rng::from_seed(self.0);
        inner.set_stream(stage as u64);
        SeededStream { inner }
    }
}

pub fn derive_seed(identifier: &str) -> Seed {
    let normalized = normalize_identifier(identifier);
    let digest = Sha256::digest(normalized.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Seed(bytes)
}

/// Synthesis stages. Discriminants are stream numbers and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Location = 0,
    Identity = 1,
    Stability = 2,
    Financial = 3,
    Device = 4,
}

/// Deterministic draw source for one stage.
pub struct SeededStream {
    inner: ChaCha20Rng,
}

impl SeededStream {
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform-ish draw in `[0, n)`. Modulo bias is irrelevant at these sizes.
    pub fn below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Draw in the closed range `[low, high]`.
    pub fn between(&mut self, low: u64, high: u64) -> u64 {
        assert!(low <= high, "empty range {low}..={high}");
        low + self.below(high - low + 1)
    }

    /// Float in `[0.0, 1.0)` built from the top 53 bits of a draw.
    pub fn unit(&mut self) -> f64 {
        (self.inner.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let index = self.below(items.len() as u64) as usize;
        &items[index]
    }

    /// Picks an index according to integer weights.
    pub fn weighted(&mut self, weights: &[u64]) -> usize {
        let total: u64 = weights.iter().sum();
        let mut roll = self.below(total);
        for (index, weight) in weights.iter().enumerate() {
            if roll < *weight {
                return index;
            }
            roll -= weight;
        }
        weights.len() - 1
    }

    pub fn fill_hex(&mut self, bytes: usize) -> String {
        let mut buffer = vec![0u8; bytes];
        self.inner.fill_bytes(&mut buffer);
        buffer.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}
