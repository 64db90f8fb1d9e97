//! Deterministic luck rolls
//!
//! A luck value is a pure function of a text key: the key is digested with
//! FNV-1a and the digest seeds a PCG stream whose first draw is the result.
//! The same key gives the same value on every platform and every reload.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::cell::CellId;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// Uniform value in [0, 1) derived from `key`
pub fn luck(key: &str) -> f64 {
    let mut rng = Pcg32::seed_from_u64(fnv1a(key.as_bytes()));
    rng.random::<f64>()
}

/// Luck source bound to a world seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Luck {
    seed: String,
}

impl Luck {
    pub fn new(seed: impl Into<String>) -> Self {
        Self { seed: seed.into() }
    }

    /// Roll for `purpose` at a cell
    pub fn roll(&self, cell: CellId, purpose: &str) -> f64 {
        luck(&format!("{}|{},{},{}", self.seed, cell.i, cell.j, purpose))
    }
}
