//! Randomness sources.
//!
//! Every wire-level PRNG selector resolves to the platform CSPRNG
//! ([`rand::rngs::OsRng`]). Deterministic key generation runs on a
//! [`ChaCha20Rng`] seeded from a digest of the passphrase and salt, with an
//! independently seeded branch stream so the two secret searches draw from
//! reproducible but unrelated byte streams.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;

/// PRNG selector embedded in a parameter set.
///
/// The nominal values mirror the wire format; all of them resolve to the
/// platform CSPRNG in this implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrngAlgorithm {
    System,
    CtrDrbg,
    HashDrbg,
}

impl PrngAlgorithm {
    /// Decode a wire selector. Unknown values degrade to [`PrngAlgorithm::System`].
    pub fn from_selector(value: i32) -> PrngAlgorithm {
        match value {
            0 => PrngAlgorithm::System,
            1 => PrngAlgorithm::CtrDrbg,
            2 => PrngAlgorithm::HashDrbg,
            _ => PrngAlgorithm::System,
        }
    }

    /// Wire selector for this source.
    pub fn selector(&self) -> i32 {
        match self {
            PrngAlgorithm::System => 0,
            PrngAlgorithm::CtrDrbg => 1,
            PrngAlgorithm::HashDrbg => 2,
        }
    }

    /// Resolve the selector to an actual generator.
    pub fn create(&self) -> OsRng {
        OsRng
    }
}

/// Deterministic RNG derived from a passphrase.
///
/// The seed is `Hash(passphrase ‖ salt)` truncated to 256 bits. Calling
/// [`SeedRng::branch`] yields a child whose seed is a digest of the parent
/// seed and a branch counter, so parent and child streams are independent
/// yet fully reproducible.
pub struct SeedRng {
    rng: ChaCha20Rng,
    seed: [u8; 32],
    digest: HashAlgorithm,
    branches: u32,
}

impl SeedRng {
    pub fn from_passphrase(digest: HashAlgorithm, passphrase: &[u8], salt: &[u8]) -> Self {
        let mut h = digest.hasher();
        h.update(passphrase);
        h.update(salt);
        Self::from_digest_output(digest, &h.finalize())
    }

    fn from_digest_output(digest: HashAlgorithm, output: &[u8]) -> Self {
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&output[..32]);
        SeedRng {
            rng: ChaCha20Rng::from_seed(seed),
            seed,
            digest,
            branches: 0,
        }
    }

    /// Derive an independent child stream.
    pub fn branch(&mut self) -> SeedRng {
        self.branches += 1;
        let mut h = self.digest.hasher();
        h.update(&self.seed);
        h.update(&self.branches.to_be_bytes());
        Self::from_digest_output(self.digest, &h.finalize())
    }
}

impl RngCore for SeedRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

impl CryptoRng for SeedRng {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_passphrase_same_stream() {
        let mut a = SeedRng::from_passphrase(HashAlgorithm::Sha256, b"passphrase", b"salt");
        let mut b = SeedRng::from_passphrase(HashAlgorithm::Sha256, b"passphrase", b"salt");
        let mut buf_a = [0u8; 64];
        let mut buf_b = [0u8; 64];
        a.fill_bytes(&mut buf_a);
        b.fill_bytes(&mut buf_b);
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn test_different_salt_different_stream() {
        let mut a = SeedRng::from_passphrase(HashAlgorithm::Sha256, b"passphrase", b"salt1");
        let mut b = SeedRng::from_passphrase(HashAlgorithm::Sha256, b"passphrase", b"salt2");
        let mut buf_a = [0u8; 64];
        let mut buf_b = [0u8; 64];
        a.fill_bytes(&mut buf_a);
        b.fill_bytes(&mut buf_b);
        assert_ne!(buf_a, buf_b);
    }

    #[test]
    fn test_branch_is_deterministic_and_independent() {
        let mut a = SeedRng::from_passphrase(HashAlgorithm::Sha512, b"pw", b"s");
        let mut b = SeedRng::from_passphrase(HashAlgorithm::Sha512, b"pw", b"s");
        let mut child_a = a.branch();
        let mut child_b = b.branch();

        let mut buf_a = [0u8; 32];
        let mut buf_b = [0u8; 32];
        child_a.fill_bytes(&mut buf_a);
        child_b.fill_bytes(&mut buf_b);
        assert_eq!(buf_a, buf_b);

        // parent stream differs from the child stream
        let mut parent = [0u8; 32];
        a.fill_bytes(&mut parent);
        assert_ne!(parent, buf_a);
    }
}
