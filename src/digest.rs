//! Streaming digest abstraction.
//!
//! The engine consumes hashes only through [`HashAlgorithm`]: a reset/update/
//! finalize stream with a known output size. SHA-2 comes from the `sha2`
//! crate and Keccak from `tiny-keccak`; the remaining selector values exist
//! for wire compatibility and degrade to the SHA-512 default.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use tiny_keccak::{Hasher as _, Keccak};

/// Hash function selector embedded in a parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
    Blake256,
    Blake512,
    Keccak256,
    Keccak512,
    Skein256,
    Skein512,
    Skein1024,
}

impl HashAlgorithm {
    /// Default algorithm, also the fallback for unknown selector values.
    pub const DEFAULT: HashAlgorithm = HashAlgorithm::Sha512;

    /// Decode a wire selector. Unknown values degrade to the default.
    pub fn from_selector(value: i32) -> HashAlgorithm {
        match value {
            0 => HashAlgorithm::Sha256,
            1 => HashAlgorithm::Sha512,
            2 => HashAlgorithm::Blake256,
            3 => HashAlgorithm::Blake512,
            4 => HashAlgorithm::Keccak256,
            5 => HashAlgorithm::Keccak512,
            6 => HashAlgorithm::Skein256,
            7 => HashAlgorithm::Skein512,
            8 => HashAlgorithm::Skein1024,
            _ => HashAlgorithm::DEFAULT,
        }
    }

    /// Wire selector for this algorithm.
    pub fn selector(&self) -> i32 {
        match self {
            HashAlgorithm::Sha256 => 0,
            HashAlgorithm::Sha512 => 1,
            HashAlgorithm::Blake256 => 2,
            HashAlgorithm::Blake512 => 3,
            HashAlgorithm::Keccak256 => 4,
            HashAlgorithm::Keccak512 => 5,
            HashAlgorithm::Skein256 => 6,
            HashAlgorithm::Skein512 => 7,
            HashAlgorithm::Skein1024 => 8,
        }
    }

    /// Map selectors without a backing implementation to the default.
    fn resolve(self) -> HashAlgorithm {
        match self {
            HashAlgorithm::Sha256
            | HashAlgorithm::Sha512
            | HashAlgorithm::Keccak256
            | HashAlgorithm::Keccak512 => self,
            _ => HashAlgorithm::DEFAULT,
        }
    }

    /// Output size in bytes.
    pub fn digest_size(&self) -> usize {
        match self.resolve() {
            HashAlgorithm::Sha256 | HashAlgorithm::Keccak256 => 32,
            _ => 64,
        }
    }

    /// Start a fresh streaming hasher.
    pub fn hasher(&self) -> StreamingHasher {
        match self.resolve() {
            HashAlgorithm::Sha256 => StreamingHasher::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => StreamingHasher::Sha512(Sha512::new()),
            HashAlgorithm::Keccak256 => StreamingHasher::Keccak256(Keccak::v256()),
            HashAlgorithm::Keccak512 => StreamingHasher::Keccak512(Keccak::v512()),
            _ => unreachable!("resolve() yields implemented algorithms only"),
        }
    }

    /// One-shot digest of `data`.
    pub fn hash(&self, data: &[u8]) -> Vec<u8> {
        let mut h = self.hasher();
        h.update(data);
        h.finalize()
    }
}

/// In-progress hash computation for one of the implemented algorithms.
pub enum StreamingHasher {
    Sha256(Sha256),
    Sha512(Sha512),
    Keccak256(Keccak),
    Keccak512(Keccak),
}

impl StreamingHasher {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            StreamingHasher::Sha256(h) => h.update(data),
            StreamingHasher::Sha512(h) => h.update(data),
            StreamingHasher::Keccak256(h) | StreamingHasher::Keccak512(h) => h.update(data),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            StreamingHasher::Sha256(h) => h.finalize().to_vec(),
            StreamingHasher::Sha512(h) => h.finalize().to_vec(),
            StreamingHasher::Keccak256(h) => {
                let mut out = vec![0u8; 32];
                h.finalize(&mut out);
                out
            }
            StreamingHasher::Keccak512(h) => {
                let mut out = vec![0u8; 64];
                h.finalize(&mut out);
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_sizes() {
        assert_eq!(HashAlgorithm::Sha256.digest_size(), 32);
        assert_eq!(HashAlgorithm::Sha512.digest_size(), 64);
        assert_eq!(HashAlgorithm::Keccak256.digest_size(), 32);
        assert_eq!(HashAlgorithm::Keccak512.digest_size(), 64);
        // unimplemented selectors fall back to SHA-512
        assert_eq!(HashAlgorithm::Skein1024.digest_size(), 64);
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let data = b"the quick brown fox jumps over the lazy dog";
        for alg in [
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha512,
            HashAlgorithm::Keccak256,
            HashAlgorithm::Keccak512,
        ] {
            let mut h = alg.hasher();
            h.update(&data[..9]);
            h.update(&data[9..]);
            assert_eq!(h.finalize(), alg.hash(data));
        }
    }

    #[test]
    fn test_unknown_selector_degrades_to_default() {
        assert_eq!(HashAlgorithm::from_selector(99), HashAlgorithm::DEFAULT);
        assert_eq!(HashAlgorithm::from_selector(-1), HashAlgorithm::DEFAULT);
    }

    #[test]
    fn test_selector_roundtrip() {
        for v in 0..9 {
            assert_eq!(HashAlgorithm::from_selector(v).selector(), v);
        }
    }
}
