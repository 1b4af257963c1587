//! IGF-2: the deterministic index generation function.
//!
//! Seeds a hash-driven bit stream and turns it into a stream of distinct
//! indices in `[0, N)`. Candidates of `c` bits are rejection-sampled against
//! the largest multiple of N below 2^c so the reduction mod N stays uniform,
//! and every yielded index is remembered so the stream never repeats one.

use crate::digest::HashAlgorithm;
use crate::math::encode::BitBuffer;
use crate::params::EncryptionParameters;

pub struct IndexGenerator {
    n: usize,
    c: usize,
    digest: HashAlgorithm,
    z: Vec<u8>,
    counter: u32,
    buf: BitBuffer,
    seen: Vec<bool>,
    /// Largest multiple of N representable in `c` bits.
    bound: u32,
}

impl IndexGenerator {
    /// Initialize from a seed string: `Z = Hash(seed)`, then pre-fill the
    /// bit buffer with `minIGFHashCalls` blocks of `Hash(Z ‖ be32(counter))`.
    pub fn new(seed: &[u8], params: &EncryptionParameters) -> Self {
        let digest = params.digest;
        let z = digest.hash(seed);
        let two_c = 1u32 << params.c;
        let mut gen = IndexGenerator {
            n: params.n,
            c: params.c,
            digest,
            z,
            counter: 0,
            buf: BitBuffer::new(),
            seen: vec![false; params.n],
            bound: two_c - (two_c % params.n as u32),
        };
        while (gen.counter as usize) < params.min_igf_hash_calls {
            gen.append_block();
        }
        gen
    }

    fn append_block(&mut self) {
        let mut h = self.digest.hasher();
        h.update(&self.z);
        h.update(&self.counter.to_be_bytes());
        self.buf.append_bytes(&h.finalize());
        self.counter += 1;
    }

    /// Yield the next index in `[0, N)`, never repeating an earlier one.
    pub fn next_index(&mut self) -> usize {
        loop {
            while self.buf.available() < self.c {
                self.append_block();
            }
            let candidate = self.buf.read_bits(self.c);
            if candidate >= self.bound {
                continue;
            }
            let index = (candidate % self.n as u32) as usize;
            if self.seen[index] {
                continue;
            }
            self.seen[index] = true;
            return index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> EncryptionParameters {
        EncryptionParameters::apr2011_439()
    }

    #[test]
    fn test_determinism() {
        let params = test_params();
        let seed: Vec<u8> = (0u8..16).collect();
        let mut a = IndexGenerator::new(&seed, &params);
        let mut b = IndexGenerator::new(&seed, &params);
        for _ in 0..100 {
            assert_eq!(a.next_index(), b.next_index());
        }
    }

    #[test]
    fn test_indices_distinct_and_in_range() {
        let params = test_params();
        let mut gen = IndexGenerator::new(b"seed", &params);
        let mut seen = vec![false; params.n];
        for _ in 0..300 {
            let i = gen.next_index();
            assert!(i < params.n);
            assert!(!seen[i], "index {} repeated", i);
            seen[i] = true;
        }
    }

    #[test]
    fn test_different_seeds_different_streams() {
        let params = test_params();
        let a: Vec<usize> = {
            let mut g = IndexGenerator::new(b"seed a", &params);
            (0..8).map(|_| g.next_index()).collect()
        };
        let b: Vec<usize> = {
            let mut g = IndexGenerator::new(b"seed b", &params);
            (0..8).map(|_| g.next_index()).collect()
        };
        assert_ne!(a, b);
    }
}
