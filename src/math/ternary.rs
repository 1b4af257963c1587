//! Ternary polynomial representations.
//!
//! Secrets and blinding values have coefficients in {−1, 0, 1} and a
//! prescribed number of ones and negative ones. Two carriers exist: a dense
//! one backed by [`IntegerPolynomial`], and a sparse one holding the two
//! index lists, whose multiplication is a sum of rotations with no
//! per-coefficient multiplies.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use rand::Rng;
use zeroize::Zeroize;

use crate::error::{ntru_err, Result};
use crate::igf::IndexGenerator;
use crate::math::encode::{index_bits, BitReader, BitWriter};
use crate::math::poly::IntegerPolynomial;

/// Uniformly place `num_ones` ones and `num_neg_ones` negative ones into `n`
/// slots, redrawing occupied positions.
pub fn generate_random_coeffs<R: Rng>(
    n: usize,
    num_ones: usize,
    num_neg_ones: usize,
    rng: &mut R,
) -> Vec<i32> {
    assert!(num_ones + num_neg_ones <= n);
    let mut coeffs = vec![0i32; n];
    for &value in &[1, -1] {
        let want = if value == 1 { num_ones } else { num_neg_ones };
        let mut placed = 0;
        while placed < want {
            let i = rng.gen_range(0..n);
            if coeffs[i] == 0 {
                coeffs[i] = value;
                placed += 1;
            }
        }
    }
    coeffs
}

/// Ternary polynomial stored as a full coefficient vector.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct DenseTernary {
    poly: IntegerPolynomial,
}

impl DenseTernary {
    /// Wrap a polynomial whose coefficients are already in {−1, 0, 1}.
    pub fn new(poly: IntegerPolynomial) -> Self {
        debug_assert!(poly.is_ternary());
        Self { poly }
    }

    /// Draw a random ternary polynomial with the given weights.
    pub fn generate_random<R: Rng>(
        n: usize,
        num_ones: usize,
        num_neg_ones: usize,
        rng: &mut R,
    ) -> Self {
        Self {
            poly: IntegerPolynomial::from_coeffs(generate_random_coeffs(
                n,
                num_ones,
                num_neg_ones,
                rng,
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.poly.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poly.is_empty()
    }

    /// Ring multiplication with a dense polynomial.
    pub fn multiply(&self, g: &IntegerPolynomial, modulus: i32) -> IntegerPolynomial {
        self.poly.multiply(g, modulus)
    }

    pub fn to_integer_polynomial(&self) -> IntegerPolynomial {
        self.poly.clone()
    }

    pub fn as_poly(&self) -> &IntegerPolynomial {
        &self.poly
    }
}

impl From<&SparseTernary> for DenseTernary {
    fn from(sparse: &SparseTernary) -> Self {
        Self {
            poly: sparse.to_integer_polynomial(),
        }
    }
}

/// Ternary polynomial stored as sorted index lists for +1 and −1.
///
/// No index appears in both lists, each list is strictly ascending, and all
/// indices are below the dimension.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct SparseTernary {
    n: usize,
    ones: Vec<usize>,
    neg_ones: Vec<usize>,
}

impl SparseTernary {
    pub fn new(n: usize, mut ones: Vec<usize>, mut neg_ones: Vec<usize>) -> Self {
        ones.sort_unstable();
        neg_ones.sort_unstable();
        debug_assert!(ones.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(neg_ones.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(ones.iter().all(|&i| i < n));
        debug_assert!(neg_ones.iter().all(|&i| i < n));
        debug_assert!(ones.iter().all(|i| !neg_ones.contains(i)));
        Self { n, ones, neg_ones }
    }

    /// Extract the index lists from a dense ternary polynomial.
    pub fn from_poly(poly: &IntegerPolynomial) -> Self {
        debug_assert!(poly.is_ternary());
        let mut ones = vec![];
        let mut neg_ones = vec![];
        for (index, &coeff) in poly.coeffs().iter().enumerate() {
            if coeff == 1 {
                ones.push(index);
            }
            if coeff == -1 {
                neg_ones.push(index);
            }
        }
        Self {
            n: poly.len(),
            ones,
            neg_ones,
        }
    }

    /// Draw a random sparse ternary polynomial with the given weights.
    pub fn generate_random<R: Rng>(
        n: usize,
        num_ones: usize,
        num_neg_ones: usize,
        rng: &mut R,
    ) -> Self {
        let coeffs = generate_random_coeffs(n, num_ones, num_neg_ones, rng);
        Self::from_poly(&IntegerPolynomial::from_coeffs(coeffs))
    }

    /// Build a blinding polynomial from a deterministic index stream.
    ///
    /// Consumes exactly 2·dr indices: the first dr become +1 positions, the
    /// next dr become −1 positions. The generator never repeats an index.
    pub fn generate_blinding(index_gen: &mut IndexGenerator, n: usize, dr: usize) -> Self {
        let ones: Vec<usize> = (0..dr).map(|_| index_gen.next_index()).collect();
        let neg_ones: Vec<usize> = (0..dr).map(|_| index_gen.next_index()).collect();
        Self::new(n, ones, neg_ones)
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn ones(&self) -> &[usize] {
        &self.ones
    }

    pub fn neg_ones(&self) -> &[usize] {
        &self.neg_ones
    }

    /// Ring multiplication as a sum of rotations of `g`: positions in the
    /// ones list add `rot(g, i)`, positions in the neg-ones list subtract.
    pub fn multiply(&self, g: &IntegerPolynomial, modulus: i32) -> IntegerPolynomial {
        let mut prod = self.multiply_raw(g);
        for c in &mut prod.coeffs {
            *c = ((*c as i64) % (modulus as i64)) as i32;
        }
        prod
    }

    /// Unreduced sum of rotations; exact over Z.
    pub(crate) fn multiply_raw(&self, g: &IntegerPolynomial) -> IntegerPolynomial {
        let n = self.n;
        assert_eq!(n, g.len(), "dimensions must match");
        let mut acc = vec![0i64; n];
        for &i in &self.ones {
            for (j, &gc) in g.coeffs().iter().enumerate() {
                let mut k = i + j;
                if k >= n {
                    k -= n;
                }
                acc[k] += gc as i64;
            }
        }
        for &i in &self.neg_ones {
            for (j, &gc) in g.coeffs().iter().enumerate() {
                let mut k = i + j;
                if k >= n {
                    k -= n;
                }
                acc[k] -= gc as i64;
            }
        }
        IntegerPolynomial::from_coeffs(acc.iter().map(|&c| c as i32).collect())
    }

    pub fn to_integer_polynomial(&self) -> IntegerPolynomial {
        let mut poly = IntegerPolynomial::new(self.n);
        for &i in &self.ones {
            poly.coeffs[i] = 1;
        }
        for &i in &self.neg_ones {
            poly.coeffs[i] = -1;
        }
        poly
    }

    /// Wire encoding: u16-BE ones count ‖ u16-BE neg-ones count ‖ both index
    /// lists packed at ⌈log₂ N⌉ bits each.
    pub fn to_binary(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u16::<BigEndian>(self.ones.len() as u16)
            .expect("vec write");
        out.write_u16::<BigEndian>(self.neg_ones.len() as u16)
            .expect("vec write");
        let bits = index_bits(self.n);
        let mut w = BitWriter::new();
        for &i in &self.ones {
            w.write_bits(i as u32, bits);
        }
        for &i in &self.neg_ones {
            w.write_bits(i as u32, bits);
        }
        out.extend_from_slice(&w.into_bytes());
        out
    }

    /// Read an encoding written by [`to_binary`](Self::to_binary).
    pub fn from_binary(r: &mut Cursor<&[u8]>, n: usize) -> Result<SparseTernary> {
        let num_ones = r.read_u16::<BigEndian>()? as usize;
        let num_neg_ones = r.read_u16::<BigEndian>()? as usize;
        let bits = index_bits(n);
        let mut packed = vec![0u8; ((num_ones + num_neg_ones) * bits + 7) / 8];
        r.read_exact(&mut packed)?;
        let mut br = BitReader::new(&packed);
        let mut read_list = |count: usize| -> Result<Vec<usize>> {
            (0..count)
                .map(|_| {
                    let i = br
                        .read_bits(bits)
                        .ok_or_else(|| ntru_err!("premature end of sparse index data"))?
                        as usize;
                    if i >= n {
                        return Err(ntru_err!("sparse index {} out of range", i));
                    }
                    Ok(i)
                })
                .collect()
        };
        let ones = read_list(num_ones)?;
        let neg_ones = read_list(num_neg_ones)?;
        Ok(SparseTernary::new(n, ones, neg_ones))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const N: usize = 439;
    const Q: i32 = 2048;

    #[test]
    fn test_generate_random_weights() {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let coeffs = generate_random_coeffs(N, 146, 145, &mut rng);
        let poly = IntegerPolynomial::from_coeffs(coeffs);
        assert_eq!(poly.count(1), 146);
        assert_eq!(poly.count(-1), 145);
        assert_eq!(poly.count(0), N - 291);
    }

    #[test]
    fn test_sparse_from_poly_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let poly =
            IntegerPolynomial::from_coeffs(generate_random_coeffs(N, 50, 40, &mut rng));
        let sparse = SparseTernary::from_poly(&poly);
        assert_eq!(sparse.ones().len(), 50);
        assert_eq!(sparse.neg_ones().len(), 40);
        assert_eq!(sparse.to_integer_polynomial(), poly);
    }

    #[test]
    fn test_sparse_multiply_matches_dense() {
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        for _ in 0..5 {
            let ternary =
                IntegerPolynomial::from_coeffs(generate_random_coeffs(N, 30, 30, &mut rng));
            let g = IntegerPolynomial::from_coeffs(
                (0..N).map(|_| rng.gen_range(0..Q)).collect(),
            );
            let sparse = SparseTernary::from_poly(&ternary);

            let mut dense_prod = ternary.multiply(&g, Q);
            dense_prod.mod_positive(Q);
            let mut sparse_prod = sparse.multiply(&g, Q);
            sparse_prod.mod_positive(Q);
            assert_eq!(dense_prod, sparse_prod);
        }
    }

    #[test]
    fn test_sparse_invariants() {
        let s = SparseTernary::new(10, vec![7, 2, 4], vec![9, 0]);
        assert_eq!(s.ones(), &[2, 4, 7]);
        assert_eq!(s.neg_ones(), &[0, 9]);
    }

    #[test]
    fn test_sparse_binary_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let s = SparseTernary::generate_random(N, 9, 8, &mut rng);
        let bytes = s.to_binary();
        // 2 counts + 17 indices at 9 bits
        assert_eq!(bytes.len(), 4 + (17 * 9 + 7) / 8);
        let back = SparseTernary::from_binary(&mut Cursor::new(&bytes[..]), N).unwrap();
        assert_eq!(back, s);
    }
}
