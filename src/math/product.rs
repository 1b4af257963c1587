//! Product-form ternary polynomials.
//!
//! A product-form secret is the triple (f1, f2, f3) of sparse ternary
//! polynomials representing t = f1·f2 + f3. Multiplying a dense polynomial
//! by t costs three sparse multiplications instead of one multiplication by
//! a dense secret of comparable weight.

use std::io::Cursor;

use rand::Rng;
use zeroize::Zeroize;

use crate::error::Result;
use crate::math::poly::IntegerPolynomial;
use crate::math::ternary::SparseTernary;

#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct ProductFormPolynomial {
    f1: SparseTernary,
    f2: SparseTernary,
    f3: SparseTernary,
}

impl ProductFormPolynomial {
    pub fn new(f1: SparseTernary, f2: SparseTernary, f3: SparseTernary) -> Self {
        Self { f1, f2, f3 }
    }

    /// Draw three independent sparse ternary factors.
    ///
    /// f1 and f2 carry equal numbers of ones and negative ones; f3's counts
    /// are given separately because the fast-Fp variant unbalances it.
    pub fn generate_random<R: Rng>(
        n: usize,
        df1: usize,
        df2: usize,
        df3_ones: usize,
        df3_neg_ones: usize,
        rng: &mut R,
    ) -> Self {
        Self {
            f1: SparseTernary::generate_random(n, df1, df1, rng),
            f2: SparseTernary::generate_random(n, df2, df2, rng),
            f3: SparseTernary::generate_random(n, df3_ones, df3_neg_ones, rng),
        }
    }

    pub fn len(&self) -> usize {
        self.f1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f1.is_empty()
    }

    pub fn factors(&self) -> (&SparseTernary, &SparseTernary, &SparseTernary) {
        (&self.f1, &self.f2, &self.f3)
    }

    /// Ring multiplication: `g·t = ((g·f1 mod m)·f2 + g·f3) mod m`.
    pub fn multiply(&self, g: &IntegerPolynomial, modulus: i32) -> IntegerPolynomial {
        let mut prod = self.f1.multiply(g, modulus);
        prod = self.f2.multiply(&prod, modulus);
        prod.add(&self.f3.multiply(g, modulus));
        prod.mod_positive(modulus);
        prod
    }

    /// Integer projection t = f1·f2 + f3, exact over Z.
    pub fn to_integer_polynomial(&self) -> IntegerPolynomial {
        let f1_int = self.f1.to_integer_polynomial();
        &self.f2.multiply_raw(&f1_int) + &self.f3.to_integer_polynomial()
    }

    /// Wire encoding: the three sparse encodings concatenated.
    pub fn to_binary(&self) -> Vec<u8> {
        let mut out = self.f1.to_binary();
        out.extend_from_slice(&self.f2.to_binary());
        out.extend_from_slice(&self.f3.to_binary());
        out
    }

    /// Read an encoding written by [`to_binary`](Self::to_binary).
    pub fn from_binary(r: &mut Cursor<&[u8]>, n: usize) -> Result<ProductFormPolynomial> {
        let f1 = SparseTernary::from_binary(r, n)?;
        let f2 = SparseTernary::from_binary(r, n)?;
        let f3 = SparseTernary::from_binary(r, n)?;
        Ok(ProductFormPolynomial::new(f1, f2, f3))
    }
}
