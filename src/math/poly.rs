//! Dense polynomials over the convolution ring Z[X]/(X^N − 1).
//!
//! `IntegerPolynomial` is the workhorse of the whole scheme: ciphertexts,
//! public keys and all intermediate values live here. Arithmetic is plain
//! schoolbook convolution reduced modulo the large modulus q (a power of
//! two) or the small modulus 3. Additive operations mutate in place;
//! multiplicative operations return a fresh polynomial and never touch the
//! right-hand operand.

use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use zeroize::Zeroize;

use crate::error::{ntru_err, Result};
use crate::math::encode::{BitReader, BitWriter};

/// Coefficient pair tables for the 3-bit SVES ternary encoding.
///
/// Bit triples 0..7 map to the coefficient pairs
/// (0,0),(0,1),(0,−1),(1,0),(1,1),(1,−1),(−1,0),(−1,1).
const SVES_COEFF1: [i32; 8] = [0, 0, 0, 1, 1, 1, -1, -1];
const SVES_COEFF2: [i32; 8] = [0, 1, -1, 0, 1, -1, 0, 1];

const POW3: [u32; 5] = [1, 3, 9, 27, 81];

/// Polynomial with N signed integer coefficients, index 0 the constant term.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct IntegerPolynomial {
    pub(crate) coeffs: Vec<i32>,
}

impl IntegerPolynomial {
    /// Create the zero polynomial of dimension `n`.
    pub fn new(n: usize) -> Self {
        Self {
            coeffs: vec![0; n],
        }
    }

    /// Create a polynomial from a coefficient vector.
    pub fn from_coeffs(coeffs: Vec<i32>) -> Self {
        Self { coeffs }
    }

    /// Create a constant polynomial of dimension `n`.
    pub fn constant(n: usize, value: i32) -> Self {
        let mut p = Self::new(n);
        p.coeffs[0] = value;
        p
    }

    /// Polynomial dimension N.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Coefficient slice, constant term first.
    pub fn coeffs(&self) -> &[i32] {
        &self.coeffs
    }

    /// Get coefficient `i`.
    pub fn coeff(&self, i: usize) -> i32 {
        self.coeffs[i]
    }

    /// Set coefficient `i`.
    pub fn set_coeff(&mut self, i: usize, value: i32) {
        self.coeffs[i] = value;
    }

    /// Coefficient-wise addition.
    pub fn add(&mut self, b: &IntegerPolynomial) {
        assert_eq!(self.coeffs.len(), b.coeffs.len(), "dimensions must match");
        for (a, &v) in self.coeffs.iter_mut().zip(b.coeffs.iter()) {
            *a += v;
        }
    }

    /// Coefficient-wise addition reduced into `[0, modulus)`.
    pub fn add_mod(&mut self, b: &IntegerPolynomial, modulus: i32) {
        assert_eq!(self.coeffs.len(), b.coeffs.len(), "dimensions must match");
        for (a, &v) in self.coeffs.iter_mut().zip(b.coeffs.iter()) {
            *a = (*a + v).rem_euclid(modulus);
        }
    }

    /// Coefficient-wise subtraction.
    pub fn sub(&mut self, b: &IntegerPolynomial) {
        assert_eq!(self.coeffs.len(), b.coeffs.len(), "dimensions must match");
        for (a, &v) in self.coeffs.iter_mut().zip(b.coeffs.iter()) {
            *a -= v;
        }
    }

    /// Coefficient-wise subtraction reduced into `[0, modulus)`.
    pub fn sub_mod(&mut self, b: &IntegerPolynomial, modulus: i32) {
        assert_eq!(self.coeffs.len(), b.coeffs.len(), "dimensions must match");
        for (a, &v) in self.coeffs.iter_mut().zip(b.coeffs.iter()) {
            *a = (*a - v).rem_euclid(modulus);
        }
    }

    /// Coefficient-wise scalar multiplication.
    pub fn mult(&mut self, factor: i32) {
        for c in &mut self.coeffs {
            *c *= factor;
        }
    }

    /// Scalar multiplication reduced into `[0, modulus)`.
    pub fn mult_mod(&mut self, factor: i32, modulus: i32) {
        for a in &mut self.coeffs {
            *a = ((*a as i64 * factor as i64).rem_euclid(modulus as i64)) as i32;
        }
    }

    /// Multiply by 3 modulo q.
    pub fn mult3(&mut self, modulus: i32) {
        self.mult_mod(3, modulus);
    }

    /// Ring multiplication: `c_k = Σ_{i+j ≡ k (mod N)} a_i·b_j`, each
    /// coefficient reduced modulo `modulus`.
    pub fn multiply(&self, other: &IntegerPolynomial, modulus: i32) -> IntegerPolynomial {
        let n = self.coeffs.len();
        assert_eq!(n, other.coeffs.len(), "dimensions must match");
        let mut acc = vec![0i64; n];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            let a = a as i64;
            for (j, &b) in other.coeffs.iter().enumerate() {
                let mut k = i + j;
                if k >= n {
                    k -= n;
                }
                acc[k] += a * b as i64;
            }
        }
        let m = modulus as i64;
        IntegerPolynomial {
            coeffs: acc.iter().map(|&c| (c % m) as i32).collect(),
        }
    }

    /// Reduce every coefficient into `[0, modulus)`.
    pub fn mod_positive(&mut self, modulus: i32) {
        for c in &mut self.coeffs {
            *c = c.rem_euclid(modulus);
        }
    }

    /// Alias of [`mod_positive`](Self::mod_positive).
    pub fn ensure_positive(&mut self, modulus: i32) {
        self.mod_positive(modulus);
    }

    /// Reduce every coefficient into `(−modulus/2, modulus/2]`.
    pub fn mod_center(&mut self, modulus: i32) {
        for c in &mut self.coeffs {
            let mut r = c.rem_euclid(modulus);
            if r > modulus / 2 {
                r -= modulus;
            }
            *c = r;
        }
    }

    /// Alias of [`mod_center`](Self::mod_center).
    pub fn center0(&mut self, modulus: i32) {
        self.mod_center(modulus);
    }

    /// Reduce every coefficient into `{−1, 0, 1}` preserving its residue
    /// modulo 3: a remainder of ±2 becomes ∓1.
    pub fn mod3(&mut self) {
        for c in &mut self.coeffs {
            let mut r = *c % 3;
            if r == 2 {
                r = -1;
            }
            if r == -2 {
                r = 1;
            }
            *c = r;
        }
    }

    /// Number of coefficients equal to `value`.
    pub fn count(&self, value: i32) -> usize {
        self.coeffs.iter().filter(|&&c| c == value).count()
    }

    /// Signed sum of all coefficients.
    pub fn sum_coeffs(&self) -> i32 {
        self.coeffs.iter().sum()
    }

    /// True when every coefficient is in `{−1, 0, 1}`.
    pub fn is_ternary(&self) -> bool {
        self.coeffs.iter().all(|&c| (-1..=1).contains(&c))
    }

    /// True when every coefficient is in `[0, q)`.
    pub fn is_reduced(&self, q: i32) -> bool {
        self.coeffs.iter().all(|&c| (0..q).contains(&c))
    }

    /// Index of the highest nonzero coefficient (0 for the zero polynomial).
    fn degree(&self) -> usize {
        for i in (0..self.coeffs.len()).rev() {
            if self.coeffs[i] != 0 {
                return i;
            }
        }
        0
    }

    fn equals_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0)
    }

    fn equals_one(&self) -> bool {
        self.coeffs[0] == 1 && self.coeffs[1..].iter().all(|&c| c == 0)
    }

    /// Compute the inverse in (Z/qZ)[X]/(X^N − 1) for q a power of two.
    ///
    /// Runs the almost-inverse algorithm over F₂, then lifts the result with
    /// Newton iterations `b ← b·(2 − a·b) mod 2^k` until `2^k ≥ q`. Returns
    /// `None` when the polynomial is not invertible modulo 2; the caller is
    /// expected to retry with a fresh candidate.
    pub fn invert_fq(&self, q: i32) -> Option<IntegerPolynomial> {
        let n = self.coeffs.len();
        let mut k = 0usize;
        let mut b = IntegerPolynomial::new(n + 1);
        b.coeffs[0] = 1;
        let mut c = IntegerPolynomial::new(n + 1);
        let mut f = IntegerPolynomial::new(n + 1);
        f.coeffs[..n].copy_from_slice(&self.coeffs);
        f.mod_positive(2);
        // X^N − 1 over F₂
        let mut g = IntegerPolynomial::new(n + 1);
        g.coeffs[0] = 1;
        g.coeffs[n] = 1;

        loop {
            while f.coeffs[0] == 0 {
                // f ← f/X, c ← c·X
                for i in 1..=n {
                    f.coeffs[i - 1] = f.coeffs[i];
                    c.coeffs[n + 1 - i] = c.coeffs[n - i];
                }
                f.coeffs[n] = 0;
                c.coeffs[0] = 0;
                k += 1;
                if f.equals_zero() {
                    return None;
                }
            }
            if f.equals_one() {
                break;
            }
            if f.degree() < g.degree() {
                std::mem::swap(&mut f, &mut g);
                std::mem::swap(&mut b, &mut c);
            }
            f.add_mod(&g, 2);
            b.add_mod(&c, 2);
        }
        if b.coeffs[n] != 0 {
            return None;
        }

        // inverse mod 2 is X^(N−k)·b(X)
        let mut inv = IntegerPolynomial::new(n);
        let k = k % n;
        for i in (0..n).rev() {
            let mut j = i as isize - k as isize;
            if j < 0 {
                j += n as isize;
            }
            inv.coeffs[j as usize] = b.coeffs[i];
        }

        Some(self.newton_lift(inv, q))
    }

    /// Lift an inverse mod 2 to an inverse mod q by doubling the modulus.
    fn newton_lift(&self, inv2: IntegerPolynomial, q: i32) -> IntegerPolynomial {
        let mut fq = inv2;
        let mut v = 2i32;
        while v < q {
            v *= 2;
            let mut temp = fq.clone();
            temp.mult_mod(2, v);
            let prod = self.multiply(&fq, v).multiply(&fq, v);
            temp.sub_mod(&prod, v);
            fq = temp;
        }
        fq.ensure_positive(q);
        fq
    }

    /// Compute the inverse in (Z/3Z)[X]/(X^N − 1).
    ///
    /// Same almost-inverse structure as [`invert_fq`](Self::invert_fq) but
    /// over F₃. Returns `None` when no inverse exists.
    pub fn invert_f3(&self) -> Option<IntegerPolynomial> {
        let n = self.coeffs.len();
        let mut k = 0usize;
        let mut b = IntegerPolynomial::new(n + 1);
        b.coeffs[0] = 1;
        let mut c = IntegerPolynomial::new(n + 1);
        let mut f = IntegerPolynomial::new(n + 1);
        f.coeffs[..n].copy_from_slice(&self.coeffs);
        f.mod_positive(3);
        // X^N − 1 over F₃
        let mut g = IntegerPolynomial::new(n + 1);
        g.coeffs[0] = 2;
        g.coeffs[n] = 1;

        loop {
            while f.coeffs[0] == 0 {
                for i in 1..=n {
                    f.coeffs[i - 1] = f.coeffs[i];
                    c.coeffs[n + 1 - i] = c.coeffs[n - i];
                }
                f.coeffs[n] = 0;
                c.coeffs[0] = 0;
                k += 1;
                if f.equals_zero() {
                    return None;
                }
            }
            // ±1: a unit constant
            if f.degree() == 0 && f.coeffs[0] != 0 {
                break;
            }
            if f.degree() < g.degree() {
                std::mem::swap(&mut f, &mut g);
                std::mem::swap(&mut b, &mut c);
            }
            if f.coeffs[0] == g.coeffs[0] {
                f.sub_mod(&g, 3);
                b.sub_mod(&c, 3);
            } else {
                f.add_mod(&g, 3);
                b.add_mod(&c, 3);
            }
        }
        if b.coeffs[n] != 0 {
            return None;
        }

        // inverse mod 3 is ±X^(N−k)·b(X), the sign given by f's constant
        let negate = f.coeffs[0] == 2;
        let mut inv = IntegerPolynomial::new(n);
        let k = k % n;
        for i in (0..n).rev() {
            let mut j = i as isize - k as isize;
            if j < 0 {
                j += n as isize;
            }
            inv.coeffs[j as usize] = if negate { -b.coeffs[i] } else { b.coeffs[i] };
        }
        inv.ensure_positive(3);
        Some(inv)
    }

    /// Pack coefficients at ⌈log₂ q⌉ bits each, LSB first.
    ///
    /// Coefficients are taken modulo q; callers normally reduce into
    /// `[0, q)` beforehand.
    pub fn to_binary(&self, q: i32) -> Vec<u8> {
        let bits = bits_per_coeff(q);
        let mut w = BitWriter::new();
        for &c in &self.coeffs {
            w.write_bits((c & (q - 1)) as u32, bits);
        }
        w.into_bytes()
    }

    /// [`to_binary`](Self::to_binary) truncated to the first `num_bytes` bytes.
    pub fn to_binary_trunc(&self, q: i32, num_bytes: usize) -> Vec<u8> {
        let mut data = self.to_binary(q);
        data.truncate(num_bytes);
        data
    }

    /// Pack each coefficient modulo 4 at 2 bits, LSB first.
    pub fn to_binary4(&self) -> Vec<u8> {
        let mut w = BitWriter::new();
        for &c in &self.coeffs {
            w.write_bits((c & 3) as u32, 2);
        }
        w.into_bytes()
    }

    /// Unpack a polynomial written by [`to_binary`](Self::to_binary).
    pub fn from_binary(data: &[u8], n: usize, q: i32) -> Result<IntegerPolynomial> {
        let bits = bits_per_coeff(q);
        let mut r = BitReader::new(data);
        let mut coeffs = Vec::with_capacity(n);
        for _ in 0..n {
            let c = r
                .read_bits(bits)
                .ok_or_else(|| ntru_err!("premature end of polynomial data"))?;
            coeffs.push(c as i32);
        }
        Ok(IntegerPolynomial { coeffs })
    }

    /// Block encoding of a ternary polynomial: 5 trits per byte in base 3.
    ///
    /// Each coefficient+1 is a base-3 digit, least significant digit first;
    /// 3⁵ = 243 so every output byte is below 243.
    pub fn to_binary3_tight(&self) -> Vec<u8> {
        debug_assert!(self.is_ternary());
        let mut out = Vec::with_capacity((self.coeffs.len() + 4) / 5);
        for chunk in self.coeffs.chunks(5) {
            let mut byte = 0u32;
            for (i, &c) in chunk.iter().enumerate() {
                byte += (c + 1) as u32 * POW3[i];
            }
            out.push(byte as u8);
        }
        out
    }

    /// Unpack a polynomial written by [`to_binary3_tight`](Self::to_binary3_tight).
    pub fn from_binary3_tight(data: &[u8], n: usize) -> Result<IntegerPolynomial> {
        let mut coeffs = Vec::with_capacity(n);
        for &b in data {
            if coeffs.len() == n {
                break;
            }
            let mut v = b as u32;
            if v >= 243 {
                return Err(ntru_err!("invalid byte in tight ternary encoding"));
            }
            for _ in 0..5 {
                if coeffs.len() == n {
                    break;
                }
                coeffs.push((v % 3) as i32 - 1);
                v /= 3;
            }
        }
        if coeffs.len() < n {
            return Err(ntru_err!("premature end of ternary data"));
        }
        Ok(IntegerPolynomial { coeffs })
    }

    /// SVES ternary packing: consecutive coefficient pairs become 3-bit
    /// groups via the fixed 8-entry table.
    ///
    /// When `skip_constant` is set, coefficient 0 is omitted (the maxM1 rule
    /// pins it to zero). With N odd and `skip_constant` unset, the final
    /// unpaired coefficient is not encoded and decodes as zero.
    pub fn to_binary3_sves(&self, skip_constant: bool) -> Vec<u8> {
        let mut w = BitWriter::new();
        let mut i = if skip_constant { 1 } else { 0 };
        while i + 1 < self.coeffs.len() {
            let t = sves_pair_index(self.coeffs[i], self.coeffs[i + 1]);
            w.write_bits((t >> 2) & 1, 1);
            w.write_bits((t >> 1) & 1, 1);
            w.write_bits(t & 1, 1);
            i += 2;
        }
        w.into_bytes()
    }

    /// Unpack a polynomial written by [`to_binary3_sves`](Self::to_binary3_sves).
    ///
    /// Consumes 3-bit groups until the polynomial cannot hold another pair;
    /// remaining coefficients (and trailing input bits) are left as zero.
    pub fn from_binary3_sves(data: &[u8], n: usize, skip_constant: bool) -> IntegerPolynomial {
        let mut poly = IntegerPolynomial::new(n);
        let mut r = BitReader::new(data);
        let mut i = if skip_constant { 1 } else { 0 };
        while i + 1 < n {
            let (b1, b2, b3) = match (r.read_bits(1), r.read_bits(1), r.read_bits(1)) {
                (Some(b1), Some(b2), Some(b3)) => (b1, b2, b3),
                _ => break,
            };
            let t = (b1 * 4 + b2 * 2 + b3) as usize;
            poly.coeffs[i] = SVES_COEFF1[t];
            poly.coeffs[i + 1] = SVES_COEFF2[t];
            i += 2;
        }
        poly
    }
}

impl Add for &IntegerPolynomial {
    type Output = IntegerPolynomial;

    fn add(self, rhs: Self) -> Self::Output {
        assert_eq!(self.coeffs.len(), rhs.coeffs.len(), "dimensions must match");
        IntegerPolynomial {
            coeffs: self
                .coeffs
                .iter()
                .zip(rhs.coeffs.iter())
                .map(|(&a, &b)| a + b)
                .collect(),
        }
    }
}

impl Add for IntegerPolynomial {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl AddAssign<&IntegerPolynomial> for IntegerPolynomial {
    fn add_assign(&mut self, rhs: &Self) {
        self.add(rhs);
    }
}

impl AddAssign for IntegerPolynomial {
    fn add_assign(&mut self, rhs: Self) {
        self.add(&rhs);
    }
}

impl Sub for &IntegerPolynomial {
    type Output = IntegerPolynomial;

    fn sub(self, rhs: Self) -> Self::Output {
        assert_eq!(self.coeffs.len(), rhs.coeffs.len(), "dimensions must match");
        IntegerPolynomial {
            coeffs: self
                .coeffs
                .iter()
                .zip(rhs.coeffs.iter())
                .map(|(&a, &b)| a - b)
                .collect(),
        }
    }
}

impl Sub for IntegerPolynomial {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl SubAssign<&IntegerPolynomial> for IntegerPolynomial {
    fn sub_assign(&mut self, rhs: &Self) {
        self.sub(rhs);
    }
}

impl SubAssign for IntegerPolynomial {
    fn sub_assign(&mut self, rhs: Self) {
        self.sub(&rhs);
    }
}

impl Neg for &IntegerPolynomial {
    type Output = IntegerPolynomial;

    fn neg(self) -> Self::Output {
        IntegerPolynomial {
            coeffs: self.coeffs.iter().map(|&c| -c).collect(),
        }
    }
}

impl Neg for IntegerPolynomial {
    type Output = Self;

    fn neg(self) -> Self::Output {
        -&self
    }
}

impl Mul for &IntegerPolynomial {
    type Output = IntegerPolynomial;

    /// Exact ring convolution over Z. Use
    /// [`multiply`](IntegerPolynomial::multiply) for the modular variant.
    fn mul(self, rhs: Self) -> Self::Output {
        let n = self.coeffs.len();
        assert_eq!(n, rhs.coeffs.len(), "dimensions must match");
        let mut acc = vec![0i64; n];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            let a = a as i64;
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                let mut k = i + j;
                if k >= n {
                    k -= n;
                }
                acc[k] += a * b as i64;
            }
        }
        IntegerPolynomial {
            coeffs: acc.iter().map(|&c| c as i32).collect(),
        }
    }
}

impl Mul for IntegerPolynomial {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl MulAssign for IntegerPolynomial {
    fn mul_assign(&mut self, rhs: Self) {
        *self = &*self * &rhs;
    }
}

/// Bits needed per coefficient in `[0, q)` for q a power of two.
pub(crate) fn bits_per_coeff(q: i32) -> usize {
    (31 - (q as u32).leading_zeros()) as usize
}

/// Table index for a coefficient pair.
///
/// The pair (−1,−1) never appears in well-formed SVES data; it is mapped to
/// index 7 so the encoder stays total, and the decrypt-side consistency
/// check rejects any ciphertext that produces it.
fn sves_pair_index(c1: i32, c2: i32) -> u32 {
    match (c1, c2) {
        (0, 0) => 0,
        (0, 1) => 1,
        (0, -1) => 2,
        (1, 0) => 3,
        (1, 1) => 4,
        (1, -1) => 5,
        (-1, 0) => 6,
        (-1, 1) | (-1, -1) => 7,
        _ => panic!("coefficient pair ({}, {}) is not ternary", c1, c2),
    }
}
