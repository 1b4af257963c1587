//! Key material and its wire formats.
//!
//! The public key is the blinded generator h reduced mod q. The private key
//! carries the secret in whichever shape it was generated in (dense, sparse
//! or product form) together with fp = f⁻¹ mod 3. Secret polynomials are
//! zeroized when a private key is dropped, and the private-key type does not
//! implement `Debug` so secrets cannot end up in logs by accident.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use zeroize::Zeroize;

use crate::error::{ntru_err, Result};
use crate::math::bigint::mod_inverse;
use crate::math::poly::bits_per_coeff;
use crate::math::{DenseTernary, IntegerPolynomial, ProductFormPolynomial, SparseTernary};
use crate::params::{EncryptionParameters, PolyType};

const FLAG_SPARSE: u8 = 1;
const FLAG_FAST_FP: u8 = 2;
const FLAG_PRODUCT: u8 = 4;

/// The private key's polymorphic ternary secret.
#[derive(Clone, PartialEq, Eq)]
pub enum TernaryCarrier {
    Dense(DenseTernary),
    Sparse(SparseTernary),
    Product(ProductFormPolynomial),
}

impl TernaryCarrier {
    /// Ring multiplication with a dense polynomial, in whichever way the
    /// carrier supports best.
    pub fn multiply(&self, g: &IntegerPolynomial, modulus: i32) -> IntegerPolynomial {
        match self {
            TernaryCarrier::Dense(t) => t.multiply(g, modulus),
            TernaryCarrier::Sparse(t) => t.multiply(g, modulus),
            TernaryCarrier::Product(t) => t.multiply(g, modulus),
        }
    }

    /// Project onto a dense length-N integer polynomial.
    pub fn to_integer_polynomial(&self) -> IntegerPolynomial {
        match self {
            TernaryCarrier::Dense(t) => t.to_integer_polynomial(),
            TernaryCarrier::Sparse(t) => t.to_integer_polynomial(),
            TernaryCarrier::Product(t) => t.to_integer_polynomial(),
        }
    }
}

impl Zeroize for TernaryCarrier {
    fn zeroize(&mut self) {
        match self {
            TernaryCarrier::Dense(t) => t.zeroize(),
            TernaryCarrier::Sparse(t) => t.zeroize(),
            TernaryCarrier::Product(t) => t.zeroize(),
        }
    }
}

/// Public key: (h, N, q) with h reduced into `[0, q)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionPublicKey {
    pub h: IntegerPolynomial,
    pub n: usize,
    pub q: i32,
}

impl EncryptionPublicKey {
    pub fn new(h: IntegerPolynomial, n: usize, q: i32) -> Self {
        debug_assert_eq!(h.len(), n);
        Self { h, n, q }
    }

    /// Layout: u16-BE N ‖ u16-BE q ‖ h packed at ⌈log₂ q⌉ bits.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u16::<BigEndian>(self.n as u16).expect("vec write");
        out.write_u16::<BigEndian>(self.q as u16).expect("vec write");
        out.extend_from_slice(&self.h.to_binary(self.q));
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read(&mut Cursor::new(data))
    }

    pub(crate) fn read(r: &mut Cursor<&[u8]>) -> Result<Self> {
        let n = r.read_u16::<BigEndian>()? as usize;
        let q = r.read_u16::<BigEndian>()? as i32;
        if n == 0 || q < 2 {
            return Err(ntru_err!("malformed public key header"));
        }
        let mut h_bytes = vec![0u8; (n * bits_per_coeff(q) + 7) / 8];
        r.read_exact(&mut h_bytes)?;
        let h = IntegerPolynomial::from_binary(&h_bytes, n, q)?;
        Ok(Self { h, n, q })
    }
}

/// Private key: the ternary secret t, fp = f⁻¹ mod 3 and the shape flags.
#[derive(Clone, PartialEq)]
pub struct EncryptionPrivateKey {
    pub n: usize,
    pub q: i32,
    pub sparse: bool,
    pub fast_fp: bool,
    pub poly_type: PolyType,
    pub t: TernaryCarrier,
    pub fp: IntegerPolynomial,
}

impl EncryptionPrivateKey {
    /// Layout: u16-BE N ‖ u16-BE q ‖ flags ‖ t.
    ///
    /// Product-form secrets are written as three sparse encodings (counts
    /// then indices packed at ⌈log₂ N⌉ bits); everything else is the tight
    /// ternary block encoding of the integer projection. fp is re-derived
    /// on load.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u16::<BigEndian>(self.n as u16).expect("vec write");
        out.write_u16::<BigEndian>(self.q as u16).expect("vec write");
        let mut flags = 0u8;
        if self.sparse {
            flags |= FLAG_SPARSE;
        }
        if self.fast_fp {
            flags |= FLAG_FAST_FP;
        }
        if self.poly_type == PolyType::Product {
            flags |= FLAG_PRODUCT;
        }
        out.push(flags);
        match &self.t {
            TernaryCarrier::Product(p) => out.extend_from_slice(&p.to_binary()),
            other => {
                out.extend_from_slice(&other.to_integer_polynomial().to_binary3_tight());
            }
        }
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read(&mut Cursor::new(data))
    }

    pub(crate) fn read(r: &mut Cursor<&[u8]>) -> Result<Self> {
        let n = r.read_u16::<BigEndian>()? as usize;
        let q = r.read_u16::<BigEndian>()? as i32;
        if n == 0 || q < 2 {
            return Err(ntru_err!("malformed private key header"));
        }
        let flags = r.read_u8()?;
        let sparse = flags & FLAG_SPARSE != 0;
        let fast_fp = flags & FLAG_FAST_FP != 0;
        let poly_type = if flags & FLAG_PRODUCT != 0 {
            PolyType::Product
        } else {
            PolyType::Simple
        };

        let t = match poly_type {
            PolyType::Product => {
                TernaryCarrier::Product(ProductFormPolynomial::from_binary(r, n)?)
            }
            PolyType::Simple => {
                let mut packed = vec![0u8; (n + 4) / 5];
                r.read_exact(&mut packed)?;
                let poly = IntegerPolynomial::from_binary3_tight(&packed, n)?;
                if sparse {
                    TernaryCarrier::Sparse(SparseTernary::from_poly(&poly))
                } else {
                    TernaryCarrier::Dense(DenseTernary::new(poly))
                }
            }
        };

        let fp = if fast_fp {
            IntegerPolynomial::constant(n, 1)
        } else {
            t.to_integer_polynomial()
                .invert_f3()
                .ok_or_else(|| ntru_err!("stored secret is not invertible mod 3"))?
        };

        Ok(Self {
            n,
            q,
            sparse,
            fast_fp,
            poly_type,
            t,
            fp,
        })
    }
}

impl Drop for EncryptionPrivateKey {
    fn drop(&mut self) {
        self.t.zeroize();
        self.fp.zeroize();
    }
}

/// Matched private and public halves.
#[derive(Clone, PartialEq)]
pub struct EncryptionKeyPair {
    pub private: EncryptionPrivateKey,
    pub public: EncryptionPublicKey,
}

impl EncryptionKeyPair {
    pub fn new(private: EncryptionPrivateKey, public: EncryptionPublicKey) -> Self {
        Self { private, public }
    }

    /// Serialization is the concatenation `public ‖ private`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.public.to_bytes();
        out.extend_from_slice(&self.private.to_bytes());
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut r = Cursor::new(data);
        let public = EncryptionPublicKey::read(&mut r)?;
        let private = EncryptionPrivateKey::read(&mut r)?;
        Ok(Self { private, public })
    }

    /// Structural validity of the pair under a parameter set.
    ///
    /// Checks that h is reduced mod q, that a simple-form secret is ternary,
    /// and that the generator polynomial reconstructed as
    /// `3·(f·h)·(9⁻¹ mod q)`, centered, is ternary with exactly dg ones and
    /// dg−1 negative ones. (Key generation multiplies h by 3, which is why
    /// the divisor here is 9.)
    pub fn is_valid(&self, params: &EncryptionParameters) -> bool {
        let n = params.n;
        let q = params.q;
        if self.public.n != n || self.private.n != n {
            return false;
        }
        if self.public.q != q || self.private.q != q {
            return false;
        }
        if self.public.h.len() != n || !self.public.h.is_reduced(q) {
            return false;
        }

        let t_int = self.private.t.to_integer_polynomial();
        if t_int.len() != n {
            return false;
        }
        if params.poly_type == PolyType::Simple && !t_int.is_ternary() {
            return false;
        }

        let mut f = t_int;
        if self.private.fast_fp {
            f.mult(3);
            f.set_coeff(0, f.coeff(0) + 1);
        }

        let inv9 = match mod_inverse(9, q as i64) {
            Some(v) => v as i32,
            None => return false,
        };
        let mut g = f.multiply(&self.public.h, q);
        g.mult3(q);
        g.mult_mod(inv9, q);
        g.mod_center(q);

        let dg = params.dg();
        g.is_ternary() && g.count(1) == dg && g.count(-1) == dg - 1
    }
}
