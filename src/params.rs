//! Parameter sets for NTRUEncrypt with SVES-3 padding.
//!
//! This module defines the cryptographic parameters of the scheme: the ring
//! dimension, the moduli, the prescribed polynomial weights and the knobs of
//! the deterministic generators. Ten canonical sets are predefined, keyed by
//! their 3-byte OID; the FAST variants share an OID with their base set and
//! differ only in using product-form secrets.
//!
//! # Overview
//!
//! A parameter set balances:
//! - **Security**: lattice hardness grows with the ring dimension N
//! - **Correctness**: the dm0 and maxM1 checks keep decryption unambiguous
//! - **Efficiency**: product-form secrets trade memory for multiply speed
//!
//! # Example
//!
//! ```
//! use ntru_sves::params::EncryptionParameters;
//!
//! let params = EncryptionParameters::ees1087ep2();
//! assert!(params.validate().is_ok());
//! assert_eq!(params.dg(), 362);
//! assert_eq!(params.max_msg_len_bytes(), 170);
//! ```

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;
use crate::error::{ntru_err, Result};
use crate::rng::PrngAlgorithm;

/// Shape of the secret polynomial f and the blinding polynomial r.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolyType {
    /// One ternary polynomial of weight df.
    Simple,
    /// Product form f1·f2 + f3 of three sparse ternary factors.
    Product,
}

impl PolyType {
    pub fn from_selector(value: i32) -> PolyType {
        match value {
            1 => PolyType::Product,
            _ => PolyType::Simple,
        }
    }

    pub fn selector(&self) -> i32 {
        match self {
            PolyType::Simple => 0,
            PolyType::Product => 1,
        }
    }
}

/// Immutable bundle of scheme parameters.
///
/// Derived quantities (`dg`, `pk_len`, buffer sizes, the maximum message
/// length) are recomputed on demand, so a record read back from its binary
/// form needs no separate initialization step.
///
/// # Example
///
/// ```
/// use ntru_sves::params::EncryptionParameters;
///
/// let params = EncryptionParameters::apr2011_439();
/// let blob = params.to_bytes();
/// let back = EncryptionParameters::from_bytes(&blob).unwrap();
/// assert_eq!(params, back);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionParameters {
    /// Ring dimension N, an odd prime.
    pub n: usize,
    /// Large modulus q, a power of two.
    pub q: i32,
    /// Weight of the secret polynomial (simple form).
    pub df: usize,
    /// Weight of the first product-form factor.
    pub df1: usize,
    /// Weight of the second product-form factor.
    pub df2: usize,
    /// Weight of the third product-form factor.
    pub df3: usize,
    /// Number of random prefix bits in the SVES-3 buffer, a multiple of 8.
    pub db: usize,
    /// Minimum count of each of {−1, 0, 1} in the masked message.
    pub dm0: usize,
    /// Bound on |Σ coefficients| of the masked message; 0 disables the
    /// check, a nonzero value also pins the constant coefficient to zero.
    pub max_m1: i32,
    /// Bit width of an index-generator candidate.
    pub c: usize,
    /// Hash blocks the index generator produces up front.
    pub min_igf_hash_calls: usize,
    /// Hash blocks the mask generator produces up front.
    pub min_mgf_hash_calls: usize,
    /// Whether the mask generator hashes its seed before streaming.
    pub hash_seed: bool,
    /// 3-byte parameter-set identifier.
    pub oid: [u8; 3],
    /// Use the sparse ternary representation for secrets and blinding.
    pub sparse: bool,
    /// Fast-Fp: f = 1 + 3F so that f⁻¹ mod 3 = 1 trivially.
    pub fast_fp: bool,
    /// Simple or product-form secrets.
    pub poly_type: PolyType,
    /// Digest used by the IGF, MGF and deterministic key generation.
    pub digest: HashAlgorithm,
    /// Randomness source selector.
    pub prng: PrngAlgorithm,
}

#[allow(clippy::too_many_arguments)]
impl EncryptionParameters {
    /// Build a simple-form parameter set.
    pub fn new_simple(
        n: usize,
        q: i32,
        df: usize,
        dm0: usize,
        max_m1: i32,
        db: usize,
        c: usize,
        min_igf_hash_calls: usize,
        min_mgf_hash_calls: usize,
        hash_seed: bool,
        oid: [u8; 3],
        sparse: bool,
        fast_fp: bool,
        digest: HashAlgorithm,
    ) -> Self {
        Self {
            n,
            q,
            df,
            df1: 0,
            df2: 0,
            df3: 0,
            db,
            dm0,
            max_m1,
            c,
            min_igf_hash_calls,
            min_mgf_hash_calls,
            hash_seed,
            oid,
            sparse,
            fast_fp,
            poly_type: PolyType::Simple,
            digest,
            prng: PrngAlgorithm::System,
        }
    }

    /// Build a product-form parameter set.
    pub fn new_product(
        n: usize,
        q: i32,
        df1: usize,
        df2: usize,
        df3: usize,
        dm0: usize,
        max_m1: i32,
        db: usize,
        c: usize,
        min_igf_hash_calls: usize,
        min_mgf_hash_calls: usize,
        hash_seed: bool,
        oid: [u8; 3],
        sparse: bool,
        digest: HashAlgorithm,
    ) -> Self {
        Self {
            n,
            q,
            df: 0,
            df1,
            df2,
            df3,
            db,
            dm0,
            max_m1,
            c,
            min_igf_hash_calls,
            min_mgf_hash_calls,
            hash_seed,
            oid,
            sparse,
            fast_fp: true,
            poly_type: PolyType::Product,
            digest,
            prng: PrngAlgorithm::System,
        }
    }

    /// EES1087EP2: N = 1087, SHA-512.
    pub fn ees1087ep2() -> Self {
        Self::new_simple(
            1087,
            2048,
            120,
            120,
            0,
            256,
            13,
            25,
            14,
            true,
            [0, 6, 3],
            true,
            false,
            HashAlgorithm::Sha512,
        )
    }

    /// EES1087EP2 with product-form secrets.
    pub fn ees1087ep2_fast() -> Self {
        Self::new_product(
            1087,
            2048,
            8,
            8,
            11,
            120,
            0,
            256,
            13,
            25,
            14,
            true,
            [0, 6, 3],
            true,
            HashAlgorithm::Sha512,
        )
    }

    /// EES1171EP1: N = 1171, SHA-512.
    pub fn ees1171ep1() -> Self {
        Self::new_simple(
            1171,
            2048,
            106,
            113,
            0,
            256,
            13,
            20,
            15,
            true,
            [0, 6, 4],
            true,
            false,
            HashAlgorithm::Sha512,
        )
    }

    /// EES1171EP1 with product-form secrets.
    pub fn ees1171ep1_fast() -> Self {
        Self::new_product(
            1171,
            2048,
            8,
            8,
            11,
            113,
            0,
            256,
            13,
            20,
            15,
            true,
            [0, 6, 4],
            true,
            HashAlgorithm::Sha512,
        )
    }

    /// EES1499EP1: N = 1499, SHA-512.
    pub fn ees1499ep1() -> Self {
        Self::new_simple(
            1499,
            2048,
            79,
            79,
            0,
            256,
            13,
            17,
            19,
            true,
            [0, 6, 5],
            true,
            false,
            HashAlgorithm::Sha512,
        )
    }

    /// EES1499EP1 with product-form secrets.
    pub fn ees1499ep1_fast() -> Self {
        Self::new_product(
            1499,
            2048,
            7,
            8,
            11,
            79,
            0,
            256,
            13,
            17,
            19,
            true,
            [0, 6, 5],
            true,
            HashAlgorithm::Sha512,
        )
    }

    /// APR2011-439: N = 439, SHA-256.
    pub fn apr2011_439() -> Self {
        Self::new_simple(
            439,
            2048,
            146,
            130,
            126,
            128,
            9,
            32,
            9,
            true,
            [0, 7, 101],
            true,
            false,
            HashAlgorithm::Sha256,
        )
    }

    /// APR2011-439 with product-form secrets.
    pub fn apr2011_439_fast() -> Self {
        Self::new_product(
            439,
            2048,
            9,
            8,
            5,
            130,
            126,
            128,
            9,
            32,
            9,
            true,
            [0, 7, 101],
            true,
            HashAlgorithm::Sha256,
        )
    }

    /// APR2011-743: N = 743, SHA-512.
    pub fn apr2011_743() -> Self {
        Self::new_simple(
            743,
            2048,
            248,
            220,
            60,
            256,
            10,
            27,
            14,
            true,
            [0, 7, 105],
            true,
            false,
            HashAlgorithm::Sha512,
        )
    }

    /// APR2011-743 with product-form secrets.
    pub fn apr2011_743_fast() -> Self {
        Self::new_product(
            743,
            2048,
            11,
            11,
            15,
            220,
            60,
            256,
            10,
            27,
            14,
            true,
            [0, 7, 105],
            false,
            HashAlgorithm::Sha512,
        )
    }

    /// All predefined parameter sets.
    pub fn all() -> Vec<EncryptionParameters> {
        vec![
            Self::ees1087ep2(),
            Self::ees1087ep2_fast(),
            Self::ees1171ep1(),
            Self::ees1171ep1_fast(),
            Self::ees1499ep1(),
            Self::ees1499ep1_fast(),
            Self::apr2011_439(),
            Self::apr2011_439_fast(),
            Self::apr2011_743(),
            Self::apr2011_743_fast(),
        ]
    }

    /// Look up a predefined set by OID.
    ///
    /// FAST variants share the OID of their base set; `use_product` selects
    /// between them.
    pub fn by_oid(oid: &[u8; 3], use_product: bool) -> Option<EncryptionParameters> {
        Self::all()
            .into_iter()
            .find(|p| p.oid == *oid && (p.poly_type == PolyType::Product) == use_product)
    }

    /// Prescribed weight of the generator polynomial g: `dg = N/3`.
    pub fn dg(&self) -> usize {
        self.n / 3
    }

    /// Public-key hash-seed contribution length in bits; equals db.
    pub fn pk_len(&self) -> usize {
        self.db
    }

    /// Bit capacity of the SVES-3 message buffer.
    pub fn buffer_len_bits(&self) -> usize {
        (self.n * 3 / 2 + 7) / 8 * 8 + 1
    }

    /// Byte length of the SVES-3 message buffer.
    pub fn buffer_len_bytes(&self) -> usize {
        (self.buffer_len_bits() + 7) / 8
    }

    /// Maximum plaintext length in bytes.
    ///
    /// When `max_m1 > 0` the constant coefficient carries no message data,
    /// so one ring position is lost.
    pub fn max_msg_len_bytes(&self) -> usize {
        self.max_msg_len_signed() as usize
    }

    fn max_msg_len_signed(&self) -> i64 {
        let eff_n = if self.max_m1 > 0 { self.n - 1 } else { self.n };
        (eff_n * 3 / 2 / 8) as i64 - 1 - (self.db / 8) as i64
    }

    /// Check structural constraints.
    pub fn validate(&self) -> Result<()> {
        if self.n < 3 || self.n % 2 == 0 {
            return Err(ntru_err!("ring dimension must be an odd prime"));
        }
        if self.q < 2 || (self.q & (self.q - 1)) != 0 {
            return Err(ntru_err!("q must be a power of two"));
        }
        if self.db % 8 != 0 {
            return Err(ntru_err!("db must be a multiple of 8"));
        }
        if self.c == 0 || self.c > 31 || (1usize << self.c) < self.n {
            return Err(ntru_err!(
                "candidate width c cannot cover the ring dimension"
            ));
        }
        let max_len = self.max_msg_len_signed();
        if !(1..=255).contains(&max_len) {
            return Err(ntru_err!(
                "maximum message length {} does not fit the one-byte length field",
                max_len
            ));
        }
        Ok(())
    }

    /// Serialize to the fixed little-endian wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(66);
        for v in [
            self.n as i32,
            self.q,
            self.df as i32,
            self.df1 as i32,
            self.df2 as i32,
            self.df3 as i32,
            self.db as i32,
            self.dm0 as i32,
            self.max_m1,
            self.c as i32,
            self.min_igf_hash_calls as i32,
            self.min_mgf_hash_calls as i32,
        ] {
            out.write_i32::<LittleEndian>(v).expect("vec write");
        }
        out.push(self.hash_seed as u8);
        out.extend_from_slice(&self.oid);
        out.push(self.sparse as u8);
        out.push(self.fast_fp as u8);
        for v in [
            self.poly_type.selector(),
            self.digest.selector(),
            self.prng.selector(),
        ] {
            out.write_i32::<LittleEndian>(v).expect("vec write");
        }
        out
    }

    /// Reconstruct a record written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(data: &[u8]) -> Result<EncryptionParameters> {
        let mut r = Cursor::new(data);
        let n = r.read_i32::<LittleEndian>()? as usize;
        let q = r.read_i32::<LittleEndian>()?;
        let df = r.read_i32::<LittleEndian>()? as usize;
        let df1 = r.read_i32::<LittleEndian>()? as usize;
        let df2 = r.read_i32::<LittleEndian>()? as usize;
        let df3 = r.read_i32::<LittleEndian>()? as usize;
        let db = r.read_i32::<LittleEndian>()? as usize;
        let dm0 = r.read_i32::<LittleEndian>()? as usize;
        let max_m1 = r.read_i32::<LittleEndian>()?;
        let c = r.read_i32::<LittleEndian>()? as usize;
        let min_igf_hash_calls = r.read_i32::<LittleEndian>()? as usize;
        let min_mgf_hash_calls = r.read_i32::<LittleEndian>()? as usize;
        let hash_seed = r.read_u8()? != 0;
        let mut oid = [0u8; 3];
        r.read_exact(&mut oid)?;
        let sparse = r.read_u8()? != 0;
        let fast_fp = r.read_u8()? != 0;
        let poly_type = PolyType::from_selector(r.read_i32::<LittleEndian>()?);
        let digest = HashAlgorithm::from_selector(r.read_i32::<LittleEndian>()?);
        let prng = PrngAlgorithm::from_selector(r.read_i32::<LittleEndian>()?);
        Ok(EncryptionParameters {
            n,
            q,
            df,
            df1,
            df2,
            df3,
            db,
            dm0,
            max_m1,
            c,
            min_igf_hash_calls,
            min_mgf_hash_calls,
            hash_seed,
            oid,
            sparse,
            fast_fp,
            poly_type,
            digest,
            prng,
        })
    }
}
