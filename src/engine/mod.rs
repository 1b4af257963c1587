//! The SVES-3 engine: key generation, encryption and decryption.
//!
//! All three operations are free functions over a parameter set, following
//! the data flow
//!
//! ```text
//! encrypt:  (M, h) → sData → r → R = r·h → mask = MGF(R) → e = R + M′
//! decrypt:  e → ci → cR = e − ci → M′ = ci − MGF(cR) → re-derive R′, check R′ = cR
//! ```
//!
//! Rejection loops (invertibility during key generation, the dm0/maxM1
//! checks during encryption) retry silently up to a fixed ceiling so
//! pathological parameters fail with an error instead of spinning.

mod decrypt;
mod encrypt;
mod keygen;

pub use decrypt::decrypt;
pub use encrypt::encrypt;
pub use keygen::{generate_key_pair, generate_key_pair_deterministic, generate_key_pair_multi};

use crate::igf::IndexGenerator;
use crate::keys::TernaryCarrier;
use crate::math::{DenseTernary, ProductFormPolynomial, SparseTernary};
use crate::params::{EncryptionParameters, PolyType};

/// Ceiling on every rejection loop.
pub(crate) const MAX_LOOP: usize = 1000;

/// Seed data for the blinding polynomial:
/// `oid ‖ message ‖ b ‖ truncate(h.to_binary(q), db/8)`.
pub(crate) fn build_seed(
    params: &EncryptionParameters,
    message: &[u8],
    b: &[u8],
    h_trunc: &[u8],
) -> Vec<u8> {
    let mut seed = Vec::with_capacity(3 + message.len() + b.len() + h_trunc.len());
    seed.extend_from_slice(&params.oid);
    seed.extend_from_slice(message);
    seed.extend_from_slice(b);
    seed.extend_from_slice(h_trunc);
    seed
}

/// Derive the blinding polynomial r from seed data, deterministically.
pub(crate) fn generate_blinding_poly(
    seed: &[u8],
    params: &EncryptionParameters,
) -> TernaryCarrier {
    let mut ig = IndexGenerator::new(seed, params);
    match params.poly_type {
        PolyType::Product => {
            let r1 = SparseTernary::generate_blinding(&mut ig, params.n, params.df1);
            let r2 = SparseTernary::generate_blinding(&mut ig, params.n, params.df2);
            let r3 = SparseTernary::generate_blinding(&mut ig, params.n, params.df3);
            TernaryCarrier::Product(ProductFormPolynomial::new(r1, r2, r3))
        }
        PolyType::Simple => {
            let r = SparseTernary::generate_blinding(&mut ig, params.n, params.df);
            if params.sparse {
                TernaryCarrier::Sparse(r)
            } else {
                TernaryCarrier::Dense(DenseTernary::from(&r))
            }
        }
    }
}
