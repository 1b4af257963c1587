//! Key-pair generation.
//!
//! Two independent searches run back to back (or in parallel): the
//! generator polynomial g must be invertible mod q, and the secret f must be
//! invertible mod q and — unless fast-Fp makes it trivial — mod 3. The
//! public key is h = 3·g·f⁻¹ mod q.

use rand::{CryptoRng, Rng};
use tracing::debug;
use zeroize::Zeroize;

use crate::error::{ntru_err, Result};
use crate::keys::{EncryptionKeyPair, EncryptionPrivateKey, EncryptionPublicKey, TernaryCarrier};
use crate::math::ternary::generate_random_coeffs;
use crate::math::{DenseTernary, IntegerPolynomial, ProductFormPolynomial, SparseTernary};
use crate::params::{EncryptionParameters, PolyType};
use crate::rng::SeedRng;

use super::MAX_LOOP;

struct SecretPoly {
    t: TernaryCarrier,
    fq: IntegerPolynomial,
    fp: IntegerPolynomial,
}

/// Generate a key pair drawing all randomness from one source.
pub fn generate_key_pair<R: Rng + CryptoRng>(
    params: &EncryptionParameters,
    rng: &mut R,
) -> Result<EncryptionKeyPair> {
    params.validate()?;
    let g = generate_g(params, rng)?;
    let secret = generate_f(params, rng)?;
    assemble(params, g, secret)
}

/// Generate a key pair with separate sources for the two secrets.
///
/// The g search and the (f, f⁻¹) search are independent pure computations,
/// so they run under `rayon::join`.
pub fn generate_key_pair_multi<RF, RG>(
    params: &EncryptionParameters,
    rng_f: &mut RF,
    rng_g: &mut RG,
) -> Result<EncryptionKeyPair>
where
    RF: Rng + CryptoRng + Send,
    RG: Rng + CryptoRng + Send,
{
    params.validate()?;
    let (g, secret) = rayon::join(
        || generate_g(params, rng_g),
        || generate_f(params, rng_f),
    );
    assemble(params, g?, secret?)
}

/// Deterministic key generation from a passphrase and salt.
///
/// Identical inputs produce byte-identical key pairs: the generator search
/// draws from a digest-seeded stream and the secret search from an
/// independent branch of it.
pub fn generate_key_pair_deterministic(
    params: &EncryptionParameters,
    passphrase: &[u8],
    salt: &[u8],
) -> Result<EncryptionKeyPair> {
    let mut rng_g = SeedRng::from_passphrase(params.digest, passphrase, salt);
    let mut rng_f = rng_g.branch();
    generate_key_pair_multi(params, &mut rng_f, &mut rng_g)
}

fn generate_g<R: Rng>(params: &EncryptionParameters, rng: &mut R) -> Result<DenseTernary> {
    let dg = params.dg();
    for attempt in 0..MAX_LOOP {
        let g = DenseTernary::generate_random(params.n, dg, dg - 1, rng);
        if let Some(mut inverse) = g.as_poly().invert_fq(params.q) {
            inverse.zeroize();
            if attempt > 0 {
                debug!(attempt, "generator polynomial accepted after retries");
            }
            return Ok(g);
        }
    }
    Err(ntru_err!("no invertible generator polynomial found"))
}

fn generate_f<R: Rng>(params: &EncryptionParameters, rng: &mut R) -> Result<SecretPoly> {
    for attempt in 0..MAX_LOOP {
        let (t, t_int) = match params.poly_type {
            PolyType::Simple => {
                let neg_ones = if params.fast_fp {
                    params.df
                } else {
                    params.df - 1
                };
                let poly = IntegerPolynomial::from_coeffs(generate_random_coeffs(
                    params.n, params.df, neg_ones, rng,
                ));
                let t = if params.sparse {
                    TernaryCarrier::Sparse(SparseTernary::from_poly(&poly))
                } else {
                    TernaryCarrier::Dense(DenseTernary::new(poly.clone()))
                };
                (t, poly)
            }
            PolyType::Product => {
                let df3_neg_ones = if params.fast_fp {
                    params.df3
                } else {
                    params.df3 - 1
                };
                let prod = ProductFormPolynomial::generate_random(
                    params.n,
                    params.df1,
                    params.df2,
                    params.df3,
                    df3_neg_ones,
                    rng,
                );
                let t_int = prod.to_integer_polynomial();
                (TernaryCarrier::Product(prod), t_int)
            }
        };

        // f = 1 + 3t under fast-Fp, otherwise f = t
        let mut f = t_int;
        if params.fast_fp {
            f.mult(3);
            f.set_coeff(0, f.coeff(0) + 1);
        }

        let fp = if params.fast_fp {
            IntegerPolynomial::constant(params.n, 1)
        } else {
            match f.invert_f3() {
                Some(fp) => fp,
                None => continue,
            }
        };
        let fq = match f.invert_fq(params.q) {
            Some(fq) => fq,
            None => continue,
        };
        f.zeroize();
        if attempt > 0 {
            debug!(attempt, "secret polynomial accepted after retries");
        }
        return Ok(SecretPoly { t, fq, fp });
    }
    Err(ntru_err!("no invertible secret polynomial found"))
}

fn assemble(
    params: &EncryptionParameters,
    g: DenseTernary,
    secret: SecretPoly,
) -> Result<EncryptionKeyPair> {
    let mut h = g.multiply(&secret.fq, params.q);
    h.mult3(params.q);
    h.ensure_positive(params.q);

    let mut g = g;
    g.zeroize();
    let mut fq = secret.fq;
    fq.zeroize();

    let private = EncryptionPrivateKey {
        n: params.n,
        q: params.q,
        sparse: params.sparse,
        fast_fp: params.fast_fp,
        poly_type: params.poly_type,
        t: secret.t,
        fp: secret.fp,
    };
    let public = EncryptionPublicKey::new(h, params.n, params.q);
    Ok(EncryptionKeyPair::new(private, public))
}
