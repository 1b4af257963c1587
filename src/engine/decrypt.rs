//! SVES-3 decryption.

use tracing::trace;

use crate::error::{ntru_err, NtruError, Result};
use crate::keys::EncryptionKeyPair;
use crate::math::IntegerPolynomial;
use crate::mgf;
use crate::params::EncryptionParameters;

use super::{build_seed, generate_blinding_poly};

/// The one message every integrity failure maps to, so the error carries no
/// oracle about which check tripped.
fn invalid_encoding() -> NtruError {
    ntru_err!("invalid message encoding")
}

/// Decrypt a ciphertext with a key pair.
///
/// Recovers ci = f·e reduced mod 3 (times fp when fast-Fp is off), strips
/// the mask, parses the SVES-3 buffer and finally re-derives the blinding
/// polynomial from the recovered message to check R′ = cR. Corruption,
/// a wrong key and an adversarial ciphertext are indistinguishable in the
/// returned error.
pub fn decrypt(
    params: &EncryptionParameters,
    kp: &EncryptionKeyPair,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    params.validate()?;
    let n = params.n;
    let q = params.q;
    let db_bytes = params.db / 8;
    let skip_constant = params.max_m1 > 0;

    let e = IntegerPolynomial::from_binary(ciphertext, n, q)?;

    // ci = e·f mod q, centered and reduced mod 3
    let mut ci = {
        let mut a = kp.private.t.multiply(&e, q);
        if kp.private.fast_fp {
            // f = 1 + 3t, so f·e = 3·(t·e) + e
            a.mult3(q);
            a.add_mod(&e, q);
            a.center0(q);
            a.mod3();
            a
        } else {
            a.center0(q);
            a.mod3();
            let mut ci = a.multiply(&kp.private.fp, 3);
            ci.center0(3);
            ci
        }
    };

    if ci.count(-1) < params.dm0 || ci.count(0) < params.dm0 || ci.count(1) < params.dm0 {
        return Err(invalid_encoding());
    }

    // cR = e − ci mod q
    let mut c_r = &e - &ci;
    c_r.ensure_positive(q);

    let mask = mgf::generate_mask(&c_r.to_binary4(), params);
    ci.sub(&mask);
    ci.mod3();
    let c_m = ci.to_binary3_sves(skip_constant);

    // parse b ‖ len ‖ message ‖ p0
    if c_m.len() < db_bytes + 1 {
        return Err(invalid_encoding());
    }
    let b = &c_m[..db_bytes];
    let msg_len = c_m[db_bytes] as usize;
    if msg_len > params.max_msg_len_bytes() || db_bytes + 1 + msg_len > c_m.len() {
        return Err(invalid_encoding());
    }
    let message = &c_m[db_bytes + 1..db_bytes + 1 + msg_len];
    let p0 = &c_m[db_bytes + 1 + msg_len..];
    if p0.iter().any(|&byte| byte != 0) {
        return Err(invalid_encoding());
    }
    trace!(msg_len, "recovered SVES-3 buffer parsed");

    // re-derive the blinding polynomial and check consistency
    let h_trunc = kp.public.h.to_binary_trunc(q, params.pk_len() / 8);
    let seed = build_seed(params, message, b, &h_trunc);
    let r_prime = generate_blinding_poly(&seed, params);
    let mut big_r_prime = r_prime.multiply(&kp.public.h, q);
    big_r_prime.ensure_positive(q);

    if big_r_prime != c_r {
        return Err(invalid_encoding());
    }

    Ok(message.to_vec())
}
