//! SVES-3 encryption.

use rand::{CryptoRng, Rng};
use tracing::debug;

use crate::error::{ntru_err, Result};
use crate::keys::EncryptionPublicKey;
use crate::math::IntegerPolynomial;
use crate::mgf;
use crate::params::EncryptionParameters;

use super::{build_seed, generate_blinding_poly, MAX_LOOP};

/// Encrypt `plaintext` under the public key.
///
/// The message is wrapped in the SVES-3 buffer `b ‖ len ‖ M ‖ 0…0`, turned
/// into a ternary polynomial, blinded with r derived from
/// `oid ‖ M ‖ b ‖ h` and masked with MGF(r·h). The whole procedure restarts
/// with a fresh random prefix b whenever the masked message fails the maxM1
/// or dm0 balance checks.
pub fn encrypt<R: Rng + CryptoRng>(
    params: &EncryptionParameters,
    public: &EncryptionPublicKey,
    plaintext: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    params.validate()?;
    let max_len = params.max_msg_len_bytes();
    if plaintext.len() > max_len {
        return Err(ntru_err!(
            "plaintext is {} bytes, maximum is {}",
            plaintext.len(),
            max_len
        ));
    }

    let n = params.n;
    let q = params.q;
    let db_bytes = params.db / 8;
    let skip_constant = params.max_m1 > 0;
    let h_trunc = public.h.to_binary_trunc(q, params.pk_len() / 8);

    for round in 0..MAX_LOOP {
        let mut b = vec![0u8; db_bytes];
        rng.fill_bytes(&mut b);

        // M′ = b ‖ len(M) ‖ M ‖ zero padding
        let mut buffer = Vec::with_capacity(params.buffer_len_bytes());
        buffer.extend_from_slice(&b);
        buffer.push(plaintext.len() as u8);
        buffer.extend_from_slice(plaintext);
        buffer.resize(params.buffer_len_bytes(), 0);

        let mut m_trin = IntegerPolynomial::from_binary3_sves(&buffer, n, skip_constant);

        let seed = build_seed(params, plaintext, &b, &h_trunc);
        let r = generate_blinding_poly(&seed, params);
        let mut big_r = r.multiply(&public.h, q);
        big_r.ensure_positive(q);

        let mask = mgf::generate_mask(&big_r.to_binary4(), params);
        m_trin.add(&mask);

        if params.max_m1 > 0 {
            if m_trin.sum_coeffs().abs() > params.max_m1 {
                debug!(round, "masked message exceeds the maxM1 bound, retrying");
                continue;
            }
            m_trin.set_coeff(0, 0);
        }
        m_trin.mod3();

        if m_trin.count(-1) < params.dm0
            || m_trin.count(0) < params.dm0
            || m_trin.count(1) < params.dm0
        {
            debug!(round, "masked message fails the dm0 balance check, retrying");
            continue;
        }

        let mut e = &big_r + &m_trin;
        e.ensure_positive(q);
        return Ok(e.to_binary(q));
    }
    Err(ntru_err!("encryption rejection loop exceeded its ceiling"))
}
