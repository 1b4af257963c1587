//! MGF-TP-1: the trit-polynomial mask generation function.
//!
//! Expands a seed into a length-N polynomial with coefficients in
//! {−1, 0, 1}. Bytes of the hash stream are rejection-sampled below
//! 3⁵ = 243 and each accepted byte contributes five base-3 digits.

use crate::math::IntegerPolynomial;
use crate::params::EncryptionParameters;

/// Generate the mask polynomial for a seed.
///
/// `Z` is `Hash(seed)` when the parameter set asks for seed hashing,
/// otherwise the raw seed. The byte stream is `Hash(Z ‖ be32(i))` for
/// i = 0, 1, …, with at least `minMGFHashCalls` blocks produced up front
/// and more appended on demand until N trits have been emitted.
pub fn generate_mask(seed: &[u8], params: &EncryptionParameters) -> IntegerPolynomial {
    let z = if params.hash_seed {
        params.digest.hash(seed)
    } else {
        seed.to_vec()
    };

    let mut stream = Vec::with_capacity(params.min_mgf_hash_calls * params.digest.digest_size());
    let mut counter = 0u32;
    while (counter as usize) < params.min_mgf_hash_calls {
        append_block(&z, &mut counter, &mut stream, params);
    }

    let mut coeffs = Vec::with_capacity(params.n);
    let mut pos = 0;
    while coeffs.len() < params.n {
        if pos == stream.len() {
            append_block(&z, &mut counter, &mut stream, params);
        }
        let byte = stream[pos];
        pos += 1;
        if byte >= 243 {
            continue;
        }
        let mut o = byte as u32;
        for _ in 0..4 {
            if coeffs.len() == params.n {
                break;
            }
            let rem = o % 3;
            coeffs.push(trit(rem));
            o = (o - rem) / 3;
        }
        if coeffs.len() < params.n {
            coeffs.push(trit(o));
        }
    }

    IntegerPolynomial::from_coeffs(coeffs)
}

fn append_block(z: &[u8], counter: &mut u32, stream: &mut Vec<u8>, params: &EncryptionParameters) {
    let mut h = params.digest.hasher();
    h.update(z);
    h.update(&counter.to_be_bytes());
    stream.extend_from_slice(&h.finalize());
    *counter += 1;
}

fn trit(digit: u32) -> i32 {
    if digit == 2 {
        -1
    } else {
        digit as i32
    }
}
