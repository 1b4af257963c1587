//! End-to-end correctness tests for the NTRU engine.
//!
//! Covers the full flow: KeyGen → Encrypt → Decrypt = Original Message,
//! plus key validity, tamper detection and deterministic key generation.

use ntru_sves::keys::{EncryptionKeyPair, EncryptionPrivateKey, TernaryCarrier};
use ntru_sves::math::{DenseTernary, IntegerPolynomial};
use ntru_sves::params::EncryptionParameters;
use ntru_sves::{decrypt, encrypt, generate_key_pair, generate_key_pair_deterministic};

use rand::rngs::OsRng;

#[test]
fn test_passphrase_keygen_roundtrip() {
    let params = EncryptionParameters::apr2011_439();
    let passphrase = b"correct horse battery staple";
    let salt = [0u8; 16];

    let kp = generate_key_pair_deterministic(&params, passphrase, &salt).unwrap();
    assert!(kp.is_valid(&params));

    let message = [0x74, 0x65, 0x73, 0x74]; // "test"
    let ciphertext = encrypt(&params, &kp.public, &message, &mut OsRng).unwrap();
    let plaintext = decrypt(&params, &kp, &ciphertext).unwrap();
    assert_eq!(plaintext, message);
}

#[test]
fn test_passphrase_keygen_deterministic() {
    let params = EncryptionParameters::apr2011_439();
    let passphrase = b"correct horse battery staple";
    let salt = [0u8; 16];

    let kp1 = generate_key_pair_deterministic(&params, passphrase, &salt).unwrap();
    let kp2 = generate_key_pair_deterministic(&params, passphrase, &salt).unwrap();
    assert_eq!(kp1.to_bytes(), kp2.to_bytes());

    // a different salt yields a different pair
    let kp3 = generate_key_pair_deterministic(&params, passphrase, &[1u8; 16]).unwrap();
    assert_ne!(kp1.to_bytes(), kp3.to_bytes());
}

#[test]
fn test_max_length_message_roundtrip() {
    let params = EncryptionParameters::ees1087ep2();
    assert_eq!(params.max_msg_len_bytes(), 170);

    let kp = generate_key_pair(&params, &mut OsRng).unwrap();
    let message = vec![0xAB; 170];
    let ciphertext = encrypt(&params, &kp.public, &message, &mut OsRng).unwrap();
    assert_eq!(decrypt(&params, &kp, &ciphertext).unwrap(), message);

    // one byte past the limit must be refused
    let too_long = vec![0xAB; 171];
    let err = encrypt(&params, &kp.public, &too_long, &mut OsRng).unwrap_err();
    assert!(err.to_string().contains("maximum"), "{}", err);
}

#[test]
fn test_tampered_ciphertext_rejected() {
    let params = EncryptionParameters::apr2011_743_fast();
    let kp = generate_key_pair(&params, &mut OsRng).unwrap();

    let message: Vec<u8> = (0u8..50).collect();
    let mut ciphertext = encrypt(&params, &kp.public, &message, &mut OsRng).unwrap();
    assert_eq!(decrypt(&params, &kp, &ciphertext).unwrap(), message);

    ciphertext[10] ^= 0x01;
    let err = decrypt(&params, &kp, &ciphertext).unwrap_err();
    assert_eq!(err.to_string(), "invalid message encoding");
}

#[test]
fn test_roundtrip_and_reload_all_parameter_sets() {
    for params in EncryptionParameters::all() {
        let kp = generate_key_pair(&params, &mut OsRng).unwrap();
        assert!(kp.is_valid(&params), "oid {:?}", params.oid);

        // empty and mid-size messages decrypt to themselves
        for message in [vec![], vec![0x5A; params.max_msg_len_bytes() / 2]] {
            let ciphertext = encrypt(&params, &kp.public, &message, &mut OsRng).unwrap();
            assert_eq!(
                decrypt(&params, &kp, &ciphertext).unwrap(),
                message,
                "oid {:?}",
                params.oid
            );
        }

        // parameter blob and key pair survive serialization by value
        let params_back = EncryptionParameters::from_bytes(&params.to_bytes()).unwrap();
        assert_eq!(params_back, params);
        let kp_back = EncryptionKeyPair::from_bytes(&kp.to_bytes()).unwrap();
        assert!(kp_back == kp, "oid {:?}", params.oid);
        assert!(kp_back.is_valid(&params));
    }
}

#[test]
fn test_perturbed_public_key_invalid() {
    let params = EncryptionParameters::apr2011_439();
    let kp = generate_key_pair(&params, &mut OsRng).unwrap();
    assert!(kp.is_valid(&params));

    let mut tampered = kp.clone();
    let old = tampered.public.h.coeff(7);
    tampered.public.h.set_coeff(7, (old + 1) % params.q);
    assert!(!tampered.is_valid(&params));
}

#[test]
fn test_perturbed_private_key_invalid() {
    // a dense carrier makes the secret easy to perturb coefficient-wise
    let mut params = EncryptionParameters::apr2011_439();
    params.sparse = false;
    let kp = generate_key_pair(&params, &mut OsRng).unwrap();
    assert!(kp.is_valid(&params));

    let mut t = kp.private.t.to_integer_polynomial();
    let flipped = match t.coeff(3) {
        0 => 1,
        c => -c,
    };
    t.set_coeff(3, flipped);
    let tampered = EncryptionKeyPair::new(
        EncryptionPrivateKey {
            n: kp.private.n,
            q: kp.private.q,
            sparse: kp.private.sparse,
            fast_fp: kp.private.fast_fp,
            poly_type: kp.private.poly_type,
            t: TernaryCarrier::Dense(DenseTernary::new(t)),
            fp: kp.private.fp.clone(),
        },
        kp.public.clone(),
    );
    assert!(!tampered.is_valid(&params));
}

#[test]
fn test_masked_message_constant_coefficient_zero() {
    // with maxM1 > 0 the constant coefficient of m′ is pinned to zero;
    // recompute m′ from the ciphertext with the private key to observe it
    let params = EncryptionParameters::apr2011_439();
    assert!(params.max_m1 > 0);
    let kp = generate_key_pair(&params, &mut OsRng).unwrap();

    for _ in 0..5 {
        let ciphertext = encrypt(&params, &kp.public, b"balanced", &mut OsRng).unwrap();
        let e = IntegerPolynomial::from_binary(&ciphertext, params.n, params.q).unwrap();

        let mut a = kp.private.t.multiply(&e, params.q);
        a.center0(params.q);
        a.mod3();
        let mut m_prime = a.multiply(&kp.private.fp, 3);
        m_prime.center0(3);

        assert_eq!(m_prime.coeff(0), 0);
        assert!(m_prime.count(-1) >= params.dm0);
        assert!(m_prime.count(0) >= params.dm0);
        assert!(m_prime.count(1) >= params.dm0);
    }
}

#[test]
fn test_wrong_key_rejected() {
    let params = EncryptionParameters::apr2011_439();
    let kp = generate_key_pair(&params, &mut OsRng).unwrap();
    let other = generate_key_pair(&params, &mut OsRng).unwrap();

    let ciphertext = encrypt(&params, &kp.public, b"secret", &mut OsRng).unwrap();
    let err = decrypt(&params, &other, &ciphertext).unwrap_err();
    assert_eq!(err.to_string(), "invalid message encoding");
}
