//! Byte-level checks of the wire formats.
//!
//! Pins down the layouts readers on other platforms depend on: the
//! little-endian parameter blob, the big-endian key headers, and the
//! bit-packed polynomial encodings.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use ntru_sves::keys::{EncryptionKeyPair, EncryptionPublicKey};
use ntru_sves::math::IntegerPolynomial;
use ntru_sves::params::{EncryptionParameters, PolyType};
use ntru_sves::{generate_key_pair, HashAlgorithm};

use rand::rngs::OsRng;

#[test]
fn test_parameter_blob_layout() {
    let params = EncryptionParameters::apr2011_439();
    let blob = params.to_bytes();
    assert_eq!(blob.len(), 66);

    // twelve little-endian i32 fields in fixed order
    let fields: Vec<i32> = (0..12)
        .map(|i| LittleEndian::read_i32(&blob[i * 4..]))
        .collect();
    assert_eq!(fields, vec![439, 2048, 146, 0, 0, 0, 128, 130, 126, 9, 32, 9]);

    assert_eq!(blob[48], 1); // hashSeed
    assert_eq!(&blob[49..52], &[0, 7, 101]); // OID
    assert_eq!(blob[52], 1); // sparse
    assert_eq!(blob[53], 0); // fastFp
    assert_eq!(LittleEndian::read_i32(&blob[54..]), PolyType::Simple.selector());
    assert_eq!(
        LittleEndian::read_i32(&blob[58..]),
        HashAlgorithm::Sha256.selector()
    );
    assert_eq!(LittleEndian::read_i32(&blob[62..]), 0); // prng: system CSPRNG
}

#[test]
fn test_public_key_layout() {
    let params = EncryptionParameters::apr2011_439();
    let n = params.n;
    let coeffs: Vec<i32> = (0..n as i32).map(|i| i % params.q).collect();
    let pk = EncryptionPublicKey::new(IntegerPolynomial::from_coeffs(coeffs), n, params.q);

    let bytes = pk.to_bytes();
    assert_eq!(BigEndian::read_u16(&bytes[0..2]), n as u16);
    assert_eq!(BigEndian::read_u16(&bytes[2..4]), params.q as u16);
    // 11 bits per coefficient for q = 2048
    assert_eq!(bytes.len(), 4 + (n * 11 + 7) / 8);

    // first coefficients 0, 1, 2 at 11 bits LSB-first:
    // byte0 = low 8 bits of c0, byte1 = c0 high ‖ c1 low, ...
    assert_eq!(bytes[4], 0x00);
    assert_eq!(bytes[5], 0x08); // coefficient 1 starts at bit 11
}

#[test]
fn test_private_key_flags_byte() {
    for params in [
        EncryptionParameters::apr2011_439(),      // sparse, simple
        EncryptionParameters::apr2011_439_fast(), // sparse, fastFp, product
        EncryptionParameters::apr2011_743_fast(), // dense, fastFp, product
    ] {
        let kp = generate_key_pair(&params, &mut OsRng).unwrap();
        let bytes = kp.private.to_bytes();
        let mut expected = 0u8;
        if params.sparse {
            expected |= 1;
        }
        if params.fast_fp {
            expected |= 2;
        }
        if params.poly_type == PolyType::Product {
            expected |= 4;
        }
        assert_eq!(bytes[4], expected, "oid {:?}", params.oid);
    }
}

#[test]
fn test_key_pair_concatenation() {
    let params = EncryptionParameters::apr2011_439();
    let kp = generate_key_pair(&params, &mut OsRng).unwrap();

    let pub_bytes = kp.public.to_bytes();
    let priv_bytes = kp.private.to_bytes();
    let pair_bytes = kp.to_bytes();

    assert_eq!(pair_bytes.len(), pub_bytes.len() + priv_bytes.len());
    assert_eq!(&pair_bytes[..pub_bytes.len()], &pub_bytes[..]);
    assert_eq!(&pair_bytes[pub_bytes.len()..], &priv_bytes[..]);

    let back = EncryptionKeyPair::from_bytes(&pair_bytes).unwrap();
    assert!(back == kp);
}

#[test]
fn test_tight_ternary_encoding_values() {
    // trits (c+1) are base-3 digits, least significant first:
    // [1, 0, -1, 1, 1] → 2 + 1·3 + 0·9 + 2·27 + 2·81 = 221
    let poly = IntegerPolynomial::from_coeffs(vec![1, 0, -1, 1, 1]);
    assert_eq!(poly.to_binary3_tight(), vec![221]);
    let back = IntegerPolynomial::from_binary3_tight(&[221], 5).unwrap();
    assert_eq!(back, poly);

    // a byte ≥ 243 is not a valid trit block
    assert!(IntegerPolynomial::from_binary3_tight(&[243], 5).is_err());
}

#[test]
fn test_serde_parameter_roundtrip() {
    for params in EncryptionParameters::all() {
        let json = serde_json::to_string(&params).unwrap();
        let back: EncryptionParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }
}
