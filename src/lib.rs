//! NTRUEncrypt public-key encryption with the SVES-3 padding scheme from
//! EESS #1.
//!
//! The scheme works in the truncated polynomial ring Z[X]/(X^N − 1) with a
//! power-of-two modulus q and the small modulus p = 3.
//!
//! Key components:
//! - Polynomial algebra mod q and mod 3, with inversion by almost-inverse
//!   plus Newton lifting
//! - Ternary secrets in dense, sparse and product form
//! - The deterministic IGF-2 index generator and MGF-TP-1 mask generator
//! - The SVES-3 encrypt/decrypt state machines with their rejection loops
//!
//! # Example
//!
//! ```
//! use ntru_sves::{decrypt, encrypt, generate_key_pair, EncryptionParameters};
//!
//! let params = EncryptionParameters::apr2011_439();
//! let mut rng = rand::rngs::OsRng;
//! let kp = generate_key_pair(&params, &mut rng).unwrap();
//!
//! let ciphertext = encrypt(&params, &kp.public, b"attack at dawn", &mut rng).unwrap();
//! let plaintext = decrypt(&params, &kp, &ciphertext).unwrap();
//! assert_eq!(plaintext, b"attack at dawn");
//! ```

pub mod digest;
pub mod engine;
pub mod error;
pub mod igf;
pub mod keys;
pub mod math;
pub mod mgf;
pub mod params;
pub mod rng;

pub use digest::HashAlgorithm;
pub use engine::{
    decrypt, encrypt, generate_key_pair, generate_key_pair_deterministic, generate_key_pair_multi,
};
pub use error::{NtruError, Result};
pub use keys::{
    EncryptionKeyPair, EncryptionPrivateKey, EncryptionPublicKey, TernaryCarrier,
};
pub use params::{EncryptionParameters, PolyType};
pub use rng::{PrngAlgorithm, SeedRng};
