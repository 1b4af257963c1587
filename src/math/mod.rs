//! Mathematical primitives for the NTRU engine.
//!
//! This module provides the algebra the scheme is built on:
//!
//! - **Dense polynomials** over the convolution ring Z[X]/(X^N − 1),
//!   reduced modulo the large modulus q or the small modulus 3
//! - **Ternary representations** (dense and sparse index lists) with
//!   rotation-based multiplication
//! - **Product-form secrets** t = f1·f2 + f3
//! - **Polynomial inversion** modulo a power of two and modulo 3
//! - **Bit-level packing** shared by every wire codec
//!
//! # Example
//!
//! ```
//! use ntru_sves::math::IntegerPolynomial;
//!
//! let mut a = IntegerPolynomial::from_coeffs(vec![1, 0, 2047, 5]);
//! a.mod_center(2048);
//! assert_eq!(a.coeffs(), &[1, 0, -1, 5]);
//! ```

pub mod bigint;
pub mod encode;
pub mod poly;
pub mod product;
pub mod ternary;

pub use bigint::mod_inverse;
pub use poly::IntegerPolynomial;
pub use product::ProductFormPolynomial;
pub use ternary::{DenseTernary, SparseTernary};
