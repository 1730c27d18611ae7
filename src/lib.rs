//! Textbook RSA: key generation, block-segmented encryption and
//! CRT-accelerated decryption over arbitrary-precision integers.
//!
//! No padding scheme is applied and the arithmetic is not constant-time.
//! Identical plaintext blocks encrypt to identical ciphertexts. This crate
//! is for learning the arithmetic, not for protecting data.

pub mod rsa;
pub mod util;

pub use rsa::{RsaEngine, RsaError, RsaResult};
pub use util::RsaConfig;
