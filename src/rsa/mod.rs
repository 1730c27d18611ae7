// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod engine;
pub mod error;
pub mod keygen;

pub use decrypt::{crt_decrypt, decrypt_bytes, decrypt_to_string};
pub use encrypt::{block_size, encrypt_bytes, encrypt_string};
pub use engine::RsaEngine;
pub use error::{RsaError, RsaResult};
pub use keygen::{generate, CrtParameters, KeyMaterial};
