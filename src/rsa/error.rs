// RSA Error Types
// Every failure the engine can surface to its caller

use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RsaError {
    /// No probable prime found within the trial bound
    #[error("prime generation failed: {0}")]
    Generation(String),

    /// No usable public exponent, or a modular inverse does not exist
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// A plaintext chunk does not fit below the modulus
    #[error("plaintext block {index} is not smaller than the {modulus_bits}-bit modulus")]
    BlockTooLarge { index: usize, modulus_bits: u64 },

    /// A ciphertext block does not fit below the modulus
    #[error("ciphertext block {index} is not smaller than the modulus")]
    Decryption { index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("decrypted message is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;
