// RSA Engine
// Holds immutable key material and exposes the encrypt/decrypt contract

use super::bigint::RsaBigInt;
use super::decrypt::{decrypt_bytes, decrypt_to_string};
use super::encrypt::{block_size, encrypt_bytes, encrypt_string};
use super::error::RsaResult;
use super::keygen::{generate, CrtParameters, KeyMaterial};
use crate::util::config::RsaConfig;
use rand::{CryptoRng, Rng};

/// Textbook RSA engine: key material generated once, then read-only
#[derive(Debug, Clone)]
pub struct RsaEngine {
    key: KeyMaterial,
    crt: CrtParameters,
}

impl RsaEngine {
    /// Generate a fresh key with `bit_length`-bit primes from the thread RNG
    pub fn construct(bit_length: u32) -> RsaResult<Self> {
        let config = RsaConfig::default().with_bit_length(bit_length);
        Self::with_config(&config, &mut rand::thread_rng())
    }

    /// Generate a key from `config`, drawing randomness only from `rng`
    pub fn with_config<R>(config: &RsaConfig, rng: &mut R) -> RsaResult<Self>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        let (key, crt) = generate(config, rng)?;
        Ok(Self { key, crt })
    }

    /// Wrap existing key material, deriving its CRT parameters
    pub fn from_key_material(key: KeyMaterial) -> RsaResult<Self> {
        let crt = key.crt_parameters()?;
        Ok(Self { key, crt })
    }

    pub fn key_material(&self) -> &KeyMaterial {
        &self.key
    }

    pub fn crt_parameters(&self) -> &CrtParameters {
        &self.crt
    }

    /// Public modulus n
    pub fn modulus(&self) -> &RsaBigInt {
        &self.key.n
    }

    /// Public exponent e
    pub fn public_exponent(&self) -> &RsaBigInt {
        &self.key.e
    }

    /// Plaintext bytes carried by each ciphertext block
    pub fn block_size(&self) -> usize {
        block_size(&self.key)
    }

    pub fn encrypt(&self, message: &[u8]) -> RsaResult<Vec<Vec<u8>>> {
        encrypt_bytes(message, &self.key)
    }

    pub fn encrypt_str(&self, message: &str) -> RsaResult<Vec<Vec<u8>>> {
        encrypt_string(message, &self.key)
    }

    pub fn decrypt<B: AsRef<[u8]>>(&self, blocks: &[B]) -> RsaResult<Vec<u8>> {
        decrypt_bytes(blocks, &self.key, &self.crt)
    }

    pub fn decrypt_to_string<B: AsRef<[u8]>>(&self, blocks: &[B]) -> RsaResult<String> {
        decrypt_to_string(blocks, &self.key, &self.crt)
    }
}
