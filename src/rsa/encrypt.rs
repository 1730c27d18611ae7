// RSA Encryption Implementation
// Splits a message into modulus-sized blocks and encrypts each one (no padding)

use super::bigint::{from_bytes, mod_pow, to_bytes, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::keygen::KeyMaterial;
use crate::util::config::block_size_for;

/// Plaintext bytes per block for this key
pub fn block_size(key: &KeyMaterial) -> usize {
    block_size_for(key.bit_length)
}

/// Raw RSA encryption primitive: m^e mod n
pub fn encrypt_block(m: &RsaBigInt, key: &KeyMaterial) -> RsaBigInt {
    mod_pow(m, &key.e, &key.n)
}

/// Encrypt bytes using the public half of `key`
///
/// Returns one minimal big-endian ciphertext per block, in message order.
/// Identical plaintext blocks produce identical ciphertexts.
pub fn encrypt_bytes(message: &[u8], key: &KeyMaterial) -> RsaResult<Vec<Vec<u8>>> {
    let size = block_size(key);
    let mut blocks = Vec::with_capacity(message.len().div_ceil(size));

    for (index, chunk) in message.chunks(size).enumerate() {
        let m = from_bytes(chunk);
        if m >= key.n {
            return Err(RsaError::BlockTooLarge {
                index,
                modulus_bits: key.modulus_bits(),
            });
        }

        let c = encrypt_block(&m, key);
        blocks.push(to_bytes(&c));
    }

    log::trace!(
        "encrypted {} bytes into {} blocks of up to {} bytes",
        message.len(),
        blocks.len(),
        size
    );

    Ok(blocks)
}

/// Encrypt a string using RSA public key
pub fn encrypt_string(plaintext: &str, key: &KeyMaterial) -> RsaResult<Vec<Vec<u8>>> {
    encrypt_bytes(plaintext.as_bytes(), key)
}
