// RSA Decryption Implementation
// Implements block decryption with Chinese Remainder Theorem (CRT) optimization

use super::bigint::{from_bytes, mod_pow, to_bytes, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::keygen::{CrtParameters, KeyMaterial};
use crate::util::config::block_size_for;

/// Decrypt one block using the Chinese Remainder Theorem
///
/// Equivalent to `c^d mod n` for every `c` in `[0, n)`, but works with two
/// exponentiations of half the size.
pub fn crt_decrypt(c: &RsaBigInt, key: &KeyMaterial, crt: &CrtParameters) -> RsaBigInt {
    let (p, q) = (&key.p, &key.q);

    // mp = c^dp mod p
    let mp = mod_pow(&(c % p), &crt.dp, p);

    // mq = c^dq mod q
    let mq = mod_pow(&(c % q), &crt.dq, q);

    // h = (mq - mp) * q_inv mod q, kept non-negative by adding q first
    let mp_mod_q = &mp % q;
    let diff = (mq + q - mp_mod_q) % q;
    let h = (diff * &crt.q_inv) % q;

    // m = mp + p * h
    mp + p * h
}

/// Decrypt ciphertext blocks back into the original byte stream
///
/// Either every block decrypts or nothing is returned. Interior blocks are
/// widened back to the block size so leading zero bytes inside the message
/// survive; the final block keeps its minimal encoding, so leading zeros of
/// the last chunk are lost.
pub fn decrypt_bytes<B: AsRef<[u8]>>(
    blocks: &[B],
    key: &KeyMaterial,
    crt: &CrtParameters,
) -> RsaResult<Vec<u8>> {
    let size = block_size_for(key.bit_length);
    let mut plaintext = Vec::with_capacity(blocks.len() * size);

    for (index, block) in blocks.iter().enumerate() {
        let c = from_bytes(block.as_ref());
        if c >= key.n {
            return Err(RsaError::Decryption { index });
        }

        let m = to_bytes(&crt_decrypt(&c, key, crt));
        let is_last = index + 1 == blocks.len();
        if !is_last && m.len() < size {
            plaintext.resize(plaintext.len() + size - m.len(), 0);
        }
        plaintext.extend_from_slice(&m);
    }

    log::trace!("decrypted {} blocks into {} bytes", blocks.len(), plaintext.len());

    Ok(plaintext)
}

/// Decrypt ciphertext blocks to a string
pub fn decrypt_to_string<B: AsRef<[u8]>>(
    blocks: &[B],
    key: &KeyMaterial,
    crt: &CrtParameters,
) -> RsaResult<String> {
    let plaintext = decrypt_bytes(blocks, key, crt)?;
    Ok(String::from_utf8(plaintext)?)
}
