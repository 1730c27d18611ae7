// RSA Key Generation
// Derives key material and CRT parameters from two random probable primes

use super::bigint::{from_u64, gcd, mod_inverse, random_prime, RsaBigInt};
use super::error::{RsaError, RsaResult};
use crate::util::config::RsaConfig;
use num_traits::One;
use rand::{CryptoRng, Rng};

/// RSA key material
///
/// `p`, `q`, `phi` and `d` are secret; `n` and `e` form the public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub bit_length: u32,    // Bit length of each prime
    pub p: RsaBigInt,       // First prime factor
    pub q: RsaBigInt,       // Second prime factor
    pub n: RsaBigInt,       // Modulus
    pub phi: RsaBigInt,     // (p-1)(q-1)
    pub e: RsaBigInt,       // Public exponent
    pub d: RsaBigInt,       // Private exponent
}

/// Pre-computed values for CRT decryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrtParameters {
    pub dp: RsaBigInt,     // d mod (p-1)
    pub dq: RsaBigInt,     // d mod (q-1)
    pub q_inv: RsaBigInt,  // p^(-1) mod q
}

impl KeyMaterial {
    /// Bit length of the modulus
    pub fn modulus_bits(&self) -> u64 {
        self.n.bits()
    }

    /// Derive CRT parameters from this key
    pub fn crt_parameters(&self) -> RsaResult<CrtParameters> {
        let p_minus_1 = &self.p - 1u8;
        let q_minus_1 = &self.q - 1u8;
        let q_inv = mod_inverse(&self.p, &self.q).ok_or_else(|| {
            RsaError::KeyGeneration("p has no inverse modulo q".to_string())
        })?;

        Ok(CrtParameters {
            dp: &self.d % &p_minus_1,
            dq: &self.d % &q_minus_1,
            q_inv,
        })
    }
}

/// Pick the smallest e >= `start` coprime with phi, trying `limit` candidates
pub fn select_public_exponent(phi: &RsaBigInt, start: u64, limit: u64) -> RsaResult<RsaBigInt> {
    let end = start.saturating_add(limit);
    let mut e = from_u64(start);

    for candidate in start..end {
        if gcd(&e, phi).is_one() {
            if candidate != start {
                log::debug!("public exponent {} rejected, using {}", start, candidate);
            }
            return Ok(e);
        }
        e += 1u8;
    }

    Err(RsaError::KeyGeneration(format!(
        "no public exponent in [{}, {}) is coprime with phi",
        start, end
    )))
}

/// Assemble key material from two distinct primes
pub fn key_material_from_primes(
    bit_length: u32,
    p: RsaBigInt,
    q: RsaBigInt,
    config: &RsaConfig,
) -> RsaResult<KeyMaterial> {
    if p == q {
        return Err(RsaError::KeyGeneration("p and q must differ".to_string()));
    }

    // Step 1: Compute n = p * q
    let n = &p * &q;

    // Step 2: Compute φ(n) = (p-1)(q-1)
    let phi = (&p - 1u8) * (&q - 1u8);

    // Step 3: Smallest e >= start coprime with φ(n)
    let e = select_public_exponent(&phi, config.public_exponent, config.exponent_search_limit)?;

    // Step 4: Compute d = e^(-1) mod φ(n)
    let d = mod_inverse(&e, &phi).ok_or_else(|| {
        RsaError::KeyGeneration(format!("e={} has no inverse modulo phi", e))
    })?;

    Ok(KeyMaterial {
        bit_length,
        p,
        q,
        n,
        phi,
        e,
        d,
    })
}

/// Generate RSA key material and CRT parameters
///
/// Randomness comes only from `rng`; a seeded RNG yields the same key every time.
pub fn generate<R>(config: &RsaConfig, rng: &mut R) -> RsaResult<(KeyMaterial, CrtParameters)>
where
    R: Rng + CryptoRng + ?Sized,
{
    config.validate()?;

    let bits = config.bit_length;
    let rounds = config.miller_rabin_rounds;
    let trials = config.max_prime_trials;

    // Generate two random primes p and q
    let p = random_prime(bits, rounds, trials, rng)?;
    let mut q = random_prime(bits, rounds, trials, rng)?;

    // Ensure p != q; only plausible for very short primes
    let mut redraws = 0;
    while p == q {
        redraws += 1;
        if redraws > trials {
            return Err(RsaError::Generation(format!(
                "second prime kept colliding with the first after {} redraws",
                trials
            )));
        }
        q = random_prime(bits, rounds, trials, rng)?;
    }

    let key = key_material_from_primes(bits, p, q, config)?;
    let crt = key.crt_parameters()?;

    log::info!(
        "generated RSA key: {}-bit primes, {}-bit modulus, e={}",
        bits,
        key.modulus_bits(),
        key.e
    );

    Ok((key, crt))
}
