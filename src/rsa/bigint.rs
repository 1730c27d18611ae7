// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use super::error::{RsaError, RsaResult};
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Primes used to reject most candidates before Miller-Rabin
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97,
];

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to minimal big-endian bytes (zero is a single 0x00)
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    n.to_bytes_be()
}

/// Modular exponentiation: base^exponent mod modulus
///
/// Left-to-right square-and-multiply, most significant exponent bit first.
/// Runs in time proportional to the exponent's bit length and to the
/// exponent's Hamming weight, so it is NOT constant-time.
///
/// Panics if `modulus` is zero.
pub fn mod_pow(base: &RsaBigInt, exponent: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let base = base % modulus;
    let mut result = RsaBigInt::one();

    for i in (0..exponent.bits()).rev() {
        result = (&result * &result) % modulus;
        if exponent.bit(i) {
            result = (&result * &base) % modulus;
        }
    }

    result
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &quotient * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    (old_r, old_x, old_y)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let a = BigInt::from(a % m);
    let m = BigInt::from(m.clone());
    let (gcd, x, _) = extended_gcd(&a, &m);

    if !gcd.is_one() {
        return None;
    }

    // x may be negative; bring it into [0, m)
    x.mod_floor(&m).to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime; a composite survives `rounds`
/// random witnesses with probability at most 4^-rounds
pub fn is_probable_prime<R: Rng + ?Sized>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool {
    if n < &RsaBigInt::from(2u8) {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        if *n == RsaBigInt::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    // Witness loop
    let two = RsaBigInt::from(2u8);
    for _ in 0..rounds {
        // Pick random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        let mut witnessed_composite = true;
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                witnessed_composite = false;
                break;
            }
        }

        if witnessed_composite {
            return false;
        }
    }

    // Probably prime
    true
}

/// Draw an odd candidate with exactly `bit_length` bits
fn random_candidate<R: Rng + ?Sized>(bit_length: u32, rng: &mut R) -> RsaBigInt {
    let mut candidate = rng.gen_biguint(u64::from(bit_length));
    candidate |= RsaBigInt::one() << (bit_length - 1);
    candidate |= RsaBigInt::one();
    candidate
}

/// Generate a random probable prime of exactly `bit_length` bits
///
/// Gives up with `RsaError::Generation` after `max_trials` candidates.
pub fn random_prime<R>(
    bit_length: u32,
    rounds: u32,
    max_trials: u32,
    rng: &mut R,
) -> RsaResult<RsaBigInt>
where
    R: Rng + CryptoRng + ?Sized,
{
    if bit_length < 2 {
        return Err(RsaError::Generation(format!(
            "no {}-bit primes exist",
            bit_length
        )));
    }

    for trial in 1..=max_trials {
        let candidate = random_candidate(bit_length, rng);
        if is_probable_prime(&candidate, rounds, rng) {
            log::debug!("found {}-bit probable prime after {} candidates", bit_length, trial);
            return Ok(candidate);
        }
    }

    Err(RsaError::Generation(format!(
        "no {}-bit probable prime found in {} candidates",
        bit_length, max_trials
    )))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// RNG that only ever yields zero bytes
    pub(crate) struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    impl CryptoRng for ZeroRng {}

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        assert_eq!(mod_pow(&from_u64(3), &from_u64(5), &from_u64(7)), from_u64(5));
        // 4^13 mod 497 = 445
        assert_eq!(
            mod_pow(&from_u64(4), &from_u64(13), &from_u64(497)),
            from_u64(445)
        );
        // 2^10 mod 1000 = 24
        assert_eq!(
            mod_pow(&from_u64(2), &from_u64(10), &from_u64(1000)),
            from_u64(24)
        );
    }

    #[test]
    fn test_mod_pow_edge_cases() {
        // Exponent zero yields one
        assert_eq!(mod_pow(&from_u64(12345), &from_u64(0), &from_u64(97)), from_u64(1));
        // Base zero with positive exponent yields zero
        assert_eq!(mod_pow(&from_u64(0), &from_u64(17), &from_u64(97)), from_u64(0));
        // Modulus one collapses everything to zero
        assert_eq!(mod_pow(&from_u64(5), &from_u64(3), &from_u64(1)), from_u64(0));
        // Base larger than the modulus is reduced first
        assert_eq!(mod_pow(&from_u64(501), &from_u64(13), &from_u64(497)), from_u64(445));
    }

    #[test]
    fn test_mod_pow_matches_num_bigint() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let modulus = rng.gen_biguint(256) + 2u8;
            let base = rng.gen_biguint(300);
            let exponent = rng.gen_biguint(128);
            assert_eq!(
                mod_pow(&base, &exponent, &modulus),
                base.modpow(&exponent, &modulus)
            );
        }
    }

    #[test]
    fn test_mod_pow_deterministic() {
        let base = from_u64(0xdead_beef);
        let exponent = from_u64(65537);
        let modulus = from_u64(0xffff_fffb);
        let first = mod_pow(&base, &exponent, &modulus);
        for _ in 0..10 {
            assert_eq!(mod_pow(&base, &exponent, &modulus), first);
        }
    }

    #[test]
    fn test_extended_gcd() {
        let (a, b) = (BigInt::from(240), BigInt::from(46));
        let (g, x, y) = extended_gcd(&a, &b);
        assert_eq!(g, BigInt::from(2));
        assert_eq!(&a * &x + &b * &y, g);
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7, so inverse of 3 mod 7 is 5
        let a = from_u64(3);
        let m = from_u64(7);
        let inv = mod_inverse(&a, &m).unwrap();
        assert_eq!(inv, from_u64(5));
        assert_eq!((a * inv) % m, from_u64(1));

        // 17^-1 mod 3120 = 2753 (the classic textbook key)
        assert_eq!(
            mod_inverse(&from_u64(17), &from_u64(3120)).unwrap(),
            from_u64(2753)
        );
    }

    #[test]
    fn test_mod_inverse_missing() {
        assert_eq!(mod_inverse(&from_u64(6), &from_u64(9)), None);
        assert_eq!(mod_inverse(&from_u64(3), &from_u64(0)), None);
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(&from_u64(65537), &from_u64(3120)), from_u64(1));
        assert_eq!(gcd(&from_u64(12), &from_u64(18)), from_u64(6));
    }

    #[test]
    fn test_is_probable_prime() {
        let mut rng = StdRng::seed_from_u64(1);
        for p in [2u64, 3, 7, 97, 101, 65537, 2_147_483_647] {
            assert!(is_probable_prime(&from_u64(p), 20, &mut rng), "{} is prime", p);
        }
        // 561 and 41041 are Carmichael numbers
        for c in [0u64, 1, 4, 9, 561, 41041, 4_294_967_297] {
            assert!(!is_probable_prime(&from_u64(c), 20, &mut rng), "{} is composite", c);
        }
    }

    #[test]
    fn test_random_prime_bit_length() {
        let mut rng = StdRng::seed_from_u64(42);
        for bits in [8u32, 16, 64, 128] {
            let p = random_prime(bits, 20, 10_000, &mut rng).unwrap();
            assert_eq!(p.bits(), u64::from(bits));
            assert!(p.bit(0));
            assert!(is_probable_prime(&p, 20, &mut rng));
        }
    }

    #[test]
    fn test_random_prime_exhausted() {
        // A zero RNG always yields 2^7 + 1 = 129 = 3 * 43
        let result = random_prime(8, 20, 16, &mut ZeroRng);
        assert!(matches!(result, Err(RsaError::Generation(_))));
    }
}
