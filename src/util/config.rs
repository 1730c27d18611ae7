// Key Generation Configuration
// Tunables for prime search, public exponent selection and key size

use crate::rsa::error::{RsaError, RsaResult};

/// Smallest prime bit length the engine accepts
pub const MIN_BIT_LENGTH: u32 = 8;

/// Conventional starting point for the public exponent (F4)
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Configuration for RSA key generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaConfig {
    /// Bit length of each prime; the modulus is roughly twice as long
    pub bit_length: u32,
    /// First candidate for `e`
    pub public_exponent: u64,
    /// How many consecutive candidates above `public_exponent` are tried
    pub exponent_search_limit: u64,
    /// Miller-Rabin rounds per candidate; each round errs with probability <= 1/4
    pub miller_rabin_rounds: u32,
    /// Candidates drawn per prime before giving up
    pub max_prime_trials: u32,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            bit_length: 1024,
            public_exponent: DEFAULT_PUBLIC_EXPONENT,
            exponent_search_limit: 10_000,
            miller_rabin_rounds: 50,
            max_prime_trials: 10_000,
        }
    }
}

impl RsaConfig {
    pub fn with_bit_length(mut self, bits: u32) -> Self {
        self.bit_length = bits;
        self
    }

    pub fn with_public_exponent(mut self, e: u64) -> Self {
        self.public_exponent = e;
        self
    }

    pub fn with_exponent_search_limit(mut self, limit: u64) -> Self {
        self.exponent_search_limit = limit;
        self
    }

    pub fn with_miller_rabin_rounds(mut self, rounds: u32) -> Self {
        self.miller_rabin_rounds = rounds;
        self
    }

    pub fn with_max_prime_trials(mut self, trials: u32) -> Self {
        self.max_prime_trials = trials;
        self
    }

    /// Check the configuration before any expensive work starts
    pub fn validate(&self) -> RsaResult<()> {
        if self.bit_length < MIN_BIT_LENGTH {
            return Err(RsaError::InvalidConfig(format!(
                "bit length must be at least {}, got {}",
                MIN_BIT_LENGTH, self.bit_length
            )));
        }
        if self.public_exponent < 3 {
            return Err(RsaError::InvalidConfig(format!(
                "public exponent must be at least 3, got {}",
                self.public_exponent
            )));
        }
        if self.miller_rabin_rounds == 0 {
            return Err(RsaError::InvalidConfig(
                "at least one Miller-Rabin round is required".to_string(),
            ));
        }
        if self.max_prime_trials == 0 {
            return Err(RsaError::InvalidConfig(
                "at least one prime candidate must be allowed".to_string(),
            ));
        }
        Ok(())
    }

    /// Plaintext bytes per block: `bit_length / 8 - 11`, never below one byte
    pub fn block_size(&self) -> usize {
        block_size_for(self.bit_length)
    }
}

/// Plaintext block size for a given prime bit length.
///
/// The 11-byte margin mirrors PKCS#1 v1.5 overhead although no padding is
/// applied. Short keys where the margin would swallow the whole block fall
/// back to one byte per block, which still stays below `n`.
pub fn block_size_for(bit_length: u32) -> usize {
    ((bit_length / 8) as usize).saturating_sub(11).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RsaConfig::default();
        assert_eq!(config.bit_length, 1024);
        assert_eq!(config.public_exponent, 65537);
        assert!(config.validate().is_ok());
        assert_eq!(config.block_size(), 117);
    }

    #[test]
    fn test_builder() {
        let config = RsaConfig::default()
            .with_bit_length(256)
            .with_public_exponent(3)
            .with_miller_rabin_rounds(20)
            .with_max_prime_trials(5)
            .with_exponent_search_limit(1);

        assert_eq!(config.bit_length, 256);
        assert_eq!(config.public_exponent, 3);
        assert_eq!(config.miller_rabin_rounds, 20);
        assert_eq!(config.max_prime_trials, 5);
        assert_eq!(config.exponent_search_limit, 1);
        assert_eq!(config.block_size(), 21);
    }

    #[test]
    fn test_block_size_small_keys() {
        assert_eq!(block_size_for(8), 1);
        assert_eq!(block_size_for(64), 1);
        assert_eq!(block_size_for(96), 1);
        assert_eq!(block_size_for(104), 2);
    }

    #[test]
    fn test_invalid_config() {
        let too_short = RsaConfig::default().with_bit_length(7);
        assert!(matches!(too_short.validate(), Err(RsaError::InvalidConfig(_))));

        let no_rounds = RsaConfig::default().with_miller_rabin_rounds(0);
        assert!(matches!(no_rounds.validate(), Err(RsaError::InvalidConfig(_))));

        let tiny_e = RsaConfig::default().with_public_exponent(1);
        assert!(matches!(tiny_e.validate(), Err(RsaError::InvalidConfig(_))));

        let no_trials = RsaConfig::default().with_max_prime_trials(0);
        assert!(matches!(no_trials.validate(), Err(RsaError::InvalidConfig(_))));
    }
}
