//! Group setup configuration.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Smallest modulus size accepted by [`SetupConfig::validate`].
pub const MIN_MODULUS_BITS: usize = 16;

/// Largest modulus size accepted by [`SetupConfig::validate`].
pub const MAX_MODULUS_BITS: usize = 8192;

/// Parameters controlling group generation.
///
/// Modulus sizes of 128 bits are only fit for toy use; anything that claims
/// real security needs at least 2048 bits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Bit length of the prime modulus `p`.
    pub modulus_bits: usize,
    /// Bit length of the subgroup order `q`. Derived from `modulus_bits` when unset.
    pub order_bits: Option<usize>,
    /// Miller-Rabin rounds per primality test.
    pub primality_rounds: usize,
    /// Candidates tried for each of `q` and `p` before giving up.
    pub max_candidates: usize,
    /// Bases tried when deriving the subgroup generator.
    pub max_generator_trials: usize,
    /// Build a safe-prime group: `p = 2q + 1`, so `q` has `modulus_bits - 1` bits.
    pub safe_prime: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            modulus_bits: 2048,
            order_bits: None,
            primality_rounds: 40,
            max_candidates: 100_000,
            max_generator_trials: 64,
            safe_prime: false,
        }
    }
}

impl SetupConfig {
    /// Default configuration for a given modulus size.
    pub fn with_modulus_bits(modulus_bits: usize) -> Self {
        Self {
            modulus_bits,
            ..Self::default()
        }
    }

    /// Bit length of the subgroup order actually used.
    pub fn order_bits(&self) -> usize {
        if self.safe_prime {
            return self.modulus_bits.saturating_sub(1);
        }

        self.order_bits.unwrap_or_else(|| default_order_bits(self.modulus_bits))
    }

    /// Returns `true` if `p = 2q + 1`.
    pub fn is_safe_prime(&self) -> bool {
        self.order_bits().checked_add(1) == Some(self.modulus_bits)
    }

    /// Loads configuration from `.env` file, TOML file, and environment variables.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables with `DEVIRGO_` prefix (e.g., `DEVIRGO_MODULUS_BITS=3072`)
    /// 2. TOML configuration file (if exists)
    /// 3. `.env` file (if exists)
    /// 4. Built-in defaults
    ///
    /// The TOML file path can be set via `DEVIRGO_CONFIG_PATH`. If not set, defaults to
    /// `./config/devirgo.toml`. A missing file is silently skipped.
    ///
    /// # Errors
    /// Returns an error if the configuration is malformed.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> figment::error::Result<Self> {
        use figment::providers::{Env, Format, Serialized, Toml};
        use figment::Figment;

        // Attempt to load .env file (silently ignore if it doesn't exist)
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("DEVIRGO_CONFIG_PATH")
            .unwrap_or_else(|_| "config/devirgo.toml".to_string());

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("DEVIRGO_").ignore(&["CONFIG_PATH"]))
            .extract()
    }

    /// Checks that the sizes and search bounds are usable.
    pub fn validate(&self) -> Result<()> {
        if self.modulus_bits < MIN_MODULUS_BITS {
            return Err(Error::InvalidParams(format!(
                "modulus must have at least {MIN_MODULUS_BITS} bits, got {}",
                self.modulus_bits
            )));
        }

        if self.modulus_bits > MAX_MODULUS_BITS {
            return Err(Error::InvalidParams(format!(
                "modulus must have at most {MAX_MODULUS_BITS} bits, got {}",
                self.modulus_bits
            )));
        }

        let order_bits = self.order_bits();
        if order_bits < 2 {
            return Err(Error::InvalidParams(format!(
                "subgroup order must have at least 2 bits, got {order_bits}"
            )));
        }

        if self.safe_prime && self.order_bits.is_some_and(|bits| bits != order_bits) {
            return Err(Error::InvalidParams(format!(
                "a safe-prime group needs a {order_bits}-bit order"
            )));
        }

        // p = 2qk + 1 with k >= 1.
        if order_bits >= self.modulus_bits {
            return Err(Error::InvalidParams(format!(
                "subgroup order of {order_bits} bits does not fit a {}-bit modulus",
                self.modulus_bits
            )));
        }

        if self.primality_rounds == 0 {
            return Err(Error::InvalidParams("primality_rounds cannot be zero".to_string()));
        }

        if self.max_candidates == 0 {
            return Err(Error::InvalidParams("max_candidates cannot be zero".to_string()));
        }

        if self.max_generator_trials == 0 {
            return Err(Error::InvalidParams("max_generator_trials cannot be zero".to_string()));
        }

        Ok(())
    }
}

/// Subgroup order size paired with a modulus size, following the DSA pairings.
pub fn default_order_bits(modulus_bits: usize) -> usize {
    match modulus_bits {
        bits if bits >= 2048 => 256,
        bits if bits >= 1024 => 160,
        bits => bits / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = SetupConfig::default();
        config.validate().unwrap();
        assert_eq!(config.order_bits(), 256);
    }

    #[test]
    fn order_bits_follow_modulus() {
        assert_eq!(default_order_bits(3072), 256);
        assert_eq!(default_order_bits(1024), 160);
        assert_eq!(default_order_bits(128), 64);
        assert_eq!(default_order_bits(16), 8);
    }

    #[test]
    fn rejects_tiny_modulus() {
        assert!(SetupConfig::with_modulus_bits(8).validate().is_err());
    }

    #[test]
    fn order_must_be_below_modulus() {
        let config = SetupConfig {
            modulus_bits: 64,
            order_bits: Some(64),
            ..SetupConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SetupConfig {
            modulus_bits: 64,
            order_bits: Some(63),
            ..SetupConfig::default()
        };
        config.validate().unwrap();
        assert!(config.is_safe_prime());
    }

    #[test]
    fn huge_order_bits_are_rejected() {
        let config = SetupConfig {
            modulus_bits: 64,
            order_bits: Some(usize::MAX),
            ..SetupConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidParams(_))));
        assert!(!config.is_safe_prime());
    }

    #[test]
    fn safe_prime_fixes_order_bits() {
        let config = SetupConfig {
            safe_prime: true,
            ..SetupConfig::with_modulus_bits(128)
        };
        config.validate().unwrap();
        assert_eq!(config.order_bits(), 127);

        let conflicting = SetupConfig {
            order_bits: Some(64),
            ..config
        };
        assert!(conflicting.validate().is_err());
    }

    #[test]
    fn rejects_zero_bounds() {
        let config = SetupConfig {
            max_candidates: 0,
            ..SetupConfig::with_modulus_bits(64)
        };
        assert!(config.validate().is_err());

        let config = SetupConfig {
            primality_rounds: 0,
            ..SetupConfig::with_modulus_bits(64)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_env_layers_file_and_environment() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/devirgo.toml",
                "modulus_bits = 1024\nprimality_rounds = 20\n",
            )?;
            jail.set_env("DEVIRGO_MODULUS_BITS", "3072");

            let config = SetupConfig::from_env()?;
            assert_eq!(config.modulus_bits, 3072);
            assert_eq!(config.primality_rounds, 20);
            assert_eq!(config.max_candidates, 100_000);
            assert_eq!(config.order_bits(), 256);
            Ok(())
        });
    }

    #[test]
    fn from_env_honors_config_path() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "modulus_bits = 256\nsafe_prime = true\n")?;
            jail.set_env("DEVIRGO_CONFIG_PATH", "custom.toml");

            let config = SetupConfig::from_env()?;
            assert_eq!(config.modulus_bits, 256);
            assert!(config.safe_prime);
            assert_eq!(config.order_bits(), 255);
            Ok(())
        });
    }

    #[test]
    fn from_env_huge_order_bits_fail_validation() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DEVIRGO_ORDER_BITS", usize::MAX.to_string());

            let config = SetupConfig::from_env()?;
            assert_eq!(config.order_bits, Some(usize::MAX));
            assert!(config.validate().is_err());
            Ok(())
        });
    }
}
