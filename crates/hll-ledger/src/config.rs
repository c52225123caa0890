use serde::{Deserialize, Serialize};

use hll_crypto::{ChainHasher, Difficulty, DigestAlgorithm};

/// Process-wide log engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Leading `'0'` hex characters every mined link hash must have.
    pub difficulty: Difficulty,
    /// Digest function for link hashes.
    pub algorithm: DigestAlgorithm,
    /// Extra mine-and-commit attempts after an `Outpaced` rejection.
    /// `0` surfaces the first rejection to the caller.
    pub max_outpaced_retries: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::DEFAULT,
            algorithm: DigestAlgorithm::default(),
            max_outpaced_retries: 0,
        }
    }
}

impl LogConfig {
    /// Default configuration with the given difficulty.
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Default::default()
        }
    }

    pub fn hasher(&self) -> ChainHasher {
        ChainHasher::new(self.algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = LogConfig::default();
        assert_eq!(c.difficulty, Difficulty::DEFAULT);
        assert_eq!(c.algorithm, DigestAlgorithm::Blake3);
        assert_eq!(c.max_outpaced_retries, 0);
    }

    #[test]
    fn toml_partial_override() {
        let c: LogConfig = toml::from_str("difficulty = 5\nalgorithm = \"sha256\"").unwrap();
        assert_eq!(c.difficulty.zeros(), 5);
        assert_eq!(c.hasher(), ChainHasher::SHA256);
        assert_eq!(c.max_outpaced_retries, 0);
    }

    #[test]
    fn toml_rejects_impossible_difficulty() {
        assert!(toml::from_str::<LogConfig>("difficulty = 65").is_err());
    }
}
