//! Monte Carlo simulation configuration.

use super::error::ConfigError;
use crate::autocall::discount::DiscountMode;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Seed used when none is supplied.
pub const DEFAULT_SEED: u64 = 42;

/// Below this many paths the simulator runs sequentially.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Monte Carlo simulation configuration.
///
/// Immutable configuration specifying simulation parameters.
/// Use [`MonteCarloConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
/// use pricer_pricing::autocall::DiscountMode;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(10_000)
///     .seed(42)
///     .detailed_paths(5)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 10_000);
/// assert_eq!(config.detailed_paths(), 5);
/// assert_eq!(config.discount_mode(), DiscountMode::DualCurrency);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloConfig {
    /// Number of simulation paths.
    n_paths: usize,
    /// Base seed; path `i` uses `seed + i`.
    seed: u64,
    /// Number of leading paths that carry a detailed trace.
    detailed_paths: usize,
    /// How cash flows are discounted.
    discount_mode: DiscountMode,
    /// Minimum path count for parallel execution.
    parallel_threshold: usize,
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of traced paths.
    #[inline]
    pub fn detailed_paths(&self) -> usize {
        self.detailed_paths
    }

    /// Returns the discounting mode.
    #[inline]
    pub fn discount_mode(&self) -> DiscountMode {
        self.discount_mode
    }

    /// Whether a run of `n_paths` should use the thread pool.
    #[inline]
    pub fn should_parallelise(&self, n_paths: usize) -> bool {
        n_paths >= self.parallel_threshold
    }

    /// Copy with a different path count and seed, keeping the other settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the new path count is invalid.
    pub fn with_paths(&self, n_paths: usize, seed: u64) -> Result<Self, ConfigError> {
        let config = Self {
            n_paths,
            seed,
            detailed_paths: self.detailed_paths.min(n_paths),
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Copy with a different discounting mode.
    pub fn with_discount_mode(&self, discount_mode: DiscountMode) -> Self {
        Self {
            discount_mode,
            ..self.clone()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is 0 or greater than 10,000,000
    /// - `detailed_paths` exceeds `n_paths`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if self.detailed_paths > self.n_paths {
            return Err(ConfigError::InvalidParameter {
                name: "detailed_paths",
                value: format!(
                    "{} exceeds the path count {}",
                    self.detailed_paths, self.n_paths
                ),
            });
        }
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// Provides a fluent API for constructing Monte Carlo configurations
/// with validation at build time.
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    seed: Option<u64>,
    detailed_paths: usize,
    discount_mode: DiscountMode,
    parallel_threshold: Option<usize>,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of simulation paths.
    ///
    /// # Arguments
    ///
    /// * `n_paths` - Number of paths in [1, 10_000_000]
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the seed for reproducibility (default [`DEFAULT_SEED`]).
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets how many leading paths record a detailed trace (default 0).
    #[inline]
    pub fn detailed_paths(mut self, detailed_paths: usize) -> Self {
        self.detailed_paths = detailed_paths;
        self
    }

    /// Sets the discounting mode (default dual-currency).
    #[inline]
    pub fn discount_mode(mut self, discount_mode: DiscountMode) -> Self {
        self.discount_mode = discount_mode;
        self
    }

    /// Sets the minimum path count for parallel execution.
    #[inline]
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = Some(threshold);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n_paths` is not set or any value is invalid.
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let n_paths = self.n_paths.ok_or(ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        })?;

        let config = MonteCarloConfig {
            n_paths,
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            detailed_paths: self.detailed_paths,
            discount_mode: self.discount_mode,
            parallel_threshold: self.parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = MonteCarloConfig::builder().n_paths(10_000).build().unwrap();

        assert_eq!(config.n_paths(), 10_000);
        assert_eq!(config.seed(), DEFAULT_SEED);
        assert_eq!(config.detailed_paths(), 0);
        assert_eq!(config.discount_mode(), DiscountMode::DualCurrency);
        assert!(config.should_parallelise(10_000));
        assert!(!config.should_parallelise(10));
    }

    #[test]
    fn test_config_invalid_zero_paths() {
        let result = MonteCarloConfig::builder().n_paths(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidPathCount(0))));
    }

    #[test]
    fn test_config_invalid_too_many_paths() {
        let result = MonteCarloConfig::builder().n_paths(MAX_PATHS + 1).build();
        assert!(matches!(result, Err(ConfigError::InvalidPathCount(_))));
    }

    #[test]
    fn test_config_missing_paths() {
        let result = MonteCarloConfig::builder().seed(1).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "n_paths",
                ..
            })
        ));
    }

    #[test]
    fn test_config_too_many_detailed_paths() {
        let result = MonteCarloConfig::builder()
            .n_paths(10)
            .detailed_paths(11)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "detailed_paths",
                ..
            })
        ));
    }

    #[test]
    fn test_with_paths_clamps_traces() {
        let config = MonteCarloConfig::builder()
            .n_paths(1000)
            .detailed_paths(20)
            .discount_mode(DiscountMode::FlatRate)
            .build()
            .unwrap();
        let small = config.with_paths(5, 7).unwrap();
        assert_eq!(small.n_paths(), 5);
        assert_eq!(small.seed(), 7);
        assert_eq!(small.detailed_paths(), 5);
        assert_eq!(small.discount_mode(), DiscountMode::FlatRate);
        assert!(config.with_paths(0, 7).is_err());
    }
}
