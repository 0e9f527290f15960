use std::time::Duration;

use dishdeck_search::PAGE_SIZE;

use crate::error::DishdeckError;

/// Tuning for the browse controller and the location providers it drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseConfig {
    /// Minimum time between two accepted navigation inputs
    pub cooldown: Duration,
    /// Start fetching the next page once `position + prefetch_threshold >= len`,
    /// i.e. with `prefetch_threshold - 1` cards left after the current one
    pub prefetch_threshold: usize,
    /// How long a location fetch may wait for a fix
    pub location_timeout: Duration,
    /// Fixes older than this are discarded
    pub max_fix_age: Duration,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(300),
            prefetch_threshold: 10,
            location_timeout: Duration::from_secs(5),
            max_fix_age: Duration::from_secs(60),
        }
    }
}

impl BrowseConfig {
    pub fn builder() -> BrowseConfigBuilder {
        BrowseConfigBuilder::new()
    }
}

/// Builder for creating browse configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct BrowseConfigBuilder {
    config: BrowseConfig,
}

impl BrowseConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: BrowseConfig::default(),
        }
    }

    /// Snappier navigation for pointer or keyboard input
    pub fn responsive() -> Self {
        let mut builder = Self::new();
        builder.config.cooldown = Duration::from_millis(150);
        builder.config.prefetch_threshold = 15;
        builder
    }

    /// Tolerate slow location hardware (cold GPS start, indoors)
    pub fn patient() -> Self {
        let mut builder = Self::new();
        builder.config.location_timeout = Duration::from_secs(15);
        builder.config.max_fix_age = Duration::from_secs(120);
        builder
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.config.cooldown = cooldown;
        self
    }

    /// Distance from the end of the list at which a prefetch fires
    /// (`position + threshold >= len`), clamped to `1..=PAGE_SIZE`
    pub fn prefetch_threshold(mut self, remaining: usize) -> Self {
        self.config.prefetch_threshold = remaining.clamp(1, PAGE_SIZE);
        self
    }

    pub fn location_timeout(mut self, timeout: Duration) -> Result<Self, DishdeckError> {
        if timeout.is_zero() {
            return Err(DishdeckError::ConfigError(
                "Location timeout must be greater than zero".to_string(),
            ));
        }
        self.config.location_timeout = timeout;
        Ok(self)
    }

    pub fn max_fix_age(mut self, age: Duration) -> Result<Self, DishdeckError> {
        if age.is_zero() {
            return Err(DishdeckError::ConfigError(
                "Maximum fix age must be greater than zero".to_string(),
            ));
        }
        self.config.max_fix_age = age;
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> BrowseConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder() {
        let config = BrowseConfigBuilder::new().build();
        assert_eq!(config.cooldown, Duration::from_millis(300));
        assert_eq!(config.prefetch_threshold, 10);
        assert_eq!(config.location_timeout, Duration::from_secs(5));
        assert_eq!(config.max_fix_age, Duration::from_secs(60));
        assert_eq!(config, BrowseConfig::default());
    }

    #[test]
    fn test_responsive_preset() {
        let config = BrowseConfigBuilder::responsive().build();
        assert_eq!(config.cooldown, Duration::from_millis(150));
        assert_eq!(config.prefetch_threshold, 15);
        assert_eq!(config.location_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_patient_preset() {
        let config = BrowseConfigBuilder::patient().build();
        assert_eq!(config.location_timeout, Duration::from_secs(15));
        assert_eq!(config.max_fix_age, Duration::from_secs(120));
        assert_eq!(config.cooldown, Duration::from_millis(300));
    }

    #[test]
    fn test_method_chaining() {
        let config = BrowseConfig::builder()
            .cooldown(Duration::from_millis(50))
            .prefetch_threshold(5)
            .location_timeout(Duration::from_secs(2))
            .unwrap()
            .build();

        assert_eq!(config.cooldown, Duration::from_millis(50));
        assert_eq!(config.prefetch_threshold, 5);
        assert_eq!(config.location_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_prefetch_threshold_is_clamped() {
        assert_eq!(
            BrowseConfigBuilder::new()
                .prefetch_threshold(0)
                .build()
                .prefetch_threshold,
            1
        );
        assert_eq!(
            BrowseConfigBuilder::new()
                .prefetch_threshold(500)
                .build()
                .prefetch_threshold,
            PAGE_SIZE
        );
    }

    #[test]
    fn test_zero_durations_rejected() {
        assert!(
            BrowseConfigBuilder::new()
                .location_timeout(Duration::ZERO)
                .is_err()
        );
        assert!(BrowseConfigBuilder::new().max_fix_age(Duration::ZERO).is_err());
    }

    #[test]
    fn test_override_presets() {
        let config = BrowseConfigBuilder::patient()
            .cooldown(Duration::from_secs(1))
            .build();

        assert_eq!(config.cooldown, Duration::from_secs(1));
        assert_eq!(config.location_timeout, Duration::from_secs(15));
    }
}
