//! Configuration for an R-Tree instance.

use super::rtree_constants::{DEFAULT_DIMENSION, DEFAULT_MAX_ENTRIES, DEFAULT_MIN_ENTRIES};
use super::rtree_types::{SpatialError, SpatialResult};

/// Construction parameters of an R-Tree.
///
/// The dimension is fixed for the lifetime of the tree and shared by every
/// rectangle stored in it. Every non-root node holds between `min_entries`
/// and `max_entries` entries, with `0 < min_entries <= max_entries / 2`.
///
/// # Examples
///
/// ```rust
/// use rtree_spatial::RTreeConfig;
///
/// let config = RTreeConfig::default()
///     .with_dimension(3)
///     .with_min_entries(2)
///     .with_max_entries(8);
/// assert!(config.validate().is_ok());
///
/// assert!(RTreeConfig::new(2, 3, 4).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RTreeConfig {
    dimension: usize,
    min_entries: usize,
    max_entries: usize,
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            min_entries: DEFAULT_MIN_ENTRIES,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl RTreeConfig {
    pub fn new(dimension: usize, min_entries: usize, max_entries: usize) -> Self {
        Self {
            dimension,
            min_entries,
            max_entries,
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_min_entries(mut self, min_entries: usize) -> Self {
        self.min_entries = min_entries;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Checks the fill bounds and dimension.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfig`] if the dimension is zero,
    /// `min_entries` is zero, or `min_entries > max_entries / 2`.
    pub fn validate(&self) -> SpatialResult<()> {
        if self.dimension == 0 {
            return Err(Self::invalid("dimension must be at least 1".into()));
        }
        if self.min_entries == 0 {
            return Err(Self::invalid("min_entries must be positive".into()));
        }
        if self.min_entries > self.max_entries / 2 {
            return Err(Self::invalid(format!(
                "min_entries ({}) must not exceed half of max_entries ({})",
                self.min_entries, self.max_entries
            )));
        }
        Ok(())
    }

    fn invalid(message: String) -> SpatialError {
        log::error!("Invalid R-Tree configuration: {}", message);
        SpatialError::InvalidConfig(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RTreeConfig::default();
        assert_eq!(config.dimension(), DEFAULT_DIMENSION);
        assert_eq!(config.min_entries(), DEFAULT_MIN_ENTRIES);
        assert_eq!(config.max_entries(), DEFAULT_MAX_ENTRIES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = RTreeConfig::default()
            .with_dimension(3)
            .with_min_entries(1)
            .with_max_entries(2);
        assert_eq!(config, RTreeConfig::new(3, 1, 2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_min_entries_rejected() {
        let err = RTreeConfig::new(2, 0, 4).validate().unwrap_err();
        assert!(matches!(err, SpatialError::InvalidConfig(_)));
    }

    #[test]
    fn test_min_above_half_max_rejected() {
        assert!(RTreeConfig::new(2, 3, 5).validate().is_err());
        assert!(RTreeConfig::new(2, 2, 4).validate().is_ok());
        assert!(RTreeConfig::new(2, 1, 1).validate().is_err());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(RTreeConfig::new(0, 2, 4).validate().is_err());
    }
}
