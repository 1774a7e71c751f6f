//! Constants for the R-Tree implementation.

/// Default number of coordinates per point
pub const DEFAULT_DIMENSION: usize = 2;

/// Maximum number of entries per node
pub const DEFAULT_MAX_ENTRIES: usize = 64;

/// Minimum entries before underflow (typically 40% of max)
pub const DEFAULT_MIN_ENTRIES: usize = 25;
