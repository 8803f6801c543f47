/// Error types for the edges of the collision core
///
/// Collision queries themselves never fail; degenerate numeric input is
/// defused in place. Errors only come from configuration, world baking and
/// mesh loading.
use thiserror::Error;

/// A configuration field holding a value the collision core cannot use.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be finite and greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`max_slide_depth` must be at least 1")]
    ZeroSlideDepth,
}

/// Failure to bake a World handle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("invalid collision config: {0}")]
    Config(#[from] ConfigError),
    #[error("collider radius must have finite positive components, got ({x}, {y}, {z})")]
    InvalidRadius { x: f32, y: f32, z: f32 },
}

/// STL decoding failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooShort(usize),
    #[error("binary STL declares {expected} facets but only {found} are present")]
    Truncated { expected: usize, found: usize },
    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
}
