//! Error types for structure growth and mesh processing

use thiserror::Error;

/// Errors that can occur while configuring, growing or post-processing meshes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowthError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A mesh buffer references data that does not exist
    #[error("mesh integrity violated: {0}")]
    MeshIntegrity(String),
    /// Requested biome index is outside the fixed biome table
    #[error("unknown biome index: {0}")]
    UnknownBiome(u8),
}

/// Result type alias for growth operations
pub type Result<T> = std::result::Result<T, GrowthError>;
