//! Error taxonomy for the transformation pass.
//!
//! Configuration and pattern errors stop the pass where they are detected.
//! Missing parents and unknown regex modifiers fall back to defaults instead.

use thiserror::Error;

/// Invalid or unrecognized generator configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The naming policy token is not one of the recognized spellings.
    #[error(
        "invalid model property naming '{0}'. Must be 'original', 'camelCase', 'PascalCase' or 'snake_case'"
    )]
    InvalidNamingPolicy(String),

    /// A model's parent chain loops back onto itself.
    #[error("inheritance cycle detected: {}", .0.join(" -> "))]
    InheritanceCycle(Vec<String>),

    /// The configuration file could not be parsed.
    #[error("failed to parse generator configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A validation pattern that does not follow the `/pattern/modifiers` convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pattern must follow the Perl /pattern/modifiers convention. {pattern} is not valid")]
pub struct InvalidPatternError {
    /// The offending pattern, verbatim.
    pub pattern: String,
}

/// Any error surfaced by the transformation core.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`ConfigurationError`].
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A pattern failed translation while owned by a specific model or operation.
    #[error("{owner}.{property}: {source}")]
    InvalidPattern {
        /// Model or operation that owns the property.
        owner: String,
        /// Wire-level name of the property or parameter.
        property: String,
        /// The underlying translation failure.
        #[source]
        source: InvalidPatternError,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
