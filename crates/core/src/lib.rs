//! Model-transformation core of the C#/Unity API client generator.
//!
//! Sits between the API-description parser and the template renderer: it
//! takes the parsed [`ApiDescription`], converts names, reconciles
//! inheritance, translates validation patterns and post-processes operation
//! return types, all in place. See [`assemble`].

#![forbid(unsafe_code)]
#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

pub mod assembly;
pub mod config;
pub mod error;
pub mod inheritance;
pub mod model;
pub mod naming;
pub mod operations;
pub mod pattern;

pub use assembly::{AssemblyReport, SkippedPattern, assemble};
pub use config::GeneratorConfig;
pub use error::{ConfigurationError, Error, InvalidPatternError, Result};
pub use model::{ApiDescription, ModelDefinition, ModelRegistry, Operation, Property};
pub use naming::NamingPolicy;
