pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod pricing;
pub mod temporal;
pub mod types;
pub mod validation;

#[cfg(feature = "demand")]
pub mod demand;

#[cfg(feature = "portfolio")]
pub mod portfolio;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::MarkdownError;
pub use types::*;

/// Standard result type for all markdown engine operations
pub type MarkdownResult<T> = Result<T, MarkdownError>;
