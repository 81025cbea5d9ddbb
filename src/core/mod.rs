//! RagKit Core Module
//!
//! This module contains the shared foundation for the pipeline:
//! - Configuration management
//! - Error types and handling
//! - Core data types

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError};
pub use error::{RagError, Result};
pub use types::{ChunkMetadata, DocumentChunk};
