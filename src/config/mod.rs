//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated)
//!     → baseline.rs (settings table → BaselineConfig, shared via ArcSwap)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the baseline snapshot
//!     → next reads observe new values
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The override switch and mount path are read once at startup

pub mod baseline;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use baseline::{BaselineConfig, Settings, SharedBaseline};
pub use loader::{load_config, ConfigError};
pub use schema::{AdminConfig, ListenerConfig, ObservabilityConfig, ServiceConfig, TimeoutConfig};
