//! Request-scoped configuration overrides.
//!
//! # Data Flow
//! ```text
//! Cookie header
//!     → codec.rs (unescape, parse JSON object)
//!     → store.rs (install into this request's override set)
//!     → facade.rs (reads: override first, then baseline)
//!     → handlers see the effective value
//!
//! Admin update:
//!     store.rs (whitelist-gated write)
//!     → codec.rs (escape)
//!     → Set-Cookie for the next request
//! ```
//!
//! # Design Decisions
//! - Override state is owned by the request, never by the process
//! - The baseline is never mutated by the override path
//! - Cookie installs skip the whitelist; admin writes do not

pub mod codec;
pub mod error;
pub mod facade;
pub mod store;

use serde_json::{Map, Value};

/// Overridden key/value pairs for one request.
pub type OverrideSet = Map<String, Value>;

pub use error::OverrideError;
pub use facade::ConfigFacade;
pub use store::{OverridableKeys, OverrideStore};
