//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign request ID)
//!     → middleware/override_cookie.rs (cookie → request-scoped ConfigFacade)
//!     → application handlers / admin surface
//!     → cookies.rs (Set-Cookie on the way out)
//! ```

pub mod cookies;
pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::RequestConfig;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
