pub mod override_cookie;

pub use override_cookie::{override_cookie_middleware, RequestConfig};
