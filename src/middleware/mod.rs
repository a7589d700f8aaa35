//! Request-level authentication.

mod session;

pub use session::{SessionUser, SESSION_COOKIE};
