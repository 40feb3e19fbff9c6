//! Authentication: password hashing and login sessions.

mod password;
mod session;

pub use password::{DEFAULT_ROUNDS, SCHEME, hash_password, verify_password};
pub use session::{MAX_SESSION_TTL_MINUTES, Session, SessionStore};
