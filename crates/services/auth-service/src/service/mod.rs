//! Authentication provider business logic.

mod authenticator;

pub use authenticator::{AuthService, Authenticator, Claims};
