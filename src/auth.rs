//! Validated request values: identifiers, roles, token kinds, expiries, and secrets.

pub mod expiry;
pub mod id;
pub mod role;
pub mod secret;

pub use expiry::*;
pub use id::*;
pub use role::*;
pub use secret::*;
