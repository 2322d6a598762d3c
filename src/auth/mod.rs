//! Token model, token storage, and auth endpoint calls.

pub mod endpoints;
pub mod error;
pub mod store;
pub mod token;

pub use error::AuthError;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::AuthToken;
