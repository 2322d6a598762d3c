//! Common re-exports.

pub use crate::api::{OrderBy, OrderDirection, PageQuery};
pub use crate::auth::{AuthToken, FileTokenStore, MemoryTokenStore, TokenStore};
pub use crate::client::ApiClient;
pub use crate::config::ClientConfig;
pub use crate::error::{FlagdeckError, Result};
pub use crate::session::{SchedulerState, SessionEvent, SessionManager};
