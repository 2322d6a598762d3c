//! Session lifecycle: event bus, refresh policy, and the session manager.

pub mod events;
pub mod manager;
pub mod policy;

pub use events::{SessionEvent, SessionEvents};
pub use manager::{SchedulerState, SessionManager};
pub use policy::RefreshDecision;
