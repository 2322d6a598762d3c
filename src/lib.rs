//! Flagdeck — Rust client SDK for the Flagdeck feature management admin API.
//!
//! Provides an authenticated HTTP client with proactive token refresh and
//! typed resource clients for the admin surface: organizations, projects,
//! environments, feature flags, experiments, goals, pushes, member accounts,
//! API keys, user segments, and notification subscriptions.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use flagdeck::prelude::*;
//!
//! # async fn example() -> flagdeck::error::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let store = Arc::new(FileTokenStore::new_default());
//! let session = Arc::new(SessionManager::new(&config, store)?);
//! session.sign_in("admin@example.com", "secret").await?;
//! session.start();
//!
//! let client = ApiClient::new(&config, session)?;
//! let flags = client.features().list("production", Default::default()).await?;
//! println!("{} flags", flags.total_count);
//! # Ok(())
//! # }
//! ```
//!
//! The session manager keeps the access token fresh in the background and
//! broadcasts [`session::SessionEvent`]s; the client transparently refreshes
//! and replays once when a request comes back 401.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod session;
