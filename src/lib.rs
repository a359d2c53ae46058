//! Sesame: client-side session and credential management
//!
//! Persists a bearer token with owner-only file permissions, drives
//! interactive login/registration, classifies remote failures into a typed
//! taxonomy, and recovers from session expiry by re-prompting and handing
//! the caller a fresh token.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use sesame::prelude::*;
//!
//! # async fn example() -> Result<(), SessionError> {
//! let store = Arc::new(FileSecretStore::new(StoreConfig::default()));
//! let api = Arc::new(HttpAuthClient::new("https://api.example.com"));
//! let mut manager = SessionManager::new(store, api, StdConsole::stdio());
//!
//! let token = manager.ensure_session().await?;
//! // ... use `token` for protected calls; on a SessionInvalid classification:
//! let token = manager.recover().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod console;
pub mod prelude;
pub mod session;
pub mod store;
pub mod validate;
