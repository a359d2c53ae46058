//! Convenience re-exports for common use.

pub use crate::api::{ApiError, AuthApi, HttpAuthClient};
pub use crate::console::{Console, ConsoleError, StdConsole};
pub use crate::session::{SessionError, SessionManager};
pub use crate::store::{FileSecretStore, SecretStore, StoreConfig, StoreError};
pub use crate::validate::{validate_email, validate_password, ValidationError};
