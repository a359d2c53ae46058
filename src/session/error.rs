//! Failures surfaced by the auth flows and coordinator.

use thiserror::Error;

use crate::api::ApiError;
use crate::console::ConsoleError;
use crate::store::StoreError;
use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The server rejected the supplied email/password pair.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registration hit an existing account for this email.
    #[error("an account with this email already exists")]
    AlreadyRegistered,

    /// Password confirmation did not match.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// The remote call succeeded but the token could not be persisted.
    ///
    /// The valid token rides along so the caller can keep using it in-memory
    /// for the rest of the process, or abort.
    #[error("logged in, but the session could not be saved: {source}")]
    SessionNotSaved { token: String, source: StoreError },

    /// Menu selection that matches none of the offered options.
    #[error("unrecognized choice: {0:?}")]
    InvalidChoice(String),

    /// The user chose to exit, or interrupted the menu.
    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
