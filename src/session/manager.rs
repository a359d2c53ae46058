//! The session coordinator.
//!
//! Callers ask [`SessionManager::ensure_session`] for a token before doing
//! protected work. When a protected call later fails with a session-invalid
//! classification, the caller hands control to [`SessionManager::recover`],
//! retries the original call once with the fresh token, and treats a second
//! failure as hard; `recover` never re-enters itself.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::AuthApi;
use crate::console::{Console, ConsoleError};
use crate::store::SecretStore;
use crate::validate::{validate_email, validate_password, PASSWORD_MAX_LEN, PASSWORD_MIN_LEN};

use super::error::SessionError;

/// Menu selections are a single digit; allow a little slack before rejecting.
const MENU_CHOICE_MAX_LEN: usize = 3;

/// Upper bound for an email address line (RFC 5321 path limit).
const EMAIL_INPUT_MAX_LEN: usize = 254;

/// Coordinates the secret store, the remote client, and the console.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use sesame::api::HttpAuthClient;
/// use sesame::console::StdConsole;
/// use sesame::session::SessionManager;
/// use sesame::store::{FileSecretStore, StoreConfig};
///
/// # async fn example() -> Result<(), sesame::session::SessionError> {
/// let store = Arc::new(FileSecretStore::new(StoreConfig::default()));
/// let api = Arc::new(HttpAuthClient::new("https://api.example.com"));
/// let mut manager = SessionManager::new(store, api, StdConsole::stdio());
/// let token = manager.ensure_session().await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionManager<C: Console> {
    store: Arc<dyn SecretStore>,
    api: Arc<dyn AuthApi>,
    console: C,
}

impl<C: Console> SessionManager<C> {
    pub fn new(store: Arc<dyn SecretStore>, api: Arc<dyn AuthApi>, console: C) -> Self {
        Self {
            store,
            api,
            console,
        }
    }

    /// True iff a session token is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Return the stored token, or drive the sign-in menu to obtain one.
    ///
    /// No interaction happens when a usable token is already stored.
    pub async fn ensure_session(&mut self) -> Result<String, SessionError> {
        if let Some(token) = self.store.load()? {
            debug!("using stored session token");
            return Ok(token);
        }
        self.authenticate_interactive("Sign in to continue.").await
    }

    /// Recover after a protected call was classified session-invalid.
    ///
    /// The stale token is cleared first, always; a failing clear is a
    /// warning, not an abort. The caller retries its original call exactly
    /// once with the returned token.
    pub async fn recover(&mut self) -> Result<String, SessionError> {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear invalidated session token");
        }
        self.authenticate_interactive("Your session has expired. Sign in again to continue.")
            .await
    }

    /// Log in with prompted credentials and persist the token.
    ///
    /// The server is authoritative for login, so no local format validation
    /// happens here. A session-invalid classification from the remote call
    /// means the credentials were rejected, not that a session expired.
    pub async fn login(&mut self) -> Result<String, SessionError> {
        let email = self.console.prompt_line("Email: ", EMAIL_INPUT_MAX_LEN)?;
        let password = self.console.prompt_password("Password: ")?;

        let token = match self.api.login(&email, &password).await {
            Ok(token) => token,
            Err(err) if err.is_session_invalid() => {
                return Err(SessionError::InvalidCredentials)
            }
            Err(err) => return Err(err.into()),
        };
        info!("login succeeded");
        self.persist(token)
    }

    /// Register with prompted, locally validated credentials and persist the
    /// token. Bad input fails fast, before any remote call is made.
    pub async fn register(&mut self) -> Result<String, SessionError> {
        let email = self.console.prompt_line("Email: ", EMAIL_INPUT_MAX_LEN)?;
        validate_email(&email)?;

        let prompt = format!("Password ({PASSWORD_MIN_LEN}-{PASSWORD_MAX_LEN} characters): ");
        let password = self.console.prompt_password(&prompt)?;
        validate_password(&password)?;

        let confirmation = self.console.prompt_password("Confirm password: ")?;
        if confirmation != password {
            return Err(SessionError::PasswordMismatch);
        }

        let token = match self.api.register(&email, &password).await {
            Ok(token) => token,
            Err(err) if err.status() == Some(409) => {
                return Err(SessionError::AlreadyRegistered)
            }
            Err(err) => return Err(err.into()),
        };
        info!("registration succeeded");
        self.persist(token)
    }

    /// Discard the stored session token.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        self.console.write_line("Logged out.")?;
        Ok(())
    }

    /// The three-way sign-in menu shared by `ensure_session` and `recover`;
    /// only the banner differs between the two.
    async fn authenticate_interactive(&mut self, banner: &str) -> Result<String, SessionError> {
        self.console.write_line(banner)?;
        self.console.write_line("  1) Log in")?;
        self.console.write_line("  2) Register")?;
        self.console.write_line("  3) Exit")?;

        let choice = match self.console.prompt_line("Choice: ", MENU_CHOICE_MAX_LEN) {
            Ok(input) => input,
            // Closed stdin at the menu is user-initiated interruption.
            Err(ConsoleError::Eof) => return Err(SessionError::Cancelled),
            Err(err) => return Err(err.into()),
        };

        match choice.as_str() {
            "1" => self.login().await,
            "2" => self.register().await,
            "3" => Err(SessionError::Cancelled),
            other => Err(SessionError::InvalidChoice(other.to_string())),
        }
    }

    fn persist(&self, token: String) -> Result<String, SessionError> {
        match self.store.save(&token) {
            Ok(()) => Ok(token),
            Err(source) => Err(SessionError::SessionNotSaved { token, source }),
        }
    }
}
