#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use sesame::api::{ApiError, AuthApi};
use sesame::console::{Console, ConsoleError};
use sesame::store::{SecretStore, StoreError};

// ---------------------------------------------------------------------------
// In-memory secret store
// ---------------------------------------------------------------------------

/// Store double with injectable failures and an operation log.
#[derive(Default)]
pub struct InMemorySecretStore {
    token: Mutex<Option<String>>,
    ops: Mutex<Vec<String>>,
    fail_save: bool,
    fail_clear: bool,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        *store.token.lock().expect("store lock poisoned") = Some(token.to_string());
        store
    }

    pub fn failing_save() -> Self {
        Self {
            fail_save: true,
            ..Self::default()
        }
    }

    pub fn failing_clear_with_token(token: &str) -> Self {
        let store = Self {
            fail_clear: true,
            ..Self::default()
        };
        *store.token.lock().expect("store lock poisoned") = Some(token.to_string());
        store
    }

    /// Operations performed so far, in order ("load"/"save"/"clear").
    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().expect("store lock poisoned").clone()
    }

    fn record(&self, op: &str) {
        self.ops.lock().expect("store lock poisoned").push(op.to_string());
    }

    fn io_error(message: &str) -> StoreError {
        StoreError::Io(std::io::Error::other(message))
    }
}

impl SecretStore for InMemorySecretStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        self.record("load");
        Ok(self.token.lock().expect("store lock poisoned").clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        self.record("save");
        if self.fail_save {
            return Err(Self::io_error("disk full"));
        }
        *self.token.lock().expect("store lock poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.record("clear");
        if self.fail_clear {
            return Err(Self::io_error("permission denied"));
        }
        *self.token.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scripted console
// ---------------------------------------------------------------------------

/// Console double that pops scripted inputs and records all output.
///
/// An exhausted script reads as end-of-stream, mirroring a closed stdin.
/// The output buffer is shared, so a handle taken before the console moves
/// into a manager stays readable afterwards.
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    output: Arc<Mutex<Vec<String>>>,
}

/// Read-side view of a [`ScriptedConsole`]'s output.
#[derive(Clone)]
pub struct OutputHandle(Arc<Mutex<Vec<String>>>);

impl OutputHandle {
    /// Everything written so far: full lines and prompts alike.
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().expect("console lock poisoned").clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn output_handle(&self) -> OutputHandle {
        OutputHandle(self.output.clone())
    }

    fn pop(&mut self) -> Option<String> {
        self.inputs.pop_front()
    }

    fn record(&self, text: &str) {
        self.output
            .lock()
            .expect("console lock poisoned")
            .push(text.to_string());
    }
}

impl Console for ScriptedConsole {
    fn write_line(&mut self, line: &str) -> Result<(), ConsoleError> {
        self.record(line);
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str, max_len: usize) -> Result<String, ConsoleError> {
        self.record(prompt);
        let line = self.pop().ok_or(ConsoleError::Eof)?;
        let line = line.trim();
        if line.is_empty() {
            return Err(ConsoleError::EmptyInput);
        }
        if line.len() > max_len {
            return Err(ConsoleError::TooLong { max: max_len });
        }
        Ok(line.to_string())
    }

    fn prompt_password(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        self.record(prompt);
        self.pop().ok_or(ConsoleError::Eof)
    }
}

// ---------------------------------------------------------------------------
// Stub remote client
// ---------------------------------------------------------------------------

/// Canned outcome for a stubbed remote call.
pub enum Canned {
    Token(String),
    Unauthorized(String),
    Status(u16, String),
}

impl Canned {
    pub fn token(value: &str) -> Self {
        Self::Token(value.to_string())
    }

    fn into_result(self) -> Result<String, ApiError> {
        match self {
            Self::Token(token) => Ok(token),
            Self::Unauthorized(message) => Err(ApiError::SessionInvalid { message }),
            Self::Status(status, body) => Err(ApiError::from_status(
                StatusCode::from_u16(status).expect("valid status"),
                &body,
            )),
        }
    }
}

/// Remote client double that replays queued outcomes and counts calls.
#[derive(Default)]
pub struct StubAuthApi {
    login_responses: Mutex<VecDeque<Canned>>,
    register_responses: Mutex<VecDeque<Canned>>,
    login_calls: Mutex<Vec<(String, String)>>,
    register_calls: Mutex<Vec<(String, String)>>,
}

impl StubAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_login(&self, outcome: Canned) {
        self.login_responses
            .lock()
            .expect("api lock poisoned")
            .push_back(outcome);
    }

    pub fn queue_register(&self, outcome: Canned) {
        self.register_responses
            .lock()
            .expect("api lock poisoned")
            .push_back(outcome);
    }

    pub fn login_calls(&self) -> Vec<(String, String)> {
        self.login_calls.lock().expect("api lock poisoned").clone()
    }

    pub fn register_calls(&self) -> Vec<(String, String)> {
        self.register_calls.lock().expect("api lock poisoned").clone()
    }

    pub fn total_calls(&self) -> usize {
        self.login_calls().len() + self.register_calls().len()
    }
}

#[async_trait]
impl AuthApi for StubAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.login_calls
            .lock()
            .expect("api lock poisoned")
            .push((email.to_string(), password.to_string()));
        self.login_responses
            .lock()
            .expect("api lock poisoned")
            .pop_front()
            .expect("unexpected login call")
            .into_result()
    }

    async fn register(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.register_calls
            .lock()
            .expect("api lock poisoned")
            .push((email.to_string(), password.to_string()));
        self.register_responses
            .lock()
            .expect("api lock poisoned")
            .pop_front()
            .expect("unexpected register call")
            .into_result()
    }
}
