//! Remote client capability and failure classification.

pub mod client;
pub mod error;

pub use client::{AuthApi, HttpAuthClient};
pub use error::ApiError;
