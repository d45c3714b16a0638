//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `SessionController`: token lifecycle, persistence, and the login flow
//! - `RememberedCredentials`: encrypted remember-me storage over the vault
//!
//! Tokens are persisted with a 30-day expiry when remember-me is set and a
//! 1-day expiry otherwise; remembered credentials live for 7 days and
//! survive logout.

pub mod credentials;
pub mod session;

pub use credentials::RememberedCredentials;
pub use session::{SessionController, SessionEvent};
