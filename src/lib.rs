//! Client-side session and data layer for the ArgentBank service.
//!
//! This crate handles everything between a UI and the remote REST API:
//! login and token lifecycle, encrypted remember-me credentials, a timed
//! on-disk cache for account data, per-resource operation tracking, and a
//! synchronous logout cascade that clears every piece of session state in
//! one step.
//!
//! [`App`] is the entry point: it owns the gateway, the session, and the
//! resource controllers, and wires the escalation channel that turns an
//! Unauthorized profile fetch into a full logout.

pub mod api;
pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod op;
pub mod resources;
pub mod store;
pub mod vault;

pub use api::{ApiClient, ApiError, ErrorKind, Gateway, Resource};
pub use app::App;
pub use auth::{SessionController, SessionEvent};
pub use config::Config;
pub use op::OpStatus;
