//! REST API client module for the ArgentBank service.
//!
//! This module provides the `Gateway` trait (the remote service contract),
//! the `ApiClient` implementation backed by reqwest, and the error taxonomy
//! that maps transport failures onto domain error kinds.
//!
//! The API uses JWT bearer token authentication obtained through the login
//! endpoint.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::ApiClient;
pub use error::{ApiError, ErrorKind, Resource};
pub use gateway::Gateway;
