//! Data models for ArgentBank entities.
//!
//! This module contains the data structures exchanged with the remote
//! service:
//!
//! - `Profile`: the authenticated user's identity
//! - `Account`: a bank account belonging to a user
//! - `Transaction`: a single ledger entry on an account
//! - `ProfilePatch`, `TransactionPatch`: partial-update payloads

pub mod account;
pub mod profile;
pub mod transaction;

pub use account::Account;
pub use profile::{Profile, ProfilePatch};
pub use transaction::{Transaction, TransactionPatch};
