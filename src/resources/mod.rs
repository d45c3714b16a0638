//! Resource controllers.
//!
//! One controller per resource family (profile, accounts, transactions),
//! each composing an `OperationTracker` with the error taxonomy and, for
//! accounts, the timed cache. Controllers never let a transport error
//! escape: failures are classified and parked in the family's error slot
//! for the caller to surface.

pub mod accounts;
pub mod profile;
pub mod transactions;

pub use accounts::AccountsController;
pub use profile::ProfileController;
pub use transactions::TransactionsController;
