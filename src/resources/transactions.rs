use tracing::debug;

use crate::api::{ErrorKind, Gateway, Resource};
use crate::models::{Transaction, TransactionPatch};
use crate::op::{OpStatus, OperationTracker};

/// Controller for an account's transactions.
///
/// The transaction list and the single-transaction detail view are
/// separate resource families with separate operation state, so a failure
/// loading the detail never clobbers the list's error slot (and vice
/// versa). Updates and deletes settle on the list family.
#[derive(Default)]
pub struct TransactionsController {
    transactions: Vec<Transaction>,
    transaction: Option<Transaction>,
    list_op: OperationTracker,
    detail_op: OperationTracker,
}

impl TransactionsController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }

    pub fn list_status(&self) -> OpStatus {
        self.list_op.status()
    }

    pub fn list_error(&self) -> Option<ErrorKind> {
        self.list_op.error()
    }

    pub fn detail_status(&self) -> OpStatus {
        self.detail_op.status()
    }

    pub fn detail_error(&self) -> Option<ErrorKind> {
        self.detail_op.error()
    }

    /// Fetch all transactions for `account_id`.
    pub async fn fetch<G: Gateway>(&mut self, gateway: &G, account_id: &str) -> bool {
        let ticket = self.list_op.begin();

        match gateway.fetch_transactions(account_id).await {
            Ok(transactions) => {
                if !self.list_op.succeed(ticket) {
                    return false;
                }
                self.transactions = transactions;
                true
            }
            Err(e) => {
                let kind = ErrorKind::from_api(Resource::Transactions, &e);
                debug!(account_id, error = %e, "Transactions fetch failed");
                self.list_op.fail(ticket, kind);
                false
            }
        }
    }

    /// Fetch a single transaction for the detail view.
    pub async fn fetch_detail<G: Gateway>(&mut self, gateway: &G, transaction_id: &str) -> bool {
        let ticket = self.detail_op.begin();

        match gateway.fetch_transaction(transaction_id).await {
            Ok(transaction) => {
                if !self.detail_op.succeed(ticket) {
                    return false;
                }
                self.transaction = Some(transaction);
                true
            }
            Err(e) => {
                let kind = ErrorKind::from_api(Resource::TransactionDetail, &e);
                debug!(transaction_id, error = %e, "Transaction detail fetch failed");
                self.detail_op.fail(ticket, kind);
                false
            }
        }
    }

    /// Apply a partial update. Success patches the matching list entry and
    /// refreshes the detail view when it shows the same transaction. An
    /// empty patch is a no-op and never reaches the network.
    pub async fn update<G: Gateway>(
        &mut self,
        gateway: &G,
        account_id: &str,
        transaction_id: &str,
        patch: &TransactionPatch,
    ) -> bool {
        if patch.is_empty() {
            return true;
        }
        let ticket = self.list_op.begin();

        match gateway
            .update_transaction(account_id, transaction_id, patch)
            .await
        {
            Ok(updated) => {
                if !self.list_op.succeed(ticket) {
                    return false;
                }
                if let Some(entry) = self
                    .transactions
                    .iter_mut()
                    .find(|t| t.transaction_id == updated.transaction_id)
                {
                    *entry = updated.clone();
                }
                if self
                    .transaction
                    .as_ref()
                    .is_some_and(|t| t.transaction_id == updated.transaction_id)
                {
                    self.transaction = Some(updated);
                }
                true
            }
            Err(e) => {
                let kind = ErrorKind::from_api(Resource::TransactionUpdate, &e);
                debug!(transaction_id, error = %e, "Transaction update failed");
                self.list_op.fail(ticket, kind);
                false
            }
        }
    }

    /// Delete a transaction. Success removes it from the list and clears
    /// the detail view when it showed the deleted entry.
    pub async fn delete<G: Gateway>(
        &mut self,
        gateway: &G,
        account_id: &str,
        transaction_id: &str,
    ) -> bool {
        let ticket = self.list_op.begin();

        match gateway.delete_transaction(account_id, transaction_id).await {
            Ok(()) => {
                if !self.list_op.succeed(ticket) {
                    return false;
                }
                self.transactions
                    .retain(|t| t.transaction_id != transaction_id);
                if self
                    .transaction
                    .as_ref()
                    .is_some_and(|t| t.transaction_id == transaction_id)
                {
                    self.transaction = None;
                }
                true
            }
            Err(e) => {
                let kind = ErrorKind::from_api(Resource::TransactionDelete, &e);
                debug!(transaction_id, error = %e, "Transaction delete failed");
                self.list_op.fail(ticket, kind);
                false
            }
        }
    }

    /// Back to initial state (logout cascade).
    pub fn reset(&mut self) {
        self.transactions.clear();
        self.transaction = None;
        self.list_op.reset();
        self.detail_op.reset();
    }
}
