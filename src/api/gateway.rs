use async_trait::async_trait;

use crate::models::{Account, Profile, ProfilePatch, Transaction, TransactionPatch};

use super::ApiError;

/// The remote service contract.
///
/// `ApiClient` is the production implementation; tests substitute a mock.
/// Every call either returns a success payload or an [`ApiError`] carrying
/// the transport status (or none, for connectivity loss) — classification
/// into domain errors happens in the resource controllers.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Attach the bearer token to all subsequent requests.
    fn set_token(&mut self, token: &str);

    /// Stop sending the Authorization header entirely.
    fn clear_token(&mut self);

    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError>;

    async fn fetch_profile(&self) -> Result<Profile, ApiError>;

    async fn update_profile(&self, patch: &ProfilePatch) -> Result<Profile, ApiError>;

    async fn fetch_accounts(&self, user_id: &str) -> Result<Vec<Account>, ApiError>;

    async fn fetch_transactions(&self, account_id: &str) -> Result<Vec<Transaction>, ApiError>;

    async fn fetch_transaction(&self, transaction_id: &str) -> Result<Transaction, ApiError>;

    async fn update_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
        patch: &TransactionPatch,
    ) -> Result<Transaction, ApiError>;

    async fn delete_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<(), ApiError>;
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::Mutex;

    use reqwest::StatusCode;

    use super::*;

    /// Canned-response gateway for controller and orchestration tests.
    #[derive(Default)]
    pub(crate) struct MockGateway {
        pub token: Option<String>,
        pub login_token: String,
        pub profile: Option<Profile>,
        pub accounts: Vec<Account>,
        pub transactions: Vec<Transaction>,
        /// When set, every call fails with this HTTP status.
        pub fail_status: Option<u16>,
        /// When set, only the named operation fails with the given status.
        pub fail_op: Option<(&'static str, u16)>,
        /// Names of the operations invoked, in order.
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl MockGateway {
        pub(crate) fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn record(&self, op: &'static str) -> Result<(), ApiError> {
            self.calls.lock().expect("calls lock").push(op);
            let code = match (self.fail_status, self.fail_op) {
                (Some(code), _) => Some(code),
                (None, Some((name, code))) if name == op => Some(code),
                _ => None,
            };
            match code {
                Some(code) => {
                    let status =
                        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                    Err(ApiError::from_status(status, "mock failure"))
                }
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Gateway for MockGateway {
        fn set_token(&mut self, token: &str) {
            self.token = Some(token.to_string());
        }

        fn clear_token(&mut self) {
            self.token = None;
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<String, ApiError> {
            self.record("login")?;
            Ok(self.login_token.clone())
        }

        async fn fetch_profile(&self) -> Result<Profile, ApiError> {
            self.record("fetch_profile")?;
            self.profile
                .clone()
                .ok_or_else(|| ApiError::from_status(StatusCode::NOT_FOUND, "no profile"))
        }

        async fn update_profile(&self, patch: &ProfilePatch) -> Result<Profile, ApiError> {
            self.record("update_profile")?;
            let mut profile = self
                .profile
                .clone()
                .ok_or_else(|| ApiError::from_status(StatusCode::NOT_FOUND, "no profile"))?;
            if let Some(ref first_name) = patch.first_name {
                profile.first_name = first_name.clone();
            }
            if let Some(ref last_name) = patch.last_name {
                profile.last_name = last_name.clone();
            }
            Ok(profile)
        }

        async fn fetch_accounts(&self, user_id: &str) -> Result<Vec<Account>, ApiError> {
            self.record("fetch_accounts")?;
            Ok(self
                .accounts
                .iter()
                .filter(|a| a.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn fetch_transactions(&self, account_id: &str) -> Result<Vec<Transaction>, ApiError> {
            self.record("fetch_transactions")?;
            Ok(self
                .transactions
                .iter()
                .filter(|t| t.account_id == account_id)
                .cloned()
                .collect())
        }

        async fn fetch_transaction(&self, transaction_id: &str) -> Result<Transaction, ApiError> {
            self.record("fetch_transaction")?;
            self.transactions
                .iter()
                .find(|t| t.transaction_id == transaction_id)
                .cloned()
                .ok_or_else(|| ApiError::from_status(StatusCode::NOT_FOUND, "no such transaction"))
        }

        async fn update_transaction(
            &self,
            account_id: &str,
            transaction_id: &str,
            patch: &TransactionPatch,
        ) -> Result<Transaction, ApiError> {
            self.record("update_transaction")?;
            let mut txn = self
                .transactions
                .iter()
                .find(|t| t.account_id == account_id && t.transaction_id == transaction_id)
                .cloned()
                .ok_or_else(|| {
                    ApiError::from_status(StatusCode::NOT_FOUND, "no such transaction")
                })?;
            if let Some(ref category) = patch.category {
                txn.category = category.clone();
            }
            if let Some(ref notes) = patch.notes {
                txn.notes = notes.clone();
            }
            if let Some(ref description) = patch.description {
                txn.description = description.clone();
            }
            Ok(txn)
        }

        async fn delete_transaction(
            &self,
            account_id: &str,
            transaction_id: &str,
        ) -> Result<(), ApiError> {
            self.record("delete_transaction")?;
            let exists = self
                .transactions
                .iter()
                .any(|t| t.account_id == account_id && t.transaction_id == transaction_id);
            if exists {
                Ok(())
            } else {
                Err(ApiError::from_status(
                    StatusCode::NOT_FOUND,
                    "no such transaction",
                ))
            }
        }
    }

    pub(crate) fn sample_profile() -> Profile {
        Profile {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
            first_name: "Tony".to_string(),
            last_name: "Stark".to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    pub(crate) fn sample_account(account_id: &str) -> Account {
        Account {
            user_id: "u1".to_string(),
            account_id: account_id.to_string(),
            title: "Argent Bank Checking".to_string(),
            amount: "$2,082.79".to_string(),
            description: "Available Balance".to_string(),
        }
    }

    pub(crate) fn sample_transaction(account_id: &str, transaction_id: &str) -> Transaction {
        Transaction {
            transaction_id: transaction_id.to_string(),
            account_id: account_id.to_string(),
            date: "2024-06-20".to_string(),
            description: "Golden Sun Bakery".to_string(),
            amount: "$8.00".to_string(),
            balance: "$298.00".to_string(),
            kind: "Electronic".to_string(),
            category: "Food".to_string(),
            notes: String::new(),
            merchant: "Golden Sun Bakery".to_string(),
            location: "Chicago".to_string(),
            status: "Settled".to_string(),
            currency: "USD".to_string(),
            payment_method: "Card".to_string(),
        }
    }
}
