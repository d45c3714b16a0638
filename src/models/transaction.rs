use serde::{Deserialize, Serialize};

/// A single ledger entry on an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub account_id: String,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub balance: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub notes: String,
    pub merchant: String,
    pub location: String,
    pub status: String,
    pub currency: String,
    pub payment_method: String,
}

/// Partial transaction update. Only category, notes, and description are
/// editable; everything else is server-owned.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.notes.is_none() && self.description.is_none()
    }
}
