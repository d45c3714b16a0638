use serde::{Deserialize, Serialize};

/// A bank account as returned by the accounts endpoint.
///
/// Monetary amounts are kept as the server's display strings; this client
/// never does arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub user_id: String,
    pub account_id: String,
    pub title: String,
    pub amount: String,
    pub description: String,
}

impl Account {
    /// Header line as shown on the accounts page, e.g.
    /// "Argent Bank Checking (x8349)".
    pub fn display_title(&self) -> String {
        format!("{} ({})", self.title, self.account_id)
    }
}
