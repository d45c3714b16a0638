use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Transport-level failure from the remote service.
///
/// This never crosses a controller boundary: resource controllers classify
/// it into an [`ErrorKind`] at the call site.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid bearer token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        ApiError::Status {
            status,
            body: Self::truncate_body(body),
        }
    }

    /// The HTTP status carried by this failure, when there is one.
    /// Connectivity loss and header construction failures have none.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            ApiError::InvalidToken(_) => None,
        }
    }
}

/// The resource family an operation belongs to. Error state is tracked and
/// surfaced per family, so one family's failure never clobbers another's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Login,
    ProfileFetch,
    ProfileUpdate,
    Accounts,
    Transactions,
    TransactionDetail,
    TransactionUpdate,
    TransactionDelete,
}

impl Resource {
    /// User-facing message for a generic failure of this family.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Resource::Login => "Login failed. Please try again.",
            Resource::ProfileFetch => "Failed to fetch profile. Please try again.",
            Resource::ProfileUpdate => "Failed to update profile. Please try again.",
            Resource::Accounts => "Failed to fetch accounts. Please try again.",
            Resource::Transactions => "Failed to fetch transactions. Please try again.",
            Resource::TransactionDetail => "Failed to fetch transaction. Please try again.",
            Resource::TransactionUpdate => "Failed to update transaction. Please try again.",
            Resource::TransactionDelete => "Failed to delete transaction. Please try again.",
        }
    }
}

/// Domain error surfaced to the caller, classified from a transport failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("You are not authorized to view this resource. Please log in.")]
    Unauthorized,

    #[error("The requested resource was not found.")]
    NotFound,

    #[error("{}", .0.failure_message())]
    OperationFailed(Resource),
}

impl ErrorKind {
    /// Canonical status-to-kind mapping, identical for every resource
    /// family. Any status other than 401/404, or a failure with no status at
    /// all, is a generic failure of the family.
    pub fn classify(resource: Resource, status: Option<StatusCode>) -> Self {
        match status {
            Some(StatusCode::UNAUTHORIZED) => ErrorKind::Unauthorized,
            Some(StatusCode::NOT_FOUND) => ErrorKind::NotFound,
            _ => ErrorKind::OperationFailed(resource),
        }
    }

    pub fn from_api(resource: Resource, err: &ApiError) -> Self {
        Self::classify(resource, err.status())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ErrorKind::Unauthorized)
    }
}
