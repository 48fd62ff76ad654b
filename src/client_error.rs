use thiserror::Error;

/// Various errors returned while authenticating or talking to the API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required configuration (usually credentials) is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No token has been stored yet, or the stored token has no access token.
    #[error("Missing access token. Authenticate first.")]
    NotAuthenticated,

    /// The OAuth callback arrived without an authorization code.
    #[error("No authorization code provided.")]
    MissingCode,

    /// The OAuth callback `state` was missing or did not match the one we issued.
    #[error("Invalid CSRF token.")]
    InvalidState,

    /// The token endpoint rejected the authorization code.
    #[error("Token exchange failed with status {status}: {body}")]
    AuthExchange { status: u16, body: String },

    /// Any non-2xx response from the REST API. The body is kept verbatim.
    #[error("API request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// The stored token does not carry a location id, but the operation needs one.
    #[error("Missing locationId.")]
    MissingLocation,

    /// The stored token does not carry a company id, but the operation needs one.
    #[error("Missing companyId.")]
    MissingCompany,

    /// An `Http` error remapped to a user-facing message by a resource service.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Form encoding error: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// The HTTP status code carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::AuthExchange { status, .. } | ClientError::Http { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Coarse, user-facing errors produced from an `Http` error by the resource services.
///
/// Each variant carries the message that should be shown to the end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0}")]
    DuplicateResource(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unknown(String),
}

impl DomainError {
    /// Return the user-facing message.
    pub fn message(&self) -> &str {
        match self {
            DomainError::DuplicateResource(message)
            | DomainError::InvalidInput(message)
            | DomainError::Unauthorized(message)
            | DomainError::NotFound(message)
            | DomainError::Unknown(message) => message,
        }
    }
}
