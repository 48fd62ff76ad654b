use crate::auth::{AuthFlow, OAuthState};
use crate::client_error::ClientError;
use crate::token_store::TokenStore;

/// What to tell the user after the OAuth redirect lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    /// HTTP status to answer the callback request with.
    pub status: u16,
    pub success: bool,
    pub message: String,
}

impl CallbackOutcome {
    fn failure(status: u16, message: String) -> CallbackOutcome {
        CallbackOutcome {
            status,
            success: false,
            message,
        }
    }
}

/// Run the callback step of the flow and turn the result into a response.
///
/// Errors never escape: each one becomes a failed outcome with its own status code, and the
/// store is left untouched unless the exchange succeeds.
pub fn handle_callback<S: TokenStore>(
    flow: &AuthFlow<S>,
    expected: Option<&OAuthState>,
    code: Option<&str>,
    state: Option<&str>,
) -> CallbackOutcome {
    match flow.complete(expected, code, state) {
        Ok(_) => CallbackOutcome {
            status: 200,
            success: true,
            message: String::from(
                "Connected to GoHighLevel successfully! You can now access your contacts and other resources.",
            ),
        },
        Err(ClientError::MissingCode) => CallbackOutcome::failure(
            400,
            String::from("No authorization code provided. Please try authenticating again."),
        ),
        Err(ClientError::InvalidState) => CallbackOutcome::failure(
            403,
            String::from("Invalid CSRF token. Authentication failed for security reasons."),
        ),
        Err(error) => {
            tracing::error!(%error, "OAuth callback failed");
            CallbackOutcome::failure(500, format!("Error: {}", error))
        }
    }
}
