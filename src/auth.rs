//! OAuth authorization-code flow against the GoHighLevel marketplace.
//!
//! 1. [`AuthFlow::authorization_request`] builds the URL the user is sent to, along with a fresh
//!    [`OAuthState`] that the caller keeps (usually in its session).
//! 2. The vendor redirects back with `code` and `state`.
//! 3. [`AuthFlow::complete`] checks the state against the kept one and only then exchanges the
//!    code. The resulting [`TokenRecord`] replaces whatever the store held.
//!
//! Nothing is written to the store unless the exchange succeeds. Refresh tokens are stored but
//! never used; an expired access token means going through the flow again.

use crate::client_error::ClientError;
use crate::config::Config;
use crate::token_record::TokenRecord;
use crate::token_store::TokenStore;
use rand::RngCore;
use reqwest::blocking::Client as HttpClient;
use url::Url;

/// Scopes requested during authorization.
pub const SCOPES: &[&str] = &[
    "contacts.readonly",
    "contacts.write",
    "opportunities.readonly",
    "opportunities.write",
    "locations.readonly",
    "users.readonly",
];

const AUTHORIZE_PATH: &str = "/oauth/chooselocation";
const TOKEN_PATH: &str = "/oauth/token";

/// Anti-forgery value sent as `state` and expected back on the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthState(String);

impl OAuthState {
    /// Generate 32 random bytes, hex encoded.
    pub fn generate() -> OAuthState {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);

        OAuthState(hex::encode(bytes))
    }

    /// Wrap a value kept from an earlier request, e.g. one read back from a session.
    pub fn from_string(value: String) -> OAuthState {
        OAuthState(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against the `state` received on the callback, in constant time.
    pub fn verify(&self, received: &str) -> bool {
        let expected = self.0.as_bytes();
        let received = received.as_bytes();

        if expected.is_empty() || expected.len() != received.len() {
            return false;
        }

        expected
            .iter()
            .zip(received)
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
    }
}

/// Where to send the user, and the state to keep until they come back.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: Url,
    pub state: OAuthState,
}

/// Drives the authorization-code flow and saves the resulting token.
pub struct AuthFlow<S: TokenStore> {
    config: Config,
    store: S,
    http: HttpClient,
}

impl<S: TokenStore> AuthFlow<S> {
    pub fn new(config: Config, store: S) -> Result<AuthFlow<S>, ClientError> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(ClientError::Config(String::from(
                "client id and client secret are required",
            )));
        }

        let http = HttpClient::builder().timeout(config.timeout).build()?;

        Ok(AuthFlow {
            config,
            store,
            http,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Build the authorization URL with a fresh state.
    pub fn authorization_request(&self) -> Result<AuthorizationRequest, ClientError> {
        let state = OAuthState::generate();
        let url = self.authorization_url(&state)?;

        Ok(AuthorizationRequest { url, state })
    }

    /// Build the authorization URL for a given state.
    pub fn authorization_url(&self, state: &OAuthState) -> Result<Url, ClientError> {
        let base = format!(
            "{}{}",
            self.config.marketplace_base.trim_end_matches('/'),
            AUTHORIZE_PATH
        );
        let mut url = Url::parse(&base)
            .map_err(|error| ClientError::Config(format!("Invalid marketplace URL: {}", error)))?;

        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("client_id", &self.config.client_id)
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("version_id", self.config.version_id())
            .append_pair("state", state.as_str());

        Ok(url)
    }

    /// Exchange an authorization code for a token and store it.
    ///
    /// On a non-2xx answer from the token endpoint nothing is stored and
    /// [`ClientError::AuthExchange`] carries the vendor's response.
    pub fn exchange_code(&self, code: &str) -> Result<TokenRecord, ClientError> {
        let url = format!("{}{}", self.config.api_base.trim_end_matches('/'), TOKEN_PATH);
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(url.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(serde_urlencoded::to_string(&params)?)
            .send()?;
        let status = response.status();
        let raw_response = response.text()?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token exchange rejected");

            return Err(ClientError::AuthExchange {
                status: status.as_u16(),
                body: raw_response,
            });
        }

        let token: TokenRecord = serde_json::from_str(&raw_response)?;
        self.store.save(&token)?;

        tracing::info!(
            location_id = token.location_id().unwrap_or("-"),
            token = %token.abbreviated_access_token(),
            "Stored new access token"
        );

        Ok(token)
    }

    /// Handle the callback: check the code and state, then exchange the code.
    ///
    /// `expected` is the state issued with the authorization request, if the caller still has
    /// it. No request is made unless both the code and a matching state are present.
    pub fn complete(
        &self,
        expected: Option<&OAuthState>,
        code: Option<&str>,
        state: Option<&str>,
    ) -> Result<TokenRecord, ClientError> {
        let code = code
            .filter(|code| !code.is_empty())
            .ok_or(ClientError::MissingCode)?;

        let valid = match (expected, state) {
            (Some(expected), Some(state)) => expected.verify(state),
            _ => false,
        };

        if !valid {
            tracing::warn!("OAuth callback state did not match");
            return Err(ClientError::InvalidState);
        }

        self.exchange_code(code)
    }

    /// Whether a token is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.store.exists()
    }

    /// Forget the stored token.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        tracing::info!("Logged out");

        Ok(())
    }
}
