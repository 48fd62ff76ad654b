//! # ghl-crm
//!
//! Library to authenticate against GoHighLevel and manage contacts and opportunities.
//!
//! You can read more information about the GoHighLevel API here:
//! [https://highlevel.stoplight.io/docs/integrations](https://highlevel.stoplight.io/docs/integrations)
//!
//! Authentication uses the OAuth authorization-code flow. The resulting token is kept in a
//! single-slot [`TokenStore`] (a JSON file by default) and read again by every service call.
//! Refresh tokens are stored but not used: once the access token expires, the user has to go
//! through the flow again.
//!
//! ### Example
//!
//! ```no_run
//! use ghl_crm::{Config, FileTokenStore, Filters, Portal};
//!
//! let config = Config::from_env()?;
//! let store = FileTokenStore::new(config.token_path.clone());
//! let portal = Portal::new(config, store)?;
//!
//! if !portal.is_authenticated() {
//!     let request = portal.authorization_request()?;
//!     // Redirect the user to `request.url` and keep `request.state` for the callback.
//!     println!("Visit {}", request.url);
//! }
//!
//! let contacts = portal.contacts()?;
//! let mut filters = Filters::new();
//! filters.insert("query".to_string(), "jane".to_string());
//!
//! for contact in contacts.list(&filters)? {
//!     println!("{} {:?}", contact.id, contact.full_name());
//! }
//! # Ok::<(), ghl_crm::ClientError>(())
//! ```

mod auth;
mod callback;
mod client;
mod client_error;
mod config;
mod contact;
mod contact_service;
mod opportunity;
mod opportunity_service;
mod portal;
pub mod response;
mod service;
mod token_record;
mod token_store;

pub use auth::{AuthFlow, AuthorizationRequest, OAuthState, SCOPES};
pub use callback::{handle_callback, CallbackOutcome};
pub use client::{ApiClient, API_VERSION};
pub use client_error::{ClientError, DomainError};
pub use config::Config;
pub use contact::{Contact, ContactInput};
pub use contact_service::{ContactService, CONTACT_FILTERS};
pub use opportunity::{Opportunity, OpportunityInput, OpportunityStatus, Pipeline, PipelineStage, User};
pub use opportunity_service::{OpportunityService, OPPORTUNITY_FILTERS};
pub use portal::{ActionOutcome, Portal};
pub use service::{remap_error, select_filters, Filters, Operation, Resource};
pub use token_record::TokenRecord;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
