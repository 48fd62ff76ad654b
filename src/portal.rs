//! Application-level entry points: one call per user action, each answering with a message.

use crate::auth::{AuthFlow, AuthorizationRequest, OAuthState};
use crate::callback::{handle_callback, CallbackOutcome};
use crate::client_error::ClientError;
use crate::config::Config;
use crate::contact::ContactInput;
use crate::contact_service::ContactService;
use crate::opportunity::OpportunityInput;
use crate::opportunity_service::OpportunityService;
use crate::token_store::{FileTokenStore, TokenStore};
use std::collections::HashMap;

/// Result of a create, update or delete action, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    fn from_result<T>(result: Result<T, ClientError>, success_message: &str) -> ActionOutcome {
        match result {
            Ok(_) => ActionOutcome {
                success: true,
                message: success_message.to_string(),
            },
            Err(error) => {
                tracing::warn!(%error, "Action failed");
                ActionOutcome {
                    success: false,
                    message: error.to_string(),
                }
            }
        }
    }
}

/// Ties the auth flow and the resource services to one token store.
pub struct Portal<S: TokenStore> {
    flow: AuthFlow<S>,
}

impl Portal<FileTokenStore> {
    /// Build a portal from the environment, keeping the token at the configured path.
    pub fn from_env() -> Result<Portal<FileTokenStore>, ClientError> {
        let config = Config::from_env()?;
        let store = FileTokenStore::new(config.token_path.clone());

        Portal::new(config, store)
    }
}

impl<S: TokenStore> Portal<S> {
    pub fn new(config: Config, store: S) -> Result<Portal<S>, ClientError> {
        Ok(Portal {
            flow: AuthFlow::new(config, store)?,
        })
    }

    pub fn auth(&self) -> &AuthFlow<S> {
        &self.flow
    }

    pub fn is_authenticated(&self) -> bool {
        self.flow.is_authenticated()
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.flow.logout()
    }

    /// Where to redirect an unauthenticated user. Keep the returned state for the callback.
    pub fn authorization_request(&self) -> Result<AuthorizationRequest, ClientError> {
        self.flow.authorization_request()
    }

    pub fn callback(
        &self,
        expected: Option<&OAuthState>,
        code: Option<&str>,
        state: Option<&str>,
    ) -> CallbackOutcome {
        handle_callback(&self.flow, expected, code, state)
    }

    pub fn contacts(&self) -> Result<ContactService, ClientError> {
        ContactService::new(self.flow.config(), self.flow.store())
    }

    pub fn opportunities(&self) -> Result<OpportunityService, ClientError> {
        OpportunityService::new(self.flow.config(), self.flow.store())
    }

    pub fn create_contact(&self, form: &HashMap<String, String>) -> ActionOutcome {
        let result = self
            .contacts()
            .and_then(|service| service.create(&ContactInput::for_create(form)));

        ActionOutcome::from_result(result, "Contact created successfully!")
    }

    pub fn update_contact(&self, contact_id: &str, form: &HashMap<String, String>) -> ActionOutcome {
        let result = self
            .contacts()
            .and_then(|service| service.update(contact_id, &ContactInput::for_update(form)));

        ActionOutcome::from_result(result, "Contact updated successfully!")
    }

    pub fn delete_contact(&self, contact_id: &str) -> ActionOutcome {
        let result = self
            .contacts()
            .and_then(|service| service.delete(contact_id));

        ActionOutcome::from_result(result, "Contact deleted successfully!")
    }

    pub fn create_opportunity(&self, form: &HashMap<String, String>) -> ActionOutcome {
        let result = OpportunityInput::for_create(form).and_then(|input| {
            self.opportunities()
                .and_then(|service| service.create(&input))
        });

        ActionOutcome::from_result(result, "Opportunity created successfully!")
    }

    pub fn update_opportunity(
        &self,
        opportunity_id: &str,
        form: &HashMap<String, String>,
    ) -> ActionOutcome {
        let result = OpportunityInput::for_update(form).and_then(|input| {
            self.opportunities()
                .and_then(|service| service.update(opportunity_id, &input))
        });

        ActionOutcome::from_result(result, "Opportunity updated successfully!")
    }

    pub fn delete_opportunity(&self, opportunity_id: &str) -> ActionOutcome {
        let result = self
            .opportunities()
            .and_then(|service| service.delete(opportunity_id));

        ActionOutcome::from_result(result, "Opportunity deleted successfully!")
    }
}
