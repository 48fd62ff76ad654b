//! Pieces shared by the contact and opportunity services.

use crate::client::ApiClient;
use crate::client_error::{ClientError, DomainError};
use crate::config::Config;
use crate::token_record::TokenRecord;
use crate::token_store::TokenStore;
use std::collections::HashMap;

/// Raw filter values keyed by name, as they come from a search form or query string.
pub type Filters = HashMap<String, String>;

/// Body substring the API uses when a contact would duplicate an existing one.
const DUPLICATE_CONTACT_MARKER: &str = "duplicated contacts";

/// The kind of record a service works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Contact,
    Opportunity,
}

impl Resource {
    fn singular(self) -> &'static str {
        match self {
            Resource::Contact => "contact",
            Resource::Opportunity => "opportunity",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            Resource::Contact => "contacts",
            Resource::Opportunity => "opportunities",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Resource::Contact => "Contact",
            Resource::Opportunity => "Opportunity",
        }
    }
}

/// What a service was doing when a request failed. Only used to pick the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Pipelines,
    Users,
}

/// Turn an `Http` error into a user-facing [`DomainError`]. Other errors pass through untouched.
///
/// The duplicate check looks at the body text; everything else goes by status code.
pub fn remap_error(error: ClientError, resource: Resource, operation: Operation) -> ClientError {
    let (status, body) = match error {
        ClientError::Http { status, body } => (status, body),
        other => return other,
    };

    let domain = if resource == Resource::Contact && body.contains(DUPLICATE_CONTACT_MARKER) {
        DomainError::DuplicateResource(String::from(
            "Contact already exists with this email or phone number.",
        ))
    } else {
        match status {
            400 => match operation {
                Operation::Create | Operation::Update => DomainError::InvalidInput(format!(
                    "Invalid {} information. Please check your input.",
                    resource.singular()
                )),
                Operation::List => DomainError::InvalidInput(String::from(
                    "Invalid search filters. Please check your input.",
                )),
                Operation::Get => {
                    DomainError::InvalidInput(format!("Invalid {} request.", resource.singular()))
                }
                Operation::Pipelines => {
                    DomainError::InvalidInput(String::from("Invalid pipeline request."))
                }
                Operation::Users => DomainError::InvalidInput(String::from("Invalid user request.")),
                Operation::Delete => failed(resource, operation),
            },
            401 | 403 => DomainError::Unauthorized(String::from(
                "Authentication failed. Please login again.",
            )),
            404 => not_found(resource, operation),
            _ => failed(resource, operation),
        }
    };

    tracing::debug!(status, ?resource, ?operation, message = domain.message(), "Remapped API error");

    ClientError::Domain(domain)
}

fn not_found(resource: Resource, operation: Operation) -> DomainError {
    let message = match (resource, operation) {
        (Resource::Opportunity, Operation::Create) => String::from("Pipeline or contact not found."),
        (_, Operation::Pipelines) => String::from("Pipelines not found."),
        (_, Operation::Users) => String::from("Users not found."),
        _ => format!("{} not found.", resource.title()),
    };

    DomainError::NotFound(message)
}

fn failed(resource: Resource, operation: Operation) -> DomainError {
    let action = match operation {
        Operation::List => format!("load {}", resource.plural()),
        Operation::Get => format!("load {}", resource.singular()),
        Operation::Create => format!("create {}", resource.singular()),
        Operation::Update => format!("update {}", resource.singular()),
        Operation::Delete => format!("delete {}", resource.singular()),
        Operation::Pipelines => String::from("load pipelines"),
        Operation::Users => String::from("load users"),
    };

    DomainError::Unknown(format!("Failed to {}. Please try again.", action))
}

/// Keep the filters named in `allowed`, in that order, skipping empty values.
///
/// Anything not in the list is dropped without complaint.
pub fn select_filters(filters: &Filters, allowed: &[&str]) -> Vec<(String, String)> {
    allowed
        .iter()
        .filter_map(|key| {
            filters
                .get(*key)
                .filter(|value| !value.is_empty())
                .map(|value| (key.to_string(), value.clone()))
        })
        .collect()
}

/// Shared state for a service: the loaded token and a client authenticated with it.
pub(crate) struct ServiceContext {
    pub(crate) api: ApiClient,
    pub(crate) token: TokenRecord,
}

impl ServiceContext {
    /// Load the stored token and build an authenticated client.
    pub(crate) fn load<S: TokenStore>(config: &Config, store: &S) -> Result<ServiceContext, ClientError> {
        let token = match store.load()? {
            Some(token) if !token.access_token.is_empty() => token,
            _ => return Err(ClientError::NotAuthenticated),
        };

        ServiceContext::with_token(config, token)
    }

    pub(crate) fn with_token(config: &Config, token: TokenRecord) -> Result<ServiceContext, ClientError> {
        let api = ApiClient::from_token(config, &token)?;

        Ok(ServiceContext { api, token })
    }

    pub(crate) fn location_id(&self) -> Result<String, ClientError> {
        self.token
            .location_id()
            .map(String::from)
            .ok_or(ClientError::MissingLocation)
    }

    pub(crate) fn company_id(&self) -> Result<String, ClientError> {
        self.token
            .company_id()
            .map(String::from)
            .ok_or(ClientError::MissingCompany)
    }
}
