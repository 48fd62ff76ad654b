use crate::client::record_path;
use crate::client_error::ClientError;
use crate::config::Config;
use crate::opportunity::{Opportunity, OpportunityInput, Pipeline, User};
use crate::response::{OpportunitiesResponse, OpportunityResponse, PipelinesResponse, UsersResponse};
use crate::service::{remap_error, select_filters, Filters, Operation, Resource, ServiceContext};
use crate::token_record::TokenRecord;
use crate::token_store::TokenStore;
use serde_json::Value;

/// Filters accepted by [`OpportunityService::search`], in the order they are sent.
pub const OPPORTUNITY_FILTERS: &[&str] = &[
    "q",
    "pipeline_id",
    "pipeline_stage_id",
    "contact_id",
    "status",
    "assigned_to",
    "campaignId",
    "id",
    "order",
    "endDate",
    "startAfter",
    "startAfterId",
    "date",
    "country",
    "page",
    "limit",
];

/// How many users to ask for when listing possible owners.
const USER_LIMIT: &str = "100";

/// Opportunities of the authenticated location, plus the pipelines and users they refer to.
pub struct OpportunityService {
    context: ServiceContext,
}

impl OpportunityService {
    /// Create a service using the token currently held by `store`.
    pub fn new<S: TokenStore>(config: &Config, store: &S) -> Result<OpportunityService, ClientError> {
        Ok(OpportunityService {
            context: ServiceContext::load(config, store)?,
        })
    }

    /// Create a service from an already loaded token.
    pub fn with_token(config: &Config, token: TokenRecord) -> Result<OpportunityService, ClientError> {
        Ok(OpportunityService {
            context: ServiceContext::with_token(config, token)?,
        })
    }

    /// Search opportunities. Only [`OPPORTUNITY_FILTERS`] are forwarded; empty values are skipped.
    pub fn search(&self, filters: &Filters) -> Result<Vec<Opportunity>, ClientError> {
        let mut query = vec![(String::from("location_id"), self.context.location_id()?)];
        query.extend(select_filters(filters, OPPORTUNITY_FILTERS));

        let response: OpportunitiesResponse = self
            .context
            .api
            .get("opportunities/search", &query)
            .map_err(|error| remap_error(error, Resource::Opportunity, Operation::List))?;

        Ok(response.opportunities)
    }

    /// Same as [`search`](OpportunityService::search).
    pub fn list(&self, filters: &Filters) -> Result<Vec<Opportunity>, ClientError> {
        self.search(filters)
    }

    pub fn get(&self, opportunity_id: &str) -> Result<Opportunity, ClientError> {
        let response: OpportunityResponse = self
            .context
            .api
            .get(&record_path("opportunities", opportunity_id)?, &[])
            .map_err(|error| remap_error(error, Resource::Opportunity, Operation::Get))?;

        Ok(response.opportunity)
    }

    /// Create an opportunity in the authenticated location.
    ///
    /// Fails with [`ClientError::MissingLocation`] before any request is made when the stored
    /// token has no location.
    pub fn create(&self, data: &OpportunityInput) -> Result<Opportunity, ClientError> {
        let location_id = self.context.location_id()?;

        let mut body = serde_json::to_value(data)?;
        if let Value::Object(fields) = &mut body {
            fields.insert(String::from("locationId"), Value::String(location_id));
        }

        let response: OpportunityResponse = self
            .context
            .api
            .post("opportunities/", &body)
            .map_err(|error| remap_error(error, Resource::Opportunity, Operation::Create))?;

        tracing::info!(opportunity_id = %response.opportunity.id, "Created opportunity");

        Ok(response.opportunity)
    }

    pub fn update(
        &self,
        opportunity_id: &str,
        data: &OpportunityInput,
    ) -> Result<Opportunity, ClientError> {
        let body = serde_json::to_value(data)?;

        let response: OpportunityResponse = self
            .context
            .api
            .put(&record_path("opportunities", opportunity_id)?, &body)
            .map_err(|error| remap_error(error, Resource::Opportunity, Operation::Update))?;

        tracing::info!(opportunity_id, "Updated opportunity");

        Ok(response.opportunity)
    }

    pub fn delete(&self, opportunity_id: &str) -> Result<(), ClientError> {
        let _: Value = self
            .context
            .api
            .delete(&record_path("opportunities", opportunity_id)?)
            .map_err(|error| remap_error(error, Resource::Opportunity, Operation::Delete))?;

        tracing::info!(opportunity_id, "Deleted opportunity");

        Ok(())
    }

    /// Get all pipelines, with their stages, for the current location.
    pub fn pipelines(&self) -> Result<Vec<Pipeline>, ClientError> {
        let query = vec![(String::from("locationId"), self.context.location_id()?)];

        let response: PipelinesResponse = self
            .context
            .api
            .get("opportunities/pipelines", &query)
            .map_err(|error| remap_error(error, Resource::Opportunity, Operation::Pipelines))?;

        Ok(response.pipelines)
    }

    /// Get the users who can own opportunities.
    ///
    /// Needs the company id from the token; the location narrows the search when known.
    pub fn users(&self) -> Result<Vec<User>, ClientError> {
        let mut query = vec![
            (String::from("companyId"), self.context.company_id()?),
            (String::from("limit"), String::from(USER_LIMIT)),
        ];

        if let Ok(location_id) = self.context.location_id() {
            query.push((String::from("locationId"), location_id));
        }

        let response: UsersResponse = self
            .context
            .api
            .get("users/search", &query)
            .map_err(|error| remap_error(error, Resource::Opportunity, Operation::Users))?;

        Ok(response.users)
    }
}
