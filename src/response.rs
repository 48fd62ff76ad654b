//! Various response objects returned from GoHighLevel.
//!
//! Every resource endpoint wraps its payload in an object keyed by the resource name. Missing
//! keys decode as empty lists, which is what the API sends for a location with no data anyway.

use crate::contact::Contact;
use crate::opportunity::{Opportunity, Pipeline, User};
use serde::Deserialize;

/// Wrapper around the `contacts/` listing.
#[derive(Debug, Deserialize)]
pub struct ContactsResponse {
    #[serde(default)]
    pub contacts: Vec<Contact>,

    #[serde(default)]
    pub meta: Option<ListMeta>,
}

/// Wrapper around a single contact, returned by `get`, `create` and `update`.
#[derive(Debug, Deserialize)]
pub struct ContactResponse {
    pub contact: Contact,
}

/// Wrapper around the `opportunities/search` listing.
#[derive(Debug, Deserialize)]
pub struct OpportunitiesResponse {
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,

    #[serde(default)]
    pub meta: Option<ListMeta>,
}

/// Wrapper around a single opportunity, returned by `get`, `create` and `update`.
#[derive(Debug, Deserialize)]
pub struct OpportunityResponse {
    pub opportunity: Opportunity,
}

#[derive(Debug, Deserialize)]
pub struct PipelinesResponse {
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
}

#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Paging information sent back with list endpoints.
///
/// Pass `start_after` and `start_after_id` back as the `startAfter` and `startAfterId` filters to
/// fetch the next page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(default)]
    pub total: Option<u64>,

    #[serde(default)]
    pub start_after: Option<serde_json::Value>,

    #[serde(default)]
    pub start_after_id: Option<String>,

    #[serde(default)]
    pub next_page_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_list_is_empty() {
        let response: ContactsResponse = serde_json::from_str("{}").unwrap();

        assert!(response.contacts.is_empty());
        assert!(response.meta.is_none());
    }

    #[test]
    fn list_meta_is_camel_case() {
        let body = r#"{"opportunities":[],"meta":{"total":42,"startAfterId":"o9","startAfter":1700000000000}}"#;
        let response: OpportunitiesResponse = serde_json::from_str(body).unwrap();
        let meta = response.meta.unwrap();

        assert_eq!(meta.total, Some(42));
        assert_eq!(meta.start_after_id.as_deref(), Some("o9"));
    }
}
