use crate::client::record_path;
use crate::client_error::ClientError;
use crate::config::Config;
use crate::contact::{Contact, ContactInput};
use crate::response::{ContactResponse, ContactsResponse};
use crate::service::{remap_error, select_filters, Filters, Operation, Resource, ServiceContext};
use crate::token_record::TokenRecord;
use crate::token_store::TokenStore;
use serde_json::Value;

/// Filters accepted by [`ContactService::list`]. Anything else is dropped.
pub const CONTACT_FILTERS: &[&str] = &["query", "limit", "startAfter", "startAfterId"];

/// Create, read, update and delete contacts of the authenticated location.
pub struct ContactService {
    context: ServiceContext,
}

impl ContactService {
    /// Create a service using the token currently held by `store`.
    pub fn new<S: TokenStore>(config: &Config, store: &S) -> Result<ContactService, ClientError> {
        Ok(ContactService {
            context: ServiceContext::load(config, store)?,
        })
    }

    /// Create a service from an already loaded token.
    pub fn with_token(config: &Config, token: TokenRecord) -> Result<ContactService, ClientError> {
        Ok(ContactService {
            context: ServiceContext::with_token(config, token)?,
        })
    }

    /// List the location's contacts. Only [`CONTACT_FILTERS`] are forwarded.
    pub fn list(&self, filters: &Filters) -> Result<Vec<Contact>, ClientError> {
        let mut query = vec![(String::from("locationId"), self.context.location_id()?)];
        query.extend(select_filters(filters, CONTACT_FILTERS));

        let response: ContactsResponse = self
            .context
            .api
            .get("contacts/", &query)
            .map_err(|error| remap_error(error, Resource::Contact, Operation::List))?;

        Ok(response.contacts)
    }

    /// Search the location's contacts by free text.
    pub fn search(&self, text: &str) -> Result<Vec<Contact>, ClientError> {
        let mut filters = Filters::new();
        filters.insert(String::from("query"), text.to_string());

        self.list(&filters)
    }

    pub fn get(&self, contact_id: &str) -> Result<Contact, ClientError> {
        let response: ContactResponse = self
            .context
            .api
            .get(&record_path("contacts", contact_id)?, &[])
            .map_err(|error| remap_error(error, Resource::Contact, Operation::Get))?;

        Ok(response.contact)
    }

    /// Create a contact in the authenticated location.
    ///
    /// Fails with [`ClientError::MissingLocation`] before any request is made when the stored
    /// token has no location.
    pub fn create(&self, data: &ContactInput) -> Result<Contact, ClientError> {
        let location_id = self.context.location_id()?;

        let mut body = serde_json::to_value(data)?;
        if let Value::Object(fields) = &mut body {
            fields.insert(String::from("locationId"), Value::String(location_id));
        }

        let response: ContactResponse = self
            .context
            .api
            .post("contacts/", &body)
            .map_err(|error| remap_error(error, Resource::Contact, Operation::Create))?;

        tracing::info!(contact_id = %response.contact.id, "Created contact");

        Ok(response.contact)
    }

    pub fn update(&self, contact_id: &str, data: &ContactInput) -> Result<Contact, ClientError> {
        let body = serde_json::to_value(data)?;

        let response: ContactResponse = self
            .context
            .api
            .put(&record_path("contacts", contact_id)?, &body)
            .map_err(|error| remap_error(error, Resource::Contact, Operation::Update))?;

        tracing::info!(contact_id, "Updated contact");

        Ok(response.contact)
    }

    pub fn delete(&self, contact_id: &str) -> Result<(), ClientError> {
        let _: Value = self
            .context
            .api
            .delete(&record_path("contacts", contact_id)?)
            .map_err(|error| remap_error(error, Resource::Contact, Operation::Delete))?;

        tracing::info!(contact_id, "Deleted contact");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_error::DomainError;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;
    use std::collections::HashMap;

    fn get_config(server: &ServerGuard) -> Config {
        Config::new("v1-abc123".into(), "secret".into(), "http://localhost/callback".into())
            .with_api_base(server.url())
    }

    fn get_token(location_id: Option<&str>) -> TokenRecord {
        let mut token = TokenRecord::new("access_token_value".into(), "refresh".into(), 86399);
        token.location_id = location_id.map(String::from);
        token
    }

    fn get_service(server: &ServerGuard, location_id: Option<&str>) -> ContactService {
        ContactService::with_token(&get_config(server), get_token(location_id)).unwrap()
    }

    #[test]
    fn list_forwards_allowed_filters_only() {
        let mut server = Server::new();
        let mocker = server
            .mock("GET", "/contacts/")
            .match_query(Matcher::Exact(String::from("locationId=loc_1&query=jane&limit=10")))
            .with_status(200)
            .with_body(r#"{"contacts":[{"id":"c1","firstName":"Jane"}],"meta":{"total":1}}"#)
            .create();
        let service = get_service(&server, Some("loc_1"));

        let mut filters = Filters::new();
        filters.insert(String::from("query"), String::from("jane"));
        filters.insert(String::from("limit"), String::from("10"));
        filters.insert(String::from("foo"), String::from("bar"));
        let contacts = service.list(&filters).unwrap();

        mocker.assert();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].first_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn list_requires_location() {
        let mut server = Server::new();
        let mocker = server.mock("GET", Matcher::Any).expect(0).create();
        let service = get_service(&server, None);

        let result = service.search("jane");

        mocker.assert();
        assert!(matches!(result, Err(ClientError::MissingLocation)));
    }

    #[test]
    fn get_unwraps_contact() {
        let mut server = Server::new();
        let mocker = server
            .mock("GET", "/contacts/c1")
            .with_status(200)
            .with_body(r#"{"contact":{"id":"c1","email":"jane@example.com"}}"#)
            .create();
        let service = get_service(&server, Some("loc_1"));

        let contact = service.get("c1").unwrap();

        mocker.assert();
        assert_eq!(contact.email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn create_injects_location() {
        let mut server = Server::new();
        let mocker = server
            .mock("POST", "/contacts/")
            .match_body(Matcher::Json(json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@example.com",
                "phone": "",
                "locationId": "loc_1"
            })))
            .with_status(201)
            .with_body(r#"{"contact":{"id":"c9","firstName":"Jane"}}"#)
            .create();
        let service = get_service(&server, Some("loc_1"));

        let mut form = HashMap::new();
        form.insert(String::from("firstName"), String::from("Jane"));
        form.insert(String::from("lastName"), String::from("Doe"));
        form.insert(String::from("email"), String::from("jane@example.com"));
        let contact = service.create(&ContactInput::for_create(&form)).unwrap();

        mocker.assert();
        assert_eq!(contact.id, "c9");
    }

    #[test]
    /// Tests that no request goes out when the token has no location.
    fn create_without_location_makes_no_request() {
        let mut server = Server::new();
        let mocker = server.mock("POST", Matcher::Any).expect(0).create();
        let service = get_service(&server, None);

        let result = service.create(&ContactInput::default());

        mocker.assert();
        assert!(matches!(result, Err(ClientError::MissingLocation)));
    }

    #[test]
    fn create_duplicate_contact() {
        let mut server = Server::new();
        let mocker = server
            .mock("POST", "/contacts/")
            .with_status(400)
            .with_body(r#"{"statusCode":400,"message":"This location does not allow duplicated contacts.","meta":{"contactId":"c1"}}"#)
            .create();
        let service = get_service(&server, Some("loc_1"));

        let result = service.create(&ContactInput::default());

        mocker.assert();
        match result {
            Err(ClientError::Domain(DomainError::DuplicateResource(message))) => {
                assert_eq!(message, "Contact already exists with this email or phone number.");
            }
            other => panic!("Expected a duplicate error, got {:?}", other),
        }
    }

    #[test]
    fn update_sends_only_given_fields() {
        let mut server = Server::new();
        let mocker = server
            .mock("PUT", "/contacts/c1")
            .match_body(Matcher::Json(json!({ "city": "Springfield" })))
            .with_status(200)
            .with_body(r#"{"succeded":true,"contact":{"id":"c1","city":"Springfield"}}"#)
            .create();
        let service = get_service(&server, None);

        let input = ContactInput {
            city: Some(String::from("Springfield")),
            ..ContactInput::default()
        };
        let contact = service.update("c1", &input).unwrap();

        mocker.assert();
        assert_eq!(contact.city.as_deref(), Some("Springfield"));
    }

    #[test]
    fn update_unauthorized() {
        let mut server = Server::new();
        let mocker = server.mock("PUT", "/contacts/c1").with_status(401).create();
        let service = get_service(&server, None);

        let result = service.update("c1", &ContactInput::default());

        mocker.assert();
        assert!(matches!(
            result,
            Err(ClientError::Domain(DomainError::Unauthorized(_)))
        ));
    }

    #[test]
    fn get_bad_request_is_invalid_input() {
        let mut server = Server::new();
        let mocker = server.mock("GET", "/contacts/c1").with_status(400).create();
        let service = get_service(&server, Some("loc_1"));

        let result = service.get("c1");

        mocker.assert();
        match result {
            Err(ClientError::Domain(DomainError::InvalidInput(message))) => {
                assert_eq!(message, "Invalid contact request.");
            }
            other => panic!("Expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn delete_keeps_id_inside_contacts() {
        let mut server = Server::new();
        let escaped = server.mock("DELETE", Matcher::Regex(String::from("^/users"))).expect(0).create();
        let mocker = server
            .mock("DELETE", "/contacts/..%2Fusers%2Fu1")
            .with_status(404)
            .create();
        let service = get_service(&server, Some("loc_1"));

        let result = service.delete("../users/u1");

        escaped.assert();
        mocker.assert();
        assert!(matches!(
            result,
            Err(ClientError::Domain(DomainError::NotFound(_)))
        ));
    }

    #[test]
    fn dot_segment_id_makes_no_request() {
        let mut server = Server::new();
        let mocker = server.mock("DELETE", Matcher::Any).expect(0).create();
        let service = get_service(&server, Some("loc_1"));

        let result = service.delete("..");

        mocker.assert();
        assert!(matches!(
            result,
            Err(ClientError::Domain(DomainError::InvalidInput(_)))
        ));
    }

    #[test]
    fn delete_missing_contact_is_not_found() {
        let mut server = Server::new();
        let mocker = server
            .mock("DELETE", "/contacts/gone")
            .with_status(404)
            .with_body(r#"{"statusCode":404,"message":"Contact not found"}"#)
            .create();
        let service = get_service(&server, Some("loc_1"));

        let result = service.delete("gone");

        mocker.assert();
        match result {
            Err(ClientError::Domain(DomainError::NotFound(message))) => {
                assert_eq!(message, "Contact not found.");
            }
            other => panic!("Expected not found, got {:?}", other),
        }
    }

    #[test]
    fn delete_success() {
        let mut server = Server::new();
        let mocker = server
            .mock("DELETE", "/contacts/c1")
            .with_status(200)
            .with_body(r#"{"succeded":true}"#)
            .create();
        let service = get_service(&server, Some("loc_1"));

        service.delete("c1").unwrap();

        mocker.assert();
    }
}
