//! Contact records and the payload used to create or update them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A contact as returned by the API. Only `id` is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub date_of_birth: Option<String>,

    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub address1: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub postal_code: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub timezone: Option<String>,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Contact {
    /// First and last name joined, or `None` if neither is set.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Fields sent when creating or updating a contact. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ContactInput {
    /// Build the payload for a new contact from submitted form fields.
    ///
    /// Only the name, email and phone are taken; each is trimmed and always sent, even when
    /// empty.
    pub fn for_create(form: &HashMap<String, String>) -> ContactInput {
        let field = |key: &str| Some(trimmed(form, key).unwrap_or_default());

        ContactInput {
            first_name: field("firstName"),
            last_name: field("lastName"),
            email: field("email"),
            phone: field("phone"),
            ..ContactInput::default()
        }
    }

    /// Build the payload for an update from submitted form fields.
    ///
    /// Every editable field is taken when present and non-empty; the rest are left untouched
    /// on the server.
    pub fn for_update(form: &HashMap<String, String>) -> ContactInput {
        let field = |key: &str| trimmed(form, key);

        ContactInput {
            first_name: field("firstName"),
            last_name: field("lastName"),
            email: field("email"),
            phone: field("phone"),
            gender: field("gender"),
            date_of_birth: field("dateOfBirth"),
            company_name: field("companyName"),
            address1: field("address1"),
            city: field("city"),
            state: field("state"),
            postal_code: field("postalCode"),
            country: field("country"),
            website: field("website"),
            timezone: field("timezone"),
            source: field("source"),
            tags: Vec::new(),
        }
    }
}

/// The trimmed value of `key`, or `None` when it is missing or empty before trimming.
pub(crate) fn trimmed(form: &HashMap<String, String>, key: &str) -> Option<String> {
    form.get(key)
        .filter(|value| !value.is_empty())
        .map(|value| value.trim().to_string())
}
