use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wrapper around a token sent back from the GoHighLevel token endpoint.
///
/// This is also the exact shape persisted by a [`TokenStore`](crate::TokenStore). Fields the
/// vendor sends that are not modelled here are kept in `extra`, so saving a record keeps
/// everything the token endpoint returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Lifetime of the access token in seconds, as reported at exchange time.
    #[serde(default)]
    pub expires_in: u64,

    #[serde(rename = "locationId", default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,

    #[serde(rename = "companyId", default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_token_type() -> String {
    String::from("Bearer")
}

impl TokenRecord {
    /// Create a bearer token record with no tenant identifiers.
    pub fn new(access_token: String, refresh_token: String, expires_in: u64) -> TokenRecord {
        TokenRecord {
            access_token,
            refresh_token,
            token_type: default_token_type(),
            expires_in,
            location_id: None,
            company_id: None,
            user_id: None,
            extra: Map::new(),
        }
    }

    /// Location id, ignoring blank values.
    pub fn location_id(&self) -> Option<&str> {
        non_blank(&self.location_id)
    }

    /// Company id, ignoring blank values.
    pub fn company_id(&self) -> Option<&str> {
        non_blank(&self.company_id)
    }

    /// Get an abbreviated version of the access token, safe to write to logs.
    pub fn abbreviated_access_token(&self) -> String {
        abbreviate(&self.access_token)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Shorten a secret to its first 9 and last 4 characters.
pub(crate) fn abbreviate(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();

    if chars.len() <= 13 {
        return "*".repeat(chars.len());
    }

    let prefix: String = chars[..9].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();

    format!("{}..{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vendor_token_body() {
        let body = r#"{
            "access_token": "eyJhbGciOi.access",
            "token_type": "Bearer",
            "expires_in": 86399,
            "refresh_token": "eyJhbGciOi.refresh",
            "scope": "contacts.readonly contacts.write",
            "userType": "Location",
            "locationId": "loc_123",
            "companyId": "comp_456",
            "userId": "user_789"
        }"#;

        let record: TokenRecord = serde_json::from_str(body).unwrap();

        assert_eq!(record.access_token, "eyJhbGciOi.access");
        assert_eq!(record.expires_in, 86399);
        assert_eq!(record.location_id(), Some("loc_123"));
        assert_eq!(record.company_id(), Some("comp_456"));
        assert_eq!(record.user_id.as_deref(), Some("user_789"));
        assert_eq!(record.extra.get("userType"), Some(&Value::from("Location")));
    }

    #[test]
    fn unknown_fields_survive_serialization() {
        let body = r#"{"access_token":"a","refresh_token":"r","token_type":"Bearer","expires_in":10,"scope":"x y"}"#;
        let record: TokenRecord = serde_json::from_str(body).unwrap();

        let written = serde_json::to_value(&record).unwrap();

        assert_eq!(written["scope"], Value::from("x y"));
        assert!(written.get("locationId").is_none());
    }

    #[test]
    fn blank_location_is_absent() {
        let mut record = TokenRecord::new("a".into(), "r".into(), 10);
        record.location_id = Some(String::new());

        assert_eq!(record.location_id(), None);
    }

    #[test]
    fn valid_abbreviated_token() {
        let record = TokenRecord::new("12345678901234567890".into(), "r".into(), 10);

        assert_eq!(record.abbreviated_access_token(), "123456789..7890");
        assert_eq!(record.abbreviated_access_token().len(), 15);
    }

    #[test]
    fn short_token_fully_masked() {
        assert_eq!(abbreviate("abc"), "***");
    }
}
