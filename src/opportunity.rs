//! Opportunities, the pipelines they move through, and the users they can be assigned to.

use crate::client_error::{ClientError, DomainError};
use crate::contact::trimmed;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityStatus {
    Open,
    Won,
    Lost,
    Abandoned,
    /// Any status this crate does not know about. Never sent back to the API.
    #[serde(other)]
    Unknown,
}

impl Default for OpportunityStatus {
    fn default() -> Self {
        OpportunityStatus::Open
    }
}

impl OpportunityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStatus::Open => "open",
            OpportunityStatus::Won => "won",
            OpportunityStatus::Lost => "lost",
            OpportunityStatus::Abandoned => "abandoned",
            OpportunityStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OpportunityStatus {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(OpportunityStatus::Open),
            "won" => Ok(OpportunityStatus::Won),
            "lost" => Ok(OpportunityStatus::Lost),
            "abandoned" => Ok(OpportunityStatus::Abandoned),
            _ => Err(ClientError::Domain(DomainError::InvalidInput(format!(
                "Unknown opportunity status '{}'.",
                value.trim()
            )))),
        }
    }
}

/// Decode an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An opportunity as returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pipeline_id: String,

    #[serde(default)]
    pub pipeline_stage_id: Option<String>,

    #[serde(default)]
    pub contact_id: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OpportunityStatus,

    #[serde(default)]
    pub monetary_value: Option<f64>,

    #[serde(default)]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PipelineStage {
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Pipeline {
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub stages: Vec<PipelineStage>,
}

impl Pipeline {
    /// Look up one of this pipeline's stages.
    pub fn stage(&self, stage_id: &str) -> Option<&PipelineStage> {
        self.stages.iter().find(|stage| stage.id == stage_id)
    }
}

/// A user of the location, used as an opportunity owner.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// Fields sent when creating or updating an opportunity. Unset fields are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_stage_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OpportunityStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monetary_value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl OpportunityInput {
    /// Build the payload for a new opportunity from submitted form fields.
    ///
    /// Name, pipeline, contact and status are always sent (status defaults to open); stage,
    /// value and owner only when filled in.
    pub fn for_create(form: &HashMap<String, String>) -> Result<OpportunityInput, ClientError> {
        let required = |key: &str| Some(trimmed(form, key).unwrap_or_default());
        let status = match trimmed(form, "status") {
            Some(status) => status.parse()?,
            None => OpportunityStatus::Open,
        };

        Ok(OpportunityInput {
            name: required("name"),
            pipeline_id: required("pipelineId"),
            contact_id: required("contactId"),
            status: Some(status),
            pipeline_stage_id: trimmed(form, "pipelineStageId"),
            monetary_value: monetary_value(form),
            assigned_to: trimmed(form, "assignedTo"),
        })
    }

    /// Build the payload for an update from submitted form fields. Empty fields are skipped.
    pub fn for_update(form: &HashMap<String, String>) -> Result<OpportunityInput, ClientError> {
        let status = match trimmed(form, "status") {
            Some(status) => Some(status.parse()?),
            None => None,
        };

        Ok(OpportunityInput {
            name: trimmed(form, "name"),
            pipeline_id: trimmed(form, "pipelineId"),
            pipeline_stage_id: trimmed(form, "pipelineStageId"),
            contact_id: None,
            status,
            monetary_value: monetary_value(form),
            assigned_to: trimmed(form, "assignedTo"),
        })
    }
}

/// Parse `monetaryValue` as a number; anything unparsable is dropped.
fn monetary_value(form: &HashMap<String, String>) -> Option<f64> {
    let value = trimmed(form, "monetaryValue")?;

    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Some(amount),
        _ => {
            tracing::debug!(value = %value, "Ignoring unparsable monetary value");
            None
        }
    }
}
