//! Measurement records produced by the measurement widget.

use crate::person::{null_as_default, BodyParams, Person};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Processing status of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementStatus {
    Pending,
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

impl MeasurementStatus {
    /// The wire value, as used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementStatus::Pending => "pending",
            MeasurementStatus::Success => "success",
            MeasurementStatus::Failed => "failed",
            MeasurementStatus::Unknown => "unknown",
        }
    }
}

/// The account that owns a measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MtmClient {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

/// A measurement record: the measured person plus delivery metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurement {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    pub uuid: Option<Uuid>,
    pub status: Option<MeasurementStatus>,
    pub delivery_status: Option<String>,
    pub notification_method: Value,
    #[serde(deserialize_with = "null_as_default")]
    pub calculations_count: u32,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    /// Widget session state, passed through as returned by the server.
    pub state: Value,
    pub widget_flow_status: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    pub short_link: Option<String>,
    pub phone: Value,
    pub email: Option<String>,
    pub source: Option<String>,
    pub unit: Option<String>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_viewed: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_archived: bool,
    pub person: Option<Person>,
    pub mtm_client: Option<MtmClient>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_demo_try: bool,
}

impl Measurement {
    pub fn front_params(&self) -> Option<&BodyParams> {
        self.person.as_ref()?.front_params.as_ref()
    }

    pub fn side_params(&self) -> Option<&BodyParams> {
        self.person.as_ref()?.side_params.as_ref()
    }

    pub fn volume_params(&self) -> Option<&BodyParams> {
        self.person.as_ref()?.volume_params.as_ref()
    }
}

/// One page of measurements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementList {
    /// Total number of measurements matching the query, across all pages.
    #[serde(deserialize_with = "null_as_default")]
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<Measurement>,
}

impl MeasurementList {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}
