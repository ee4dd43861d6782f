//! Person records and the body parameters computed for them.

use crate::task::TaskSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Gender of a measured person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[serde(other)]
    Unknown,
}

impl Gender {
    /// The wire value, as used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

/// Who took the photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoFlow {
    /// Somebody else held the phone.
    Friend,
    /// The person took the photos themselves.
    Hand,
    #[serde(other)]
    Unknown,
}

/// Phone tilt angles, in degrees, at the moment a photo was taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceCoordinate {
    #[serde(rename = "betaX")]
    pub beta_x: f64,
    #[serde(rename = "gammaY")]
    pub gamma_y: f64,
    #[serde(rename = "alphaZ")]
    pub alpha_z: f64,
}

/// Phone orientation for both photos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhonePosition {
    #[serde(rename = "frontPhoto", skip_serializing_if = "Option::is_none")]
    pub front_photo: Option<DeviceCoordinate>,
    #[serde(rename = "sidePhoto", skip_serializing_if = "Option::is_none")]
    pub side_photo: Option<DeviceCoordinate>,
}

/// A group of computed body parameters (girths, lengths, heights).
///
/// The server returns dozens of named values per group and adds new ones over
/// time, so the group is kept as the name → value map it arrives as.
/// Numeric values are in the person's measurement units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyParams(pub Map<String, Value>);

impl BodyParams {
    /// Numeric value of the named parameter, e.g. `"waist"` or `"inseam"`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name)?.as_f64()
    }

    /// Raw value of the named parameter, including nested objects like `clothes_type`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// All numeric parameters.
    pub fn numeric(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.as_f64()?)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A measured subject.
///
/// Every field is optional on the wire: a body such as `{"id": 1}` decodes to
/// a person with that id and everything else at its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub gender: Option<Gender>,
    /// Height in cm.
    #[serde(deserialize_with = "null_as_default")]
    pub height: u32,
    /// Weight in kg.
    #[serde(deserialize_with = "null_as_default")]
    pub weight: f64,
    pub created: Option<DateTime<Utc>>,
    pub phone_position: Option<PhonePosition>,
    pub photo_flow: Option<PhotoFlow>,
    pub ip_address: Option<String>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
    /// The calculation job of this person, when the server embeds it.
    pub task_set: Option<TaskSet>,
    /// Every calculation job run for this person.
    #[serde(deserialize_with = "null_as_default")]
    pub task_sets: Vec<TaskSet>,
    pub front_params: Option<BodyParams>,
    pub side_params: Option<BodyParams>,
    pub volume_params: Option<BodyParams>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_viewed: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_archived: bool,
}

impl Person {
    /// Returns `true` if any body parameter group has been computed.
    pub fn has_measurements(&self) -> bool {
        [
            self.front_params.as_ref(),
            self.side_params.as_ref(),
            self.volume_params.as_ref(),
        ]
        .into_iter()
        .flatten()
        .any(|params| !params.is_empty())
    }

    /// The primary calculation job, falling back to the embedded `task_set`.
    pub fn primary_task_set(&self) -> Option<&TaskSet> {
        self.task_sets
            .iter()
            .find(|task_set| task_set.is_primary)
            .or(self.task_set.as_ref())
    }
}

/// Decodes `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
