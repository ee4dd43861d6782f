//! Person lifecycle operations: create, calculate, fetch.

use crate::{
    metadata::RequestMetadata,
    person::{null_as_default, Gender, PhonePosition, PhotoFlow, Person},
    queue::{extract_task_set_id, QueueResponse},
    Client, Result,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PERSONS_PATH: &str = "/persons/";

/// Parameters for [`PersonApi::create`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePersonParams {
    pub gender: Gender,
    /// Height in cm.
    pub height: u32,
    /// Weight in kg.
    pub weight: f64,
}

/// The person created by [`PersonApi::create`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreatePersonResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub gender: Option<Gender>,
    #[serde(deserialize_with = "null_as_default")]
    pub height: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub weight: f64,
}

/// Parameters for [`PersonApi::create_with_images`].
///
/// Images are sent inline as base64; no content checks are made client-side.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePersonWithImagesParams {
    pub gender: Gender,
    /// Height in cm.
    pub height: u32,
    /// Weight in kg.
    pub weight: f64,
    /// Encoded front photo (JPEG, PNG, ...).
    pub front_image: Vec<u8>,
    /// Encoded side photo.
    pub side_image: Vec<u8>,
    pub phone_position: Option<PhonePosition>,
    pub photo_flow: Option<PhotoFlow>,
}

impl CreatePersonWithImagesParams {
    fn to_body(&self) -> CreatePersonWithImagesBody<'_> {
        CreatePersonWithImagesBody {
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            front_image: STANDARD.encode(&self.front_image),
            side_image: STANDARD.encode(&self.side_image),
            phone_position: self.phone_position.as_ref(),
            photo_flow: self.photo_flow,
        }
    }
}

#[derive(Serialize)]
struct CreatePersonWithImagesBody<'a> {
    gender: Gender,
    height: u32,
    weight: f64,
    front_image: String,
    side_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_position: Option<&'a PhonePosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_flow: Option<PhotoFlow>,
}

#[derive(Deserialize)]
struct TaskSetUrlResponse {
    task_set_url: String,
}

/// A started calculation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSetHandle {
    /// URL of the job on the queue endpoint, as returned by the server.
    pub task_set_url: String,
    /// Id to poll with [`QueueApi::get`](crate::QueueApi::get).
    pub task_set_id: Uuid,
}

impl TaskSetHandle {
    fn from_response(response: TaskSetUrlResponse) -> Result<Self> {
        let task_set_id = extract_task_set_id(&response.task_set_url)?;
        Ok(TaskSetHandle {
            task_set_url: response.task_set_url,
            task_set_id,
        })
    }
}

/// Person operations, obtained from [`Client::persons`].
#[derive(Debug, Clone, Copy)]
pub struct PersonApi<'a> {
    client: &'a Client,
}

impl<'a> PersonApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches a person, including computed parameters once available.
    pub async fn get(&self, person_id: u64) -> Result<Person> {
        tracing::debug!(person_id, "Fetching person");
        let metadata = RequestMetadata::get(format!("{PERSONS_PATH}{person_id}/"));
        self.client.call::<(), Person>(metadata, None).await
    }

    /// Creates a person without photos.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use saia::{Client, CreatePersonParams, Gender};
    ///
    /// # async fn example() -> Result<(), saia::Error> {
    /// let client = Client::new("my-api-key")?;
    /// let person = client
    ///     .persons()
    ///     .create(&CreatePersonParams { gender: Gender::Male, height: 180, weight: 75.0 })
    ///     .await?;
    /// println!("{}", person.url);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, params: &CreatePersonParams) -> Result<CreatePersonResponse> {
        let metadata = RequestMetadata::post(PERSONS_PATH).all_measurement_types();
        let created: CreatePersonResponse = self.client.call(metadata, Some(params)).await?;
        tracing::info!(person_id = created.id, "Person created");
        Ok(created)
    }

    /// Polls the calculation job of a person once.
    ///
    /// Same request as [`QueueApi::get`](crate::QueueApi::get).
    pub async fn task_set(&self, task_set_id: Uuid) -> Result<QueueResponse> {
        self.client.queue().get(task_set_id).await
    }

    /// Creates a person from front and side photos, which starts a calculation.
    ///
    /// The returned handle identifies the calculation job to poll.
    pub async fn create_with_images(
        &self,
        params: &CreatePersonWithImagesParams,
    ) -> Result<TaskSetHandle> {
        let body = params.to_body();
        let metadata = RequestMetadata::post(PERSONS_PATH).all_measurement_types();
        let response: TaskSetUrlResponse = self.client.call(metadata, Some(&body)).await?;
        let handle = TaskSetHandle::from_response(response)?;
        tracing::info!(task_set_id = %handle.task_set_id, "Person created, calculation queued");
        Ok(handle)
    }

    /// Starts the measurement calculation for an existing person.
    pub async fn start_calculation(&self, person_id: u64) -> Result<TaskSetHandle> {
        let metadata = RequestMetadata::get(format!("{PERSONS_PATH}{person_id}/calculate/"))
            .all_measurement_types();
        let response: TaskSetUrlResponse = self.client.call::<(), _>(metadata, None).await?;
        let handle = TaskSetHandle::from_response(response)?;
        tracing::info!(person_id, task_set_id = %handle.task_set_id, "Calculation started");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::DeviceCoordinate;

    fn params() -> CreatePersonWithImagesParams {
        CreatePersonWithImagesParams {
            gender: Gender::Female,
            height: 170,
            weight: 70.1,
            front_image: b"dummy front image".to_vec(),
            side_image: b"dummy side image".to_vec(),
            phone_position: None,
            photo_flow: None,
        }
    }

    #[test]
    fn images_are_base64_encoded() {
        let body = serde_json::to_value(params().to_body()).unwrap();

        assert_eq!(body["gender"], "female");
        assert_eq!(body["height"], 170);
        assert_eq!(body["weight"], 70.1);
        assert_eq!(body["front_image"], "ZHVtbXkgZnJvbnQgaW1hZ2U=");
        assert_eq!(body["side_image"], "ZHVtbXkgc2lkZSBpbWFnZQ==");
        assert!(body.get("phone_position").is_none());
        assert!(body.get("photo_flow").is_none());
    }

    #[test]
    fn orientation_and_flow_are_included_when_set() {
        let mut params = params();
        params.photo_flow = Some(PhotoFlow::Friend);
        params.phone_position = Some(PhonePosition {
            front_photo: Some(DeviceCoordinate {
                beta_x: 90.0,
                gamma_y: 0.5,
                alpha_z: 10.0,
            }),
            side_photo: Some(DeviceCoordinate::default()),
        });

        let body = serde_json::to_value(params.to_body()).unwrap();

        assert_eq!(body["photo_flow"], "friend");
        assert_eq!(body["phone_position"]["frontPhoto"]["betaX"], 90.0);
        assert_eq!(body["phone_position"]["sidePhoto"]["alphaZ"], 0.0);
    }

    #[test]
    fn handle_requires_uuid_in_url() {
        let handle = TaskSetHandle::from_response(TaskSetUrlResponse {
            task_set_url: "https://saia.3dlook.me/api/v2/queue/3fa85f64-5717-4562-b3fc-2c963f66afa6/"
                .to_string(),
        })
        .unwrap();
        assert_eq!(
            handle.task_set_id.to_string(),
            "3fa85f64-5717-4562-b3fc-2c963f66afa6"
        );

        let err = TaskSetHandle::from_response(TaskSetUrlResponse {
            task_set_url: "https://saia.3dlook.me/api/v2/queue/".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, crate::Error::TaskSetIdNotFound { .. }));
    }

    #[test]
    fn created_person_tolerates_nulls() {
        let created: CreatePersonResponse = serde_json::from_str(
            r#"{"id": 5, "url": "u", "gender": "male", "height": null, "weight": 70.0}"#,
        )
        .unwrap();
        assert_eq!(created.id, 5);
        assert_eq!(created.height, 0);
        assert_eq!(created.weight, 70.0);

        let created: CreatePersonResponse = serde_json::from_str(
            r#"{"id": null, "url": null, "gender": null, "height": 180, "weight": null}"#,
        )
        .unwrap();
        assert_eq!(
            created,
            CreatePersonResponse {
                height: 180,
                ..CreatePersonResponse::default()
            }
        );
    }
}
