//! Task-set polling.
//!
//! `GET /queue/{id}/` answers with one of two shapes and no type tag: a task
//! set while the job is tracked, or the finished person once the server
//! redirects to the final resource. [`QueueResponse`] resolves the shape by
//! probing for the `is_ready` key before decoding.
//!
//! The client never waits or retries on its own. Callers poll on their own
//! schedule until [`QueueResponse::is_finished`] returns `true`.

use crate::{metadata::RequestMetadata, person::Person, task::TaskSet, Client, Error, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::LazyLock;
use uuid::Uuid;

static TASK_SET_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("task set id pattern is valid")
});

/// Key present only on task-set payloads.
const TASK_SET_MARKER: &str = "is_ready";

/// Pulls the task-set UUID out of a URL returned by the API.
///
/// # Errors
///
/// Returns [`Error::TaskSetIdNotFound`] if the URL has no UUID-shaped part.
///
/// # Examples
///
/// ```
/// use saia::queue::extract_task_set_id;
///
/// let id = extract_task_set_id(
///     "https://saia.3dlook.me/api/v2/queue/3fa85f64-5717-4562-b3fc-2c963f66afa6/",
/// )
/// .unwrap();
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
///
/// assert!(extract_task_set_id("https://saia.3dlook.me/api/v2/queue/").is_err());
/// ```
pub fn extract_task_set_id(url: &str) -> Result<Uuid> {
    TASK_SET_ID
        .find(url)
        .and_then(|found| Uuid::parse_str(found.as_str()).ok())
        .ok_or_else(|| Error::TaskSetIdNotFound {
            url: url.to_string(),
        })
}

/// What the queue endpoint returned.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueResponse {
    /// The job is still tracked. It may be running, or ready and failed.
    TaskSet(TaskSet),
    /// The job finished and the endpoint returned the measured person.
    Person(Box<Person>),
}

impl QueueResponse {
    /// Resolves an already parsed payload into one of the two shapes.
    ///
    /// A non-null `is_ready` key selects [`QueueResponse::TaskSet`]; anything
    /// else is decoded as a [`Person`].
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let is_task_set = value
            .get(TASK_SET_MARKER)
            .is_some_and(|marker| !marker.is_null());

        if is_task_set {
            serde_json::from_value(value).map(QueueResponse::TaskSet)
        } else {
            serde_json::from_value(value).map(|person| QueueResponse::Person(Box::new(person)))
        }
    }

    /// Returns `true` once there is nothing left to wait for: either the
    /// person is back or the task set is ready.
    pub fn is_finished(&self) -> bool {
        match self {
            QueueResponse::TaskSet(task_set) => task_set.is_ready,
            QueueResponse::Person(_) => true,
        }
    }

    /// Returns `true` if the job finished without success.
    pub fn is_failed(&self) -> bool {
        match self {
            QueueResponse::TaskSet(task_set) => task_set.is_failed(),
            QueueResponse::Person(_) => false,
        }
    }

    /// The task set, if the job is still tracked.
    pub fn task_set(&self) -> Option<&TaskSet> {
        match self {
            QueueResponse::TaskSet(task_set) => Some(task_set),
            QueueResponse::Person(_) => None,
        }
    }

    /// The measured person, if the job finished.
    pub fn person(&self) -> Option<&Person> {
        match self {
            QueueResponse::Person(person) => Some(person),
            QueueResponse::TaskSet(_) => None,
        }
    }

    /// Consumes the response, returning the measured person if there is one.
    pub fn into_person(self) -> Option<Person> {
        match self {
            QueueResponse::Person(person) => Some(*person),
            QueueResponse::TaskSet(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for QueueResponse {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        QueueResponse::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Queue operations, obtained from [`Client::queue`].
#[derive(Debug, Clone, Copy)]
pub struct QueueApi<'a> {
    client: &'a Client,
}

impl<'a> QueueApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Polls a task set once.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use saia::{Client, QueueResponse};
    /// use std::time::Duration;
    ///
    /// # async fn example(task_set_id: uuid::Uuid) -> Result<(), saia::Error> {
    /// let client = Client::new("my-api-key")?;
    ///
    /// let finished = loop {
    ///     let response = client.queue().get(task_set_id).await?;
    ///     if response.is_finished() {
    ///         break response;
    ///     }
    ///     tokio::time::sleep(Duration::from_secs(3)).await;
    /// };
    ///
    /// match finished {
    ///     QueueResponse::Person(person) => println!("{:?}", person.volume_params),
    ///     QueueResponse::TaskSet(task_set) => println!("failed: {:?}", task_set.error_codes()),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, task_set_id: Uuid) -> Result<QueueResponse> {
        let metadata = RequestMetadata::get(format!("/queue/{task_set_id}/"));
        let response: QueueResponse = self.client.call::<(), _>(metadata, None).await?;

        match &response {
            QueueResponse::TaskSet(task_set) => tracing::debug!(
                %task_set_id,
                is_ready = task_set.is_ready,
                is_successful = task_set.is_successful,
                "Task set polled"
            ),
            QueueResponse::Person(person) => tracing::debug!(
                %task_set_id,
                person_id = person.id,
                "Task set resolved to person"
            ),
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn is_ready_selects_task_set() {
        let response = QueueResponse::from_value(json!({
            "is_ready": false,
            "is_successful": false,
            "sub_tasks": [{"name": "front_skeleton_processing", "status": "PENDING", "task_id": "t", "message": ""}]
        }))
        .unwrap();

        assert!(matches!(response, QueueResponse::TaskSet(_)));
        assert!(!response.is_finished());
        assert!(!response.is_failed());
        assert!(response.person().is_none());
    }

    #[test]
    fn missing_is_ready_selects_person() {
        let response = QueueResponse::from_value(json!({
            "id": 1021366,
            "gender": "male",
            "volume_params": {"chest": 99.1}
        }))
        .unwrap();

        assert!(response.is_finished());
        assert!(!response.is_failed());
        assert!(response.task_set().is_none());
        let person = response.into_person().unwrap();
        assert_eq!(person.id, 1021366);
    }

    #[test]
    fn person_with_embedded_task_set_is_still_a_person() {
        let response = QueueResponse::from_value(json!({
            "id": 9,
            "task_set": {"is_ready": true, "is_successful": true, "sub_tasks": []}
        }))
        .unwrap();

        let person = response.person().unwrap();
        assert!(person.task_set.as_ref().unwrap().is_succeeded());
    }

    #[test]
    fn null_is_ready_is_treated_as_absent() {
        let response = QueueResponse::from_value(json!({"id": 4, "is_ready": null})).unwrap();
        assert!(matches!(response, QueueResponse::Person(_)));
    }

    #[test]
    fn ready_and_unsuccessful_is_failed() {
        let response: QueueResponse = serde_json::from_str(
            r#"{"is_ready": true, "is_successful": false, "sub_tasks": []}"#,
        )
        .unwrap();
        assert!(response.is_finished());
        assert!(response.is_failed());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(serde_json::from_str::<QueueResponse>("[1, 2]").is_err());
        assert!(serde_json::from_str::<QueueResponse>("{").is_err());
    }

    #[test]
    fn extracts_first_uuid() {
        let id = extract_task_set_id(
            "https://saia.3dlook.me/api/v2/queue/3fa85f64-5717-4562-b3fc-2c963f66afa6/",
        )
        .unwrap();
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn url_without_uuid_is_an_error() {
        for url in ["", "https://saia.3dlook.me/api/v2/queue/", "/queue/not-a-uuid/"] {
            let err = extract_task_set_id(url).unwrap_err();
            assert!(matches!(err, Error::TaskSetIdNotFound { .. }), "{url}");
        }
    }

    #[test]
    fn unknown_gender_still_resolves_person() {
        let response: QueueResponse =
            serde_json::from_str(r#"{"id":5,"gender":"","volume_params":{"chest":90.0}}"#).unwrap();

        let person = response.into_person().unwrap();
        assert_eq!(person.id, 5);
        assert_eq!(person.gender, Some(crate::Gender::Unknown));
        assert_eq!(person.volume_params.unwrap().get("chest"), Some(90.0));
    }
}
