//! # saia - typed client for the SAIA body-measurement API
//!
//! `saia` creates person records from photos, starts measurement
//! calculations, polls their progress and retrieves the computed body
//! parameters. It is built on `reqwest` and only ferries data: every number
//! comes from the server, and nothing is cached, retried or rate limited.
//!
//! ## Quick Start
//!
//! ```no_run
//! use saia::{Client, CreatePersonWithImagesParams, Gender, PhotoFlow, QueueResponse};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .api_key("my-api-key")
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     let handle = client
//!         .persons()
//!         .create_with_images(&CreatePersonWithImagesParams {
//!             gender: Gender::Female,
//!             height: 170,
//!             weight: 65.0,
//!             front_image: std::fs::read("front.jpg")?,
//!             side_image: std::fs::read("side.jpg")?,
//!             phone_position: None,
//!             photo_flow: Some(PhotoFlow::Hand),
//!         })
//!         .await?;
//!
//!     // Polling cadence is up to the caller.
//!     loop {
//!         match client.queue().get(handle.task_set_id).await? {
//!             QueueResponse::Person(person) => {
//!                 println!("Waist: {:?}", person.volume_params.and_then(|p| p.get("waist")));
//!                 break;
//!             }
//!             QueueResponse::TaskSet(task_set) if task_set.is_failed() => {
//!                 println!("Calculation failed: {:?}", task_set.error_codes());
//!                 break;
//!             }
//!             QueueResponse::TaskSet(_) => tokio::time::sleep(Duration::from_secs(3)).await,
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`Result`]. Non-2xx responses surface as
//! [`Error::HttpError`] with the raw body, undecodable bodies as
//! [`Error::DeserializationFailed`], and [`Error::stage`] tells which phase
//! of the call failed.
//!
//! ## Failed calculations
//!
//! Failed sub-tasks only carry a free-text message. [`SubTask::error_code`]
//! maps the known messages to a [`SubTaskErrorCode`]; see [`error_code`] for
//! the matching table and its limits.

mod client;
mod error;
pub mod error_code;
mod measurement;
mod measurement_api;
mod metadata;
mod person;
mod person_api;
pub mod queue;
mod task;

pub use client::{Client, ClientBuilder, ClientConfig, DEFAULT_API_HOST};
pub use error::{Error, Result, Stage};
pub use error_code::SubTaskErrorCode;
pub use measurement::{Measurement, MeasurementList, MeasurementStatus, MtmClient};
pub use measurement_api::{ListMeasurementsParams, MeasurementApi};
pub use person::{BodyParams, DeviceCoordinate, Gender, Person, PhonePosition, PhotoFlow};
pub use person_api::{
    CreatePersonParams, CreatePersonResponse, CreatePersonWithImagesParams, PersonApi,
    TaskSetHandle,
};
pub use queue::{QueueApi, QueueResponse};
pub use task::{SubTask, SubTaskName, TaskSet, TaskStatus};

/// Re-exported so callers can bind a cancellation token without adding the dependency.
pub use tokio_util::sync::CancellationToken;
