//! Task sets and their sub-tasks.
//!
//! A task set is the server-side job created when a calculation starts. It
//! stays "not ready" while its sub-tasks run and becomes "ready" once they are
//! done, successfully or not. Sub-task statuses are provisional until then.

use crate::error_code::{self, SubTaskErrorCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single sub-task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    /// Queued or still running.
    #[default]
    Pending,
    /// Finished successfully.
    Success,
    /// Finished with an error; see [`SubTask::message`].
    Failure,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Name of a processing stage inside a task set.
///
/// Names the client does not know are kept verbatim in [`SubTaskName::Other`]
/// so that new stages on the server never break decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubTaskName {
    FrontSkeletonProcessing,
    SideSkeletonProcessing,
    FrontProcessing,
    SideProcessing,
    MeasurementModelProcessing,
    Other(String),
    #[default]
    Unnamed,
}

impl SubTaskName {
    /// The wire name of this stage.
    pub fn as_str(&self) -> &str {
        match self {
            SubTaskName::FrontSkeletonProcessing => "front_skeleton_processing",
            SubTaskName::SideSkeletonProcessing => "side_skeleton_processing",
            SubTaskName::FrontProcessing => "front_processing",
            SubTaskName::SideProcessing => "side_processing",
            SubTaskName::MeasurementModelProcessing => "measurement_model_processing",
            SubTaskName::Other(name) => name,
            SubTaskName::Unnamed => "",
        }
    }
}

impl From<String> for SubTaskName {
    fn from(name: String) -> Self {
        match name.as_str() {
            "front_skeleton_processing" => SubTaskName::FrontSkeletonProcessing,
            "side_skeleton_processing" => SubTaskName::SideSkeletonProcessing,
            "front_processing" => SubTaskName::FrontProcessing,
            "side_processing" => SubTaskName::SideProcessing,
            "measurement_model_processing" => SubTaskName::MeasurementModelProcessing,
            "" => SubTaskName::Unnamed,
            _ => SubTaskName::Other(name),
        }
    }
}

impl From<SubTaskName> for String {
    fn from(name: SubTaskName) -> Self {
        match name {
            SubTaskName::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SubTaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One processing stage of a task set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubTask {
    pub name: SubTaskName,
    pub status: TaskStatus,
    pub task_id: String,
    /// Free-text result message. For failed sub-tasks this describes the failure.
    pub message: String,
}

impl SubTask {
    /// Returns `true` if this sub-task finished with `FAILURE`.
    pub fn is_failed(&self) -> bool {
        self.status == TaskStatus::Failure
    }

    /// Classifies the failure message of this sub-task.
    ///
    /// Always [`SubTaskErrorCode::Unknown`] unless the sub-task has failed.
    pub fn error_code(&self) -> SubTaskErrorCode {
        error_code::classify(self.status, &self.message)
    }
}

/// An asynchronous calculation job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSet {
    /// Server id; only present when the task set is embedded in a person record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// The job has finished, successfully or not.
    pub is_ready: bool,
    /// The job has finished successfully. Only meaningful once `is_ready` is set.
    pub is_successful: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_primary: bool,
    pub sub_tasks: Vec<SubTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl TaskSet {
    /// Returns `true` once the job has finished and succeeded.
    pub fn is_succeeded(&self) -> bool {
        self.is_ready && self.is_successful
    }

    /// Returns `true` once the job has finished without success.
    ///
    /// A task set that is not ready yet is never failed, whatever its
    /// sub-task statuses currently say.
    pub fn is_failed(&self) -> bool {
        self.is_ready && !self.is_successful
    }

    /// Sub-tasks that finished with `FAILURE`.
    pub fn failed_sub_tasks(&self) -> impl Iterator<Item = &SubTask> {
        self.sub_tasks.iter().filter(|task| task.is_failed())
    }

    /// Classified errors of the failed sub-tasks, in sub-task order.
    ///
    /// Empty unless the task set [is failed](TaskSet::is_failed).
    pub fn error_codes(&self) -> Vec<SubTaskErrorCode> {
        if !self.is_failed() {
            return Vec::new();
        }
        self.failed_sub_tasks().map(SubTask::error_code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub_task(status: TaskStatus, message: &str) -> SubTask {
        SubTask {
            name: SubTaskName::FrontSkeletonProcessing,
            status,
            task_id: "task".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn decodes_task_set_from_queue_payload() {
        let json = r#"{
            "is_ready": true,
            "is_successful": false,
            "sub_tasks": [
                {"name": "front_skeleton_processing", "status": "FAILURE", "task_id": "a1", "message": "The detected object is not human"},
                {"name": "side_skeleton_processing", "status": "SUCCESS", "task_id": "b2", "message": ""},
                {"name": "brand_new_stage", "status": "STARTED", "task_id": "c3", "message": ""}
            ]
        }"#;

        let task_set: TaskSet = serde_json::from_str(json).unwrap();

        assert!(task_set.is_failed());
        assert_eq!(task_set.sub_tasks.len(), 3);
        assert_eq!(task_set.sub_tasks[0].name, SubTaskName::FrontSkeletonProcessing);
        assert_eq!(task_set.sub_tasks[1].status, TaskStatus::Success);
        assert_eq!(
            task_set.sub_tasks[2].name,
            SubTaskName::Other("brand_new_stage".to_string())
        );
        assert_eq!(task_set.sub_tasks[2].status, TaskStatus::Unknown);
        assert_eq!(
            task_set.error_codes(),
            vec![SubTaskErrorCode::ObjectIsNotHuman]
        );
    }

    #[test]
    fn pending_task_set_is_not_failed() {
        let task_set = TaskSet {
            is_ready: false,
            is_successful: false,
            sub_tasks: vec![sub_task(TaskStatus::Failure, "The body is not full")],
            ..TaskSet::default()
        };

        assert!(!task_set.is_failed());
        assert!(!task_set.is_succeeded());
        assert!(task_set.error_codes().is_empty());
        assert_eq!(task_set.failed_sub_tasks().count(), 1);
    }

    #[test]
    fn ready_and_successful_is_succeeded() {
        let task_set = TaskSet {
            is_ready: true,
            is_successful: true,
            ..TaskSet::default()
        };
        assert!(task_set.is_succeeded());
        assert!(!task_set.is_failed());
    }

    #[test]
    fn sub_task_failure_flag_follows_status() {
        assert!(sub_task(TaskStatus::Failure, "").is_failed());
        assert!(!sub_task(TaskStatus::Pending, "").is_failed());
        assert!(!sub_task(TaskStatus::Success, "").is_failed());
    }

    #[test]
    fn sub_task_name_round_trips_through_string() {
        let name: SubTaskName = "measurement_model_processing".to_string().into();
        assert_eq!(name, SubTaskName::MeasurementModelProcessing);
        assert_eq!(String::from(name), "measurement_model_processing");
        assert_eq!(SubTaskName::Other("x".to_string()).to_string(), "x");
    }
}
