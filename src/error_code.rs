//! Classification of failed sub-tasks.
//!
//! The API reports sub-task failures as free text only, so the codes below are
//! derived by matching that text against [`MESSAGE_RULES`]. This is a best-effort
//! translation tied to the server's current wording, not a contract: when the
//! server rewords a message the affected failures fall back to
//! [`SubTaskErrorCode::Unknown`] until the table is updated.

use crate::task::TaskStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a sub-task failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubTaskErrorCode {
    /// The pose does not match the one the photo slot expects.
    WrongPose,
    /// No human body was found in the photo.
    HumanBodyNotDetected,
    /// Something was detected, but it is not a person.
    ObjectIsNotHuman,
    /// A side photo was uploaded in the front photo slot.
    SidePhotoInFront,
    /// A front photo was uploaded in the side photo slot.
    FrontPhotoInSide,
    /// The photo orientation could not be determined.
    FailedToDetermineOrientation,
    /// The body is cut off by the edges of the photo.
    BodyNotFullyVisible,
    /// The sub-task did not fail, or its message is not recognized.
    #[default]
    Unknown,
}

impl fmt::Display for SubTaskErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SubTaskErrorCode::WrongPose => "wrong pose",
            SubTaskErrorCode::HumanBodyNotDetected => "human body not detected",
            SubTaskErrorCode::ObjectIsNotHuman => "object is not human",
            SubTaskErrorCode::SidePhotoInFront => "side photo in the front slot",
            SubTaskErrorCode::FrontPhotoInSide => "front photo in the side slot",
            SubTaskErrorCode::FailedToDetermineOrientation => "failed to determine orientation",
            SubTaskErrorCode::BodyNotFullyVisible => "body not fully visible",
            SubTaskErrorCode::Unknown => "unknown",
        };
        f.write_str(text)
    }
}

/// How a rule matches a failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageMatch {
    /// The message starts with the given text.
    Prefix(&'static str),
    /// The message is exactly the given text.
    Exact(&'static str),
}

impl MessageMatch {
    fn matches(&self, message: &str) -> bool {
        match self {
            MessageMatch::Prefix(prefix) => message.starts_with(prefix),
            MessageMatch::Exact(text) => message == *text,
        }
    }
}

/// Failure message rules, evaluated top to bottom. The first match wins.
pub const MESSAGE_RULES: &[(MessageMatch, SubTaskErrorCode)] = &[
    (
        MessageMatch::Prefix("The pose is wrong"),
        SubTaskErrorCode::WrongPose,
    ),
    (
        MessageMatch::Exact("Can not detect the human body"),
        SubTaskErrorCode::HumanBodyNotDetected,
    ),
    (
        MessageMatch::Exact("The detected object is not human"),
        SubTaskErrorCode::ObjectIsNotHuman,
    ),
    (
        MessageMatch::Exact("Side photo in the front"),
        SubTaskErrorCode::SidePhotoInFront,
    ),
    (
        MessageMatch::Exact("Front photo in the side"),
        SubTaskErrorCode::FrontPhotoInSide,
    ),
    (
        MessageMatch::Exact("Can not determine the photo orientation"),
        SubTaskErrorCode::FailedToDetermineOrientation,
    ),
    (
        MessageMatch::Exact("The body is not full"),
        SubTaskErrorCode::BodyNotFullyVisible,
    ),
];

/// Classifies a sub-task by status and message.
///
/// Only `FAILURE` sub-tasks are classified; anything else is
/// [`SubTaskErrorCode::Unknown`].
///
/// # Examples
///
/// ```
/// use saia::{error_code::classify, SubTaskErrorCode, TaskStatus};
///
/// assert_eq!(
///     classify(TaskStatus::Failure, "The pose is wrong, check your arms"),
///     SubTaskErrorCode::WrongPose
/// );
/// assert_eq!(
///     classify(TaskStatus::Success, "The pose is wrong"),
///     SubTaskErrorCode::Unknown
/// );
/// ```
pub fn classify(status: TaskStatus, message: &str) -> SubTaskErrorCode {
    if status != TaskStatus::Failure {
        return SubTaskErrorCode::Unknown;
    }

    MESSAGE_RULES
        .iter()
        .find(|(rule, _)| rule.matches(message))
        .map(|(_, code)| *code)
        .unwrap_or_default()
}
