//! Domain service for inquiries sent from the public catalog.
//!
//! Submission from the public inquiry form, and the admin's read/delete view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::db::StorageError;
use crate::models::{Inquiry, InquiryForm, InquiryId, ProfileId};

pub const SUBMISSION_ACKNOWLEDGEMENT: &str = "Success! Your inquiry has been sent to the Admin.";

pub const EMPTY_INQUIRIES_MESSAGE: &str = "No inquiries yet.";

/// Errors specific to inquiry operations.
#[derive(Debug, Error)]
pub enum InquiryError {
    #[error("Inquiry {0} not found")]
    NotFound(InquiryId),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Domain service trait for inquiries.
#[async_trait::async_trait]
pub trait InquiryService: Send + Sync {
    /// Validates the form, stamps it and stores it ahead of older inquiries.
    ///
    /// # Errors
    ///
    /// Returns [`InquiryError::MissingFields`] and stores nothing if a
    /// required field is blank.
    async fn submit(&self, profile_id: ProfileId, form: InquiryForm)
    -> Result<Inquiry, InquiryError>;

    /// All inquiries, newest first.
    async fn list_inquiries(&self) -> Result<Vec<Inquiry>, InquiryError>;

    /// Removes one inquiry by id and returns it.
    async fn delete_inquiry(&self, id: &InquiryId) -> Result<Inquiry, InquiryError>;
}

/// Progress of one form submission as shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Done,
}

/// How long past its acknowledgement delay a submission may stay in
/// Submitting before it is treated as abandoned.
const ABANDONED_AFTER: Duration = Duration::from_secs(30);

/// Drives a form through Idle → Submitting → Done. The record is written
/// while Submitting; the acknowledgement delay only holds back the feedback.
///
/// The flow is kept per visitor between requests, so a second submit while
/// one is still being acknowledged is refused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionFlow {
    status: SubmissionStatus,
    started_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    ack_delay: Duration,
}

impl SubmissionFlow {
    #[must_use]
    pub const fn new(ack_delay: Duration) -> Self {
        Self {
            status: SubmissionStatus::Idle,
            started_at: None,
            ack_delay,
        }
    }

    /// Restores a flow saved for this visitor, using the current delay.
    #[must_use]
    pub const fn with_ack_delay(mut self, ack_delay: Duration) -> Self {
        self.ack_delay = ack_delay;
        self
    }

    #[must_use]
    pub const fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn begin(&mut self) -> Result<(), InquiryError> {
        self.begin_at(Utc::now())
    }

    fn begin_at(&mut self, now: DateTime<Utc>) -> Result<(), InquiryError> {
        if self.status == SubmissionStatus::Submitting && !self.is_abandoned(now) {
            return Err(InquiryError::AlreadySubmitting);
        }
        self.status = SubmissionStatus::Submitting;
        self.started_at = Some(now);
        Ok(())
    }

    fn is_abandoned(&self, now: DateTime<Utc>) -> bool {
        let Some(started_at) = self.started_at else {
            return true;
        };
        let limit = chrono::Duration::from_std(self.ack_delay + ABANDONED_AFTER)
            .unwrap_or(chrono::Duration::MAX);
        now.signed_duration_since(started_at) > limit
    }

    /// Waits out the acknowledgement delay, then marks the submission done.
    pub async fn acknowledge(&mut self) {
        if !self.ack_delay.is_zero() {
            tokio::time::sleep(self.ack_delay).await;
        }
        self.status = SubmissionStatus::Done;
    }

    /// Back to Idle after a failed submission.
    pub fn reset(&mut self) {
        self.status = SubmissionStatus::Idle;
        self.started_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flow_transitions() {
        let mut flow = SubmissionFlow::new(Duration::ZERO);
        assert_eq!(flow.status(), SubmissionStatus::Idle);

        flow.begin().unwrap();
        assert_eq!(flow.status(), SubmissionStatus::Submitting);
        assert!(matches!(flow.begin(), Err(InquiryError::AlreadySubmitting)));

        flow.acknowledge().await;
        assert_eq!(flow.status(), SubmissionStatus::Done);

        flow.begin().unwrap();
        flow.reset();
        assert_eq!(flow.status(), SubmissionStatus::Idle);
    }

    #[tokio::test]
    async fn test_acknowledge_waits_for_delay() {
        let mut flow = SubmissionFlow::new(Duration::from_millis(30));
        flow.begin().unwrap();

        let started = std::time::Instant::now();
        flow.acknowledge().await;
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_saved_flow_refuses_second_begin() {
        let mut flow = SubmissionFlow::new(Duration::from_secs(1));
        flow.begin().unwrap();

        let saved = serde_json::to_string(&flow).unwrap();
        let mut restored: SubmissionFlow = serde_json::from_str::<SubmissionFlow>(&saved)
            .unwrap()
            .with_ack_delay(Duration::from_secs(1));
        assert_eq!(restored.status(), SubmissionStatus::Submitting);
        assert!(matches!(restored.begin(), Err(InquiryError::AlreadySubmitting)));
    }

    #[test]
    fn test_abandoned_submission_can_begin_again() {
        let mut flow = SubmissionFlow::new(Duration::from_secs(1));
        let start = Utc::now();
        flow.begin_at(start).unwrap();

        assert!(flow.begin_at(start + chrono::Duration::seconds(5)).is_err());
        flow.begin_at(start + chrono::Duration::seconds(60)).unwrap();
        assert_eq!(flow.status(), SubmissionStatus::Submitting);
    }

    #[test]
    fn test_missing_fields_message() {
        let err = InquiryError::MissingFields(vec!["gender", "ageTo"]);
        assert_eq!(err.to_string(), "Missing required fields: gender, ageTo");
    }
}
