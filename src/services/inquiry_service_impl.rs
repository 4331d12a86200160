//! [`Repository`]-backed implementation of the `InquiryService` trait.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::db::Repository;
use crate::models::{Inquiry, InquiryForm, InquiryId, ProfileId};
use crate::services::inquiry_service::{InquiryError, InquiryService};

pub struct DefaultInquiryService {
    repo: Arc<dyn Repository>,
    default_country: String,
    write_lock: Mutex<()>,
}

impl DefaultInquiryService {
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>, default_country: impl Into<String>) -> Self {
        Self {
            repo,
            default_country: default_country.into(),
            write_lock: Mutex::new(()),
        }
    }
}

/// Date and time the way the site has always shown it, e.g.
/// `3/14/2026, 9:05:07 PM`.
pub fn submission_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

#[async_trait]
impl InquiryService for DefaultInquiryService {
    async fn submit(
        &self,
        profile_id: ProfileId,
        form: InquiryForm,
    ) -> Result<Inquiry, InquiryError> {
        let missing = form.missing_fields();
        if !missing.is_empty() {
            return Err(InquiryError::MissingFields(missing));
        }

        let inquiry = form.into_inquiry(
            InquiryId::generate(),
            profile_id,
            &self.default_country,
            submission_timestamp(&Local::now()),
        );

        let _guard = self.write_lock.lock().await;
        let mut inquiries = self.repo.inquiries().await?;
        inquiries.insert(0, inquiry.clone());
        self.repo.save_inquiries(&inquiries).await?;

        info!(id = %inquiry.id, profile_id = %inquiry.profile_id, "Inquiry received");
        Ok(inquiry)
    }

    async fn list_inquiries(&self) -> Result<Vec<Inquiry>, InquiryError> {
        let _guard = self.write_lock.lock().await;
        let mut inquiries = self.repo.inquiries().await?;

        let mut backfilled = 0;
        for inquiry in inquiries.iter_mut().filter(|i| i.id.is_empty()) {
            inquiry.id = InquiryId::generate();
            backfilled += 1;
        }

        if backfilled > 0 {
            warn!(count = backfilled, "Assigned ids to stored inquiries without one");
            self.repo.save_inquiries(&inquiries).await?;
        }

        Ok(inquiries)
    }

    async fn delete_inquiry(&self, id: &InquiryId) -> Result<Inquiry, InquiryError> {
        let _guard = self.write_lock.lock().await;
        let mut inquiries = self.repo.inquiries().await?;

        let index = inquiries
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| InquiryError::NotFound(id.clone()))?;

        let removed = inquiries.remove(index);
        self.repo.save_inquiries(&inquiries).await?;

        info!(id = %removed.id, "Inquiry deleted");
        Ok(removed)
    }
}
