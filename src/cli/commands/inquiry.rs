use crate::models::InquiryId;
use crate::services::inquiry_service::EMPTY_INQUIRIES_MESSAGE;
use crate::state::SharedState;

pub async fn cmd_inquiry_list(state: &SharedState) -> anyhow::Result<()> {
    let inquiries = state.inquiry_service.list_inquiries().await?;

    if inquiries.is_empty() {
        println!("{EMPTY_INQUIRIES_MESSAGE}");
        return Ok(());
    }

    println!("Inquiries ({}):", inquiries.len());
    println!("{:-<70}", "");
    for inquiry in &inquiries {
        println!("• {}  [{}]  {}", inquiry.profile_id, inquiry.date, inquiry.id);
        println!(
            "  Looking for: {} {}, age {}-{}, {:?} / {:?}",
            inquiry.marital_status,
            inquiry.gender,
            inquiry.age_from,
            inquiry.age_to,
            inquiry.religion,
            inquiry.sect,
        );
        println!(
            "  Caste: {} | Profession: {} | Qualification: {}",
            inquiry.caste, inquiry.profession, inquiry.qualification
        );
        println!("  Location: {}, {}", inquiry.city, inquiry.country);
    }

    Ok(())
}

pub async fn cmd_inquiry_remove(state: &SharedState, id: &str) -> anyhow::Result<()> {
    match state.inquiry_service.delete_inquiry(&InquiryId::new(id)).await {
        Ok(removed) => println!("✓ Removed inquiry for {} ({})", removed.profile_id, removed.id),
        Err(crate::services::InquiryError::NotFound(_)) => {
            println!("Inquiry {id} not found.");
            println!("Use 'matchcrm inquiry list' to see inquiry IDs.");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
