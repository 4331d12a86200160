pub mod admin;
pub mod inquiry;
pub mod profile;

pub use admin::{AdminInfo, AdminUser};
pub use inquiry::{Inquiry, InquiryForm, InquiryId, Religion, Sect};
pub use profile::{Age, Gender, MaritalStatus, Profile, ProfileId, ProfileInput, sample_profiles};
