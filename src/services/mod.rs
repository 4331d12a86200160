pub mod catalog;
pub use catalog::{Catalog, CatalogService, CatalogSource};

pub mod image;
pub use image::ImageService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{
    AuthError, AuthService, AuthState, CredentialVerifier, verifier_for,
};
pub use auth_service_impl::DefaultAuthService;

pub mod profile_service;
pub mod profile_service_impl;
pub use profile_service::{DeleteConfirmation, ProfileError, ProfileService};
pub use profile_service_impl::DefaultProfileService;

pub mod inquiry_service;
pub mod inquiry_service_impl;
pub use inquiry_service::{InquiryError, InquiryService, SubmissionFlow, SubmissionStatus};
pub use inquiry_service_impl::DefaultInquiryService;
