use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;

use crate::db::{Repository, StorageError};
use crate::models::{Gender, MaritalStatus, Profile, ProfileId, Religion, Sect, sample_profiles};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Stored,
    Samples,
}

/// Profiles shown on the public landing page.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub source: CatalogSource,
    pub profiles: Vec<Profile>,
}

pub struct CatalogService {
    repo: Arc<dyn Repository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Stored profiles in storage order, or the built-in samples while none
    /// are stored.
    pub async fn featured(&self) -> Result<Catalog, StorageError> {
        let profiles = self.repo.profiles().await?;

        if profiles.is_empty() {
            return Ok(Catalog {
                source: CatalogSource::Samples,
                profiles: sample_profiles(),
            });
        }

        Ok(Catalog {
            source: CatalogSource::Stored,
            profiles,
        })
    }
}

/// Server-rendered profile cards.
#[must_use]
pub fn render_html(catalog: &Catalog) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Featured Profiles</title>\n</head>\n<body>\n\
         <main class=\"catalog\">\n<h1>Featured Profiles</h1>\n",
    );

    for profile in &catalog.profiles {
        let id = html_escape::encode_double_quoted_attribute(profile.id.as_str());
        let _ = write!(
            html,
            "<article class=\"profile-card\" data-id=\"{id}\">\n\
             <img src=\"{image}\" alt=\"{title}\">\n\
             <span class=\"profile-id\">{id_text}</span>\n\
             <h2>{title_text}</h2>\n\
             <p>{age} years, {status}, {gender}</p>\n\
             <p class=\"city\">{city}</p>\n\
             <a class=\"inquiry-link\" href=\"/catalog/{id}/inquiry\">Send Inquiry</a>\n\
             </article>\n",
            image = html_escape::encode_double_quoted_attribute(profile.image_or_placeholder()),
            title = html_escape::encode_double_quoted_attribute(&profile.title),
            id_text = html_escape::encode_text(profile.id.as_str()),
            title_text = html_escape::encode_text(&profile.title),
            age = html_escape::encode_text(&profile.age.to_string()),
            status = profile.status,
            gender = profile.gender,
            city = html_escape::encode_text(&profile.city),
        );
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn select(html: &mut String, name: &str, label: &str, options: &[&str], placeholder: bool) {
    let _ = writeln!(html, "<label>{label}\n<select name=\"{name}\">");
    if placeholder {
        html.push_str("<option value=\"\">Select</option>\n");
    }
    for option in options {
        let _ = writeln!(html, "<option value=\"{option}\">{option}</option>");
    }
    html.push_str("</select>\n</label>\n");
}

fn input(html: &mut String, name: &str, label: &str) {
    let _ = writeln!(
        html,
        "<label>{label}\n<input type=\"text\" name=\"{name}\">\n</label>"
    );
}

/// Inquiry form scoped to one profile. Required selectors start on an empty
/// placeholder option.
#[must_use]
pub fn render_inquiry_form(profile_id: &ProfileId, error: Option<&str>) -> String {
    let id_attr = html_escape::encode_double_quoted_attribute(profile_id.as_str());
    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Send Inquiry</title>\n</head>\n<body>\n\
         <main class=\"inquiry\">\n<h1>Inquiry for {id_text}</h1>\n",
        id_text = html_escape::encode_text(profile_id.as_str()),
    );

    if let Some(error) = error {
        let _ = writeln!(
            html,
            "<p class=\"error\">{}</p>",
            html_escape::encode_text(error)
        );
    }

    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/catalog/{id_attr}/inquiry\">"
    );
    let statuses = MaritalStatus::ALL.map(MaritalStatus::as_str);
    let genders = Gender::ALL.map(Gender::as_str);
    select(&mut html, "maritalStatus", "Marital Status", &statuses, true);
    select(&mut html, "gender", "Gender", &genders, true);
    input(&mut html, "ageFrom", "Age From");
    input(&mut html, "ageTo", "Age To");
    input(&mut html, "caste", "Caste");
    select(&mut html, "religion", "Religion", &Religion::ALL.map(Religion::as_str), false);
    select(&mut html, "sect", "Sect", &Sect::ALL.map(Sect::as_str), false);
    input(&mut html, "profession", "Profession");
    input(&mut html, "qualification", "Qualification");
    input(&mut html, "country", "Country");
    input(&mut html, "city", "City");
    html.push_str(
        "<button type=\"submit\">Send Inquiry</button>\n</form>\n\
         </main>\n</body>\n</html>\n",
    );
    html
}

/// Page shown once a form-posted inquiry is stored.
#[must_use]
pub fn render_submission_done(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Inquiry Sent</title>\n</head>\n<body>\n\
         <main class=\"inquiry\">\n<p class=\"success\">{}</p>\n\
         <a href=\"/\">Back to profiles</a>\n</main>\n</body>\n</html>\n",
        html_escape::encode_text(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::db::{Store, StoreRepository, keys};
    use crate::models::AdminUser;

    fn setup() -> (CatalogService, Store) {
        let store = Store::in_memory();
        let repo = Arc::new(StoreRepository::single(
            store.clone(),
            AdminUser::seed(&AdminConfig::default(), "123456".to_string()),
        ));
        (CatalogService::new(repo), store)
    }

    #[tokio::test]
    async fn test_empty_store_shows_samples() {
        let (service, _) = setup();
        let catalog = service.featured().await.unwrap();

        assert_eq!(catalog.source, CatalogSource::Samples);
        let ids: Vec<&str> = catalog.profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["SMB-917", "SMB-825", "SMB-877", "SMB-59"]);
    }

    #[tokio::test]
    async fn test_malformed_profiles_show_samples() {
        let (service, store) = setup();
        store.write_raw(keys::PROFILES, "{not json").await.unwrap();

        let catalog = service.featured().await.unwrap();
        assert_eq!(catalog.source, CatalogSource::Samples);
        assert_eq!(catalog.profiles.len(), 4);
    }

    #[tokio::test]
    async fn test_stored_profiles_replace_samples() {
        let (service, store) = setup();
        store
            .write_raw(
                keys::PROFILES,
                r#"[{"id":"SMB-404","title":"Engineer","age":"30","status":"Divorced","gender":"Male","city":"Karachi","image":""}]"#,
            )
            .await
            .unwrap();

        let catalog = service.featured().await.unwrap();
        assert_eq!(catalog.source, CatalogSource::Stored);
        assert_eq!(catalog.profiles.len(), 1);
        assert_eq!(catalog.profiles[0].title, "Engineer");
    }

    #[tokio::test]
    async fn test_html_escapes_profile_text() {
        let (service, store) = setup();
        store
            .write_raw(
                keys::PROFILES,
                r#"[{"id":"SMB-101","title":"<script>alert(1)</script>","age":29,"status":"Single","gender":"Female","city":"Multan"}]"#,
            )
            .await
            .unwrap();

        let html = render_html(&service.featured().await.unwrap());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(Profile::PLACEHOLDER_IMAGE));
        assert!(html.contains("/catalog/SMB-101/inquiry"));
    }

    #[test]
    fn test_inquiry_form_starts_on_placeholder() {
        let html = render_inquiry_form(&ProfileId::from("SMB-917"), Some("Missing <fields>"));

        assert!(html.contains("action=\"/catalog/SMB-917/inquiry\""));
        assert!(html.contains("<select name=\"maritalStatus\">\n<option value=\"\">Select</option>"));
        assert!(html.contains("<option value=\"Widow\">Widow</option>"));
        assert!(html.contains("Missing &lt;fields&gt;"));
    }
}
