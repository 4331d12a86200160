use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use super::profile::{Age, Gender, MaritalStatus, ProfileId};

/// Value recorded for optional inquiry fields left blank.
pub const NOT_AVAILABLE: &str = "N/A";

/// Country recorded when the visitor leaves it blank.
pub const DEFAULT_COUNTRY: &str = "Pakistan";

/// Stable inquiry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InquiryId(String);

impl InquiryId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InquiryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Religion {
    #[default]
    Islam,
    Christianity,
    Hinduism,
}

impl Religion {
    pub const ALL: [Self; 3] = [Self::Islam, Self::Christianity, Self::Hinduism];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Islam => "Islam",
            Self::Christianity => "Christianity",
            Self::Hinduism => "Hinduism",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sect {
    #[default]
    Sunni,
    Shia,
    Other,
}

impl Sect {
    pub const ALL: [Self; 3] = [Self::Sunni, Self::Shia, Self::Other];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunni => "Sunni",
            Self::Shia => "Shia",
            Self::Other => "Other",
        }
    }
}

/// A visitor's request about a listing, describing the match they want.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    /// Empty for records written before ids existed.
    #[serde(default, skip_serializing_if = "InquiryId::is_empty")]
    pub id: InquiryId,
    pub profile_id: ProfileId,
    pub marital_status: MaritalStatus,
    pub gender: Gender,
    #[serde(default = "not_available")]
    pub caste: String,
    #[serde(default = "not_available")]
    pub profession: String,
    #[serde(default = "not_available")]
    pub qualification: String,
    #[serde(default)]
    pub age_from: Age,
    #[serde(default)]
    pub age_to: Age,
    #[serde(default)]
    pub religion: Religion,
    #[serde(default)]
    pub sect: Sect,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "not_available")]
    pub city: String,
    #[serde(default)]
    pub date: String,
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

/// Reads a selector whose untouched placeholder option posts `""`.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => {
            let value = IntoDeserializer::<D::Error>::into_deserializer(value.trim().to_string());
            T::deserialize(value).map(Some)
        }
        _ => Ok(None),
    }
}

/// Fields posted by the public inquiry form, as JSON or url-encoded.
/// Selectors that were never touched arrive as `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<Gender>,
    pub caste: Option<String>,
    pub age_from: Option<Age>,
    pub age_to: Option<Age>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub religion: Option<Religion>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sect: Option<Sect>,
    pub profession: Option<String>,
    pub qualification: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl InquiryForm {
    /// Names of required fields that are missing or blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.marital_status.is_none() {
            missing.push("maritalStatus");
        }
        if self.gender.is_none() {
            missing.push("gender");
        }
        if self.age_from.as_ref().is_none_or(Age::is_blank) {
            missing.push("ageFrom");
        }
        if self.age_to.as_ref().is_none_or(Age::is_blank) {
            missing.push("ageTo");
        }
        missing
    }

    /// Builds the stored record. Callers check [`Self::missing_fields`] first;
    /// a missing required selector falls back to its first option.
    #[must_use]
    pub fn into_inquiry(
        self,
        id: InquiryId,
        profile_id: ProfileId,
        default_country: &str,
        date: String,
    ) -> Inquiry {
        Inquiry {
            id,
            profile_id,
            marital_status: self.marital_status.unwrap_or_default(),
            gender: self.gender.unwrap_or_default(),
            caste: or_not_available(self.caste),
            profession: or_not_available(self.profession),
            qualification: or_not_available(self.qualification),
            age_from: self.age_from.unwrap_or_default(),
            age_to: self.age_to.unwrap_or_default(),
            religion: self.religion.unwrap_or_default(),
            sect: self.sect.unwrap_or_default(),
            country: self
                .country
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| default_country.to_string()),
            city: or_not_available(self.city),
            date,
        }
    }
}

fn or_not_available(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => not_available(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_only() -> InquiryForm {
        InquiryForm {
            marital_status: Some(MaritalStatus::Single),
            gender: Some(Gender::Female),
            age_from: Some(Age::Text("24".to_string())),
            age_to: Some(Age::Text("30".to_string())),
            caste: Some(String::new()),
            ..InquiryForm::default()
        }
    }

    #[test]
    fn test_blank_optionals_become_not_available() {
        let inquiry = required_only().into_inquiry(
            InquiryId::new("a"),
            ProfileId::from("SMB-917"),
            "Pakistan",
            "1/2/2026, 3:04:05 PM".to_string(),
        );

        assert_eq!(inquiry.caste, NOT_AVAILABLE);
        assert_eq!(inquiry.profession, NOT_AVAILABLE);
        assert_eq!(inquiry.qualification, NOT_AVAILABLE);
        assert_eq!(inquiry.city, NOT_AVAILABLE);
        assert_eq!(inquiry.religion, Religion::Islam);
        assert_eq!(inquiry.sect, Sect::Sunni);
        assert_eq!(inquiry.country, "Pakistan");
    }

    #[test]
    fn test_missing_required_fields() {
        let form = InquiryForm {
            gender: Some(Gender::Male),
            age_to: Some(Age::Text(" ".to_string())),
            ..InquiryForm::default()
        };
        assert_eq!(
            form.missing_fields(),
            vec!["maritalStatus", "ageFrom", "ageTo"]
        );
        assert!(required_only().missing_fields().is_empty());
    }

    #[test]
    fn test_camel_case_wire_names() {
        let inquiry = required_only().into_inquiry(
            InquiryId::new("b"),
            ProfileId::from("SMB-825"),
            "Pakistan",
            String::new(),
        );
        let json = serde_json::to_value(&inquiry).unwrap();
        assert_eq!(json["profileId"], "SMB-825");
        assert_eq!(json["maritalStatus"], "Single");
        assert_eq!(json["ageFrom"], "24");
    }

    #[test]
    fn test_blank_selectors_count_as_missing() {
        let form: InquiryForm = serde_json::from_str(
            r#"{"maritalStatus":"","gender":"Male","ageFrom":"25","ageTo":"30","religion":"","sect":null}"#,
        )
        .unwrap();

        assert_eq!(form.marital_status, None);
        assert_eq!(form.gender, Some(Gender::Male));
        assert_eq!(form.religion, None);
        assert_eq!(form.sect, None);
        assert_eq!(form.missing_fields(), vec!["maritalStatus"]);

        assert!(serde_json::from_str::<InquiryForm>(r#"{"gender":"Robot"}"#).is_err());
    }

    #[test]
    fn test_stored_record_without_country_gets_default() {
        let json = r#"{"profileId":"SMB-59","maritalStatus":"Single","gender":"Female","ageFrom":"20","ageTo":"28"}"#;
        let inquiry: Inquiry = serde_json::from_str(json).unwrap();
        assert_eq!(inquiry.country, DEFAULT_COUNTRY);
        assert_eq!(inquiry.city, NOT_AVAILABLE);
    }

    #[test]
    fn test_reads_record_without_id() {
        let json = r#"{"profileId":"SMB-59","maritalStatus":"Widow","gender":"Male","caste":"N/A","ageFrom":"30","ageTo":"45","religion":"Islam","sect":"Shia","profession":"N/A","qualification":"N/A","country":"Pakistan","city":"N/A","date":"1/1/2026, 9:00:00 AM"}"#;
        let inquiry: Inquiry = serde_json::from_str(json).unwrap();
        assert!(inquiry.id.is_empty());
        assert_eq!(inquiry.sect, Sect::Shia);
        assert!(!serde_json::to_string(&inquiry).unwrap().contains("\"id\""));
    }
}
