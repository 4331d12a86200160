use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const PROFILE_ID_PREFIX: &str = "SMB-";

const RANDOM_ID_MIN: u32 = 100;
const RANDOM_ID_MAX: u32 = 999;

/// Listing identifier, `SMB-<digits>`. Assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix, if the id follows the `SMB-<digits>` shape.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        self.0.strip_prefix(PROFILE_ID_PREFIX)?.parse().ok()
    }

    /// Draws `SMB-100..=SMB-999` until an unused id comes up. Once that space
    /// is exhausted, continues past the highest numeric suffix in use.
    pub fn generate<R: Rng>(existing: &[Profile], rng: &mut R) -> Self {
        let taken: HashSet<&str> = existing.iter().map(|p| p.id.as_str()).collect();

        let free_slots = (RANDOM_ID_MIN..=RANDOM_ID_MAX)
            .filter(|n| !taken.contains(format!("{PROFILE_ID_PREFIX}{n}").as_str()))
            .count();

        if free_slots > 0 {
            loop {
                let candidate = Self(format!(
                    "{PROFILE_ID_PREFIX}{}",
                    rng.random_range(RANDOM_ID_MIN..=RANDOM_ID_MAX)
                ));
                if !taken.contains(candidate.as_str()) {
                    return candidate;
                }
            }
        }

        let next = existing
            .iter()
            .filter_map(|p| p.id.number())
            .max()
            .unwrap_or(RANDOM_ID_MAX)
            + 1;
        Self(format!("{PROFILE_ID_PREFIX}{next}"))
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// An age as it was entered: forms submit text, seeded data holds numbers.
/// Serialized back in the same JSON shape it was read in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Age {
    Number(u32),
    Text(String),
}

impl Age {
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    #[must_use]
    pub fn years(&self) -> Option<u32> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl Default for Age {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaritalStatus {
    #[default]
    Single,
    Divorced,
    Widow,
}

impl MaritalStatus {
    pub const ALL: [Self; 3] = [Self::Single, Self::Divorced, Self::Widow];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Divorced => "Divorced",
            Self::Widow => "Widow",
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaritalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown marital status '{s}' (Single, Divorced, Widow)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown gender '{s}' (Male, Female)"))
    }
}

/// A published listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub title: String,
    pub age: Age,
    #[serde(default)]
    pub status: MaritalStatus,
    #[serde(default)]
    pub gender: Gender,
    pub city: String,
    /// Relative path for bundled images, data URI for uploads.
    #[serde(default)]
    pub image: String,
}

impl Profile {
    pub const PLACEHOLDER_IMAGE: &'static str = "/placeholder.jpg";

    #[must_use]
    pub fn image_or_placeholder(&self) -> &str {
        if self.image.is_empty() {
            Self::PLACEHOLDER_IMAGE
        } else {
            &self.image
        }
    }

    /// Profile built from the admin form. The id is supplied by the caller.
    #[must_use]
    pub fn from_input(id: ProfileId, input: ProfileInput) -> Self {
        Self {
            id,
            title: input.title,
            age: input.age,
            status: input.status,
            gender: input.gender,
            city: input.city,
            image: input.image.unwrap_or_default(),
        }
    }

    /// Overwrites every editable field, keeping the id. A missing image keeps
    /// the current one.
    pub fn apply(&mut self, input: ProfileInput) {
        self.title = input.title;
        self.age = input.age;
        self.status = input.status;
        self.gender = input.gender;
        self.city = input.city;
        if let Some(image) = input.image {
            self.image = image;
        }
    }
}

/// Admin form payload for creating or editing a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub title: String,
    pub age: Age,
    #[serde(default)]
    pub status: MaritalStatus,
    #[serde(default)]
    pub gender: Gender,
    pub city: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProfileInput {
    /// Names of required fields left blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.age.is_blank() {
            missing.push("age");
        }
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        missing
    }
}

/// Listings shown on the public catalog until an admin publishes one.
#[must_use]
pub fn sample_profiles() -> Vec<Profile> {
    let sample = |id: &str, title: &str, age: u32, gender: Gender, city: &str, image: &str| {
        Profile {
            id: ProfileId::from(id),
            title: title.to_string(),
            age: Age::Number(age),
            status: MaritalStatus::Single,
            gender,
            city: city.to_string(),
            image: image.to_string(),
        }
    };

    vec![
        sample("SMB-917", "Private Employee", 28, Gender::Male, "Lahore", "/m1.jpg"),
        sample("SMB-825", "Lawyer", 28, Gender::Female, "Lahore", "/f1.jpg"),
        sample("SMB-877", "Nurse", 32, Gender::Female, "Sialkot", "/f2.jpg"),
        sample("SMB-59", "Govt Employee", 28, Gender::Male, "Faisalabad", "/m2.jpg"),
    ]
}
