use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Recorded gender of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A single family member
///
/// Only `id` and `first_name` are required. `birth_order` is the 1-based
/// position among siblings and takes precedence over `date_of_birth` when
/// children are ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Opaque unique identifier
    pub id: String,

    pub first_name: String,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub maiden_name: Option<String>,

    #[serde(default)]
    pub gender: Option<Gender>,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,

    #[serde(default)]
    pub birth_place: Option<String>,

    /// Sibling ordinal (1 = eldest)
    #[serde(default)]
    pub birth_order: Option<u32>,

    #[serde(default)]
    pub biography: Option<String>,

    /// Reference to an externally stored photo
    #[serde(default)]
    pub profile_photo_url: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Create a person with only the required fields set
    pub fn new(id: impl Into<String>, first_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: None,
            maiden_name: None,
            gender: None,
            date_of_birth: None,
            date_of_death: None,
            birth_place: None,
            birth_order: None,
            biography: None,
            profile_photo_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// First and last name joined by a space
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().filter(|l| !l.is_empty()) {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }

    /// `First (Maiden) Last`, omitting whichever parts are unset
    pub fn full_name_with_maiden(&self) -> String {
        let mut parts = vec![self.first_name.clone()];
        if let Some(maiden) = self.maiden_name.as_deref().filter(|m| !m.is_empty()) {
            parts.push(format!("({})", maiden));
        }
        if let Some(last) = self.last_name.as_deref().filter(|l| !l.is_empty()) {
            parts.push(last.to_string());
        }
        parts.join(" ")
    }

    pub fn is_living(&self) -> bool {
        self.date_of_death.is_none()
    }
}
