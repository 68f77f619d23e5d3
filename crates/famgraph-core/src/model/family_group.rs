use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named grouping of persons (a branch or household)
///
/// Carried through export documents untouched; the engine never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
