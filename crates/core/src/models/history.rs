use serde::{Deserialize, Serialize};

/// One entry of a patient's medical history. Every clinical field may be
/// missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub conditions: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl MedicalRecord {
    /// True when the record carries no clinical content at all.
    pub fn is_blank(&self) -> bool {
        [&self.conditions, &self.allergies, &self.notes]
            .iter()
            .all(|field| field.as_deref().is_none_or(|v| v.trim().is_empty()))
    }
}
