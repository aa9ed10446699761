use chrono;
use serde::Deserialize;
use serde::Serialize;

/// A persisted lead. Field names on the wire are camelCase to match the
/// submission payload; column names stay snake_case.
#[derive(Debug, Clone, Deserialize, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub company: Option<String>,
    pub linkedin: Option<String>,
    pub age: String,
    pub city: String,
    pub created_at: chrono::NaiveDateTime,
}

/// An incoming submission, before the store has assigned identity.
///
/// Every field defaults to empty so a payload with a field missing
/// deserializes and then fails the presence check, instead of bouncing
/// off serde with a different error body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadSubmission {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub company: Option<String>,
    pub linkedin: Option<String>,
    pub age: String,
    pub city: String,
}

impl LeadSubmission {
    /// Presence check for the required fields. Format rules are the
    /// client schema's job; the endpoint only double-checks presence.
    pub fn has_required_fields(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.phone,
            &self.email,
            &self.age,
            &self.city,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}
