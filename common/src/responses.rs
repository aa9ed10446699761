use serde::{Deserialize, Serialize};

use crate::models::Lead;

pub const ERR_METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const ERR_MISSING_FIELDS: &str = "Missing required fields";
pub const ERR_DUPLICATE_LEAD: &str = "A lead with this email or phone already exists.";
pub const ERR_SERVER: &str = "Server error. Please try again later.";

/// The stable response envelope for `POST /api/lead`.
///
/// Exactly one of `lead` / `error` is present: `lead` on success,
/// `error` on any rejection. Shared between the intake service and the
/// form client so both sides agree on the wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitLeadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<Lead>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitLeadResponse {
    pub fn created(lead: Lead) -> Self {
        SubmitLeadResponse {
            success: true,
            lead: Some(lead),
            error: None,
        }
    }

    pub fn rejected(error: &str) -> Self {
        SubmitLeadResponse {
            success: false,
            lead: None,
            error: Some(error.to_string()),
        }
    }
}
