use std::sync::LazyLock;

use common::models::LeadSubmission;
use regex::Regex;
use validator::{Validate, ValidationErrors};

// Optional leading '+', then digits, spaces, dashes, or parentheses.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9\s\-()]+$").expect("phone pattern must compile"));

/// What the user has typed so far. Validated locally before anything is
/// transmitted; `company` and `linkedin` are free-form and optional.
#[derive(Debug, Clone, Default, Validate)]
pub struct LeadDraft {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(
        length(min = 10, message = "Enter valid phone"),
        regex(path = *PHONE_PATTERN, message = "Invalid number")
    )]
    pub phone: String,
    #[validate(email(message = "Enter valid email"))]
    pub email: String,
    pub company: String,
    pub linkedin: String,
    #[validate(length(min = 1, message = "Age is required"))]
    pub age: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
}

impl LeadDraft {
    /// The wire payload: blank optional fields are sent as absent.
    pub fn to_submission(&self) -> LeadSubmission {
        LeadSubmission {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            company: some_if_filled(&self.company),
            linkedin: some_if_filled(&self.linkedin),
            age: self.age.clone(),
            city: self.city.clone(),
        }
    }
}

fn some_if_filled(field: &str) -> Option<String> {
    let trimmed = field.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Flatten validator's per-field errors into displayable messages.
pub fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages
}
