use common::models::LeadSubmission;
use common::responses::SubmitLeadResponse;
use tracing::error;
use validator::Validate;

use crate::options::OTHER_CITY;
use crate::schema::{error_messages, LeadDraft};

/// Where the UI navigates after a successful submission.
pub const CONFIRMATION_PATH: &str = "/thank-you";

const ERR_SUBMIT_REJECTED: &str = "Something went wrong.";
const ERR_SUBMIT_FAILED: &str = "Failed to submit. Try again.";

/// The form controller: draft state, the "Other" city switch, and the
/// single-in-flight submission.
#[derive(Debug, Default)]
pub struct LeadForm {
    pub draft: LeadDraft,
    custom_city: String,
    other_city: bool,
    submitting: bool,
    submit_error: Option<String>,
}

/// How the UI should branch after `submit`.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Accepted; navigate to the confirmation view.
    Redirect(String),
    /// Local validation failed; nothing was transmitted.
    Invalid(Vec<String>),
    /// The endpoint rejected the submission or the transport failed.
    /// The inline message is in `submit_error` and the entered data
    /// stays in place for correction.
    Error,
}

impl LeadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a city from the option list. Choosing the "Other" sentinel
    /// switches the city to whatever free text has been entered; the
    /// sentinel itself is never transmitted.
    pub fn select_city(&mut self, choice: &str) {
        self.other_city = choice == OTHER_CITY;
        self.draft.city = if self.other_city {
            self.custom_city.clone()
        } else {
            choice.to_string()
        };
    }

    /// Free-text city entry, active while "Other" is selected.
    pub fn set_custom_city(&mut self, text: &str) {
        self.custom_city = text.to_string();
        if self.other_city {
            self.draft.city = text.to_string();
        }
    }

    /// True while a submission is outstanding; the submit control stays
    /// disabled until this clears.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Inline error from the last failed submission, if any.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Validate the draft and, if it passes, transmit it. Validation
    /// failure sends nothing over the network. Application rejections
    /// and transport failures both land as an inline error message.
    pub async fn submit(&mut self, client: &reqwest::Client, api_url: &str) -> SubmitOutcome {
        if self.submitting {
            return SubmitOutcome::Error;
        }
        self.submit_error = None;

        if let Err(errors) = self.draft.validate() {
            return SubmitOutcome::Invalid(error_messages(&errors));
        }

        self.submitting = true;
        let result = post_lead(client, api_url, &self.draft.to_submission()).await;
        self.submitting = false;

        match result {
            Ok(response) if response.success => {
                SubmitOutcome::Redirect(CONFIRMATION_PATH.to_string())
            }
            Ok(response) => {
                error!("Submission failed: {:?}", response.error);
                self.submit_error = Some(ERR_SUBMIT_REJECTED.to_string());
                SubmitOutcome::Error
            }
            Err(e) => {
                error!("Submission transport failed: {e}");
                self.submit_error = Some(ERR_SUBMIT_FAILED.to_string());
                SubmitOutcome::Error
            }
        }
    }
}

async fn post_lead(
    client: &reqwest::Client,
    api_url: &str,
    submission: &LeadSubmission,
) -> Result<SubmitLeadResponse, reqwest::Error> {
    let response = client.post(api_url).json(submission).send().await?;
    response.json::<SubmitLeadResponse>().await
}
