use tracing::info;

use super::{enter, failed, reject, PageError};
use crate::models::{Attachment, NewAssignment};
use crate::routes::Route;
use crate::state::AppState;
use crate::utils::notifier::Toast;

pub const FILES_MISSING: &str = "Please upload both assignment and answer key files";
pub const SUBMIT_SUCCEEDED: &str = "Assignment submitted successfully!";
pub const SUBMIT_FAILED: &str = "Failed to submit assignment";

#[derive(Debug, Clone, Default)]
pub struct SubmitAssignmentForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub assignment_file: Option<Attachment>,
    pub answer_key_file: Option<Attachment>,
}

impl SubmitAssignmentForm {
    /// Checks the form without touching the network.
    fn validate(&self) -> Result<NewAssignment, String> {
        let (Some(assignment_file), Some(answer_key_file)) =
            (&self.assignment_file, &self.answer_key_file)
        else {
            return Err(FILES_MISSING.to_string());
        };
        for file in [assignment_file, answer_key_file] {
            if !file.has_accepted_extension() {
                return Err(format!(
                    "'{}' is not a PDF or Word document",
                    file.file_name
                ));
            }
        }
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err("Title and description are required".to_string());
        }
        let price = self.price.trim();
        match price.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => {}
            _ => return Err(format!("'{}' is not a valid price", price)),
        }

        Ok(NewAssignment {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price: price.to_string(),
            assignment_file: assignment_file.clone(),
            answer_key_file: answer_key_file.clone(),
        })
    }

    /// Uploads the assignment; on success the user is sent to their dashboard.
    pub async fn submit(&self, state: &AppState) -> Result<Route, PageError> {
        enter(state, Route::SubmitAssignment)?;

        let assignment = self.validate().map_err(|message| reject(state, &message))?;
        let token = state
            .session
            .require_token()
            .map_err(|e| failed(state, e, SUBMIT_FAILED))?;

        match state.api.submit_assignment(&token, &assignment).await {
            Ok(()) => {
                info!(
                    event_name = "assignment.submitted",
                    event_domain = "assignments",
                    title = %assignment.title,
                    "assignment submitted"
                );
                state.notifier.notify(Toast::success(SUBMIT_SUCCEEDED));
                Ok(Route::Dashboard)
            }
            Err(e) => {
                let message = e.user_message(SUBMIT_FAILED);
                Err(failed(state, e, &message))
            }
        }
    }
}
