use tracing::info;

use super::admin_dashboard::FETCH_FAILED;
use super::{failed, PageError};
use crate::models::Assignment;
use crate::routes::Route;
use crate::state::AppState;

pub const DELETE_FAILED: &str = "Failed to delete assignment";

/// The logged-in user's own submissions.
pub struct UserDashboard {
    state: AppState,
    token: String,
    assignments: Vec<Assignment>,
    loading: bool,
}

impl UserDashboard {
    pub fn open(state: &AppState) -> Result<Self, PageError> {
        if !state.session().is_authenticated() {
            return Err(PageError::Redirect(Route::Login));
        }
        let token = state.session.require_token()?;
        Ok(UserDashboard {
            state: state.clone(),
            token,
            assignments: Vec::new(),
            loading: true,
        })
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn load(&mut self) -> Result<&[Assignment], PageError> {
        let result = self.state.api.my_assignments(&self.token).await;
        self.loading = false;
        self.assignments = result.map_err(|e| failed(&self.state, e, FETCH_FAILED))?;
        Ok(&self.assignments)
    }

    /// Deletes one submission and drops only that row from the list.
    pub async fn delete(&mut self, id: &str) -> Result<(), PageError> {
        self.state
            .api
            .delete_assignment(&self.token, id)
            .await
            .map_err(|e| failed(&self.state, e, DELETE_FAILED))?;
        self.assignments.retain(|a| a.id != id);
        info!(
            event_name = "assignment.deleted",
            event_domain = "assignments",
            id,
            "assignment deleted"
        );
        Ok(())
    }
}
