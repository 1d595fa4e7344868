use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{failed, PageError};
use crate::models::{Assignment, AssignmentStatus};
use crate::routes::Route;
use crate::state::AppState;
use crate::utils::notifier::Toast;

pub const FETCH_FAILED: &str = "Failed to fetch assignments";
pub const STATUS_UPDATED: &str = "Assignment status updated successfully";
pub const STATUS_UPDATE_FAILED: &str = "Failed to update assignment status";
pub const DOWNLOAD_SUCCEEDED: &str = "Files downloaded successfully";
pub const DOWNLOAD_FAILED: &str = "Failed to download files";

/// Every submission on the marketplace, for administrators.
pub struct AdminDashboard {
    state: AppState,
    token: String,
    assignments: Vec<Assignment>,
    loading: bool,
}

impl AdminDashboard {
    /// Anonymous visitors are sent to the login page, other non-admins to their own dashboard.
    pub fn open(state: &AppState) -> Result<Self, PageError> {
        let session = state.session();
        if !session.is_authenticated() {
            return Err(PageError::Redirect(Route::Login));
        }
        if !session.is_admin() {
            return Err(PageError::Redirect(Route::Dashboard));
        }
        let token = state.session.require_token()?;
        Ok(AdminDashboard {
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
        let result = self.state.api.all_assignments(&self.token).await;
        self.loading = false;
        self.assignments = result.map_err(|e| failed(&self.state, e, FETCH_FAILED))?;
        debug!("Loaded {} assignments", self.assignments.len());
        Ok(&self.assignments)
    }

    /// Updates one submission's status; the local row changes only once the backend accepted it.
    pub async fn change_status(
        &mut self,
        id: &str,
        status: AssignmentStatus,
    ) -> Result<(), PageError> {
        self.state
            .api
            .update_assignment_status(&self.token, id, status)
            .await
            .map_err(|e| failed(&self.state, e, STATUS_UPDATE_FAILED))?;

        if let Some(row) = self.assignments.iter_mut().find(|a| a.id == id) {
            row.status = status;
        }
        info!(
            event_name = "assignment.status_changed",
            event_domain = "assignments",
            id,
            status = %status,
            "assignment status changed"
        );
        self.state.notifier.notify(Toast::success(STATUS_UPDATED));
        Ok(())
    }

    /// Fetches both files of a submission concurrently and writes them to
    /// `dir/assignment_<id>/`. Returns that folder.
    pub async fn download(&self, id: &str, dir: &Path) -> Result<PathBuf, PageError> {
        let result = self.download_files(id, dir).await;
        match result {
            Ok(folder) => {
                self.state.notifier.notify(Toast::success(DOWNLOAD_SUCCEEDED));
                Ok(folder)
            }
            Err(e) => Err(failed(&self.state, e, DOWNLOAD_FAILED)),
        }
    }

    async fn download_files(&self, id: &str, dir: &Path) -> Result<PathBuf, PageError> {
        let assignment = self
            .assignments
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| PageError::Validation(format!("No assignment with id '{}'", id)))?;
        let folder = folder_name(id)
            .map(|name| dir.join(name))
            .ok_or_else(|| PageError::Validation(format!("Unsafe assignment id '{}'", id)))?;

        let api = &self.state.api;
        let (assignment_bytes, answer_key_bytes) = futures::try_join!(
            api.fetch_file(&assignment.assignment_file),
            api.fetch_file(&assignment.answer_key_file),
        )?;

        tokio::fs::create_dir_all(&folder).await?;
        let files = [
            (&assignment.assignment_file, "assignment", assignment_bytes),
            (&assignment.answer_key_file, "answer_key", answer_key_bytes),
        ];
        for (remote, fallback, bytes) in files {
            let target = folder.join(file_basename(remote, fallback));
            tokio::fs::write(&target, bytes).await?;
            debug!("Wrote {}", target.display());
        }
        Ok(folder)
    }
}

/// `assignment_<id>`, or None when the id could escape the download directory.
fn folder_name(id: &str) -> Option<String> {
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return None;
    }
    Some(format!("assignment_{}", id))
}

/// Last path segment of a backend file path such as `uploads/169_essay.pdf`.
fn file_basename(remote: &str, fallback: &str) -> String {
    remote
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(fallback)
        .to_string()
}
