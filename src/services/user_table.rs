//! Admin user table
//!
//! Search-filtered, paginated listing of the user directory with edit, delete and
//! create. Every successful mutation is followed by a full refetch; the table is never
//! patched locally.

use tracing::{info, warn};
use validator::Validate;

use crate::models::{NewUser, UserRecord, UserRole, UserUpdate};
use crate::services::filter::user_pipeline;
use crate::services::log_viewer::LoadState;
use crate::services::paginator::{Page, PageWindow};
use crate::services::record_source::{Credential, RecordSource};
use crate::utils::{ConsoleError, ConsoleResult};

pub const DEFAULT_USER_PAGE_SIZE: usize = 10;

/// Editable copy of a user record
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    /// New password; blank means keep the current one
    pub password: String,
}

impl EditDraft {
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            role: record.role.clone(),
            password: String::new(),
        }
    }

    /// Build the update payload; a blank password is left out
    pub fn to_update(&self) -> UserUpdate {
        let password = self.password.trim();
        UserUpdate {
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            password: (!password.is_empty()).then(|| password.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserTable {
    users: Vec<UserRecord>,
    search: String,
    window: PageWindow,
    state: LoadState,
    draft: Option<EditDraft>,
    pending_delete: Option<i64>,
}

impl Default for UserTable {
    fn default() -> Self {
        Self::new(DEFAULT_USER_PAGE_SIZE)
    }
}

impl UserTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            users: Vec::new(),
            search: String::new(),
            window: PageWindow::new(page_size),
            state: LoadState::Loading,
            draft: None,
            pending_delete: None,
        }
    }

    /// Refetch the directory; failure keeps the previous rows and marks the table failed
    pub async fn refresh<S>(&mut self, source: &S, credential: &Credential) -> &LoadState
    where
        S: RecordSource + ?Sized,
    {
        self.state = LoadState::Loading;
        match source.fetch_users(credential).await {
            Ok(users) => self.replace_users(users),
            Err(err) => {
                warn!("Failed to load users: {}", err);
                self.state = LoadState::Failed(err);
            }
        }
        &self.state
    }

    pub fn replace_users(&mut self, users: Vec<UserRecord>) {
        self.users = users;
        self.state = LoadState::Ready;
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.window.reset();
    }

    /// Matching users in fetch order
    pub fn filtered(&self) -> Vec<&UserRecord> {
        user_pipeline(&self.search).apply(&self.users)
    }

    pub fn page(&self) -> Page<&UserRecord> {
        self.window.paginate(self.filtered())
    }

    pub fn next_page(&mut self) {
        let total = self.filtered().len();
        self.window.next(total);
    }

    pub fn previous_page(&mut self) {
        let total = self.filtered().len();
        self.window.previous(total);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.window.go_to(page);
    }

    fn find(&self, id: i64) -> ConsoleResult<&UserRecord> {
        self.users
            .iter()
            .find(|user| user.id == id)
            .ok_or_else(|| ConsoleError::NotFound(format!("User {} is not in the table", id)))
    }

    /// Open an edit draft for a listed user
    pub fn open_edit(&mut self, id: i64) -> ConsoleResult<&mut EditDraft> {
        let draft = EditDraft::from_record(self.find(id)?);
        Ok(self.draft.insert(draft))
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut EditDraft> {
        self.draft.as_mut()
    }

    pub fn close_edit(&mut self) {
        self.draft = None;
    }

    /// Send the open draft; on success refetch and close it, on failure keep it open
    pub async fn submit_edit<S>(&mut self, source: &S, credential: &Credential) -> ConsoleResult<()>
    where
        S: RecordSource + ?Sized,
    {
        let draft = self
            .draft
            .as_ref()
            .ok_or_else(|| ConsoleError::Validation("No user is being edited".to_string()))?;
        let update = draft.to_update();
        update.validate()?;

        source.update_user(credential, draft.id, &update).await?;
        info!("Updated user {}", draft.id);

        self.draft = None;
        self.refresh(source, credential).await;
        Ok(())
    }

    /// Select a user for deletion; nothing is sent until confirmed
    pub fn request_delete(&mut self, id: i64) -> ConsoleResult<&UserRecord> {
        self.find(id)?;
        self.pending_delete = Some(id);
        self.find(id)
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the pending user; the selection is cleared whatever the outcome
    pub async fn confirm_delete<S>(
        &mut self,
        source: &S,
        credential: &Credential,
    ) -> ConsoleResult<()>
    where
        S: RecordSource + ?Sized,
    {
        let id = self
            .pending_delete
            .take()
            .ok_or_else(|| ConsoleError::Validation("No user selected for deletion".to_string()))?;

        source.delete_user(credential, id).await?;
        info!("Deleted user {}", id);

        self.refresh(source, credential).await;
        Ok(())
    }

    /// Create a user, then refetch
    pub async fn create_user<S>(
        &mut self,
        source: &S,
        credential: &Credential,
        user: &NewUser,
    ) -> ConsoleResult<UserRecord>
    where
        S: RecordSource + ?Sized,
    {
        user.validate()?;
        let created = source.create_user(credential, user).await?;
        info!("Created user {} ({})", created.username, created.id);

        self.refresh(source, credential).await;
        Ok(created)
    }
}
