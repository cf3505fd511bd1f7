//! Todo synchronization: list/create/update/delete against the remote
//! collection with a local mirror that is only ever replaced wholesale.
//!
//! Every successful mutation is followed by exactly one `refresh()`, issued
//! after the mutation's own response has been observed. Reads are neither
//! deduplicated nor cancelled: overlapping refreshes each overwrite `items`
//! when they land, so a stale response arriving last wins.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, FailureClass, UNAUTHORIZED_MESSAGE};
use crate::todo::{Todo, TodoId, normalize_todo_list};

#[async_trait(?Send)]
pub trait TodoApiTransport {
    async fn list_todos(&self, token: &str) -> Result<Value, ApiError>;
    async fn create_todo(&self, token: &str, title: &str) -> Result<(), ApiError>;
    async fn update_todo(&self, token: &str, id: &TodoId, title: &str) -> Result<(), ApiError>;
    async fn delete_todo(&self, token: &str, id: &TodoId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncError {
    Unauthorized,
}

impl SyncError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unauthorized => UNAUTHORIZED_MESSAGE,
        }
    }
}

/// What a single user action amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// A required field was empty; no request was issued.
    Skipped,
    Unauthorized,
    /// Absorbed without any visible error.
    Failed,
}

/// Transient row-edit state. Never persisted, never sent until saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditDraft {
    pub editing_id: Option<TodoId>,
    pub edit_title: String,
}

impl EditDraft {
    #[must_use]
    pub fn is_editing(&self, id: &TodoId) -> bool {
        self.editing_id.as_ref() == Some(id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoSyncState {
    pub items: Vec<Todo>,
    pub last_error: Option<SyncError>,
    pub loading: bool,
    pub draft: EditDraft,
}

impl TodoSyncState {
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.last_error.map(SyncError::message)
    }
}

/// Synchronizer bound to one bearer token. Clones share state, so a UI can
/// hand copies to independently spawned actions.
#[derive(Debug)]
pub struct TodoSync<T> {
    transport: Rc<T>,
    token: Rc<str>,
    state: Rc<RefCell<TodoSyncState>>,
}

impl<T> Clone for TodoSync<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            token: Rc::clone(&self.token),
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: TodoApiTransport> TodoSync<T> {
    /// Refuses to mount without a non-empty token.
    #[must_use]
    pub fn mount(transport: Rc<T>, token: &str) -> Option<Self> {
        if token.is_empty() {
            tracing::debug!("todo sync not mounted: no token");
            return None;
        }
        Some(Self {
            transport,
            token: Rc::from(token),
            state: Rc::new(RefCell::new(TodoSyncState::default())),
        })
    }

    #[must_use]
    pub fn state(&self) -> Ref<'_, TodoSyncState> {
        self.state.borrow()
    }

    #[must_use]
    pub fn snapshot(&self) -> TodoSyncState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn items(&self) -> Vec<Todo> {
        self.state.borrow().items.clone()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<SyncError> {
        self.state.borrow().last_error
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn draft(&self) -> EditDraft {
        self.state.borrow().draft.clone()
    }

    pub fn begin_edit(&self, todo: &Todo) {
        let mut state = self.state.borrow_mut();
        state.draft = EditDraft {
            editing_id: Some(todo.id.clone()),
            edit_title: todo.title.clone(),
        };
    }

    pub fn set_edit_title(&self, title: impl Into<String>) {
        self.state.borrow_mut().draft.edit_title = title.into();
    }

    pub fn cancel_edit(&self) {
        self.state.borrow_mut().draft = EditDraft::default();
    }

    /// Replaces the mirror with the server's list.
    ///
    /// Unauthorized leaves `items` untouched and records the error. Any other
    /// failure empties `items` without recording anything, which makes a
    /// transient outage look like an empty collection.
    pub async fn refresh(&self) -> ActionOutcome {
        self.state.borrow_mut().loading = true;
        tracing::debug!("refreshing todos");
        let result = self.transport.list_todos(&self.token).await;

        let mut state = self.state.borrow_mut();
        state.loading = false;
        match result {
            Ok(body) => {
                state.items = normalize_todo_list(&body);
                state.last_error = None;
                tracing::debug!(count = state.items.len(), "todos refreshed");
                ActionOutcome::Completed
            }
            Err(error) => match error.classify() {
                FailureClass::Unauthorized => {
                    tracing::warn!(status = ?error.status, "todo list unauthorized");
                    state.last_error = Some(SyncError::Unauthorized);
                    ActionOutcome::Unauthorized
                }
                FailureClass::Other => {
                    tracing::warn!(status = ?error.status, %error, "todo list failed; showing empty list");
                    state.items.clear();
                    ActionOutcome::Failed
                }
            },
        }
    }

    /// Creates a todo, then reloads the list. The new row is never appended
    /// locally.
    pub async fn create(&self, title: &str) -> ActionOutcome {
        if title.is_empty() {
            return ActionOutcome::Skipped;
        }
        let result = self.transport.create_todo(&self.token, title).await;
        self.after_mutation("create", result, || {}).await
    }

    pub async fn update(&self, id: &TodoId, title: &str) -> ActionOutcome {
        if title.is_empty() {
            return ActionOutcome::Skipped;
        }
        let result = self.transport.update_todo(&self.token, id, title).await;
        self.after_mutation("update", result, || self.cancel_edit())
            .await
    }

    pub async fn delete(&self, id: &TodoId) -> ActionOutcome {
        let result = self.transport.delete_todo(&self.token, id).await;
        self.after_mutation("delete", result, || {}).await
    }

    /// Commits the edit draft. Does nothing when no row is being edited.
    pub async fn save_edit(&self) -> ActionOutcome {
        let EditDraft {
            editing_id,
            edit_title,
        } = self.draft();
        let Some(id) = editing_id else {
            return ActionOutcome::Skipped;
        };
        self.update(&id, &edit_title).await
    }

    async fn after_mutation(
        &self,
        action: &'static str,
        result: Result<(), ApiError>,
        on_success: impl FnOnce(),
    ) -> ActionOutcome {
        match result {
            Ok(()) => {
                tracing::debug!(action, "todo mutation accepted");
                on_success();
                // Outcome of the follow-up read lands in state, not here.
                let _ = self.refresh().await;
                ActionOutcome::Completed
            }
            Err(error) => match error.classify() {
                FailureClass::Unauthorized => {
                    tracing::warn!(action, status = ?error.status, "todo mutation unauthorized");
                    self.state.borrow_mut().last_error = Some(SyncError::Unauthorized);
                    ActionOutcome::Unauthorized
                }
                FailureClass::Other => {
                    tracing::warn!(action, status = ?error.status, %error, "todo mutation failed");
                    ActionOutcome::Failed
                }
            },
        }
    }
}
