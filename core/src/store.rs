//! In-memory view model for the todo list, kept in step with the server.
//!
//! # Design
//! The server is authoritative: every successful mutation replaces local
//! state with what the server returned, never with a client-side merge.
//! Failed calls leave the view exactly as it was and are logged.
//!
//! Operations take `&self` so several may be in flight at once. The view
//! lives behind a mutex that is only locked to read or to apply a settled
//! result, never across an `.await`. Each network operation remembers the
//! generation it started in; a `reset()` in the meantime makes its outcome
//! stale. A stale outcome, success or failure, is dropped without touching
//! the view and the call returns `Ok(None)`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTodo, DraftItem, TodoId, TodoItem, UpdateTodo};

/// The editing cursor. At most one item is in edit mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing { id: TodoId, draft: DraftItem },
}

impl EditState {
    pub fn id(&self) -> Option<&TodoId> {
        match self {
            EditState::Idle => None,
            EditState::Editing { id, .. } => Some(id),
        }
    }

    pub fn is_editing(&self, target: &TodoId) -> bool {
        self.id() == Some(target)
    }
}

/// Everything the rendering layer needs, captured in one consistent step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub items: Vec<TodoItem>,
    pub editing: EditState,
    pub draft_new: DraftItem,
}

impl ListState {
    pub fn editing_id(&self) -> Option<&TodoId> {
        self.editing.id()
    }

    /// The edit-in-progress input; empty when nothing is being edited.
    pub fn draft_edit(&self) -> DraftItem {
        match &self.editing {
            EditState::Idle => DraftItem::default(),
            EditState::Editing { draft, .. } => draft.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    view: ListState,
    generation: u64,
}

type Parser<R> = fn(&TodoClient, HttpResponse) -> Result<R, ApiError>;

/// Owns the todo list view and reconciles it with the remote service.
pub struct TodoListStore<T> {
    client: TodoClient,
    transport: T,
    inner: Mutex<Inner>,
}

impl TodoListStore<ReqwestTransport> {
    /// Build a store that talks to the service over HTTP.
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new()?;
        let store = Self::new(TodoClient::new(&config.base_url), transport);
        debug!(base_url = store.client.base_url(), "todo store connected");
        Ok(store)
    }
}

impl<T: Transport> TodoListStore<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn snapshot(&self) -> ListState {
        self.lock().view.clone()
    }

    pub fn items(&self) -> Vec<TodoItem> {
        self.lock().view.items.clone()
    }

    pub fn editing_id(&self) -> Option<TodoId> {
        self.lock().view.editing_id().cloned()
    }

    pub fn draft_edit(&self) -> DraftItem {
        self.lock().view.draft_edit()
    }

    pub fn draft_new(&self) -> DraftItem {
        self.lock().view.draft_new.clone()
    }

    pub fn set_draft_new(&self, draft: DraftItem) {
        self.lock().view.draft_new = draft;
    }

    /// Replace the edit input. Ignored when nothing is being edited.
    pub fn set_draft_edit(&self, new_draft: DraftItem) {
        if let EditState::Editing { draft, .. } = &mut self.lock().view.editing {
            *draft = new_draft;
        }
    }

    /// Fetch the full list and replace `items` with it.
    pub async fn load(&self) -> Result<(), ApiError> {
        let generation = self.generation();
        let request = Ok(self.client.build_list_todos());
        let fetched = self
            .send("load", generation, request, TodoClient::parse_list_todos)
            .await?;
        if let Some(items) = fetched {
            self.apply("load", generation, |view| view.items = items);
        }
        Ok(())
    }

    /// Create an item from `draft` and append the server's copy.
    ///
    /// Returns `Ok(None)` without any request when the title is blank, and
    /// when the outcome settled after a reset. On failure `draft_new` is kept
    /// so the input can be resubmitted.
    pub async fn create(&self, draft: DraftItem) -> Result<Option<TodoItem>, ApiError> {
        if draft.is_blank() {
            debug!("skipping create with blank title");
            return Ok(None);
        }
        let generation = self.generation();
        let request = self.client.build_create_todo(&CreateTodo::from(&draft));
        let Some(item) = self
            .send("create", generation, request, TodoClient::parse_create_todo)
            .await?
        else {
            return Ok(None);
        };
        let applied = self.apply("create", generation, |view| {
            view.items.push(item.clone());
            view.draft_new = DraftItem::default();
        });
        Ok(applied.then_some(item))
    }

    /// Create an item from the current new-item input.
    pub async fn submit_new(&self) -> Result<Option<TodoItem>, ApiError> {
        let draft = self.draft_new();
        self.create(draft).await
    }

    /// Send exactly `fields` for `id` and replace the local copy in place
    /// with the server's response. `Ok(None)` means the outcome settled after
    /// a reset and was dropped.
    pub async fn update(&self, id: &TodoId, fields: UpdateTodo) -> Result<Option<TodoItem>, ApiError> {
        self.send_update("update", id, &fields, false).await
    }

    pub async fn toggle_complete(&self, item: &TodoItem) -> Result<Option<TodoItem>, ApiError> {
        self.update(&item.id, UpdateTodo::completed(!item.completed)).await
    }

    /// Delete `id` remotely, then drop it locally. Deleting the item under
    /// edit closes the editing session.
    pub async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        let generation = self.generation();
        let request = Ok(self.client.build_delete_todo(id));
        let deleted = self
            .send("delete", generation, request, TodoClient::parse_delete_todo)
            .await?;
        if deleted.is_none() {
            return Ok(());
        }
        self.apply("delete", generation, |view| {
            view.items.retain(|item| &item.id != id);
            if view.editing.is_editing(id) {
                view.editing = EditState::Idle;
            }
        });
        Ok(())
    }

    /// Open an editing session for `item`, replacing any other session.
    pub fn start_edit(&self, item: &TodoItem) {
        self.lock().view.editing = EditState::Editing {
            id: item.id.clone(),
            draft: DraftItem::from_item(item),
        };
    }

    /// Persist the edit in progress.
    ///
    /// Returns `Ok(None)` without any request when nothing is being edited or
    /// the title is blank. The session closes only once the server accepts
    /// the change; a failure leaves it open for another try.
    pub async fn save_edit(&self) -> Result<Option<TodoItem>, ApiError> {
        let editing = self.lock().view.editing.clone();
        let (id, draft) = match editing {
            EditState::Editing { id, draft } if !draft.is_blank() => (id, draft),
            EditState::Editing { .. } => {
                debug!("skipping save with blank title");
                return Ok(None);
            }
            EditState::Idle => return Ok(None),
        };
        self.send_update("save_edit", &id, &UpdateTodo::from(&draft), true)
            .await
    }

    pub fn cancel_edit(&self) {
        self.lock().view.editing = EditState::Idle;
    }

    /// Drop all view state. Results of calls still in flight are discarded.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.view = ListState::default();
        inner.generation = inner.generation.wrapping_add(1);
    }

    async fn send_update(
        &self,
        operation: &'static str,
        id: &TodoId,
        fields: &UpdateTodo,
        closes_edit: bool,
    ) -> Result<Option<TodoItem>, ApiError> {
        let generation = self.generation();
        let request = self.client.build_update_todo(id, fields);
        let Some(item) = self
            .send(operation, generation, request, TodoClient::parse_update_todo)
            .await?
        else {
            return Ok(None);
        };
        let applied = self.apply(operation, generation, |view| {
            match view.items.iter_mut().find(|existing| &existing.id == id) {
                Some(slot) => *slot = item.clone(),
                None => debug!(%id, "updated item is no longer in the list"),
            }
            if closes_edit && view.editing.is_editing(id) {
                view.editing = EditState::Idle;
            }
        });
        Ok(applied.then_some(item))
    }

    /// Run one round-trip. A failure is logged and returned unless a reset
    /// happened since `generation`, in which case it becomes `Ok(None)`.
    async fn send<R>(
        &self,
        operation: &'static str,
        generation: u64,
        request: Result<HttpRequest, ApiError>,
        parse: Parser<R>,
    ) -> Result<Option<R>, ApiError> {
        match self.exchange(request, parse).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.generation() != generation => {
                debug!(operation, error = %err, "discarding failure that settled after a reset");
                Ok(None)
            }
            Err(err) => {
                error!(operation, error = %err, "todo request failed");
                Err(err)
            }
        }
    }

    async fn exchange<R>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: Parser<R>,
    ) -> Result<R, ApiError> {
        let response = self.transport.execute(request?).await?;
        parse(&self.client, response)
    }

    /// Apply `change` in one locked step. Returns false when the result is
    /// stale and was dropped.
    fn apply(&self, operation: &'static str, generation: u64, change: impl FnOnce(&mut ListState)) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(operation, "discarding result that settled after a reset");
            return false;
        }
        change(&mut inner.view);
        true
    }

    fn generation(&self) -> u64 {
        self.lock().generation
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
