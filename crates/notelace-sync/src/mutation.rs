//! Optimistic mutation controller.
//!
//! Every mutation follows the same cycle: capture the previous value,
//! apply the next value to local state in one synchronous transition,
//! issue the remote call, then either confirm (adopting the server's
//! representation when one is returned) or revert to the captured value
//! exactly. A failed mutation always settles into the state observed
//! before it began.
//!
//! The controller does not serialize mutations. Two in-flight mutations
//! on the same target race and the last local write wins; the caller is
//! expected to disable the triggering control while one is in flight.
//! Independent targets are fully independent.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use notelace_client::NotebookApi;
use notelace_core::{parse_tag_draft, Error, Notebook, SessionContext};

use crate::store::NotebookStore;

/// A settled, reverted mutation: the classification plus a
/// user-displayable message.
#[derive(Debug)]
pub struct MutationFailure {
    /// Error classification (401 is distinct so callers can redirect to
    /// re-authentication).
    pub error: Error,
    /// Displayable message: fixed phrasing for session expiry and
    /// permission denial, server detail verbatim when one was provided,
    /// the operation fallback otherwise.
    pub message: String,
}

impl MutationFailure {
    fn new(error: Error, fallback: &str) -> Self {
        let message = error.user_message(fallback);
        Self { error, message }
    }

    /// Whether the caller should redirect to re-authentication.
    pub fn is_session_expired(&self) -> bool {
        self.error.is_session_expired()
    }
}

/// Tag-editor UI state owned by the caller.
///
/// The editor is closed optimistically when a tag save is applied; a
/// failed save reopens it with the previous draft so the user can retry
/// without re-typing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEditor {
    pub open: bool,
    pub draft: String,
}

impl TagEditor {
    /// Open the editor with a draft (typically the current tags joined
    /// with ", ").
    pub fn opened_with(draft: impl Into<String>) -> Self {
        Self {
            open: true,
            draft: draft.into(),
        }
    }
}

/// Applies optimistic mutations against the shared store.
pub struct MutationController<A: NotebookApi> {
    api: Arc<A>,
    store: NotebookStore,
    session: SessionContext,
}

impl<A: NotebookApi> MutationController<A> {
    pub fn new(api: Arc<A>, store: NotebookStore, session: SessionContext) -> Self {
        Self {
            api,
            store,
            session,
        }
    }

    /// Toggle the session user's like on a notebook.
    ///
    /// Optimistic: the like flips locally before the request is issued.
    /// A server-returned notebook replaces the optimistic value; an empty
    /// 2xx keeps it.
    pub async fn toggle_like(&self, notebook_id: &str) -> Result<(), MutationFailure> {
        let viewer = self.session.email().to_string();
        let previous = self.snapshot(notebook_id, "Failed to update like.")?;

        self.store.with_notebook_mut(notebook_id, |nb| {
            if let Some(pos) = nb.likes.iter().position(|e| *e == viewer) {
                nb.likes.remove(pos);
            } else {
                nb.likes.push(viewer.clone());
            }
        });

        match self.api.toggle_like(notebook_id).await {
            Ok(Some(server)) => {
                self.store.replace_notebook(notebook_id, server);
                info!(notebook_id, op = "toggle_like", "Mutation confirmed");
                Ok(())
            }
            Ok(None) => {
                info!(notebook_id, op = "toggle_like", "Mutation confirmed (optimistic value kept)");
                Ok(())
            }
            Err(error) => Err(self.revert_notebook(notebook_id, previous, error, "Failed to update like.")),
        }
    }

    /// Set a notebook's public visibility.
    pub async fn set_visibility(
        &self,
        notebook_id: &str,
        is_public: bool,
    ) -> Result<(), MutationFailure> {
        let fallback = "Failed to update visibility.";
        let previous = self.snapshot(notebook_id, fallback)?;

        self.store
            .with_notebook_mut(notebook_id, |nb| nb.is_public = is_public);

        match self.api.set_visibility(notebook_id, is_public).await {
            Ok(server) => {
                self.store.replace_notebook(notebook_id, server);
                info!(notebook_id, op = "set_visibility", is_public, "Mutation confirmed");
                Ok(())
            }
            Err(error) => Err(self.revert_notebook(notebook_id, previous, error, fallback)),
        }
    }

    /// Replace a notebook's tag set from the editor draft.
    ///
    /// The draft is normalized (trimmed, deduplicated, sorted) before the
    /// optimistic write, matching what the server will store. The editor
    /// closes optimistically; a failed save reopens it with the previous
    /// draft restored.
    pub async fn replace_tags(
        &self,
        notebook_id: &str,
        editor: &mut TagEditor,
    ) -> Result<(), MutationFailure> {
        let fallback = "Failed to update tags.";
        let previous = self.snapshot(notebook_id, fallback)?;
        let previous_draft = editor.draft.clone();
        let tags = parse_tag_draft(&editor.draft);

        self.store
            .with_notebook_mut(notebook_id, |nb| nb.tags = tags.clone());
        editor.open = false;
        editor.draft.clear();

        match self.api.replace_tags(notebook_id, &tags).await {
            Ok(server) => {
                self.store.replace_notebook(notebook_id, server);
                info!(notebook_id, op = "replace_tags", "Mutation confirmed");
                Ok(())
            }
            Err(error) => {
                editor.open = true;
                editor.draft = previous_draft;
                Err(self.revert_notebook(notebook_id, previous, error, fallback))
            }
        }
    }

    /// Edit a note's content in the open notebook.
    pub async fn edit_note(
        &self,
        notebook_id: &str,
        note_id: &str,
        content: &str,
    ) -> Result<(), MutationFailure> {
        let fallback = "Failed to save note.";
        let previous = self.store.find_note(note_id).ok_or_else(|| {
            MutationFailure::new(Error::NotFound("Note not found.".to_string()), fallback)
        })?;

        let mut updated = previous.clone();
        updated.content = content.to_string();
        self.store.replace_note(note_id, updated);

        match self.api.update_note(notebook_id, note_id, content).await {
            Ok(server) => {
                self.store.replace_note(note_id, server);
                info!(notebook_id, note_id, op = "edit_note", "Mutation confirmed");
                Ok(())
            }
            Err(error) => {
                warn!(notebook_id, note_id, op = "edit_note", error = %error, "Mutation reverted");
                self.store.replace_note(note_id, previous);
                Err(MutationFailure::new(error, fallback))
            }
        }
    }

    /// Delete a note from the open notebook.
    pub async fn delete_note(
        &self,
        notebook_id: &str,
        note_id: &str,
    ) -> Result<(), MutationFailure> {
        let fallback = "Failed to delete note.";
        let (index, removed) = self.store.remove_note(note_id).ok_or_else(|| {
            MutationFailure::new(Error::NotFound("Note not found.".to_string()), fallback)
        })?;

        match self.api.delete_note(notebook_id, note_id).await {
            Ok(()) => {
                info!(notebook_id, note_id, op = "delete_note", "Mutation confirmed");
                Ok(())
            }
            Err(error) => {
                warn!(notebook_id, note_id, op = "delete_note", error = %error, "Mutation reverted");
                self.store.restore_note_at(index, removed);
                Err(MutationFailure::new(error, fallback))
            }
        }
    }

    /// Delete a notebook from the collection.
    pub async fn delete_notebook(&self, notebook_id: &str) -> Result<(), MutationFailure> {
        let fallback = "Failed to delete notebook.";
        let removed = self.store.remove(notebook_id);
        let open = self.store.open_notebook().filter(|nb| nb.id == notebook_id);
        if removed.is_none() && open.is_none() {
            return Err(MutationFailure::new(
                Error::NotFound("Notebook not found.".to_string()),
                fallback,
            ));
        }
        if open.is_some() {
            self.store.clear_open();
        }

        match self.api.delete_notebook(notebook_id).await {
            Ok(()) => {
                info!(notebook_id, op = "delete_notebook", "Mutation confirmed");
                Ok(())
            }
            Err(error) => {
                warn!(notebook_id, op = "delete_notebook", error = %error, "Mutation reverted");
                if let Some((index, notebook)) = removed {
                    self.store.restore_at(index, notebook);
                }
                if let Some(notebook) = open {
                    self.store.set_open(notebook);
                }
                Err(MutationFailure::new(error, fallback))
            }
        }
    }

    /// Create a notebook.
    ///
    /// A client-local placeholder entry appears immediately and is
    /// replaced by the server representation on success, or removed on
    /// failure.
    pub async fn create_notebook(&self, name: &str) -> Result<Notebook, MutationFailure> {
        let fallback = "Failed to create notebook.";
        let pending_id = self.store.next_pending_id();
        let placeholder = Notebook {
            id: pending_id.clone(),
            name: name.to_string(),
            owner_email: self.session.email().to_string(),
            created_at: Utc::now(),
            notes: vec![],
            access_list: vec![],
            is_public: false,
            tags: vec![],
            likes: vec![],
        };
        self.store.insert(placeholder);

        match self.api.create_notebook(name).await {
            Ok(server) => {
                self.store.replace_notebook(&pending_id, server.clone());
                info!(notebook_id = %server.id, op = "create_notebook", "Mutation confirmed");
                Ok(server)
            }
            Err(error) => {
                warn!(op = "create_notebook", error = %error, "Mutation reverted");
                self.store.remove(&pending_id);
                Err(MutationFailure::new(error, fallback))
            }
        }
    }

    // ── helpers ────────────────────────────────────────────────────────

    /// Capture the previous value of a notebook for an exact revert.
    fn snapshot(&self, notebook_id: &str, fallback: &str) -> Result<Notebook, MutationFailure> {
        self.store
            .find(notebook_id)
            .or_else(|| {
                self.store
                    .open_notebook()
                    .filter(|nb| nb.id == notebook_id)
            })
            .ok_or_else(|| {
                MutationFailure::new(Error::NotFound("Notebook not found.".to_string()), fallback)
            })
    }

    /// Restore the captured previous value and build the failure.
    fn revert_notebook(
        &self,
        notebook_id: &str,
        previous: Notebook,
        error: Error,
        fallback: &str,
    ) -> MutationFailure {
        warn!(notebook_id, error = %error, "Mutation reverted");
        self.store.replace_notebook(notebook_id, previous);
        MutationFailure::new(error, fallback)
    }
}
