//! Shared notebook state.
//!
//! One store backs both the collection view (list of notebooks) and the
//! detail view (the open notebook with its notes). The store is mutated
//! only by the synchronizer and the mutation controller acting on its
//! behalf. The lock is never held across an await; transitions between
//! suspension points are atomic.

use std::sync::{Arc, Mutex};

use notelace_core::{Note, Notebook};

#[derive(Default)]
struct StoreState {
    notebooks: Vec<Notebook>,
    open: Option<Notebook>,
    pending_seq: u64,
}

/// Shared, interior-mutable notebook state.
#[derive(Clone, Default)]
pub struct NotebookStore {
    inner: Arc<Mutex<StoreState>>,
}

impl NotebookStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Collection view ────────────────────────────────────────────────

    /// Snapshot of the visible collection.
    pub fn notebooks(&self) -> Vec<Notebook> {
        self.inner.lock().unwrap().notebooks.clone()
    }

    /// Number of visible notebooks.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().notebooks.len()
    }

    /// Whether the visible collection is empty (including the deliberate
    /// cleared state while a fetch is in flight).
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().notebooks.is_empty()
    }

    /// Clear the visible collection. Called before every fetch so stale
    /// entries are never shown against a newer query.
    pub fn clear(&self) {
        self.inner.lock().unwrap().notebooks.clear();
    }

    /// Replace the entire collection with a fetch result. No merging.
    pub fn replace_all(&self, notebooks: Vec<Notebook>) {
        self.inner.lock().unwrap().notebooks = notebooks;
    }

    /// Find a notebook in the visible collection by id.
    pub fn find(&self, notebook_id: &str) -> Option<Notebook> {
        self.inner
            .lock()
            .unwrap()
            .notebooks
            .iter()
            .find(|n| n.id == notebook_id)
            .cloned()
    }

    /// Append a notebook to the visible collection.
    pub fn insert(&self, notebook: Notebook) {
        self.inner.lock().unwrap().notebooks.push(notebook);
    }

    /// Remove a notebook, returning it with its position so a revert can
    /// reinsert it exactly where it was.
    pub fn remove(&self, notebook_id: &str) -> Option<(usize, Notebook)> {
        let mut state = self.inner.lock().unwrap();
        let index = state.notebooks.iter().position(|n| n.id == notebook_id)?;
        Some((index, state.notebooks.remove(index)))
    }

    /// Reinsert a notebook at its original position.
    pub fn restore_at(&self, index: usize, notebook: Notebook) {
        let mut state = self.inner.lock().unwrap();
        let index = index.min(state.notebooks.len());
        state.notebooks.insert(index, notebook);
    }

    /// Replace a notebook everywhere it appears (collection entry and
    /// open slot) with a new representation, matched by `match_id`.
    ///
    /// `match_id` is passed separately so a server representation with a
    /// real id can replace a pending placeholder.
    pub fn replace_notebook(&self, match_id: &str, notebook: Notebook) {
        let mut state = self.inner.lock().unwrap();
        if let Some(entry) = state.notebooks.iter_mut().find(|n| n.id == match_id) {
            *entry = notebook.clone();
        }
        if state.open.as_ref().is_some_and(|n| n.id == match_id) {
            state.open = Some(notebook);
        }
    }

    /// Apply a synchronous edit to a notebook everywhere it appears.
    /// Returns false when the notebook is not present at all.
    pub fn with_notebook_mut<F>(&self, notebook_id: &str, f: F) -> bool
    where
        F: Fn(&mut Notebook),
    {
        let mut state = self.inner.lock().unwrap();
        let mut found = false;
        if let Some(entry) = state.notebooks.iter_mut().find(|n| n.id == notebook_id) {
            f(entry);
            found = true;
        }
        if let Some(open) = state.open.as_mut() {
            if open.id == notebook_id {
                f(open);
                found = true;
            }
        }
        found
    }

    // ── Detail view ────────────────────────────────────────────────────

    /// Snapshot of the open notebook, if any.
    pub fn open_notebook(&self) -> Option<Notebook> {
        self.inner.lock().unwrap().open.clone()
    }

    /// Set the open notebook (detail fetch arrived).
    pub fn set_open(&self, notebook: Notebook) {
        self.inner.lock().unwrap().open = Some(notebook);
    }

    /// Close the detail view.
    pub fn clear_open(&self) {
        self.inner.lock().unwrap().open = None;
    }

    /// Look up a note in the open notebook.
    pub fn find_note(&self, note_id: &str) -> Option<Note> {
        self.inner
            .lock()
            .unwrap()
            .open
            .as_ref()
            .and_then(|nb| nb.notes.iter().find(|n| n.id == note_id).cloned())
    }

    /// Remove a note from the open notebook, returning it with its
    /// position for exact reinsertion on revert.
    pub fn remove_note(&self, note_id: &str) -> Option<(usize, Note)> {
        let mut state = self.inner.lock().unwrap();
        let open = state.open.as_mut()?;
        let index = open.notes.iter().position(|n| n.id == note_id)?;
        Some((index, open.notes.remove(index)))
    }

    /// Reinsert a note at its original position in the open notebook.
    pub fn restore_note_at(&self, index: usize, note: Note) {
        let mut state = self.inner.lock().unwrap();
        if let Some(open) = state.open.as_mut() {
            let index = index.min(open.notes.len());
            open.notes.insert(index, note);
        }
    }

    /// Replace a note in the open notebook with a new representation.
    pub fn replace_note(&self, note_id: &str, note: Note) {
        let mut state = self.inner.lock().unwrap();
        if let Some(open) = state.open.as_mut() {
            if let Some(entry) = open.notes.iter_mut().find(|n| n.id == note_id) {
                *entry = note;
            }
        }
    }

    /// Append a note to the open notebook if it matches `notebook_id`.
    pub fn append_note(&self, notebook_id: &str, note: Note) {
        let mut state = self.inner.lock().unwrap();
        if let Some(open) = state.open.as_mut() {
            if open.id == notebook_id {
                open.notes.push(note);
            }
        }
    }

    /// Next client-local placeholder id for an optimistic create.
    pub fn next_pending_id(&self) -> String {
        let mut state = self.inner.lock().unwrap();
        state.pending_seq += 1;
        format!("pending-{}", state.pending_seq)
    }
}
