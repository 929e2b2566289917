//! Collection synchronizer.
//!
//! Drives fetch-on-mount and fetch-on-query-change for the notebook
//! collections, and wires the engines together per screen: mutations go
//! through the controller, images through the pipeline, quiz payloads
//! into validated sessions.
//!
//! Fetches are clear-then-refill: the visible collection is emptied
//! before the request goes out (the brief empty state drives the
//! empty-state messaging), then replaced wholesale by the response. A
//! monotonically increasing ticket guards against out-of-order arrivals:
//! only the latest issued fetch may apply its response, so rapid query
//! changes can never leave a stale result on screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use notelace_client::NotebookApi;
use notelace_core::{
    resolve_permission, EffectivePermission, Error, Note, Notebook, Permission, Result,
    SessionContext,
};

use crate::mutation::MutationController;
use crate::pipeline::{IngestionPipeline, PipelineFailure};
use crate::quiz::QuizSession;
use crate::store::NotebookStore;

/// Which collection a fetch targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionScope {
    /// Notebooks owned by the session user.
    Owned,
    /// Notebooks shared with the session user.
    Shared,
    /// Public discovery, optionally filtered. An empty query is the
    /// unfiltered public collection.
    Public { query: String },
}

/// Outcome of one fetch cycle.
#[derive(Debug, PartialEq)]
pub enum FetchOutcome {
    /// The response was the latest and replaced the collection.
    Applied(Vec<Notebook>),
    /// A newer fetch was issued while this one was in flight; the
    /// response was dropped.
    Superseded,
}

/// Orchestrates fetch cycles over one shared store.
pub struct CollectionSynchronizer<A: NotebookApi> {
    api: Arc<A>,
    store: NotebookStore,
    session: SessionContext,
    ticket: AtomicU64,
}

impl<A: NotebookApi> CollectionSynchronizer<A> {
    pub fn new(api: Arc<A>, session: SessionContext) -> Self {
        Self {
            api,
            store: NotebookStore::new(),
            session,
            ticket: AtomicU64::new(0),
        }
    }

    /// The shared store backing this synchronizer's screens.
    pub fn store(&self) -> &NotebookStore {
        &self.store
    }

    /// The session this synchronizer operates as.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// A mutation controller bound to the same store and session.
    pub fn controller(&self) -> MutationController<A> {
        MutationController::new(self.api.clone(), self.store.clone(), self.session.clone())
    }

    /// An ingestion pipeline bound to the same transport.
    pub fn pipeline(&self) -> IngestionPipeline<A> {
        IngestionPipeline::new(self.api.clone())
    }

    // ── Collection fetches ─────────────────────────────────────────────

    /// Fetch a collection, clear-then-refill, guarded by ticket.
    ///
    /// A response (or error) belonging to a superseded fetch is dropped
    /// without touching the store or surfacing the error.
    pub async fn refresh(&self, scope: CollectionScope) -> Result<FetchOutcome> {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.clear();
        debug!(ticket, scope = ?scope, "Fetching collection");

        let result = match &scope {
            CollectionScope::Owned => self.api.list_notebooks().await,
            CollectionScope::Shared => self.api.list_shared_notebooks().await,
            CollectionScope::Public { query } => self.api.search_public_notebooks(query).await,
        };

        if self.ticket.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "Dropping superseded fetch response");
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(notebooks) => {
                info!(ticket, result_count = notebooks.len(), "Collection replaced");
                self.store.replace_all(notebooks.clone());
                Ok(FetchOutcome::Applied(notebooks))
            }
            Err(error) => Err(error),
        }
    }

    /// Public search. An empty query returns the unfiltered collection.
    pub async fn search(&self, query: &str) -> Result<FetchOutcome> {
        self.refresh(CollectionScope::Public {
            query: query.to_string(),
        })
        .await
    }

    // ── Detail view ────────────────────────────────────────────────────

    /// Open a notebook: detail fetch with embedded notes and access
    /// list, with the viewer's permission resolved on arrival.
    pub async fn open_notebook(&self, notebook_id: &str) -> Result<(Notebook, EffectivePermission)> {
        let notebook = self.api.get_notebook(notebook_id).await?;
        let permission = resolve_permission(self.session.email(), &notebook);
        debug!(notebook_id, permission = %permission, "Notebook opened");
        self.store.set_open(notebook.clone());
        Ok((notebook, permission))
    }

    /// Close the detail view.
    pub fn close_notebook(&self) {
        self.store.clear_open();
    }

    /// The viewer's permission over the currently open notebook.
    pub fn open_permission(&self) -> Option<EffectivePermission> {
        self.store
            .open_notebook()
            .map(|nb| resolve_permission(self.session.email(), &nb))
    }

    // ── Engine wiring ──────────────────────────────────────────────────

    /// Run the ingestion pipeline and append the persisted note to the
    /// open notebook.
    pub async fn ingest_image(
        &self,
        image: Vec<u8>,
        filename: &str,
        notebook_id: &str,
    ) -> std::result::Result<Note, PipelineFailure> {
        let note = self.pipeline().run(image, filename, notebook_id).await?;
        self.store.append_note(notebook_id, note.clone());
        Ok(note)
    }

    /// Fetch a quiz payload and start a validated session.
    pub async fn start_quiz(&self, notebook_id: &str) -> Result<QuizSession> {
        let payload = self.api.generate_quiz(notebook_id).await?;
        QuizSession::new(payload)
    }

    /// Grant a user access to a notebook. Non-optimistic: the access
    /// list is server-owned, so the open notebook is refetched on
    /// success.
    pub async fn share(
        &self,
        notebook_id: &str,
        recipient_email: &str,
        permission: Permission,
    ) -> Result<()> {
        self.api
            .share_notebook(notebook_id, recipient_email, permission)
            .await?;
        info!(notebook_id, recipient = recipient_email, "Notebook shared");
        if self
            .store
            .open_notebook()
            .is_some_and(|nb| nb.id == notebook_id)
        {
            let refreshed = self.api.get_notebook(notebook_id).await?;
            self.store.set_open(refreshed);
        }
        Ok(())
    }

    // ── Calendar and export passthroughs ───────────────────────────────

    /// Days with note activity, as sorted `YYYY-MM-DD` strings.
    pub async fn note_dates(&self) -> Result<Vec<String>> {
        self.api.note_dates().await
    }

    /// Notes created on one day.
    pub async fn notes_on(&self, date: &str) -> Result<Vec<Note>> {
        if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(Error::InvalidInput(format!(
                "Invalid date format: {} (expected YYYY-MM-DD)",
                date
            )));
        }
        self.api.notes_by_date(date).await
    }

    /// Exported notebook bytes; formatting is entirely server-side.
    pub async fn export_pdf(&self, notebook_id: &str) -> Result<Vec<u8>> {
        self.api.export_pdf(notebook_id).await
    }
}
