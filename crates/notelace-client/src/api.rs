//! The `NotebookApi` trait: every remote operation the engine performs.

use async_trait::async_trait;
use notelace_core::{
    ExtractResponse, Note, Notebook, Permission, QuizPayload, Result, SummarizeResponse,
};

/// Remote API consumed by the notelace engine.
///
/// The engine treats the server as an opaque collaborator: implementations
/// classify failures into the core error taxonomy and return fully-parsed
/// payloads. All methods are single requests; none retry.
#[async_trait]
pub trait NotebookApi: Send + Sync {
    /// `GET /notebooks` — notebooks owned by the session user.
    async fn list_notebooks(&self) -> Result<Vec<Notebook>>;

    /// `GET /notebooks/shared` — notebooks shared with the session user.
    async fn list_shared_notebooks(&self) -> Result<Vec<Notebook>>;

    /// `GET /notebooks/public/search?query=` — public notebooks. An empty
    /// query returns the unfiltered public collection.
    async fn search_public_notebooks(&self, query: &str) -> Result<Vec<Notebook>>;

    /// `GET /notebooks/{id}` — one notebook with embedded notes and
    /// access list.
    async fn get_notebook(&self, notebook_id: &str) -> Result<Notebook>;

    /// `POST /notebooks` — create a notebook.
    async fn create_notebook(&self, name: &str) -> Result<Notebook>;

    /// `DELETE /notebooks/{id}`.
    async fn delete_notebook(&self, notebook_id: &str) -> Result<()>;

    /// `PATCH /notebooks/{id}/visibility` — returns the updated notebook.
    async fn set_visibility(&self, notebook_id: &str, is_public: bool) -> Result<Notebook>;

    /// `PATCH /notebooks/{id}/tags` — returns the updated notebook.
    async fn replace_tags(&self, notebook_id: &str, tags: &[String]) -> Result<Notebook>;

    /// `POST /notebooks/{id}/like` — toggles the session user's like.
    /// The body is optional: `None` on an empty 2xx, in which case the
    /// caller keeps its optimistic value.
    async fn toggle_like(&self, notebook_id: &str) -> Result<Option<Notebook>>;

    /// `POST /notebooks/{id}/share` — grant a user access.
    async fn share_notebook(
        &self,
        notebook_id: &str,
        recipient_email: &str,
        permission: Permission,
    ) -> Result<()>;

    /// `POST /notebooks/{id}/notes` — persist a note.
    async fn create_note(&self, notebook_id: &str, content: &str) -> Result<Note>;

    /// `PUT /notebooks/{id}/notes/{note_id}` — returns the updated note.
    async fn update_note(&self, notebook_id: &str, note_id: &str, content: &str) -> Result<Note>;

    /// `DELETE /notebooks/{id}/notes/{note_id}`.
    async fn delete_note(&self, notebook_id: &str, note_id: &str) -> Result<()>;

    /// `POST /upload-image/` — multipart image upload, returns recognized
    /// text.
    async fn extract_text(
        &self,
        image: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<ExtractResponse>;

    /// `POST /summarize-text/` — condense raw text into study notes.
    async fn summarize_text(&self, text: &str) -> Result<SummarizeResponse>;

    /// `POST /notebooks/{id}/quiz` — generate a quiz from notebook
    /// content.
    async fn generate_quiz(&self, notebook_id: &str) -> Result<QuizPayload>;

    /// `GET /notes/dates` — sorted `YYYY-MM-DD` strings with note
    /// activity.
    async fn note_dates(&self) -> Result<Vec<String>>;

    /// `GET /notes/by-date/{date}` — notes created on the given day.
    async fn notes_by_date(&self, date: &str) -> Result<Vec<Note>>;

    /// `GET /notebooks/{id}/pdf` — opaque exported bytes; formatting is
    /// server-side.
    async fn export_pdf(&self, notebook_id: &str) -> Result<Vec<u8>>;
}
