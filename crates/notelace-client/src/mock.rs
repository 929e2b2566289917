//! Mock API for deterministic engine tests.
//!
//! Behaves like a tiny in-memory server: canned notebooks, canned AI
//! responses, queued per-operation failures, and a call log for
//! assertions.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use notelace_core::{
    normalize_tags, Error, ExtractResponse, Note, Notebook, Permission, QuizPayload, QuizQuestion,
    Result, SummarizeResponse,
};

use crate::api::NotebookApi;

/// One recorded call against the mock.
#[derive(Debug, Clone)]
pub struct MockCall {
    /// Trait method name, e.g. `"create_note"`.
    pub operation: String,
    /// Primary input (id, query, or content) for assertions.
    pub input: String,
}

struct MockState {
    viewer: String,
    notebooks: Vec<Notebook>,
    extracted_text: String,
    summary: String,
    quiz: QuizPayload,
    note_dates: Vec<String>,
    pdf_bytes: Vec<u8>,
    failures: HashMap<String, VecDeque<Error>>,
    calls: Vec<MockCall>,
    next_id: u64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            viewer: "mock@example.com".to_string(),
            notebooks: Vec::new(),
            extracted_text: "mock extracted text".to_string(),
            summary: "mock summary".to_string(),
            quiz: QuizPayload {
                questions: vec![QuizQuestion {
                    question: "2+2?".to_string(),
                    options: vec!["3".to_string(), "4".to_string()],
                    correct_answer: "4".to_string(),
                }],
            },
            note_dates: Vec::new(),
            pdf_bytes: Vec::new(),
            failures: HashMap::new(),
            calls: Vec::new(),
            next_id: 1,
        }
    }
}

/// In-memory [`NotebookApi`] implementation for tests.
#[derive(Clone)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Set the email the mock treats as the session user (used by the
    /// like toggle).
    pub fn with_viewer(self, email: impl Into<String>) -> Self {
        self.state.lock().unwrap().viewer = email.into();
        self
    }

    /// Seed a notebook.
    pub fn with_notebook(self, notebook: Notebook) -> Self {
        self.state.lock().unwrap().notebooks.push(notebook);
        self
    }

    /// Set the canned extraction result.
    pub fn with_extracted_text(self, text: impl Into<String>) -> Self {
        self.state.lock().unwrap().extracted_text = text.into();
        self
    }

    /// Set the canned summary.
    pub fn with_summary(self, summary: impl Into<String>) -> Self {
        self.state.lock().unwrap().summary = summary.into();
        self
    }

    /// Set the canned quiz payload.
    pub fn with_quiz(self, quiz: QuizPayload) -> Self {
        self.state.lock().unwrap().quiz = quiz;
        self
    }

    /// Set the canned note-activity dates.
    pub fn with_note_dates(self, dates: Vec<String>) -> Self {
        self.state.lock().unwrap().note_dates = dates;
        self
    }

    /// Queue a failure for the next call to `operation`. Multiple queued
    /// failures for the same operation are consumed in order.
    pub fn fail_next(&self, operation: &str, error: Error) {
        self.state
            .lock()
            .unwrap()
            .failures
            .entry(operation.to_string())
            .or_default()
            .push_back(error);
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of calls recorded for one operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Snapshot of the mock's notebook collection.
    pub fn notebooks(&self) -> Vec<Notebook> {
        self.state.lock().unwrap().notebooks.clone()
    }

    fn enter(&self, operation: &str, input: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
        });
        if let Some(queue) = state.failures.get_mut(operation) {
            if let Some(err) = queue.pop_front() {
                return Err(err);
            }
        }
        Ok(())
    }

    fn fresh_id(state: &mut MockState, prefix: &str) -> String {
        let id = format!("{}-{}", prefix, state.next_id);
        state.next_id += 1;
        id
    }
}

#[async_trait]
impl NotebookApi for MockApi {
    async fn list_notebooks(&self) -> Result<Vec<Notebook>> {
        self.enter("list_notebooks", "")?;
        let state = self.state.lock().unwrap();
        let viewer = state.viewer.clone();
        Ok(state
            .notebooks
            .iter()
            .filter(|n| n.owner_email == viewer)
            .cloned()
            .collect())
    }

    async fn list_shared_notebooks(&self) -> Result<Vec<Notebook>> {
        self.enter("list_shared_notebooks", "")?;
        let state = self.state.lock().unwrap();
        let viewer = state.viewer.clone();
        Ok(state
            .notebooks
            .iter()
            .filter(|n| {
                n.owner_email != viewer && n.access_list.iter().any(|e| e.user_email == viewer)
            })
            .cloned()
            .collect())
    }

    async fn search_public_notebooks(&self, query: &str) -> Result<Vec<Notebook>> {
        self.enter("search_public_notebooks", query)?;
        let state = self.state.lock().unwrap();
        let needle = query.trim().to_lowercase();
        Ok(state
            .notebooks
            .iter()
            .filter(|n| n.is_public)
            .filter(|n| {
                needle.is_empty()
                    || n.name.to_lowercase().contains(&needle)
                    || n.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn get_notebook(&self, notebook_id: &str) -> Result<Notebook> {
        self.enter("get_notebook", notebook_id)?;
        let state = self.state.lock().unwrap();
        state
            .notebooks
            .iter()
            .find(|n| n.id == notebook_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Notebook not found.".to_string()))
    }

    async fn create_notebook(&self, name: &str) -> Result<Notebook> {
        self.enter("create_notebook", name)?;
        let mut state = self.state.lock().unwrap();
        let notebook = Notebook {
            id: Self::fresh_id(&mut state, "mock-nb"),
            name: name.to_string(),
            owner_email: state.viewer.clone(),
            created_at: Utc::now(),
            notes: vec![],
            access_list: vec![],
            is_public: false,
            tags: vec![],
            likes: vec![],
        };
        state.notebooks.push(notebook.clone());
        Ok(notebook)
    }

    async fn delete_notebook(&self, notebook_id: &str) -> Result<()> {
        self.enter("delete_notebook", notebook_id)?;
        let mut state = self.state.lock().unwrap();
        let before = state.notebooks.len();
        state.notebooks.retain(|n| n.id != notebook_id);
        if state.notebooks.len() == before {
            return Err(Error::NotFound("Notebook not found.".to_string()));
        }
        Ok(())
    }

    async fn set_visibility(&self, notebook_id: &str, is_public: bool) -> Result<Notebook> {
        self.enter("set_visibility", notebook_id)?;
        let mut state = self.state.lock().unwrap();
        let notebook = state
            .notebooks
            .iter_mut()
            .find(|n| n.id == notebook_id)
            .ok_or_else(|| Error::NotFound("Notebook not found.".to_string()))?;
        notebook.is_public = is_public;
        Ok(notebook.clone())
    }

    async fn replace_tags(&self, notebook_id: &str, tags: &[String]) -> Result<Notebook> {
        self.enter("replace_tags", notebook_id)?;
        let mut state = self.state.lock().unwrap();
        let notebook = state
            .notebooks
            .iter_mut()
            .find(|n| n.id == notebook_id)
            .ok_or_else(|| Error::NotFound("Notebook not found.".to_string()))?;
        notebook.tags = normalize_tags(tags);
        Ok(notebook.clone())
    }

    async fn toggle_like(&self, notebook_id: &str) -> Result<Option<Notebook>> {
        self.enter("toggle_like", notebook_id)?;
        let mut state = self.state.lock().unwrap();
        let viewer = state.viewer.clone();
        let notebook = state
            .notebooks
            .iter_mut()
            .find(|n| n.id == notebook_id)
            .ok_or_else(|| Error::NotFound("Public notebook not found.".to_string()))?;
        if let Some(pos) = notebook.likes.iter().position(|e| *e == viewer) {
            notebook.likes.remove(pos);
        } else {
            notebook.likes.push(viewer);
        }
        Ok(Some(notebook.clone()))
    }

    async fn share_notebook(
        &self,
        notebook_id: &str,
        recipient_email: &str,
        _permission: Permission,
    ) -> Result<()> {
        self.enter(
            "share_notebook",
            &format!("{}:{}", notebook_id, recipient_email),
        )?;
        Ok(())
    }

    async fn create_note(&self, notebook_id: &str, content: &str) -> Result<Note> {
        self.enter("create_note", content)?;
        let mut state = self.state.lock().unwrap();
        let id = Self::fresh_id(&mut state, "mock-note");
        let notebook = state
            .notebooks
            .iter_mut()
            .find(|n| n.id == notebook_id)
            .ok_or_else(|| Error::NotFound("Notebook not found.".to_string()))?;
        let note = Note {
            id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        notebook.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, notebook_id: &str, note_id: &str, content: &str) -> Result<Note> {
        self.enter("update_note", note_id)?;
        let mut state = self.state.lock().unwrap();
        let notebook = state
            .notebooks
            .iter_mut()
            .find(|n| n.id == notebook_id)
            .ok_or_else(|| Error::NotFound("Notebook not found.".to_string()))?;
        let note = notebook
            .notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| Error::NotFound("Note not found within the specified notebook.".to_string()))?;
        note.content = content.to_string();
        Ok(note.clone())
    }

    async fn delete_note(&self, notebook_id: &str, note_id: &str) -> Result<()> {
        self.enter("delete_note", note_id)?;
        let mut state = self.state.lock().unwrap();
        let notebook = state
            .notebooks
            .iter_mut()
            .find(|n| n.id == notebook_id)
            .ok_or_else(|| Error::NotFound("Notebook not found.".to_string()))?;
        // Deleting an already-gone note still succeeds; the desired state
        // is achieved either way.
        notebook.notes.retain(|n| n.id != note_id);
        Ok(())
    }

    async fn extract_text(
        &self,
        _image: Vec<u8>,
        filename: &str,
        _mime_type: &str,
    ) -> Result<ExtractResponse> {
        self.enter("extract_text", filename)?;
        let state = self.state.lock().unwrap();
        Ok(ExtractResponse {
            filename: filename.to_string(),
            extracted_text: state.extracted_text.clone(),
        })
    }

    async fn summarize_text(&self, text: &str) -> Result<SummarizeResponse> {
        self.enter("summarize_text", text)?;
        let state = self.state.lock().unwrap();
        Ok(SummarizeResponse {
            summary: state.summary.clone(),
        })
    }

    async fn generate_quiz(&self, notebook_id: &str) -> Result<QuizPayload> {
        self.enter("generate_quiz", notebook_id)?;
        let state = self.state.lock().unwrap();
        Ok(state.quiz.clone())
    }

    async fn note_dates(&self) -> Result<Vec<String>> {
        self.enter("note_dates", "")?;
        let state = self.state.lock().unwrap();
        Ok(state.note_dates.clone())
    }

    async fn notes_by_date(&self, date: &str) -> Result<Vec<Note>> {
        self.enter("notes_by_date", date)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .notebooks
            .iter()
            .flat_map(|n| n.notes.iter())
            .filter(|n| n.created_at.format("%Y-%m-%d").to_string() == date)
            .cloned()
            .collect())
    }

    async fn export_pdf(&self, notebook_id: &str) -> Result<Vec<u8>> {
        self.enter("export_pdf", notebook_id)?;
        let state = self.state.lock().unwrap();
        Ok(state.pdf_bytes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notelace_core::AccessEntry;

    fn notebook(id: &str, owner: &str) -> Notebook {
        Notebook {
            id: id.to_string(),
            name: format!("Notebook {}", id),
            owner_email: owner.to_string(),
            created_at: Utc::now(),
            notes: vec![],
            access_list: vec![],
            is_public: false,
            tags: vec![],
            likes: vec![],
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_owner() {
        let api = MockApi::new()
            .with_viewer("alice@example.com")
            .with_notebook(notebook("n1", "alice@example.com"))
            .with_notebook(notebook("n2", "bob@example.com"));
        let owned = api.list_notebooks().await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, "n1");
    }

    #[tokio::test]
    async fn test_shared_list_requires_access_entry() {
        let mut shared = notebook("n2", "bob@example.com");
        shared.access_list.push(AccessEntry {
            user_email: "alice@example.com".to_string(),
            permission: Permission::View,
        });
        let api = MockApi::new()
            .with_viewer("alice@example.com")
            .with_notebook(notebook("n1", "alice@example.com"))
            .with_notebook(shared);
        let result = api.list_shared_notebooks().await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "n2");
    }

    #[tokio::test]
    async fn test_queued_failure_consumed_in_order() {
        let api = MockApi::new().with_notebook(notebook("n1", "mock@example.com"));
        api.fail_next("get_notebook", Error::Network("down".into()));

        let err = api.get_notebook("n1").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));

        // Queue drained; next call succeeds.
        assert!(api.get_notebook("n1").await.is_ok());
        assert_eq!(api.call_count("get_notebook"), 2);
    }

    #[tokio::test]
    async fn test_toggle_like_round_trip() {
        let api = MockApi::new()
            .with_viewer("bob@example.com")
            .with_notebook(notebook("n1", "alice@example.com"));

        let liked = api.toggle_like("n1").await.unwrap().unwrap();
        assert_eq!(liked.likes, vec!["bob@example.com"]);

        let unliked = api.toggle_like("n1").await.unwrap().unwrap();
        assert!(unliked.likes.is_empty());
    }

    #[tokio::test]
    async fn test_replace_tags_normalizes_like_the_server() {
        let api = MockApi::new().with_notebook(notebook("n1", "mock@example.com"));
        let updated = api
            .replace_tags(
                "n1",
                &["Work".to_string(), " ideas ".to_string(), "work".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(updated.tags, vec!["Work", "ideas"]);
    }

    #[tokio::test]
    async fn test_search_matches_name_and_tags() {
        let mut nb = notebook("n1", "alice@example.com");
        nb.is_public = true;
        nb.tags = vec!["physics".to_string()];
        let api = MockApi::new().with_notebook(nb);

        assert_eq!(api.search_public_notebooks("PHYS").await.unwrap().len(), 1);
        assert_eq!(api.search_public_notebooks("").await.unwrap().len(), 1);
        assert!(api
            .search_public_notebooks("chemistry")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_note_is_ok() {
        let api = MockApi::new().with_notebook(notebook("n1", "mock@example.com"));
        assert!(api.delete_note("n1", "ghost").await.is_ok());
    }
}
