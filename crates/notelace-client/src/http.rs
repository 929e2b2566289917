//! Reqwest-backed implementation of [`NotebookApi`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use notelace_core::{
    ApiDetail, Error, ExtractResponse, Note, Notebook, NoteCreate, NotebookCreate, Permission,
    QuizPayload, Result, SessionContext, ShareRequest, SummarizeResponse, TagsUpdate,
    VisibilityUpdate,
};

use crate::api::NotebookApi;
use crate::config::ClientConfig;

/// HTTP transport to the notebook API.
///
/// Every request carries the session's bearer credential. Non-2xx
/// responses are classified through [`Error::from_status`], with the
/// server's `{"detail": ...}` text surfaced when the body carries one.
/// 2xx bodies are parsed strictly; parse failures become
/// [`Error::MalformedResponse`].
pub struct HttpApi {
    client: reqwest::Client,
    config: ClientConfig,
    session: SessionContext,
}

impl HttpApi {
    /// Create a transport for one authenticated session.
    pub fn new(config: ClientConfig, session: SessionContext) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            session,
        })
    }

    /// The session this transport authenticates as.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Classify a non-2xx response, extracting the server detail text
    /// when the body is the API's `{"detail": ...}` shape.
    async fn classify(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiDetail>(&body)
            .ok()
            .map(|d| d.detail);
        warn!(
            status,
            error = detail.as_deref().unwrap_or("(no detail)"),
            "API request failed"
        );
        Error::from_status(status, detail.as_deref())
    }

    /// Check status and strictly parse a JSON body.
    async fn expect_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::classify(response).await);
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Check status on endpoints that return no meaningful body
    /// (2xx or 204).
    async fn expect_empty(response: reqwest::Response) -> Result<()> {
        if !response.status().is_success() {
            return Err(Self::classify(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl NotebookApi for HttpApi {
    async fn list_notebooks(&self) -> Result<Vec<Notebook>> {
        let response = self
            .client
            .get(self.url("/notebooks"))
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn list_shared_notebooks(&self) -> Result<Vec<Notebook>> {
        let response = self
            .client
            .get(self.url("/notebooks/shared"))
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn search_public_notebooks(&self, query: &str) -> Result<Vec<Notebook>> {
        debug!(query, "Searching public notebooks");
        let mut request = self
            .client
            .get(self.url("/notebooks/public/search"))
            .bearer_auth(self.session.bearer_token());
        if !query.is_empty() {
            request = request.query(&[("query", query)]);
        }
        let response = request.send().await?;
        Self::expect_json(response).await
    }

    async fn get_notebook(&self, notebook_id: &str) -> Result<Notebook> {
        let response = self
            .client
            .get(self.url(&format!("/notebooks/{}", notebook_id)))
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn create_notebook(&self, name: &str) -> Result<Notebook> {
        let response = self
            .client
            .post(self.url("/notebooks"))
            .bearer_auth(self.session.bearer_token())
            .json(&NotebookCreate {
                name: name.to_string(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn delete_notebook(&self, notebook_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/notebooks/{}", notebook_id)))
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        Self::expect_empty(response).await
    }

    async fn set_visibility(&self, notebook_id: &str, is_public: bool) -> Result<Notebook> {
        let response = self
            .client
            .patch(self.url(&format!("/notebooks/{}/visibility", notebook_id)))
            .bearer_auth(self.session.bearer_token())
            .json(&VisibilityUpdate { is_public })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn replace_tags(&self, notebook_id: &str, tags: &[String]) -> Result<Notebook> {
        let response = self
            .client
            .patch(self.url(&format!("/notebooks/{}/tags", notebook_id)))
            .bearer_auth(self.session.bearer_token())
            .json(&TagsUpdate {
                tags: tags.to_vec(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn toggle_like(&self, notebook_id: &str) -> Result<Option<Notebook>> {
        let response = self
            .client
            .post(self.url(&format!("/notebooks/{}/like", notebook_id)))
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::classify(response).await);
        }
        // The like endpoint may answer with the updated notebook or with
        // an empty 2xx. An empty body keeps the optimistic value.
        let body = response.text().await?;
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn share_notebook(
        &self,
        notebook_id: &str,
        recipient_email: &str,
        permission: Permission,
    ) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("/notebooks/{}/share", notebook_id)))
            .bearer_auth(self.session.bearer_token())
            .json(&ShareRequest {
                recipient_email: recipient_email.to_string(),
                permission,
            })
            .send()
            .await?;
        Self::expect_empty(response).await
    }

    async fn create_note(&self, notebook_id: &str, content: &str) -> Result<Note> {
        let response = self
            .client
            .post(self.url(&format!("/notebooks/{}/notes", notebook_id)))
            .bearer_auth(self.session.bearer_token())
            .json(&NoteCreate {
                content: content.to_string(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn update_note(&self, notebook_id: &str, note_id: &str, content: &str) -> Result<Note> {
        let response = self
            .client
            .put(self.url(&format!("/notebooks/{}/notes/{}", notebook_id, note_id)))
            .bearer_auth(self.session.bearer_token())
            .json(&NoteCreate {
                content: content.to_string(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn delete_note(&self, notebook_id: &str, note_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/notebooks/{}/notes/{}", notebook_id, note_id)))
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        Self::expect_empty(response).await
    }

    async fn extract_text(
        &self,
        image: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<ExtractResponse> {
        debug!(filename, mime_type, bytes = image.len(), "Uploading image for extraction");
        let part = Part::bytes(image)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|e| Error::InvalidInput(format!("Invalid mime type: {}", e)))?;
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(self.url("/upload-image/"))
            .bearer_auth(self.session.bearer_token())
            .multipart(form)
            .timeout(self.config.ai_timeout)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn summarize_text(&self, text: &str) -> Result<SummarizeResponse> {
        let response = self
            .client
            .post(self.url("/summarize-text/"))
            .bearer_auth(self.session.bearer_token())
            .json(&serde_json::json!({ "text": text }))
            .timeout(self.config.ai_timeout)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn generate_quiz(&self, notebook_id: &str) -> Result<QuizPayload> {
        debug!(notebook_id, "Requesting quiz generation");
        let response = self
            .client
            .post(self.url(&format!("/notebooks/{}/quiz", notebook_id)))
            .bearer_auth(self.session.bearer_token())
            .timeout(self.config.ai_timeout)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn note_dates(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.url("/notes/dates"))
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn notes_by_date(&self, date: &str) -> Result<Vec<Note>> {
        let response = self
            .client
            .get(self.url(&format!("/notes/by-date/{}", date)))
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn export_pdf(&self, notebook_id: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url(&format!("/notebooks/{}/pdf", notebook_id)))
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::classify(response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }
}
