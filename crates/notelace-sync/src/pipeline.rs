//! Image ingestion pipeline: extract → summarize → persist.
//!
//! Three sequential remote stages, each stage's output feeding the next.
//! Fail-fast: a failed stage stops the pipeline; nothing downstream is
//! attempted, and there is no automatic retry — the caller re-invokes
//! from stage one. Partial artifacts (extracted text, summary) survive a
//! failure so the caller can show the user how far the pipeline got.

use std::sync::Arc;

use tracing::{debug, info, warn};

use notelace_client::NotebookApi;
use notelace_core::{Error, Note};

/// The three pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Binary image → raw recognized text.
    Extract,
    /// Raw text → condensed summary.
    Summarize,
    /// Summary → stored note in the target notebook.
    Persist,
}

impl PipelineStage {
    /// Stage-specific failure label shown to the user, identifying how
    /// far the pipeline progressed.
    pub fn failure_label(&self) -> &'static str {
        match self {
            Self::Extract => "Extraction failed",
            Self::Summarize => "Summarization failed",
            Self::Persist => "Save failed",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract => write!(f, "extract"),
            Self::Summarize => write!(f, "summarize"),
            Self::Persist => write!(f, "persist"),
        }
    }
}

/// A failed pipeline run: which stage failed, the classification, and
/// the artifacts produced by the stages that had already succeeded.
#[derive(Debug)]
pub struct PipelineFailure {
    /// The stage that failed.
    pub stage: PipelineStage,
    /// Error classification. Session expiry short-circuits the pipeline
    /// the same as any failure, but callers surface it distinctly.
    pub error: Error,
    /// Text recognized before the failure, if the extract stage
    /// succeeded. Shown as an intermediate preview.
    pub extracted_text: Option<String>,
    /// Summary computed before the failure, if the summarize stage
    /// succeeded.
    pub summary: Option<String>,
}

impl PipelineFailure {
    /// Displayable message: distinct phrasing for session expiry and
    /// permission denial, the stage label otherwise.
    pub fn user_message(&self) -> String {
        self.error.user_message(self.stage.failure_label())
    }

    pub fn is_session_expired(&self) -> bool {
        self.error.is_session_expired()
    }
}

/// Runs the three-stage ingestion for one image.
pub struct IngestionPipeline<A: NotebookApi> {
    api: Arc<A>,
}

impl<A: NotebookApi> IngestionPipeline<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Run the full pipeline: image in, persisted note out.
    ///
    /// The input is magic-byte sniffed first; non-image bytes fail at the
    /// extract stage without touching the network.
    pub async fn run(
        &self,
        image: Vec<u8>,
        filename: &str,
        notebook_id: &str,
    ) -> Result<Note, PipelineFailure> {
        let mime_type = match sniff_image(&image) {
            Some(mime) => mime,
            None => {
                return Err(PipelineFailure {
                    stage: PipelineStage::Extract,
                    error: Error::InvalidInput(
                        "The selected file is not a recognized image.".to_string(),
                    ),
                    extracted_text: None,
                    summary: None,
                });
            }
        };
        debug!(filename, mime_type, stage = "extract", "Starting ingestion");

        let extracted = match self.api.extract_text(image, filename, mime_type).await {
            Ok(response) => response.extracted_text,
            Err(error) => {
                warn!(stage = "extract", error = %error, "Ingestion failed");
                return Err(PipelineFailure {
                    stage: PipelineStage::Extract,
                    error,
                    extracted_text: None,
                    summary: None,
                });
            }
        };
        debug!(stage = "summarize", chars = extracted.len(), "Extraction complete");

        let summary = match self.api.summarize_text(&extracted).await {
            Ok(response) => response.summary,
            Err(error) => {
                warn!(stage = "summarize", error = %error, "Ingestion failed");
                return Err(PipelineFailure {
                    stage: PipelineStage::Summarize,
                    error,
                    extracted_text: Some(extracted),
                    summary: None,
                });
            }
        };
        debug!(stage = "persist", chars = summary.len(), "Summarization complete");

        match self.api.create_note(notebook_id, &summary).await {
            Ok(note) => {
                info!(notebook_id, note_id = %note.id, "Ingestion complete");
                Ok(note)
            }
            Err(error) => {
                warn!(stage = "persist", error = %error, "Ingestion failed");
                Err(PipelineFailure {
                    stage: PipelineStage::Persist,
                    error,
                    extracted_text: Some(extracted),
                    summary: Some(summary),
                })
            }
        }
    }
}

/// Detect an image mime type from magic bytes.
fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    let kind = infer::get(bytes)?;
    if kind.matcher_type() == infer::MatcherType::Image {
        Some(kind.mime_type())
    } else {
        None
    }
}
