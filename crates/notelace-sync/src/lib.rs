//! # notelace-sync
//!
//! The notelace engines: the optimistic mutation controller, the image
//! ingestion pipeline, the quiz state machine, and the collection
//! synchronizer that composes them per screen.
//!
//! Everything here follows one concurrency model: a single event loop,
//! suspension only at awaited remote calls, and locks held only across
//! synchronous state transitions — so every local transition is atomic
//! from the caller's perspective.

pub mod mutation;
pub mod pipeline;
pub mod quiz;
pub mod store;
pub mod synchronizer;

pub use mutation::{MutationController, MutationFailure, TagEditor};
pub use pipeline::{IngestionPipeline, PipelineFailure, PipelineStage};
pub use quiz::{Advance, QuizSession, QuizState};
pub use store::NotebookStore;
pub use synchronizer::{CollectionScope, CollectionSynchronizer, FetchOutcome};
