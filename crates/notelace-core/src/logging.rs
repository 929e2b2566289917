//! Structured logging schema for notelace.
//!
//! All crates use these constants for consistent structured logging fields
//! so log output can be queried by standardized names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | WARN  | Recoverable failure, local state was reverted |
//! | INFO  | Lifecycle events, confirmed mutations |
//! | DEBUG | Decision points, stale-response drops, stage transitions |

use tracing_subscriber::EnvFilter;

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Notebook id being operated on.
pub const NOTEBOOK_ID: &str = "notebook_id";

/// Note id being operated on.
pub const NOTE_ID: &str = "note_id";

/// Viewer email driving the operation.
pub const VIEWER: &str = "viewer";

/// Search query text.
pub const QUERY: &str = "query";

// ─── Operation fields ──────────────────────────────────────────────────────

/// Logical operation name.
/// Examples: "toggle_like", "replace_tags", "refresh", "run_pipeline"
pub const OPERATION: &str = "op";

/// Pipeline stage name ("extract", "summarize", "persist").
pub const STAGE: &str = "stage";

/// Fetch ticket from the request-sequence guard.
pub const TICKET: &str = "ticket";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Number of entries a fetch replaced the collection with.
pub const RESULT_COUNT: &str = "result_count";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Initialize tracing with an env-filter subscriber.
///
/// Honors `RUST_LOG`; defaults to `info` when unset. Safe to call more
/// than once (later calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }

    #[test]
    fn test_field_names_are_snake_case() {
        for name in [NOTEBOOK_ID, NOTE_ID, VIEWER, QUERY, OPERATION, STAGE, TICKET] {
            assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
