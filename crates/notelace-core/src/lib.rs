//! # notelace-core
//!
//! Core types and pure logic for the notelace client engine.
//!
//! This crate provides the wire data model, the error taxonomy shared by
//! every notelace crate, permission resolution over shared notebooks, tag
//! normalization, and the explicit session context object. It performs no
//! I/O; the transport lives in `notelace-client`.

pub mod access;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod tags;

// Re-export commonly used types at crate root
pub use access::{resolve_permission, EffectivePermission};
pub use error::{Error, Result};
pub use models::*;
pub use session::SessionContext;
pub use tags::{normalize_tags, parse_tag_draft};
