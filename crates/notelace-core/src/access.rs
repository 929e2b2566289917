//! Permission resolution over shared notebooks.
//!
//! The resolved capability gates UI affordances only. The server is the
//! authority: a 403 on any mutation is final and the local resolution is
//! never trusted over it (grants can be revoked server-side at any time).

use crate::models::{Notebook, Permission};

/// A viewer's effective capability over a notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectivePermission {
    /// The viewer owns the notebook.
    Owner,
    /// The viewer holds an edit grant.
    Edit,
    /// Read-only. Also the implicit default for any viewer with no
    /// access-list entry: a reachable notebook is at least viewable.
    View,
}

impl EffectivePermission {
    /// Whether this capability allows mutating notebook content.
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Owner | Self::Edit)
    }

    /// Whether this capability allows owner-only operations
    /// (visibility, tags, sharing, deletion).
    pub fn is_owner(&self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl std::fmt::Display for EffectivePermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Edit => write!(f, "edit"),
            Self::View => write!(f, "view"),
        }
    }
}

/// Resolve `viewer`'s effective permission over `notebook`.
///
/// Ownership wins outright, regardless of access-list contents. Otherwise
/// the FIRST access-list entry matching the viewer decides, in list order;
/// duplicate entries with conflicting permissions resolve to the earliest
/// one, not the most privileged. A viewer with no entry gets `View`.
pub fn resolve_permission(viewer: &str, notebook: &Notebook) -> EffectivePermission {
    if notebook.owner_email == viewer {
        return EffectivePermission::Owner;
    }
    for entry in &notebook.access_list {
        if entry.user_email == viewer {
            return match entry.permission {
                Permission::Edit => EffectivePermission::Edit,
                Permission::View => EffectivePermission::View,
            };
        }
    }
    EffectivePermission::View
}
