//! Explicit session context.
//!
//! Identity and the bearer credential travel as a value object handed to
//! every component that needs them. There is no ambient session state:
//! the context is created at login, dropped at logout, and substitutable
//! in tests. Components never inspect the token; they only attach it to
//! outgoing requests.

/// Identity and credential for one authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    email: String,
    bearer_token: String,
}

impl SessionContext {
    /// Create a session context from a login response.
    pub fn new(email: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            bearer_token: bearer_token.into(),
        }
    }

    /// The authenticated user's email, the sole identity token used in
    /// permission comparisons.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The bearer credential attached to every request.
    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }
}
