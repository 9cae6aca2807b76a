//! # Lookup Keys
//!
//! Decides whether a caller-supplied token is an identity or a name. This is
//! the only place identity format is checked, so the three `getByIdOrName`
//! operations cannot drift apart.
//!
//! ```text
//! token ──► Uuid::parse_str ──ok──► LookupKey::Id(canonical)
//!                │
//!                └──err──────────► LookupKey::Name(token)
//! ```

use uuid::Uuid;

/// A classified lookup token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    /// Lowercase hyphenated UUID.
    Id(String),
    /// Exact name, matched as given.
    Name(String),
}

impl LookupKey {
    /// Classifies `token`.
    ///
    /// Any form the `uuid` crate accepts (hyphenated, simple, braced, URN,
    /// any case) counts as an identity and is canonicalised.
    ///
    /// ## Example
    /// ```rust
    /// use menu_core::LookupKey;
    ///
    /// assert_eq!(
    ///     LookupKey::parse("550E8400E29B41D4A716446655440000"),
    ///     LookupKey::Id("550e8400-e29b-41d4-a716-446655440000".to_string())
    /// );
    /// assert_eq!(LookupKey::parse("Beverages"), LookupKey::Name("Beverages".to_string()));
    /// ```
    pub fn parse(token: &str) -> Self {
        match Uuid::parse_str(token.trim()) {
            Ok(id) => LookupKey::Id(id.to_string()),
            Err(_) => LookupKey::Name(token.to_string()),
        }
    }

    /// The key as it will be matched.
    pub fn as_str(&self) -> &str {
        match self {
            LookupKey::Id(s) | LookupKey::Name(s) => s,
        }
    }
}
