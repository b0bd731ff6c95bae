//! Error types for lookups and cascades
//!
//! Lookup failures never escape a cascade: the loader and the reconciler
//! report them and fall back to the placeholder state. `SyncError` is what
//! those components log, and what the API layer turns into a `JsValue`.

use thiserror::Error;

use crate::models::{GeoLevel, ScopeId};

/// A remote lookup that did not produce data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The request was rejected before a response arrived (offline,
    /// CORS, timeout)
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The endpoint answered with a non-success status
    #[error("{url} answered with status {status}")]
    BadStatus { status: u16, url: String },

    /// The body was not the expected JSON shape
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Top-level error for cascade and reconciliation operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The triggering element has no enclosing form instance
    #[error("could not find the enclosing form for the element")]
    MissingScope,

    /// The scope resolved, but no form instance is registered under it
    #[error("no form instance registered for scope '{0}'")]
    UnknownScope(ScopeId),

    /// A field addressed by stable id is not on the page
    #[error("no field registered with id '{0}'")]
    MissingField(String),

    /// The scope has no select for a level the operation needs
    #[error("form '{scope}' has no {level} select")]
    MissingSelect { scope: ScopeId, level: GeoLevel },

    /// The selection a lookup was keyed by changed before it completed
    #[error("the {0} selection changed while its options were loading")]
    Superseded(GeoLevel),

    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),
}
