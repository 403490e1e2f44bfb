//! Error types for layout requests.

use thiserror::Error;

use crate::api::types::ObjectId;
use crate::config::policy::PolicyId;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, LayoutError>;

/// Errors rejected at the engine boundary.
///
/// Numeric oddities (zero radii, inverted belts) are clamped, not reported.
/// Only structural problems with the object forest or the policy table end
/// up here.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("duplicate object id: {0}")]
    DuplicateId(ObjectId),

    #[error("object {id} orbits {parent}, which is not in the object set")]
    MissingParent { id: ObjectId, parent: ObjectId },

    #[error("object {id} is part of an orbit cycle")]
    Cycle { id: ObjectId },

    #[error("no policy registered for {0}")]
    UnknownPolicy(PolicyId),

    #[error("invalid policy {policy}: {reason}")]
    InvalidPolicy { policy: PolicyId, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
