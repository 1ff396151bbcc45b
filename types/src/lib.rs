//! Domain types for cascade thinking.
//!
//! Pure data with no IO and no async: thought coordinates, accepted requests,
//! sequence and branch records, and the response payloads built from them.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod ids;
mod reference;
mod response;
mod text;
mod thought;

pub use ids::{AbsolutePosition, BranchId, SequenceId, SequencePosition};
pub use reference::{ParseRefError, RefKind, RetrievalPattern, ThoughtRef};
pub use response::{BranchSummary, CurrentSequence, FailureResponse, GapInfo, ThoughtResponse};
pub use text::{PREVIEW_CHARS, count_noun, thought_preview, truncate_preview};
pub use thought::{
    BranchMetadata, BranchOrigin, DEFAULT_RECENT_LIMIT, DEFAULT_SOURCE, MAX_RECENT_LIMIT,
    ResponseMode, SequenceMetadata, Thought, ThoughtPreview, ThoughtRequest, is_default_source,
};

use serde::{Deserialize, Serialize};

/// Definition of a tool that can be advertised to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The name of the tool (function name).
    pub name: String,
    /// A description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's parameters.
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}
