//! Thought records, accepted requests and the sequence/branch bookkeeping tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    AbsolutePosition, BranchId, RetrievalPattern, SequenceId, SequencePosition, ThoughtRef,
    thought_preview,
};

/// Source tag assumed when a call does not name one.
pub const DEFAULT_SOURCE: &str = "user";

/// Recent-thought window used when the caller does not override it.
pub const DEFAULT_RECENT_LIMIT: u8 = 5;

/// Upper bound accepted for `recentThoughtsLimit`.
pub const MAX_RECENT_LIMIT: u8 = 100;

/// True when `source` denotes the interactive caller rather than another tool.
#[must_use]
pub fn is_default_source(source: Option<&str>) -> bool {
    source.is_none_or(|s| s == DEFAULT_SOURCE)
}

/// How much context a response carries. Ordered: each mode is a superset of the previous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    Minimal,
    #[default]
    Standard,
    Verbose,
}

impl ResponseMode {
    pub const ALL: [Self; 3] = [Self::Minimal, Self::Standard, Self::Verbose];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Standard => "standard",
            Self::Verbose => "verbose",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == raw)
            .ok_or_else(|| raw.to_string())
    }
}

/// Present only on the thought that founds a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchOrigin {
    pub from: AbsolutePosition,
    pub branch_id: BranchId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An accepted thought. Immutable once appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub content: String,
    pub sequence_position: SequencePosition,
    pub absolute_position: AbsolutePosition,
    pub sequence_id: SequenceId,
    pub total_expected: u32,
    pub next_thought_needed: bool,
    pub is_revision: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revises: Option<AbsolutePosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchOrigin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Whether this thought expanded the expected total.
    pub needs_more_thoughts: bool,
}

impl Thought {
    #[must_use]
    pub fn is_default_source(&self) -> bool {
        is_default_source(self.source.as_deref())
    }

    #[must_use]
    pub fn source_label(&self) -> &str {
        self.source.as_deref().unwrap_or(DEFAULT_SOURCE)
    }
}

/// A structurally valid `cascade_thinking` call, before any engine checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThoughtRequest {
    pub content: String,
    /// Optional only when `switch_to_branch` is set.
    pub position: Option<SequencePosition>,
    pub total_expected: u32,
    pub next_thought_needed: bool,
    pub is_revision: bool,
    pub revises: Option<ThoughtRef>,
    pub branch_from: Option<ThoughtRef>,
    pub branch_id: Option<BranchId>,
    pub branch_description: Option<String>,
    pub needs_more_thoughts: bool,
    pub start_new_sequence: bool,
    pub sequence_description: Option<String>,
    pub source: Option<String>,
    pub isolated_context: bool,
    pub switch_to_branch: Option<BranchId>,
    pub recent_limit: Option<u8>,
    pub retrieve: Option<RetrievalPattern>,
    pub response_mode: Option<ResponseMode>,
}

impl ThoughtRequest {
    #[must_use]
    pub fn is_default_source(&self) -> bool {
        is_default_source(self.source.as_deref())
    }
}

/// `(absolute, preview)` pair used by recent/retrieved lists and branch context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThoughtPreview {
    pub absolute: String,
    pub content: String,
}

impl ThoughtPreview {
    #[must_use]
    pub fn of(thought: &Thought) -> Self {
        Self {
            absolute: thought.absolute_position.to_string(),
            content: thought_preview(&thought.content),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceMetadata {
    pub id: SequenceId,
    pub summary: String,
    pub created_at: String,
    pub absolute_start: AbsolutePosition,
    pub thought_count: u32,
    /// Branches spawned from this sequence, in creation order.
    #[serde(rename = "branches")]
    pub child_branch_ids: Vec<BranchId>,
    /// Context copied from the origin when this sequence was founded by a branch.
    #[serde(rename = "branchContext", skip_serializing_if = "Vec::is_empty")]
    pub inherited_context: Vec<ThoughtPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_branch_id: Option<BranchId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchMetadata {
    pub branch_id: BranchId,
    pub from_sequence_id: SequenceId,
    pub from_absolute_thought: AbsolutePosition,
    pub from_sequence_thought: SequencePosition,
    pub current_sequence_id: SequenceId,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub thoughts_in_branch: u32,
}
