//! Outward payloads of the `cascade_thinking` tool.
//!
//! Optional fields are omitted from the JSON entirely when absent; which ones are
//! present depends on the requested [`ResponseMode`](crate::ResponseMode).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{BranchMetadata, SequenceMetadata, ThoughtPreview};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSequence {
    pub id: String,
    pub summary: String,
    pub thoughts_in_sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    pub branch_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub thought_count: u32,
    pub from_thought: String,
}

/// Thoughts inserted by other tools since the caller's previous thought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapInfo {
    pub has_gap: bool,
    pub gap_size: u32,
    pub explanation: String,
    pub created_by: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtResponse {
    pub thought_number: String,
    pub absolute_thought_number: String,
    pub total_thoughts: u32,
    pub next_thought_needed: bool,
    pub hint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_thought_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_sequence: Option<CurrentSequence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_thoughts: Option<Vec<ThoughtPreview>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_thoughts_limit: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sequences: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_thoughts_all_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_branches: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_branches: Option<Vec<BranchSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_info: Option<GapInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_more_thoughts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_total_thoughts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieved_thoughts: Option<Vec<ThoughtPreview>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_history: Option<Vec<SequenceMetadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<BTreeMap<String, BranchMetadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_tree: Option<String>,
}

/// Payload returned for any rejected call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureResponse {
    pub error: String,
    pub status: &'static str,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: "failed",
        }
    }
}
