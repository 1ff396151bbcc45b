//! Assembling the outward response for a committed thought.
//!
//! Minimal responses carry position and continuation only, plus branch and
//! revision context when that context would otherwise be lost. Standard adds
//! sequence, recent-thought and branch overviews; verbose adds full history.

use cascade_types::{
    BranchId, BranchSummary, CurrentSequence, GapInfo, ResponseMode, RetrievalPattern,
    SequenceMetadata, Thought, ThoughtPreview, ThoughtResponse, count_noun,
};

use crate::branches::BranchTable;
use crate::ledger::Ledger;
use crate::resolve::Resolver;
use crate::sequences::SequenceTable;
use crate::tree::branch_tree;

/// Sequences longer than this get a `sequenceSummary`.
const SUMMARY_THRESHOLD: u32 = 10;

/// Engine state after commit, borrowed for rendering.
pub(crate) struct Snapshot<'a> {
    pub(crate) ledger: &'a Ledger,
    pub(crate) sequences: &'a SequenceTable,
    pub(crate) branches: &'a BranchTable,
    pub(crate) active_branch: Option<&'a BranchId>,
}

/// Per-call facts that are not recoverable from the snapshot.
pub(crate) struct Committed<'a> {
    pub(crate) thought: &'a Thought,
    pub(crate) mode: ResponseMode,
    pub(crate) recent_limit: u8,
    pub(crate) default_recent_limit: u8,
    pub(crate) gap: Option<GapInfo>,
    pub(crate) expanded: bool,
    pub(crate) retrieve: Option<&'a RetrievalPattern>,
}

pub(crate) fn compose(snapshot: &Snapshot<'_>, committed: Committed<'_>) -> ThoughtResponse {
    let thought = committed.thought;
    let sequence = snapshot.sequences.get(&thought.sequence_id);
    let revision = thought.is_revision || thought.revises.is_some();

    let mut response = ThoughtResponse {
        thought_number: thought.sequence_position.to_string(),
        absolute_thought_number: thought.absolute_position.to_string(),
        total_thoughts: thought.total_expected,
        next_thought_needed: thought.next_thought_needed,
        hint: hint(snapshot, thought, sequence, &committed),
        expected_thought_number: thought
            .next_thought_needed
            .then(|| thought.sequence_position.next().to_string()),
        ..ThoughtResponse::default()
    };

    let current_branch = snapshot
        .active_branch
        .map_or(BranchId::MAIN, BranchId::as_str)
        .to_string();

    if committed.mode == ResponseMode::Minimal {
        if snapshot.active_branch.is_some() || revision || thought.branch.is_some() {
            response.current_branch = Some(current_branch);
        }
        if revision {
            response.current_sequence = sequence.map(current_sequence);
        }
    } else {
        standard_fields(&mut response, snapshot, &committed, sequence, current_branch);
    }

    if let Some(pattern) = committed.retrieve {
        response.retrieved_thoughts =
            Some(Resolver::new(snapshot.ledger, sequence).retrieve(pattern));
    }

    if committed.mode == ResponseMode::Verbose {
        response.sequence_history = Some(snapshot.sequences.iter().cloned().collect());
        response.branches = Some(
            snapshot
                .branches
                .iter()
                .map(|b| (b.branch_id.to_string(), b.clone()))
                .collect(),
        );
        if !snapshot.branches.is_empty() {
            response.branch_tree = Some(branch_tree(snapshot.sequences, snapshot.branches));
        }
    }

    response
}

fn standard_fields(
    response: &mut ThoughtResponse,
    snapshot: &Snapshot<'_>,
    committed: &Committed<'_>,
    sequence: Option<&SequenceMetadata>,
    current_branch: String,
) {
    let thought = committed.thought;

    response.current_sequence = sequence.map(current_sequence);
    response.recent_thoughts = Some(
        snapshot
            .ledger
            .last(usize::from(committed.recent_limit))
            .iter()
            .map(ThoughtPreview::of)
            .collect(),
    );
    response.recent_thoughts_limit = (committed.recent_limit != committed.default_recent_limit)
        .then_some(committed.recent_limit);
    response.total_sequences = Some(snapshot.sequences.len());
    response.total_thoughts_all_time = Some(snapshot.ledger.len());
    response.active_branches = Some(snapshot.branches.touching(&thought.sequence_id));
    response.current_branch = Some(current_branch);

    if !snapshot.branches.is_empty() {
        response.available_branches = Some(
            snapshot
                .branches
                .iter()
                .map(|b| BranchSummary {
                    branch_id: b.branch_id.to_string(),
                    description: b.description.clone(),
                    thought_count: b.thoughts_in_branch,
                    from_thought: b.from_absolute_thought.to_string(),
                })
                .collect(),
        );
    }

    response.gap_info.clone_from(&committed.gap);

    if let Some(seq) = sequence.filter(|s| s.thought_count > SUMMARY_THRESHOLD) {
        response.sequence_summary = Some(sequence_summary(snapshot.ledger, seq, thought));
    }

    if !thought.is_default_source() {
        response.tool_source = Some(thought.source_label().to_string());
    }

    if committed.expanded {
        response.needs_more_thoughts = Some(true);
        response.adjusted_total_thoughts = Some(thought.total_expected);
    }
}

fn current_sequence(sequence: &SequenceMetadata) -> CurrentSequence {
    CurrentSequence {
        id: sequence.id.to_string(),
        summary: sequence.summary.clone(),
        thoughts_in_sequence: sequence.thought_count,
    }
}

fn hint(
    snapshot: &Snapshot<'_>,
    thought: &Thought,
    sequence: Option<&SequenceMetadata>,
    committed: &Committed<'_>,
) -> String {
    let mut parts = Vec::new();

    match snapshot.active_branch.and_then(|id| snapshot.branches.get(id)) {
        Some(branch) => {
            let description = branch
                .description
                .as_deref()
                .map(|d| format!(" ({d})"))
                .unwrap_or_default();
            parts.push(format!(
                "On branch '{}'{description} with {}",
                branch.branch_id,
                count_noun(branch.thoughts_in_branch, "thought")
            ));
        }
        None => {
            let summary = sequence.map_or("", |s| s.summary.as_str());
            parts.push(format!("Continuing sequence: {summary}"));
        }
    }

    if !snapshot.branches.is_empty() {
        let roster: Vec<String> = snapshot
            .branches
            .iter()
            .map(|b| format!("{}({})", b.branch_id, b.thoughts_in_branch))
            .collect();
        parts.push(format!("Branches: {}", roster.join(", ")));
    }

    if !thought.is_default_source() {
        parts.push(format!("(created by {})", thought.source_label()));
    }
    if committed.gap.is_some() {
        parts.push("[Note: Some thoughts created by other tools]".to_string());
    }
    if committed.expanded {
        parts.push("[Total thoughts expanded]".to_string());
    }

    parts.join(" | ")
}

fn sequence_summary(ledger: &Ledger, sequence: &SequenceMetadata, latest: &Thought) -> String {
    let thoughts: Vec<&Thought> = ledger.sequence_thoughts(&sequence.id).collect();
    let revisions = thoughts.iter().filter(|t| t.is_revision).count() as u32;
    let expansions = thoughts.iter().filter(|t| t.needs_more_thoughts).count();

    let mut parts = vec![format!(
        "{} ({})",
        sequence.summary,
        count_noun(sequence.thought_count, "thought")
    )];
    if revisions > 0 {
        parts.push(format!("Key revisions: {} revised", count_noun(revisions, "thought")));
    }
    if !sequence.child_branch_ids.is_empty() {
        let names: Vec<&str> = sequence
            .child_branch_ids
            .iter()
            .map(BranchId::as_str)
            .collect();
        parts.push(format!("Branches created: {}", names.join(", ")));
    }
    if expansions > 0 {
        parts.push(format!("Expanded thinking {expansions} time(s)"));
    }

    let total = latest.total_expected.max(1);
    let percent = (u64::from(sequence.thought_count) * 100 / u64::from(total)).min(100);
    parts.push(format!(
        "Progress: {percent}% ({}/{total})",
        sequence.thought_count
    ));

    parts.join(". ")
}
