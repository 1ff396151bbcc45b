//! ASCII rendering of the branch hierarchy for verbose responses.

use cascade_types::{SequenceId, SequenceMetadata, count_noun};

use crate::branches::BranchTable;
use crate::sequences::SequenceTable;

pub(crate) fn branch_tree(sequences: &SequenceTable, branches: &BranchTable) -> String {
    let mut lines = vec!["Branch Tree Structure:".to_string()];

    let roots = sequences.iter().filter(|s| s.parent_branch_id.is_none());
    for (i, root) in roots.enumerate() {
        let has_children = branches.spawned_from(&root.id).next().is_some();
        if i > 0 && !has_children {
            continue;
        }
        lines.push(root_label(root, i == 0));
        push_children(&mut lines, branches, &root.id, "");
    }

    lines.join("\n")
}

fn root_label(root: &SequenceMetadata, is_main: bool) -> String {
    let count = count_noun(root.thought_count, "thought");
    if is_main {
        format!("📋 Main ({count})")
    } else {
        format!("📋 {} ({count})", root.summary)
    }
}

fn push_children(
    lines: &mut Vec<String>,
    branches: &BranchTable,
    sequence: &SequenceId,
    prefix: &str,
) {
    let children: Vec<_> = branches.spawned_from(sequence).collect();
    let last = children.len().saturating_sub(1);
    for (i, branch) in children.into_iter().enumerate() {
        let (connector, indent) = if i == last {
            ("└─ ", "   ")
        } else {
            ("├─ ", "│  ")
        };
        let description = branch
            .description
            .as_deref()
            .map(|d| format!(" ({d})"))
            .unwrap_or_default();
        lines.push(format!(
            "{prefix}{connector}🌿 {}{description} [{}]",
            branch.branch_id,
            count_noun(branch.thoughts_in_branch, "thought")
        ));
        push_children(
            lines,
            branches,
            &branch.current_sequence_id,
            &format!("{prefix}{indent}"),
        );
    }
}
