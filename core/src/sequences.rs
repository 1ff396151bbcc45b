//! Sequence bookkeeping: creation order, the current pointer and per-sequence counts.

use std::collections::HashMap;

use cascade_types::{AbsolutePosition, BranchId, SequenceId, SequenceMetadata, ThoughtPreview};

/// Everything needed to mint a sequence.
#[derive(Debug)]
pub(crate) struct NewSequence {
    pub(crate) summary: String,
    pub(crate) created_at: String,
    pub(crate) absolute_start: AbsolutePosition,
    pub(crate) inherited_context: Vec<ThoughtPreview>,
    pub(crate) parent_branch_id: Option<BranchId>,
}

#[derive(Debug, Default)]
pub(crate) struct SequenceTable {
    entries: Vec<SequenceMetadata>,
    index: HashMap<SequenceId, usize>,
    current: Option<usize>,
}

impl SequenceTable {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &SequenceMetadata> {
        self.entries.iter()
    }

    pub(crate) fn get(&self, id: &SequenceId) -> Option<&SequenceMetadata> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub(crate) fn current(&self) -> Option<&SequenceMetadata> {
        self.current.map(|i| &self.entries[i])
    }

    /// "main": the first sequence not founded by a branch.
    pub(crate) fn main(&self) -> Option<&SequenceMetadata> {
        self.entries.iter().find(|s| s.parent_branch_id.is_none())
    }

    /// Create a sequence and make it current.
    pub(crate) fn mint(&mut self, seed: NewSequence) -> SequenceId {
        let id = SequenceId::nth(self.entries.len() + 1);
        let position = self.entries.len();
        self.entries.push(SequenceMetadata {
            id: id.clone(),
            summary: seed.summary,
            created_at: seed.created_at,
            absolute_start: seed.absolute_start,
            thought_count: 0,
            child_branch_ids: Vec::new(),
            inherited_context: seed.inherited_context,
            parent_branch_id: seed.parent_branch_id,
        });
        self.index.insert(id.clone(), position);
        self.current = Some(position);
        id
    }

    pub(crate) fn set_current(&mut self, id: &SequenceId) {
        if let Some(&i) = self.index.get(id) {
            self.current = Some(i);
        }
    }

    pub(crate) fn record_thought(&mut self, id: &SequenceId) {
        if let Some(&i) = self.index.get(id) {
            self.entries[i].thought_count += 1;
        }
    }

    pub(crate) fn add_child_branch(&mut self, id: &SequenceId, branch: &BranchId) {
        if let Some(&i) = self.index.get(id) {
            let children = &mut self.entries[i].child_branch_ids;
            if !children.contains(branch) {
                children.push(branch.clone());
            }
        }
    }
}
