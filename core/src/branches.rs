use cascade_types::{BranchId, BranchMetadata, SequenceId};

/// Branch records in creation order. Re-founding an id replaces its record in place.
#[derive(Debug, Default)]
pub(crate) struct BranchTable {
    entries: Vec<BranchMetadata>,
}

impl BranchTable {
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &BranchMetadata> {
        self.entries.iter()
    }

    pub(crate) fn ids(&self) -> Vec<BranchId> {
        self.entries.iter().map(|b| b.branch_id.clone()).collect()
    }

    pub(crate) fn get(&self, id: &BranchId) -> Option<&BranchMetadata> {
        self.entries.iter().find(|b| &b.branch_id == id)
    }

    pub(crate) fn insert(&mut self, branch: BranchMetadata) {
        match self
            .entries
            .iter_mut()
            .find(|b| b.branch_id == branch.branch_id)
        {
            Some(existing) => *existing = branch,
            None => self.entries.push(branch),
        }
    }

    pub(crate) fn record_thought(&mut self, id: &BranchId) {
        if let Some(branch) = self.entries.iter_mut().find(|b| &b.branch_id == id) {
            branch.thoughts_in_branch += 1;
        }
    }

    /// Branches spawned from, or continuing in, `sequence`.
    pub(crate) fn touching(&self, sequence: &SequenceId) -> usize {
        self.entries
            .iter()
            .filter(|b| &b.from_sequence_id == sequence || &b.current_sequence_id == sequence)
            .count()
    }

    /// Branches whose origin thought sits in `sequence`.
    pub(crate) fn spawned_from<'a>(
        &'a self,
        sequence: &'a SequenceId,
    ) -> impl Iterator<Item = &'a BranchMetadata> + 'a {
        self.entries
            .iter()
            .filter(move |b| &b.from_sequence_id == sequence)
    }
}
