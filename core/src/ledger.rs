//! Append-only store of accepted thoughts.

use std::collections::HashMap;

use cascade_types::{AbsolutePosition, SequenceId, SequencePosition, Thought};

/// Thoughts in absolute order. `A{n}` lives at index `n - 1`.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    thoughts: Vec<Thought>,
    by_sequence: HashMap<SequenceId, Vec<usize>>,
}

impl Ledger {
    pub(crate) fn len(&self) -> u32 {
        self.thoughts.len() as u32
    }

    pub(crate) fn next_position(&self) -> AbsolutePosition {
        AbsolutePosition::new(self.len() + 1)
    }

    pub(crate) fn get(&self, position: AbsolutePosition) -> Option<&Thought> {
        let index = (position.value() as usize).checked_sub(1)?;
        self.thoughts.get(index)
    }

    pub(crate) fn in_sequence(
        &self,
        sequence: &SequenceId,
        position: SequencePosition,
    ) -> Option<&Thought> {
        let index = (position.value() as usize).checked_sub(1)?;
        let absolute = *self.by_sequence.get(sequence)?.get(index)?;
        self.thoughts.get(absolute)
    }

    pub(crate) fn sequence_thoughts<'a>(
        &'a self,
        sequence: &SequenceId,
    ) -> impl Iterator<Item = &'a Thought> + 'a {
        self.by_sequence
            .get(sequence)
            .into_iter()
            .flatten()
            .filter_map(move |&index| self.thoughts.get(index))
    }

    /// Positions `start..=end` of one sequence, clamped to what it holds.
    pub(crate) fn sequence_range<'a>(
        &'a self,
        sequence: &SequenceId,
        start: u32,
        end: u32,
    ) -> impl Iterator<Item = &'a Thought> + 'a {
        let indices = self.by_sequence.get(sequence).map_or(&[][..], Vec::as_slice);
        let first = (start.max(1) as usize - 1).min(indices.len());
        let last = (end as usize).min(indices.len()).max(first);
        indices[first..last]
            .iter()
            .filter_map(move |&index| self.thoughts.get(index))
    }

    /// The `count` most recent thoughts, oldest first.
    pub(crate) fn last(&self, count: usize) -> &[Thought] {
        let start = self.thoughts.len().saturating_sub(count);
        &self.thoughts[start..]
    }

    /// Up to `count` thoughts ending at `position` inclusive, oldest first.
    pub(crate) fn window_ending_at(&self, position: AbsolutePosition, count: usize) -> &[Thought] {
        let end = (position.value() as usize).min(self.thoughts.len());
        let start = end.saturating_sub(count);
        &self.thoughts[start..end]
    }

    /// Thoughts recorded strictly after `position`.
    pub(crate) fn after(&self, position: AbsolutePosition) -> &[Thought] {
        let start = (position.value() as usize).min(self.thoughts.len());
        &self.thoughts[start..]
    }

    pub(crate) fn range(&self, start: u32, end: u32) -> impl Iterator<Item = &Thought> {
        self.thoughts
            .iter()
            .filter(move |t| (start..=end).contains(&t.absolute_position.value()))
    }

    pub(crate) fn append(&mut self, thought: Thought) {
        debug_assert_eq!(thought.absolute_position, self.next_position());
        let index = self.thoughts.len();
        self.by_sequence
            .entry(thought.sequence_id.clone())
            .or_default()
            .push(index);
        self.thoughts.push(thought);
    }
}
