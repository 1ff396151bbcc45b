//! Turning `A{n}` / `S{n}` references and retrieval patterns into ledger entries.

use cascade_types::{
    RefKind, RetrievalPattern, SequenceMetadata, SequencePosition, Thought, ThoughtPreview,
    ThoughtRef,
};

use crate::error::EngineError;
use crate::ledger::Ledger;

/// Read-only view used to resolve references. Sequence-relative references are
/// answered against `sequence`, the one the caller is currently in.
pub(crate) struct Resolver<'a> {
    ledger: &'a Ledger,
    sequence: Option<&'a SequenceMetadata>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(ledger: &'a Ledger, sequence: Option<&'a SequenceMetadata>) -> Self {
        Self { ledger, sequence }
    }

    pub(crate) fn resolve(&self, reference: ThoughtRef) -> Result<&'a Thought, EngineError> {
        match reference {
            ThoughtRef::Absolute(position) => {
                self.ledger
                    .get(position)
                    .ok_or(EngineError::UnknownAbsoluteReference {
                        reference: position,
                        recorded: self.ledger.len(),
                    })
            }
            ThoughtRef::Sequence(position) => {
                self.in_sequence(position)
                    .ok_or(EngineError::UnknownSequenceReference {
                        reference: position,
                        in_sequence: self.sequence.map_or(0, |s| s.thought_count),
                    })
            }
        }
    }

    fn in_sequence(&self, position: SequencePosition) -> Option<&'a Thought> {
        let sequence = self.sequence?;
        self.ledger.in_sequence(&sequence.id, position)
    }

    /// Previews for a retrieval pattern, oldest first for `last:N` and ranges,
    /// request order for lists. List entries that do not resolve are skipped.
    pub(crate) fn retrieve(&self, pattern: &RetrievalPattern) -> Vec<ThoughtPreview> {
        match pattern {
            RetrievalPattern::Last(count) => self
                .ledger
                .last(*count)
                .iter()
                .map(ThoughtPreview::of)
                .collect(),
            RetrievalPattern::Range {
                kind: RefKind::Absolute,
                start,
                end,
            } => self
                .ledger
                .range(*start, *end)
                .map(ThoughtPreview::of)
                .collect(),
            RetrievalPattern::Range {
                kind: RefKind::Sequence,
                start,
                end,
            } => self.sequence.map_or_else(Vec::new, |sequence| {
                self.ledger
                    .sequence_range(&sequence.id, *start, *end)
                    .map(ThoughtPreview::of)
                    .collect()
            }),
            RetrievalPattern::List(references) => references
                .iter()
                .filter_map(|r| self.resolve(*r).ok())
                .map(ThoughtPreview::of)
                .collect(),
        }
    }
}
