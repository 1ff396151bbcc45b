//! Detecting thoughts inserted by other tools between two of the caller's own.

use cascade_types::{AbsolutePosition, GapInfo, count_noun};

use crate::ledger::Ledger;

#[derive(Debug, Default)]
pub(crate) struct GapTracker {
    last_default: Option<AbsolutePosition>,
}

impl GapTracker {
    /// Describe what happened since the last default-source thought, if anything.
    pub(crate) fn detect(&self, ledger: &Ledger) -> Option<GapInfo> {
        let intervening = ledger.after(self.last_default?);
        if intervening.is_empty() {
            return None;
        }

        let mut created_by: Vec<String> = Vec::new();
        for thought in intervening {
            let source = thought.source_label();
            if !created_by.iter().any(|s| s == source) {
                created_by.push(source.to_string());
            }
        }

        let gap_size = intervening.len() as u32;
        let verb = if gap_size == 1 { "was" } else { "were" };
        let explanation = format!(
            "{} {verb} created by other tools ({}) since your last thought",
            count_noun(gap_size, "thought"),
            created_by.join(", ")
        );
        Some(GapInfo {
            has_gap: true,
            gap_size,
            explanation,
            created_by,
        })
    }

    pub(crate) fn record(&mut self, position: AbsolutePosition) {
        self.last_default = Some(position);
    }
}
