use std::iter;

use thiserror::Error;

use cascade_tools::ValidationError;
use cascade_types::{AbsolutePosition, BranchId, ParseRefError, SequencePosition};

/// Why a thought was rejected. Every variant leaves the engine untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid thought number: expected {expected} for current sequence, but got {got}")]
    InvalidPosition {
        expected: SequencePosition,
        got: SequencePosition,
    },
    #[error("Invalid thought reference: {0}")]
    InvalidReferenceFormat(#[from] ParseRefError),
    #[error("Absolute thought {reference} does not exist. {}", absolute_range(.recorded))]
    UnknownAbsoluteReference {
        reference: AbsolutePosition,
        recorded: u32,
    },
    #[error("Sequence thought {reference} does not exist in the current sequence. {}", sequence_range(.in_sequence))]
    UnknownSequenceReference {
        reference: SequencePosition,
        in_sequence: u32,
    },
    #[error("Branch '{id}' does not exist. {}", branch_roster(.available))]
    UnknownBranch {
        id: BranchId,
        available: Vec<BranchId>,
    },
    #[error("Cannot combine switchToBranch with startNewSequence. Please use one or the other.")]
    MutuallyExclusiveOptions,
}

fn absolute_range(recorded: &u32) -> String {
    match *recorded {
        0 => "No thoughts have been recorded yet.".to_string(),
        n => format!("Valid range: A1-A{n}."),
    }
}

fn sequence_range(in_sequence: &u32) -> String {
    match *in_sequence {
        0 => "The current sequence has no thoughts yet.".to_string(),
        n => format!("Valid range: S1-S{n}."),
    }
}

fn branch_roster(available: &[BranchId]) -> String {
    let names: Vec<&str> = iter::once(BranchId::MAIN)
        .chain(available.iter().map(BranchId::as_str))
        .collect();
    format!("Available branches: {}.", names.join(", "))
}
