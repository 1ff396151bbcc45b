//! Thought coordinates and retrieval patterns.
//!
//! A thought can be addressed absolutely (`A12`, global ledger order) or relative
//! to the current sequence (`S3`). Both forms are case-insensitive.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{AbsolutePosition, SequencePosition};

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([AS])(\d+)$").expect("valid thought reference regex"));
static SEQUENCE_POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^S(\d+)$").expect("valid sequence position regex"));
static LAST_N: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^last:(\d+)$").expect("valid last:N regex"));
static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([AS])(\d+)\s*-\s*([AS])(\d+)$").expect("valid reference range regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRefError {
    #[error("'{0}' is not a thought reference (expected A{{n}} or S{{n}} with n >= 1)")]
    Reference(String),
    #[error("'{0}' is not a sequence position (expected S{{n}} with n >= 1)")]
    SequencePosition(String),
    #[error("'{0}' is not a retrieval pattern")]
    Pattern(String),
}

/// Which coordinate system a reference uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Absolute,
    Sequence,
}

impl RefKind {
    fn from_prefix(prefix: &str) -> Self {
        if prefix.eq_ignore_ascii_case("a") {
            Self::Absolute
        } else {
            Self::Sequence
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThoughtRef {
    Absolute(AbsolutePosition),
    Sequence(SequencePosition),
}

impl ThoughtRef {
    fn from_parts(kind: RefKind, n: u32) -> Self {
        match kind {
            RefKind::Absolute => Self::Absolute(AbsolutePosition::new(n)),
            RefKind::Sequence => Self::Sequence(SequencePosition::new(n)),
        }
    }
}

impl fmt::Display for ThoughtRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(pos) => write!(f, "{pos}"),
            Self::Sequence(pos) => write!(f, "{pos}"),
        }
    }
}

impl FromStr for ThoughtRef {
    type Err = ParseRefError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let caps = REFERENCE
            .captures(trimmed)
            .ok_or_else(|| ParseRefError::Reference(raw.to_string()))?;
        let n = parse_ordinal(&caps[2]).ok_or_else(|| ParseRefError::Reference(raw.to_string()))?;
        Ok(Self::from_parts(RefKind::from_prefix(&caps[1]), n))
    }
}

impl FromStr for SequencePosition {
    type Err = ParseRefError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        SEQUENCE_POSITION
            .captures(raw.trim())
            .and_then(|caps| parse_ordinal(&caps[1]))
            .map(SequencePosition::new)
            .ok_or_else(|| ParseRefError::SequencePosition(raw.to_string()))
    }
}

/// Positive 1-based ordinal that fits a `u32`.
fn parse_ordinal(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|n| *n >= 1)
}

/// A request to pull earlier thoughts into the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalPattern {
    /// `last:N`, the N most recent thoughts of the whole ledger.
    Last(usize),
    /// `A5-A8` or `S2-S4`, inclusive, both ends of the same kind.
    Range { kind: RefKind, start: u32, end: u32 },
    /// `A3,S5,A9`, unresolvable entries are skipped at lookup time.
    List(Vec<ThoughtRef>),
}

impl FromStr for RetrievalPattern {
    type Err = ParseRefError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let malformed = || ParseRefError::Pattern(raw.to_string());

        if let Some(caps) = LAST_N.captures(trimmed) {
            let count = caps[1].parse::<usize>().map_err(|_| malformed())?;
            return Ok(Self::Last(count));
        }

        if let Some(caps) = RANGE.captures(trimmed) {
            let kind = RefKind::from_prefix(&caps[1]);
            if kind != RefKind::from_prefix(&caps[3]) {
                return Err(malformed());
            }
            let start = parse_ordinal(&caps[2]).ok_or_else(malformed)?;
            let end = parse_ordinal(&caps[4]).ok_or_else(malformed)?;
            return Ok(Self::Range {
                kind,
                start: start.min(end),
                end: start.max(end),
            });
        }

        let refs = trimmed
            .split(',')
            .map(|entry| entry.parse::<ThoughtRef>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::List(refs))
    }
}
