//! Structural validation of raw `cascade_thinking` arguments.
//!
//! Turns untyped JSON into a [`ThoughtRequest`] or a field-specific error. Only
//! shape is checked here; whether positions and references exist is the engine's job.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use cascade_types::{
    BranchId, MAX_RECENT_LIMIT, ResponseMode, RetrievalPattern, SequencePosition, ThoughtRef,
    ThoughtRequest,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid thought: must be a string")]
    Content,
    #[error("Invalid thoughtNumber: must be a string with S prefix (e.g., 'S1', 'S2')")]
    MissingPosition,
    #[error("Invalid thoughtNumber: must match pattern S{{n}} or s{{n}}")]
    PositionFormat,
    #[error("Invalid totalThoughts: must be a number")]
    TotalNotNumber,
    #[error("Invalid totalThoughts: must be at least 1")]
    InvalidTotal,
    #[error("Invalid totalThoughts: must be an integer")]
    TotalNotInteger,
    #[error("Invalid totalThoughts: must not exceed {}", u32::MAX)]
    TotalTooLarge,
    #[error("Invalid nextThoughtNeeded: must be a boolean")]
    Continuation,
    #[error("Invalid {field}: must be a boolean")]
    NotBoolean { field: &'static str },
    #[error("Invalid {field}: must be a string")]
    NotString { field: &'static str },
    #[error("Invalid {field}: must match pattern A{{n}} or S{{n}}")]
    ReferenceFormat { field: &'static str },
    #[error("Invalid branchId: 'main' is reserved for the root sequence")]
    ReservedBranchId,
    #[error("recentThoughtsLimit must be an integer")]
    RecentLimitNotInteger,
    #[error("recentThoughtsLimit must be non-negative")]
    RecentLimitNegative,
    #[error("recentThoughtsLimit must not exceed 100")]
    RecentLimitTooLarge,
    #[error("retrieveThoughts must be a string")]
    RetrievalNotString,
    #[error(
        "retrieveThoughts must be in format 'last:N', 'A10-A15', 'S3-S7', or comma-separated references like 'A3,S5'"
    )]
    RetrievalFormat,
    #[error("responseMode must be a string")]
    ResponseModeNotString,
    #[error("responseMode must be one of: minimal, standard, verbose")]
    ResponseModeUnknown,
}

/// Validate raw tool arguments and build a typed request.
///
/// Checks run in a fixed order so the first problem reported is stable:
/// `thought`, `thoughtNumber`, `totalThoughts`, `nextThoughtNeeded`, then the
/// optional fields. JSON `null` on an optional field counts as absent.
pub fn validate_thought_args(args: &Value) -> Result<ThoughtRequest, ValidationError> {
    let obj = args.as_object().ok_or(ValidationError::Content)?;

    let content = obj
        .get("thought")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::Content)?
        .to_string();

    let switching = present(obj, "switchToBranch").is_some();
    let position = match present(obj, "thoughtNumber") {
        None if switching => None,
        Some(Value::String(raw)) => Some(
            raw.parse::<SequencePosition>()
                .map_err(|_| ValidationError::PositionFormat)?,
        ),
        _ => return Err(ValidationError::MissingPosition),
    };

    let total_expected = match obj.get("totalThoughts") {
        Some(Value::Number(n)) => total_from_number(n)?,
        _ => return Err(ValidationError::TotalNotNumber),
    };

    let next_thought_needed = obj
        .get("nextThoughtNeeded")
        .and_then(Value::as_bool)
        .ok_or(ValidationError::Continuation)?;

    let is_revision = optional_bool(obj, "isRevision")?;
    let revises = optional_ref(obj, "revisesThought")?;
    let branch_from = optional_ref(obj, "branchFromThought")?;
    let branch_id = optional_str(obj, "branchId")?.map(BranchId::new);
    if branch_id.as_ref().is_some_and(BranchId::is_main) {
        return Err(ValidationError::ReservedBranchId);
    }
    let branch_description = optional_str(obj, "branchDescription")?.map(str::to_string);
    let needs_more_thoughts = optional_bool(obj, "needsMoreThoughts")?;
    let start_new_sequence = optional_bool(obj, "startNewSequence")?;
    let sequence_description = optional_str(obj, "sequenceDescription")?.map(str::to_string);
    let source = optional_str(obj, "toolSource")?.map(str::to_string);
    let isolated_context = optional_bool(obj, "isolatedContext")?;
    let switch_to_branch = optional_str(obj, "switchToBranch")?.map(BranchId::new);
    let recent_limit = recent_limit(obj)?;

    let retrieve = match present(obj, "retrieveThoughts") {
        None => None,
        Some(Value::String(raw)) => Some(
            raw.parse::<RetrievalPattern>()
                .map_err(|_| ValidationError::RetrievalFormat)?,
        ),
        Some(_) => return Err(ValidationError::RetrievalNotString),
    };

    let response_mode = match present(obj, "responseMode") {
        None => None,
        Some(Value::String(raw)) => Some(
            raw.parse::<ResponseMode>()
                .map_err(|_| ValidationError::ResponseModeUnknown)?,
        ),
        Some(_) => return Err(ValidationError::ResponseModeNotString),
    };

    Ok(ThoughtRequest {
        content,
        position,
        total_expected,
        next_thought_needed,
        is_revision,
        revises,
        branch_from,
        branch_id,
        branch_description,
        needs_more_thoughts,
        start_new_sequence,
        sequence_description,
        source,
        isolated_context,
        switch_to_branch,
        recent_limit,
        retrieve,
        response_mode,
    })
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn optional_bool(obj: &Map<String, Value>, field: &'static str) -> Result<bool, ValidationError> {
    match present(obj, field) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ValidationError::NotBoolean { field }),
    }
}

fn optional_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, ValidationError> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ValidationError::NotString { field }),
    }
}

fn optional_ref(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<ThoughtRef>, ValidationError> {
    optional_str(obj, field)?
        .map(|raw| {
            raw.parse::<ThoughtRef>()
                .map_err(|_| ValidationError::ReferenceFormat { field })
        })
        .transpose()
}

/// Accepts `5` and `5.0`; `None` for fractions.
fn integral(n: &Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(i128::from(u));
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f.abs() < 1e18).then_some(f as i128)
}

fn total_from_number(n: &Number) -> Result<u32, ValidationError> {
    if n.as_f64().is_some_and(|f| f < 1.0) {
        return Err(ValidationError::InvalidTotal);
    }
    let total = integral(n).ok_or(ValidationError::TotalNotInteger)?;
    u32::try_from(total).map_err(|_| ValidationError::TotalTooLarge)
}

fn recent_limit(obj: &Map<String, Value>) -> Result<Option<u8>, ValidationError> {
    let limit = match present(obj, "recentThoughtsLimit") {
        None => return Ok(None),
        Some(Value::Number(n)) => integral(n).ok_or(ValidationError::RecentLimitNotInteger)?,
        Some(_) => return Err(ValidationError::RecentLimitNotInteger),
    };
    if limit < 0 {
        return Err(ValidationError::RecentLimitNegative);
    }
    u8::try_from(limit)
        .ok()
        .filter(|limit| *limit <= MAX_RECENT_LIMIT)
        .map(Some)
        .ok_or(ValidationError::RecentLimitTooLarge)
}
