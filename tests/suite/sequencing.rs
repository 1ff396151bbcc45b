//! Sequence numbering, totals and rejection without side effects.

use serde_json::json;

use crate::common::{accept, quiet_engine, reject, thought, with};

#[test]
fn rejected_position_leaves_no_trace() {
    let mut engine = quiet_engine();
    let first = accept(&mut engine, &thought("First", 1, 3));
    assert_eq!(first["expectedThoughtNumber"], "S2");

    for _ in 0..3 {
        let error = reject(&mut engine, &thought("Skipping ahead", 5, 3));
        assert_eq!(
            error,
            "Invalid thought number: expected S2 for current sequence, but got S5"
        );
    }

    let second = accept(&mut engine, &thought("Second", 2, 3));
    assert_eq!(second["thoughtNumber"], "S2");
    assert_eq!(second["absoluteThoughtNumber"], "A2");
    assert_eq!(second["expectedThoughtNumber"], "S3");
    assert_eq!(second["totalThoughtsAllTime"], 2);
    assert!(second.get("gapInfo").is_none());
    assert_eq!(engine.thought_count(), 2);
    assert_eq!(engine.sequence_count(), 1);
}

#[test]
fn final_thought_has_no_expected_successor() {
    let mut engine = quiet_engine();
    let args = with(thought("Only", 1, 1), json!({"nextThoughtNeeded": false}));
    let response = accept(&mut engine, &args);
    assert_eq!(response["nextThoughtNeeded"], false);
    assert!(response.get("expectedThoughtNumber").is_none());
}

#[test]
fn explicit_new_sequences_restart_at_s1() {
    let mut engine = quiet_engine();
    accept(&mut engine, &thought("One", 1, 2));
    accept(&mut engine, &thought("Two", 2, 2));

    let wrong = with(thought("Fresh", 3, 2), json!({"startNewSequence": true}));
    assert!(reject(&mut engine, &wrong).contains("expected S1"));
    assert_eq!(engine.sequence_count(), 1);

    let fresh = with(
        thought("Fresh", 1, 2),
        json!({"startNewSequence": true, "sequenceDescription": "Plan B"}),
    );
    let response = accept(&mut engine, &fresh);
    assert_eq!(response["thoughtNumber"], "S1");
    assert_eq!(response["absoluteThoughtNumber"], "A3");
    assert_eq!(response["currentSequence"]["id"], "seq_2");
    assert_eq!(response["currentSequence"]["summary"], "Plan B");
    assert_eq!(response["totalSequences"], 2);
    assert_eq!(response["hint"], "Continuing sequence: Plan B");

    let unnamed = with(thought("Again", 1, 2), json!({"startNewSequence": true}));
    let response = accept(&mut engine, &unnamed);
    assert_eq!(
        response["currentSequence"]["summary"],
        "Sequence starting at A4"
    );
}

#[test]
fn total_is_raised_to_position() {
    let mut engine = quiet_engine();
    accept(&mut engine, &thought("a", 1, 1));
    let response = accept(&mut engine, &thought("b", 2, 1));
    assert_eq!(response["totalThoughts"], 2);
    assert!(response.get("adjustedTotalThoughts").is_none());
}

#[test]
fn needing_more_thoughts_expands_by_at_least_three() {
    let mut engine = quiet_engine();
    accept(&mut engine, &thought("a", 1, 3));
    accept(&mut engine, &thought("b", 2, 3));
    let more = with(thought("c", 3, 3), json!({"needsMoreThoughts": true}));
    let response = accept(&mut engine, &more);
    assert_eq!(response["totalThoughts"], 6);
    assert_eq!(response["adjustedTotalThoughts"], 6);
    assert_eq!(response["needsMoreThoughts"], true);
    assert!(
        response["hint"]
            .as_str()
            .unwrap()
            .contains("[Total thoughts expanded]")
    );
}

#[test]
fn needing_more_thoughts_expands_by_half_for_long_runs() {
    let mut engine = quiet_engine();
    for n in 1..10 {
        accept(&mut engine, &thought("step", n, 10));
    }
    let more = with(thought("step", 10, 10), json!({"needsMoreThoughts": true}));
    let response = accept(&mut engine, &more);
    assert_eq!(response["totalThoughts"], 15);
}

#[test]
fn long_sequences_are_summarised() {
    let mut engine = quiet_engine();
    accept(&mut engine, &thought("start", 1, 11));
    let revision = with(
        thought("rethink", 2, 11),
        json!({"isRevision": true, "revisesThought": "A1"}),
    );
    accept(&mut engine, &revision);
    for n in 3..11 {
        let response = accept(&mut engine, &thought("step", n, 11));
        assert!(response.get("sequenceSummary").is_none());
    }

    let response = accept(&mut engine, &thought("last", 11, 11));
    assert_eq!(
        response["sequenceSummary"],
        "Sequence starting at A1 (11 thoughts). Key revisions: 1 thought revised. Progress: 100% (11/11)"
    );
}

#[test]
fn switching_without_position_computes_it() {
    let mut engine = quiet_engine();
    accept(&mut engine, &thought("a", 1, 3));
    accept(&mut engine, &thought("b", 2, 3));
    let args = json!({
        "thought": "back to main",
        "totalThoughts": 3,
        "nextThoughtNeeded": true,
        "switchToBranch": "main",
    });
    let response = accept(&mut engine, &args);
    assert_eq!(response["thoughtNumber"], "S3");
    assert_eq!(response["currentBranch"], "main");
}

#[test]
fn structural_errors_are_reported_verbatim() {
    let mut engine = quiet_engine();
    assert_eq!(
        reject(&mut engine, &json!({"thought": "", "thoughtNumber": "S1"})),
        "Invalid thought: must be a string"
    );
    assert_eq!(
        reject(&mut engine, &with(thought("x", 1, 3), json!({"totalThoughts": 0}))),
        "Invalid totalThoughts: must be at least 1"
    );
    assert_eq!(
        reject(&mut engine, &with(thought("x", 1, 3), json!({"thoughtNumber": "T1"}))),
        "Invalid thoughtNumber: must match pattern S{n} or s{n}"
    );
    assert_eq!(engine.thought_count(), 0);
}
