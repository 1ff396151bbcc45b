//! Thoughts from other tools: source tags, gap reporting and isolated contexts.

use serde_json::json;

use crate::common::{accept, quiet_engine, reject, thought, with};

fn from_tool(content: &str, number: u32, source: &str) -> serde_json::Value {
    with(thought(content, number, 10), json!({"toolSource": source}))
}

#[test]
fn other_tools_have_positions_assigned() {
    let mut engine = quiet_engine();
    accept(&mut engine, &thought("mine", 1, 10));
    let response = accept(&mut engine, &from_tool("theirs", 7, "task"));
    assert_eq!(response["thoughtNumber"], "S2");
    assert_eq!(response["toolSource"], "task");
    assert!(response.get("gapInfo").is_none());
    assert_eq!(
        response["hint"],
        "Continuing sequence: Sequence starting at A1 | (created by task)"
    );
}

#[test]
fn explicit_user_source_is_still_checked() {
    let mut engine = quiet_engine();
    accept(&mut engine, &thought("mine", 1, 10));
    let error = reject(&mut engine, &from_tool("mine", 5, "user"));
    assert!(error.contains("expected S2"));

    let response = accept(&mut engine, &from_tool("mine", 2, "user"));
    assert!(response.get("toolSource").is_none());
}

#[test]
fn gaps_report_intervening_tools() {
    let mut engine = quiet_engine();
    accept(&mut engine, &thought("mine", 1, 10));
    accept(&mut engine, &from_tool("a", 1, "task"));
    accept(&mut engine, &from_tool("b", 1, "agent:1"));
    accept(&mut engine, &from_tool("c", 1, "task"));

    let response = accept(&mut engine, &thought("mine again", 5, 10));
    let gap = &response["gapInfo"];
    assert_eq!(gap["hasGap"], true);
    assert_eq!(gap["gapSize"], 3);
    assert_eq!(gap["createdBy"], json!(["task", "agent:1"]));
    assert!(
        gap["explanation"]
            .as_str()
            .unwrap()
            .starts_with("3 thoughts were created by other tools")
    );
    assert!(
        response["hint"]
            .as_str()
            .unwrap()
            .ends_with("[Note: Some thoughts created by other tools]")
    );

    let response = accept(&mut engine, &thought("and again", 6, 10));
    assert!(response.get("gapInfo").is_none());
}

#[test]
fn isolated_callers_get_private_numbering() {
    let mut engine = quiet_engine();
    accept(&mut engine, &thought("mine", 1, 10));

    let isolated = with(from_tool("private", 1, "agent:1"), json!({"isolatedContext": true}));
    let response = accept(&mut engine, &isolated);
    assert_eq!(response["absoluteThoughtNumber"], "A1");
    assert_eq!(response["totalThoughtsAllTime"], 1);

    let again = with(from_tool("private", 2, "agent:1"), json!({"isolatedContext": true}));
    let response = accept(&mut engine, &again);
    assert_eq!(response["absoluteThoughtNumber"], "A2");

    let other = with(from_tool("other", 1, "agent:2"), json!({"isolatedContext": true}));
    let response = accept(&mut engine, &other);
    assert_eq!(response["absoluteThoughtNumber"], "A1");

    assert_eq!(engine.thought_count(), 1);
    assert_eq!(engine.isolated("agent:1").unwrap().thought_count(), 2);
    assert_eq!(engine.isolated("agent:2").unwrap().thought_count(), 1);

    let response = accept(&mut engine, &thought("mine again", 2, 10));
    assert_eq!(response["absoluteThoughtNumber"], "A2");
    assert!(response.get("gapInfo").is_none());
}

#[test]
fn isolation_needs_a_source() {
    let mut engine = quiet_engine();
    let args = with(thought("shared", 1, 10), json!({"isolatedContext": true}));
    accept(&mut engine, &args);
    assert_eq!(engine.thought_count(), 1);
    assert!(engine.isolated("user").is_none());
}
