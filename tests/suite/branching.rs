//! Founding, continuing and switching between branches.

use serde_json::{Value, json};

use crate::common::{accept, quiet_engine, reject, thought, with};
use cascade_core::Engine;

fn branch(content: &str, from: &str, id: &str, description: Option<&str>) -> Value {
    let mut args = with(
        thought(content, 1, 3),
        json!({"branchFromThought": from, "branchId": id}),
    );
    if let Some(description) = description {
        args["branchDescription"] = json!(description);
    }
    args
}

fn switch(content: &str, to: &str) -> Value {
    json!({
        "thought": content,
        "totalThoughts": 5,
        "nextThoughtNeeded": true,
        "switchToBranch": to,
    })
}

fn two_main_thoughts() -> Engine {
    let mut engine = quiet_engine();
    accept(&mut engine, &thought("Main one", 1, 3));
    accept(&mut engine, &thought("Main two", 2, 3));
    engine
}

#[test]
fn founding_opens_a_fresh_sequence() {
    let mut engine = two_main_thoughts();
    let response = accept(
        &mut engine,
        &branch("Cache it", "A2", "alt", Some("Try caching")),
    );
    assert_eq!(response["thoughtNumber"], "S1");
    assert_eq!(response["absoluteThoughtNumber"], "A3");
    assert_eq!(response["currentBranch"], "alt");
    assert_eq!(response["currentSequence"]["id"], "seq_2");
    assert_eq!(response["currentSequence"]["summary"], "Branch: Try caching");
    assert_eq!(response["activeBranches"], 1);
    assert_eq!(
        response["hint"],
        "On branch 'alt' (Try caching) with 1 thought | Branches: alt(1)"
    );
    assert_eq!(
        response["availableBranches"],
        json!([{
            "branchId": "alt",
            "description": "Try caching",
            "thoughtCount": 1,
            "fromThought": "A2",
        }])
    );

    let sequence = engine.current_sequence().unwrap();
    assert_eq!(sequence.inherited_context.len(), 2);
    assert_eq!(sequence.parent_branch_id.as_ref().unwrap().as_str(), "alt");
}

#[test]
fn branch_summary_falls_back_to_id() {
    let mut engine = two_main_thoughts();
    let response = accept(&mut engine, &branch("x", "A1", "bare", None));
    assert_eq!(response["currentSequence"]["summary"], "Branch: bare");
    assert_eq!(response["hint"], "On branch 'bare' with 1 thought | Branches: bare(1)");
}

#[test]
fn continuing_a_branch_counts_thoughts() {
    let mut engine = two_main_thoughts();
    accept(&mut engine, &branch("b1", "A2", "alt", Some("Try caching")));
    let response = accept(&mut engine, &thought("b2", 2, 3));
    assert_eq!(response["thoughtNumber"], "S2");
    assert_eq!(
        response["hint"],
        "On branch 'alt' (Try caching) with 2 thoughts | Branches: alt(2)"
    );
    assert_eq!(engine.branch("alt").unwrap().thoughts_in_branch, 2);
}

#[test]
fn switching_moves_between_sequences() {
    let mut engine = two_main_thoughts();
    accept(&mut engine, &branch("b1", "A1", "branch-a", None));
    accept(
        &mut engine,
        &with(branch("b1", "A1", "branch-b", None), json!({"switchToBranch": "main"})),
    );
    assert_eq!(engine.current_branch(), "branch-b");

    let response = accept(&mut engine, &switch("check a", "branch-a"));
    assert_eq!(response["currentBranch"], "branch-a");
    assert_eq!(response["thoughtNumber"], "S2");
    assert!(response["hint"].as_str().unwrap().starts_with("On branch 'branch-a'"));

    let response = accept(&mut engine, &switch("check main", "main"));
    assert_eq!(response["currentBranch"], "main");
    assert_eq!(response["thoughtNumber"], "S3");
    assert_eq!(response["activeBranches"], 2);
    let hint = response["hint"].as_str().unwrap();
    assert!(!hint.contains("On branch"));
    assert!(hint.contains("Branches: branch-a(2), branch-b(1)"));
}

#[test]
fn supplied_position_is_checked_after_switch() {
    let mut engine = two_main_thoughts();
    accept(&mut engine, &branch("b1", "A1", "alt", None));
    let args = with(switch("back", "main"), json!({"thoughtNumber": "S1"}));
    assert_eq!(
        reject(&mut engine, &args),
        "Invalid thought number: expected S3 for current sequence, but got S1"
    );
    assert_eq!(engine.current_branch(), "alt");
}

#[test]
fn unknown_and_reserved_branches_are_rejected() {
    let mut engine = two_main_thoughts();
    accept(&mut engine, &branch("b1", "A1", "alt", None));

    assert_eq!(
        reject(&mut engine, &switch("lost", "ghost")),
        "Branch 'ghost' does not exist. Available branches: main, alt."
    );
    assert_eq!(
        reject(&mut engine, &branch("no", "A1", "main", None)),
        "Invalid branchId: 'main' is reserved for the root sequence"
    );
    assert_eq!(
        reject(
            &mut engine,
            &with(switch("both", "alt"), json!({"startNewSequence": true})),
        ),
        "Cannot combine switchToBranch with startNewSequence. Please use one or the other."
    );
    assert_eq!(engine.thought_count(), 3);
    assert_eq!(engine.sequence_count(), 2);
}

#[test]
fn origin_without_id_only_validates_the_reference() {
    let mut engine = two_main_thoughts();
    let missing = with(thought("x", 3, 3), json!({"branchFromThought": "A9"}));
    assert!(reject(&mut engine, &missing).starts_with("Absolute thought A9 does not exist"));

    let args = with(thought("x", 3, 3), json!({"branchFromThought": "A1"}));
    let response = accept(&mut engine, &args);
    assert_eq!(response["currentSequence"]["id"], "seq_1");
    assert_eq!(engine.branch_count(), 0);
}

#[test]
fn refounding_an_id_replaces_the_branch() {
    let mut engine = two_main_thoughts();
    accept(&mut engine, &branch("b1", "A2", "alt", Some("first")));
    accept(&mut engine, &thought("b2", 2, 3));
    let response = accept(&mut engine, &branch("again", "A1", "alt", Some("second")));
    assert_eq!(response["currentSequence"]["id"], "seq_3");
    let branches = response["availableBranches"].as_array().unwrap();
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0]["thoughtCount"], 1);
    assert_eq!(branches[0]["fromThought"], "A1");
    assert_eq!(branches[0]["description"], "second");
}

#[test]
fn verbose_mode_draws_the_branch_tree() {
    let mut engine = quiet_engine();
    for n in 1..4 {
        accept(&mut engine, &thought("main", n, 4));
    }
    accept(
        &mut engine,
        &branch("auth", "A1", "feature-auth", Some("Authentication exploration")),
    );
    accept(
        &mut engine,
        &branch("oauth", "S1", "oauth-specific", Some("OAuth2 implementation")),
    );
    accept(
        &mut engine,
        &branch("db", "A2", "feature-db", Some("Database optimization")),
    );

    let args = with(
        switch("overview", "main"),
        json!({"responseMode": "verbose"}),
    );
    let response = accept(&mut engine, &args);
    assert_eq!(response["sequenceHistory"].as_array().unwrap().len(), 4);
    assert_eq!(response["branches"]["oauth-specific"]["fromSequenceId"], "seq_2");

    let tree = response["branchTree"].as_str().unwrap();
    insta::assert_snapshot!(tree, @r"
    Branch Tree Structure:
    📋 Main (4 thoughts)
    ├─ 🌿 feature-auth (Authentication exploration) [1 thought]
    │  └─ 🌿 oauth-specific (OAuth2 implementation) [1 thought]
    └─ 🌿 feature-db (Database optimization) [1 thought]
    ");
}
