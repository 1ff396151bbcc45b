//! The stdio server end to end, plus configuration feeding the engine.

use std::fs;

use serde_json::{Value, json};

use cascade_config::CascadeConfig;
use cascade_core::EngineOptions;
use cascade_thinking::Server;
use cascade_types::ResponseMode;

fn quiet_server() -> Server {
    Server::new(EngineOptions {
        log_thoughts: false,
        ..EngineOptions::default()
    })
}

async fn exchange(server: &mut Server, requests: &[String]) -> Vec<Value> {
    let input = requests.join("\n");
    let mut output = Vec::new();
    server.run(input.as_bytes(), &mut output).await.unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn call(id: i64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments},
    })
    .to_string()
}

fn tool_text(reply: &Value) -> Value {
    let text = reply["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn full_session_over_stdio() {
    let mut server = quiet_server();
    let requests = vec![
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string(),
        call(
            3,
            "cascade_thinking",
            json!({"thought": "Start", "thoughtNumber": "S1", "totalThoughts": 2, "nextThoughtNeeded": true}),
        ),
        call(
            4,
            "cascade_thinking",
            json!({"thought": "Skip", "thoughtNumber": "S4", "totalThoughts": 2, "nextThoughtNeeded": true}),
        ),
        call(5, "sequential_thinking", json!({})),
        "this is not json".to_string(),
        json!({"jsonrpc": "2.0", "id": 6, "method": "ping"}).to_string(),
    ];

    let replies = exchange(&mut server, &requests).await;
    assert_eq!(replies.len(), 7);

    assert_eq!(replies[0]["id"], 1);
    assert_eq!(
        replies[0]["result"]["serverInfo"]["name"],
        "cascade-thinking-mcp"
    );

    let tools = replies[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "cascade_thinking");
    assert_eq!(
        tools[0]["inputSchema"]["required"],
        json!(["thought", "totalThoughts", "nextThoughtNeeded"])
    );

    assert!(replies[2]["result"].get("isError").is_none());
    assert_eq!(tool_text(&replies[2])["absoluteThoughtNumber"], "A1");

    assert_eq!(replies[3]["result"]["isError"], true);
    assert_eq!(
        tool_text(&replies[3]),
        json!({
            "error": "Invalid thought number: expected S2 for current sequence, but got S4",
            "status": "failed",
        })
    );

    assert_eq!(replies[4]["result"]["isError"], true);
    assert_eq!(
        replies[4]["result"]["content"][0]["text"],
        "Unknown tool: sequential_thinking"
    );

    assert_eq!(replies[5]["id"], Value::Null);
    assert_eq!(replies[5]["error"]["code"], -32700);

    assert_eq!(replies[6]["id"], 6);
    assert_eq!(replies[6]["result"], json!({}));

    assert_eq!(server.engine().thought_count(), 1);
}

#[tokio::test]
async fn invalid_utf8_frame_keeps_the_session_alive() {
    let mut server = quiet_server();
    let ping = |id: i64| json!({"jsonrpc": "2.0", "id": id, "method": "ping"}).to_string();

    let mut input = ping(1).into_bytes();
    input.extend_from_slice(b"\n\xff\xfe\n");
    input.extend_from_slice(ping(2).as_bytes());
    input.push(b'\n');

    let mut output = Vec::new();
    server.run(input.as_slice(), &mut output).await.unwrap();
    let replies: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0]["id"], 1);
    assert_eq!(replies[1]["id"], Value::Null);
    assert_eq!(replies[1]["error"]["code"], -32700);
    assert_eq!(replies[2]["id"], 2);
    assert_eq!(replies[2]["result"], json!({}));
}

#[tokio::test]
async fn state_persists_across_calls() {
    let mut server = quiet_server();
    let requests: Vec<String> = (1..=3)
        .map(|n| {
            call(
                n,
                "cascade_thinking",
                json!({
                    "thought": format!("step {n}"),
                    "thoughtNumber": format!("S{n}"),
                    "totalThoughts": 3,
                    "nextThoughtNeeded": n < 3,
                }),
            )
        })
        .collect();
    let replies = exchange(&mut server, &requests).await;
    let last = tool_text(&replies[2]);
    assert_eq!(last["absoluteThoughtNumber"], "A3");
    assert!(last.get("expectedThoughtNumber").is_none());
}

#[test]
fn config_file_shapes_engine_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[logging]\nthought_log = false\n\n[engine]\nresponse_mode = \"minimal\"\nrecent_thoughts_limit = 2\n",
    )
    .unwrap();

    let config = CascadeConfig::load_from(&path).unwrap();
    let options = EngineOptions::from_config(&config);
    assert!(!options.log_thoughts);
    assert_eq!(options.response_mode, ResponseMode::Minimal);
    assert_eq!(options.recent_limit, 2);

    let mut server = Server::new(options);
    let reply = server
        .handle_line(&call(
            1,
            "cascade_thinking",
            json!({"thought": "x", "thoughtNumber": "S1", "totalThoughts": 1, "nextThoughtNeeded": false}),
        ))
        .unwrap();
    let reply = serde_json::to_value(reply).unwrap();
    let response = tool_text(&reply);
    assert!(response.get("currentSequence").is_none());
}

#[test]
fn broken_config_is_a_typed_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[engine]\nrecent_thoughts_limit = \"lots\"\n").unwrap();
    let err = CascadeConfig::load_from(&path).unwrap_err();
    assert_eq!(err.path(), path.as_path());
}
