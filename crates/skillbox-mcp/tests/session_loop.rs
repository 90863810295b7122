//! Session loop tests: whole line streams in, reply lines out.

use std::sync::Arc;

use serde_json::Value;

use skillbox_mcp::protocol::ProtocolHandler;
use skillbox_mcp::tools::ToolRegistry;
use skillbox_mcp::transport::{process_line, StdioTransport};

fn transport() -> StdioTransport {
    StdioTransport::new(ProtocolHandler::new(Arc::new(ToolRegistry::builtin())))
}

/// Run one session over raw bytes and return everything written.
async fn run_raw(input: &[u8]) -> String {
    let mut output = Vec::new();
    transport()
        .serve(input, &mut output)
        .await
        .expect("session failed");
    String::from_utf8(output).expect("output is not UTF-8")
}

/// Run one session over `input` and return the reply lines.
async fn run_session(input: &str) -> Vec<String> {
    let text = run_raw(input.as_bytes()).await;
    assert!(text.is_empty() || text.ends_with('\n'));
    text.lines().map(str::to_string).collect()
}

fn parse(line: &str) -> Value {
    serde_json::from_str(line).expect("reply line is not JSON")
}

#[tokio::test]
async fn full_session_transcript() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"add","arguments":{"a":2,"b":3}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"bogus","arguments":{}}}"#,
        "\n",
        "not json\n",
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/list"}"#,
        "\n",
    );

    let lines = run_session(input).await;
    assert_eq!(lines.len(), 4);

    let init = parse(&lines[0]);
    assert_eq!(init["id"], 1);
    assert!(init["result"]["protocolVersion"].is_string());

    let add = parse(&lines[1]);
    assert_eq!(add["id"], 2);
    assert!(add["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("2 + 3 = 5"));

    let bogus = parse(&lines[2]);
    assert_eq!(bogus["id"], 3);
    assert_eq!(bogus["result"]["isError"], true);

    let list = parse(&lines[3]);
    assert_eq!(list["id"], 4);
    assert_eq!(list["result"]["tools"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn replies_come_back_in_request_order() {
    let input: String = (1..=20)
        .map(|i| format!(r#"{{"jsonrpc":"2.0","id":{i},"method":"ping"}}"#) + "\n")
        .collect();
    let ids: Vec<i64> = run_session(&input)
        .await
        .iter()
        .map(|l| parse(l)["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, (1..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn notifications_and_garbage_produce_no_output() {
    let input = concat!(
        "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
        "\n",
        "   \n",
        "[1, 2, 3]\n",
        "\"just a string\"\n",
        "{\"unterminated\": \n",
        "{\"jsonrpc\":\"2.0\",\"method\":\"tools/call\",\"params\":{\"name\":\"echo\"}}\n",
    );
    assert!(run_session(input).await.is_empty());
}

#[tokio::test]
async fn session_survives_faults() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"add","arguments":{"a":"two"}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":"b","method":"tools/call","params":{"name":"calculate","arguments":{"expression":"7 // 2"}}}"#,
        "\n",
    );
    let lines = run_session(input).await;
    assert_eq!(lines.len(), 2);

    let fault = parse(&lines[0]);
    assert_eq!(fault["id"], "a");
    assert_eq!(fault["error"]["code"], -32603);
    assert!(fault.get("result").is_none());

    let ok = parse(&lines[1]);
    assert_eq!(ok["id"], "b");
    assert_eq!(ok["result"]["content"][0]["text"], "7 // 2 = 3");
}

#[tokio::test]
async fn crlf_line_endings_are_accepted() {
    let lines = run_session("{\"jsonrpc\":\"2.0\",\"id\":0,\"method\":\"ping\"}\r\n").await;
    assert_eq!(lines, [r#"{"jsonrpc":"2.0","id":0,"result":{}}"#]);
}

#[tokio::test]
async fn discovery_twice_is_byte_identical() {
    let input = concat!(
        "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n",
        "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n",
    );
    let lines = run_session(input).await;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], lines[1]);
}

#[tokio::test]
async fn empty_input_ends_cleanly() {
    assert!(run_raw(b"").await.is_empty());
}

#[tokio::test]
async fn invalid_utf8_line_is_skipped() {
    let mut input = vec![0xff, 0xfe, b'\n'];
    input.extend_from_slice(b"{\"id\":1,\"method\":\"ping\"}\n");
    assert_eq!(run_raw(&input).await, "{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n");
}

#[tokio::test]
async fn last_line_without_newline_is_processed() {
    assert_eq!(
        run_raw(b"{\"id\":2,\"method\":\"ping\"}").await,
        "{\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{}}\n"
    );
}

#[tokio::test]
async fn malformed_tools_call_params_do_not_end_the_session() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":null,"arguments":{}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":5,"arguments":{}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":[1,2]}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":4,"method":"ping"}"#,
        "\n",
    );
    let lines = run_session(input).await;
    assert_eq!(lines.len(), 4);

    let null_name = parse(&lines[0]);
    assert_eq!(null_name["result"]["isError"], true);
    assert_eq!(null_name["result"]["content"][0]["text"], "Unknown tool: null");

    let number_name = parse(&lines[1]);
    assert_eq!(number_name["result"]["isError"], true);
    assert_eq!(number_name["result"]["content"][0]["text"], "Unknown tool: 5");

    let array_params = parse(&lines[2]);
    assert_eq!(array_params["id"], 3);
    assert_eq!(array_params["error"]["code"], -32603);

    assert_eq!(parse(&lines[3])["result"], serde_json::json!({}));
}

#[test]
fn process_line_skips_garbage() {
    let t = transport();
    assert!(process_line(t.handler(), "not json").unwrap().is_none());
    assert!(process_line(t.handler(), "[1, 2]").unwrap().is_none());
}
