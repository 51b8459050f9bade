//! Host bridge tests: NDJSON commands in, responses and events out.

use serde_json::{Value, json};
use sift::host::contract::{EVENT_VERSION, STATE_CHANGED_EVENT};
use sift::host::run_bridge;
use sift::{ControllerConfig, PageWindow, SearchBackend, SearchController, SearchError};
use sift_client::{ResultItem, SearchPage, SearchRequest};
use tokio::io::{AsyncReadExt, BufReader};

/// Fifty results in total; pages past the fifth come back empty.
struct FiftyResults;

impl SearchBackend for FiftyResults {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        let start = (request.page - 1) * request.per_page;
        let count = 50u32.saturating_sub(start).min(request.per_page);
        Ok(SearchPage {
            results: (0..count)
                .map(|i| ResultItem {
                    title: format!("{} {}", request.query, start + i + 1),
                    url: format!("https://example.org/{}", start + i + 1),
                    content: String::new(),
                    engine: "openlibrary".into(),
                    score: 1.0,
                })
                .collect(),
            number_of_results: 50,
            has_next: None,
            has_previous: None,
        })
    }

    fn per_page(&self) -> u32 {
        10
    }
}

/// Run the bridge over `input` and return every output line as JSON.
async fn run_lines(config: ControllerConfig, input: &str) -> Vec<Value> {
    let controller = SearchController::new(FiftyResults, config);
    let (writer, mut output) = tokio::io::duplex(1 << 20);
    let reader = BufReader::new(input.as_bytes());

    run_bridge(controller, reader, writer)
        .await
        .expect("bridge should exit cleanly");

    let mut raw = String::new();
    output.read_to_string(&mut raw).await.expect("read output");
    raw.lines()
        .map(|line| serde_json::from_str(line).expect("every line is JSON"))
        .collect()
}

fn response<'a>(lines: &'a [Value], request_id: &str) -> Option<&'a Value> {
    lines
        .iter()
        .find(|line| line.get("request_id").and_then(Value::as_str) == Some(request_id))
}

fn last_state(lines: &[Value]) -> &Value {
    let event = lines
        .iter()
        .rev()
        .find(|line| line["event"] == json!(STATE_CHANGED_EVENT))
        .expect("at least one state event");
    &event["payload"]
}

fn command(id: &str, name: &str, payload: Value) -> String {
    json!({"v": EVENT_VERSION, "request_id": id, "command": name, "payload": payload}).to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Protocol
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_gets_a_response() {
    let input = command("r1", "host.ping", json!({})) + "\n";
    let lines = run_lines(ControllerConfig::default(), &input).await;
    let pong = response(&lines, "r1").expect("response");
    assert_eq!(pong["ok"], json!(true));
    assert_eq!(pong["payload"]["pong"], json!(true));
}

#[tokio::test]
async fn malformed_line_gets_parse_error_and_bridge_continues() {
    let input = format!(
        "not json\n\n{}\n",
        command("r2", "host.version", json!({}))
    );
    let lines = run_lines(ControllerConfig::default(), &input).await;
    let parse_error = response(&lines, "parse-error").expect("parse error response");
    assert_eq!(parse_error["ok"], json!(false));
    assert!(response(&lines, "r2").is_some());
}

#[tokio::test]
async fn stop_ends_the_session() {
    let input = [
        command("r1", "host.stop", json!({})),
        command("r2", "host.ping", json!({})),
    ]
    .join("\n");
    let lines = run_lines(ControllerConfig::default(), &input).await;
    assert_eq!(response(&lines, "r1").expect("stop")["payload"]["stopping"], json!(true));
    assert!(response(&lines, "r2").is_none());
}

// ────────────────────────────────────────────────────────────────────────────
// State events
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_is_accepted_and_final_state_is_emitted() {
    let input = command("r1", "search.submit", json!({"query": "dune"})) + "\n";
    let lines = run_lines(ControllerConfig::default(), &input).await;

    assert_eq!(
        response(&lines, "r1").expect("response")["payload"],
        json!({"accepted": true})
    );
    let state = last_state(&lines);
    assert_eq!(state["query"], json!("dune"));
    assert_eq!(state["phase"], json!("settled"));
    assert_eq!(state["loading"], json!(false));
    assert_eq!(state["total_results"], json!(50));
    assert_eq!(state["total_pages"], json!(5));
    assert_eq!(state["result_range"], json!({"start": 1, "end": 10}));
    assert_eq!(state["visible_pages"], json!([1, 2, 3]));
}

#[tokio::test]
async fn events_carry_envelope_fields() {
    let input = command("r1", "search.submit", json!({"query": "dune"})) + "\n";
    let lines = run_lines(ControllerConfig::default(), &input).await;
    let event = lines
        .iter()
        .find(|line| line.get("event").is_some())
        .expect("event");
    assert_eq!(event["v"], json!(EVENT_VERSION));
    assert!(!event["event_id"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn compressed_window_is_reported() {
    let config = ControllerConfig {
        page_window: PageWindow::Compressed,
        ..Default::default()
    };
    let input = command("r1", "search.submit", json!({"query": "dune"})) + "\n";
    let lines = run_lines(config, &input).await;
    assert_eq!(last_state(&lines)["visible_pages"], json!([1, 2, 3, 4, 5]));
}

#[tokio::test]
async fn filters_without_query_are_stored() {
    let input = command(
        "r1",
        "filters.apply",
        json!({"category": "books", "engines": ["openlibrary"]}),
    ) + "\n";
    let lines = run_lines(ControllerConfig::default(), &input).await;
    let state = last_state(&lines);
    assert_eq!(state["category"], json!("books"));
    assert_eq!(state["engines"], json!(["openlibrary"]));
    assert_eq!(state["phase"], json!("idle"));
}
