/// Driving the stdio server with scripted request lines
use habit_ledger::mcp::protocol::error_codes;
use habit_ledger::mcp::McpServer;
use habit_ledger::*;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Feed request lines to a server and collect one parsed response per output line
fn exchange<S: DocumentStore>(server: &mut McpServer<S>, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    let mut output: Vec<u8> = Vec::new();

    tokio_test::block_on(server.serve(input.as_bytes(), &mut output)).expect("server failed");

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn tool_call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

#[test]
fn test_handshake_and_tool_listing() {
    let mut server = McpServer::new(HabitLedger::with_store(MemoryStore::new()));
    let responses = exchange(
        &mut server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ],
    );

    // The notification gets no response
    assert_eq!(responses.len(), 2);
    assert!(server.is_initialized());

    let init = &responses[0]["result"];
    assert_eq!(init["serverInfo"]["name"], json!("habit-ledger"));
    assert!(init["protocolVersion"].is_string());

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    for expected in ["habit_add", "entry_record", "habit_report", "obligation_upcoming", "plan_check"] {
        assert!(names.contains(&expected), "missing tool {}", expected);
    }
    let record = tools.iter().find(|t| t["name"] == json!("entry_record")).unwrap();
    assert!(record["inputSchema"]["properties"]["habit_id"].is_object());
}

#[test]
fn test_habit_workflow_over_json_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = JsonFileStore::open(dir.path()).unwrap();
    let mut server = McpServer::new(HabitLedger::with_store(store));

    let added = exchange(&mut server, &[tool_call(1, "habit_add", json!({"name": "Meditate"}))]);
    let habit_id = added[0]["result"]["structuredContent"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let responses = exchange(
        &mut server,
        &[
            tool_call(2, "entry_record", json!({"habit_id": habit_id, "date": "2025-05-01", "status": "done"})),
            tool_call(3, "entry_record", json!({"habit_id": habit_id, "date": "2025-05-02", "status": "done"})),
            tool_call(4, "habit_report", json!({"habit_id": habit_id, "end": "2025-05-02", "window_days": 7})),
            tool_call(5, "entry_record", json!({"habit_id": habit_id, "date": "2025-05-03", "status": 9})),
            tool_call(6, "habit_add", json!({"name": "Meditate"})),
            tool_call(7, "entry_record", json!({"habit_id": "nobody", "status": "done"})),
            tool_call(8, "entry_record", json!({"habit_id": habit_id, "date": "2025-02-30", "status": "done"})),
            tool_call(9, "entries_clear", json!({})),
        ],
    );

    assert_eq!(responses.len(), 8);
    assert_eq!(responses[1]["result"]["structuredContent"]["currentStreak"], json!(2));

    let report = &responses[2]["result"]["structuredContent"]["reports"][0];
    assert_eq!(report["summary"]["current_streak"], json!(2));
    assert_eq!(report["summary"]["completion_rate"], json!(28.6));

    assert_eq!(responses[3]["error"]["code"], json!(error_codes::VALIDATION_ERROR));
    assert_eq!(responses[4]["error"]["code"], json!(error_codes::DUPLICATE_NAME));
    assert_eq!(responses[5]["error"]["code"], json!(error_codes::UNKNOWN_ID));
    assert_eq!(responses[6]["error"]["code"], json!(error_codes::VALIDATION_ERROR));
    assert_eq!(responses[6]["error"]["data"]["tool"], json!("entry_record"));
    // Clearing without confirm is refused
    assert!(responses[7].get("error").is_some());

    // Everything written went through the JSON files
    let reopened = HabitLedger::with_store(JsonFileStore::open(dir.path()).unwrap());
    let id = HabitId::parse(&habit_id).unwrap();
    assert_eq!(reopened.list_habits().len(), 1);
    assert_eq!(
        reopened
            .entries_in_range(&id, "2025-05-01".parse().unwrap(), "2025-05-31".parse().unwrap())
            .len(),
        2
    );
}

#[test]
fn test_bad_lines_do_not_stop_the_server() {
    let mut server = McpServer::new(HabitLedger::with_store(MemoryStore::new()));
    let input = "not json\n\n{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"ping\"}\n";
    let mut output: Vec<u8> = Vec::new();

    tokio_test::block_on(server.serve(input.as_bytes(), &mut output)).unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], json!(error_codes::PARSE_ERROR));
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["id"], json!(3));
    assert!(responses[1]["result"].is_object());
}

#[test]
fn test_unknown_tool_and_bad_arguments() {
    let mut server = McpServer::new(HabitLedger::with_store(MemoryStore::new()));
    let responses = exchange(
        &mut server,
        &[
            tool_call(1, "habit_fly", json!({})),
            tool_call(2, "habit_add", json!({"title": "Run"})),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call"}),
        ],
    );

    assert_eq!(responses[0]["error"]["code"], json!(error_codes::METHOD_NOT_FOUND));
    assert_eq!(responses[1]["error"]["code"], json!(error_codes::INVALID_PARAMS));
    assert_eq!(responses[2]["error"]["code"], json!(error_codes::INVALID_PARAMS));
}

#[test]
fn test_obligations_and_planning_tools() {
    let mut server = McpServer::new(HabitLedger::with_store(MemoryStore::new()));
    let responses = exchange(
        &mut server,
        &[
            tool_call(
                1,
                "obligation_add",
                json!({"name": "Rent", "amount": 1200, "anchor_date": "2025-01-31", "recurrence": "monthly"}),
            ),
            tool_call(2, "obligation_upcoming", json!({"reference": "2025-02-10"})),
            tool_call(
                3,
                "plan_check",
                json!({"blocks": [
                    {"title": "Write", "start": "09:00", "minutes": 90},
                    {"title": "Call", "start": "10:00", "minutes": 30}
                ]}),
            ),
            tool_call(
                4,
                "countdown",
                json!({"end": "2025-06-01T10:00:00Z", "now": "2025-06-01T09:35:00Z"}),
            ),
        ],
    );

    let upcoming = &responses[1]["result"]["structuredContent"];
    assert_eq!(upcoming["occurrences"][0]["date"], json!("2025-02-28"));
    assert_eq!(upcoming["occurrences"][0]["daysUntil"], json!(18));
    assert_eq!(upcoming["dueThisHorizon"], json!(1200));

    let plan = &responses[2]["result"]["structuredContent"];
    assert_eq!(plan["conflicts"][0]["later"], json!("Call"));

    let countdown = &responses[3]["result"]["structuredContent"];
    assert_eq!(countdown["remainingSeconds"], json!(1500));
    assert_eq!(countdown["display"], json!("25:00"));
}
