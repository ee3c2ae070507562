//! Replay the store scenarios stored in `test-vectors/scenarios.json`.
//!
//! Each case lists user actions with the canned server response for any
//! action that reaches the network, then the list, request count, and editing
//! cursor expected at the end. Items are compared as parsed values so field
//! order in the file does not matter.

use serde_json::Value;
use todo_store::{
    ApiError, DraftItem, ScriptedTransport, TodoClient, TodoId, TodoItem, TodoListStore,
    UpdateTodo,
};

const BASE_URL: &str = "http://localhost:8000";

/// Queue the step's response, if it has one.
fn script(transport: &ScriptedTransport, step: &Value) {
    let Some(response) = step.get("response") else {
        return;
    };
    if let Some(kind) = response.get("error") {
        match kind.as_str().unwrap() {
            "transport" => transport.push_error(ApiError::Transport("connection refused".to_string())),
            other => panic!("unknown scripted error: {other}"),
        }
        return;
    }
    let status = response["status"].as_u64().unwrap() as u16;
    let body = match response.get("raw") {
        Some(raw) => raw.as_str().unwrap().to_string(),
        None => response["body"].to_string(),
    };
    transport.push_response(status, body);
}

fn draft(step: &Value) -> DraftItem {
    DraftItem::new(
        step["title"].as_str().unwrap(),
        step["description"].as_str().unwrap_or_default(),
    )
}

async fn run_step(store: &TodoListStore<ScriptedTransport>, step: &Value) -> Result<(), ApiError> {
    let nth = |step: &Value| -> TodoItem {
        let index = step["index"].as_u64().unwrap() as usize;
        store.items()[index].clone()
    };
    let id = |step: &Value| TodoId::new(step["id"].as_str().unwrap());

    match step["op"].as_str().unwrap() {
        "load" => store.load().await,
        "create" => store.create(draft(step)).await.map(drop),
        "toggle" => store.toggle_complete(&nth(step)).await.map(drop),
        "update" => {
            let fields: UpdateTodo = serde_json::from_value(step["fields"].clone()).unwrap();
            store.update(&id(step), fields).await.map(drop)
        }
        "delete" => store.delete(&id(step)).await,
        "start_edit" => {
            store.start_edit(&nth(step));
            Ok(())
        }
        "set_draft_edit" => {
            store.set_draft_edit(draft(step));
            Ok(())
        }
        "save_edit" => store.save_edit().await.map(drop),
        "cancel_edit" => {
            store.cancel_edit();
            Ok(())
        }
        other => panic!("unknown op: {other}"),
    }
}

#[tokio::test]
async fn store_scenarios() {
    let raw = include_str!("../../test-vectors/scenarios.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let store = TodoListStore::new(TodoClient::new(BASE_URL), ScriptedTransport::new());

        for (i, step) in case["steps"].as_array().unwrap().iter().enumerate() {
            script(store.transport(), step);
            let result = run_step(&store, step).await;
            let expect_error = step["expect_error"].as_bool().unwrap_or(false);
            assert_eq!(result.is_err(), expect_error, "{name}: step {i} outcome {result:?}");
        }

        let expected: Vec<TodoItem> = serde_json::from_value(case["expected_items"].clone()).unwrap();
        assert_eq!(store.items(), expected, "{name}: items");

        let requests = case["expected_requests"].as_u64().unwrap() as usize;
        assert_eq!(store.transport().request_count(), requests, "{name}: request count");
        assert_eq!(store.transport().pending(), 0, "{name}: unused scripted responses");

        let editing = case["expected_editing"].as_str().map(TodoId::new);
        assert_eq!(store.editing_id(), editing, "{name}: editing cursor");
    }
}
