// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end tests for the runtime API client against a local mock server.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::client::{InstanceDataKind, RuntimeApiError, RuntimeClient};
use crate::model::{InstanceId, TaskId};

#[derive(Debug, Clone, Default)]
struct Recorded {
    authorization: Arc<Mutex<Option<Option<String>>>>,
    accept: Arc<Mutex<Option<Option<String>>>>,
    query: Arc<Mutex<Option<BTreeMap<String, String>>>>,
    put_path: Arc<Mutex<Option<String>>>,
}

impl Recorded {
    fn capture_headers(&self, headers: &HeaderMap) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        *self.authorization.lock().expect("lock") = Some(header("authorization"));
        *self.accept.lock().expect("lock") = Some(header("accept"));
    }
}

async fn invocation_handler(
    State(recorded): State<Recorded>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    recorded.capture_headers(&headers);
    Json(json!({
        "request": {"method": "GET", "url": format!("/orders/{id}")},
        "response": {"status": 200, "body": "'{\"ok\":true}'"},
    }))
}

async fn instances_handler(
    State(recorded): State<Recorded>,
    Query(params): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    recorded.capture_headers(&headers);
    *recorded.query.lock().expect("lock") = Some(params);
    Json(json!([
        {"id": "c1", "workflow": "orders", "status": "completed"},
    ]))
}

async fn task_handler(
    State(recorded): State<Recorded>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    recorded.capture_headers(&headers);
    Json(json!({"values": {"approver": "dana"}}))
}

async fn data_handler(
    State(recorded): State<Recorded>,
    Path((id, kind)): Path<(String, String)>,
    Query(params): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    recorded.capture_headers(&headers);
    *recorded.query.lock().expect("lock") = Some(params);
    *recorded.put_path.lock().expect("lock") = Some(format!("/data/{id}/{kind}"));
    Json(json!({}))
}

async fn serve_mock(recorded: Recorded) -> String {
    let router = Router::new()
        .route("/invocations/{id}", get(invocation_handler))
        .route("/instances", get(instances_handler))
        .route("/tasks/{id}", get(task_handler))
        .route("/data/{id}/{kind}", put(data_handler))
        .with_state(recorded);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve mock");
    });
    format!("http://{addr}")
}

fn instance_id(value: &str) -> InstanceId {
    InstanceId::new(value).expect("instance id")
}

#[tokio::test]
async fn invocation_fetch_sends_accept_and_bearer() {
    let recorded = Recorded::default();
    let base_url = serve_mock(recorded.clone()).await;

    let client = RuntimeClient::new(base_url, Some("sekrit".to_owned()));
    let invocation = client.invocation(&instance_id("i1")).await.expect("invocation");

    assert_eq!(
        invocation.request.expect("request").method.as_deref(),
        Some("GET")
    );
    assert_eq!(
        recorded.authorization.lock().expect("lock").clone(),
        Some(Some("Bearer sekrit".to_owned()))
    );
    assert_eq!(
        recorded.accept.lock().expect("lock").clone(),
        Some(Some("application/json".to_owned()))
    );
}

#[tokio::test]
async fn bearer_header_is_omitted_without_a_token() {
    let recorded = Recorded::default();
    let base_url = serve_mock(recorded.clone()).await;

    let client = RuntimeClient::new(base_url, None);
    client.invocation(&instance_id("i1")).await.expect("invocation");

    assert_eq!(recorded.authorization.lock().expect("lock").clone(), Some(None));
}

#[tokio::test]
async fn child_instances_send_both_correlation_params() {
    let recorded = Recorded::default();
    let base_url = serve_mock(recorded.clone()).await;

    let client = RuntimeClient::new(base_url, None);
    let children = client
        .child_instances(&instance_id("w1"), Some(&instance_id("s1")))
        .await
        .expect("children");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, "c1");

    let params = recorded.query.lock().expect("lock").clone().expect("query");
    assert_eq!(params.get("parentInstanceId").map(String::as_str), Some("w1"));
    assert_eq!(
        params.get("parentStateInstanceId").map(String::as_str),
        Some("s1")
    );

    // Absent parent-state goes out as the empty string, not an omitted param.
    client
        .child_instances(&instance_id("w1"), None)
        .await
        .expect("children");
    let params = recorded.query.lock().expect("lock").clone().expect("query");
    assert_eq!(
        params.get("parentStateInstanceId").map(String::as_str),
        Some("")
    );
}

#[tokio::test]
async fn task_fetch_decodes_the_values_mapping() {
    let recorded = Recorded::default();
    let base_url = serve_mock(recorded.clone()).await;

    let client = RuntimeClient::new(base_url, None);
    let task = client
        .task(&TaskId::new("t1").expect("task id"))
        .await
        .expect("task");
    assert_eq!(task.values.get("approver"), Some(&json!("dana")));
}

#[tokio::test]
async fn put_data_targets_the_expected_path_and_query() {
    let recorded = Recorded::default();
    let base_url = serve_mock(recorded.clone()).await;

    let client = RuntimeClient::new(base_url, None);
    client
        .put_data(
            &instance_id("w1"),
            InstanceDataKind::Input,
            Some(&instance_id("s1")),
            &json!({"orderId": 7}),
        )
        .await
        .expect("put data");

    assert_eq!(
        recorded.put_path.lock().expect("lock").clone().as_deref(),
        Some("/data/w1/input")
    );
    let params = recorded.query.lock().expect("lock").clone().expect("query");
    assert_eq!(params.get("stateInstanceId").map(String::as_str), Some("s1"));
}

#[tokio::test]
async fn failing_status_is_a_typed_error() {
    let recorded = Recorded::default();
    let base_url = serve_mock(recorded).await;

    let client = RuntimeClient::new(format!("{base_url}/missing"), None);
    let err = client
        .invocation(&instance_id("i1"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, RuntimeApiError::Status { status: 404, .. }));
}
