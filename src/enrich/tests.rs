// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;

use super::{
    child_row, format_response_body, invocation_patch, task_rows, EnrichmentPatch, Enricher,
    InstanceView, InvocationRecord, InvocationRequest, InvocationResponse, TaskRecord,
};
use crate::format::DocumentDialect;
use crate::model::{ElementId, InstanceRecord};

#[test]
fn view_pretty_prints_structured_fields_with_two_spaces() {
    let record = InstanceRecord {
        id: "i1".to_owned(),
        workflow: Some("orders".to_owned()),
        log: Some(json!(["started", "finished"])),
        input: Some(json!({"orderId": 7})),
        ..InstanceRecord::default()
    };

    let view = InstanceView::from_record(&record);
    assert_eq!(view.workflow, "orders");
    assert_eq!(view.input.as_deref(), Some("{\n  \"orderId\": 7\n}"));
    assert_eq!(view.log.as_deref(), Some("[\n  \"started\",\n  \"finished\"\n]"));
}

#[test]
fn absent_output_is_normalized_to_an_empty_string() {
    let record = InstanceRecord {
        id: "i1".to_owned(),
        ..InstanceRecord::default()
    };
    let view = InstanceView::from_record(&record);
    assert_eq!(view.output, "");

    let record = InstanceRecord {
        id: "i1".to_owned(),
        output: Some(json!({"ok": true})),
        ..InstanceRecord::default()
    };
    let view = InstanceView::from_record(&record);
    assert_eq!(view.output, "{\n  \"ok\": true\n}");
}

#[test]
fn response_body_strips_one_quote_layer_on_single_lines() {
    assert_eq!(format_response_body(&json!("'plain'")), "plain");
    assert_eq!(format_response_body(&json!("\"plain\"")), "plain");
    // Only one layer comes off.
    assert_eq!(format_response_body(&json!("''double''")), "'double'");
    // Multi-line strings are left untouched.
    assert_eq!(format_response_body(&json!("'a'\n'b'")), "'a'\n'b'");
}

#[test]
fn bracketed_response_bodies_are_reformatted_as_json() {
    assert_eq!(
        format_response_body(&json!("'{\"ok\":true}'")),
        "{\n  \"ok\": true\n}"
    );
    assert_eq!(format_response_body(&json!("[1,2]")), "[\n  1,\n  2\n]");
    // Bracketed but not valid JSON: left as stripped text.
    assert_eq!(format_response_body(&json!("'{nope}'")), "{nope}");
}

#[test]
fn structured_response_bodies_are_pretty_printed() {
    assert_eq!(format_response_body(&json!({"ok": true})), "{\n  \"ok\": true\n}");
}

#[test]
fn invocation_patch_formats_the_request_in_the_session_dialect() {
    let invocation = InvocationRecord {
        request: Some(InvocationRequest {
            method: Some("POST".to_owned()),
            url: Some("/orders".to_owned()),
            ..InvocationRequest::default()
        }),
        response: Some(InvocationResponse {
            status: Some(200),
            body: Some(json!("'ok'")),
            ..InvocationResponse::default()
        }),
    };

    let EnrichmentPatch::Invocation { request, response } =
        invocation_patch(DocumentDialect::Yaml, &invocation)
    else {
        panic!("expected invocation patch");
    };
    assert!(request.expect("request").contains("method: POST"));
    assert_eq!(response.as_deref(), Some("ok"));
}

#[test]
fn child_rows_pad_missing_fields_with_empty_strings() {
    let record = InstanceRecord {
        id: "c1".to_owned(),
        workflow: Some("orders".to_owned()),
        ..InstanceRecord::default()
    };
    let row = child_row(&record);
    assert_eq!(row.id, "c1");
    assert_eq!(row.workflow, "orders");
    assert_eq!(row.branch, "");
    assert_eq!(row.status, "");
    assert_eq!(row.start, "");
    assert_eq!(row.end, "");
}

#[test]
fn task_rows_project_the_values_mapping() {
    let mut values = BTreeMap::new();
    values.insert("approver".to_owned(), json!("dana"));
    values.insert("amount".to_owned(), json!(125));
    let task = TaskRecord { values };

    let rows = task_rows(&task);
    assert_eq!(
        rows,
        vec![
            ("amount".to_owned(), "125".to_owned()),
            ("approver".to_owned(), "dana".to_owned()),
        ]
    );
}

#[test]
fn view_applies_patches_in_place() {
    let mut view = InstanceView::default();
    view.apply(EnrichmentPatch::TaskValues {
        rows: vec![("k".to_owned(), "v".to_owned())],
    });
    assert_eq!(view.task_values.len(), 1);

    view.apply(EnrichmentPatch::Invocation {
        request: Some("GET /x".to_owned()),
        response: None,
    });
    assert_eq!(view.request.as_deref(), Some("GET /x"));
}

#[tokio::test]
async fn spawn_fetches_without_a_client_is_a_noop() {
    let (updates_tx, mut updates_rx) = mpsc::unbounded_channel();
    let enricher = Enricher::new(
        None,
        DocumentDialect::Json,
        updates_tx,
        Arc::new(AtomicU64::new(0)),
    );

    let element_id = ElementId::new("s1").expect("element id");
    let record = InstanceRecord {
        id: "i1".to_owned(),
        rest_operation: Some(true),
        ..InstanceRecord::default()
    };
    enricher.spawn_fetches(&element_id, &[record]);

    assert!(updates_rx.try_recv().is_err());
}
