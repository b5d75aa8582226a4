// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime instance enrichment.
//!
//! The synchronous half projects raw instance records into display-ready
//! views; the asynchronous half fetches invocation records, child instances
//! and task data in the background. Fetches are fire-and-forget: failures are
//! logged and the primary render proceeds with whatever has completed, and
//! every completion carries the generation it was spawned under so stale
//! results from a replaced session or reselected element are discarded.

mod client;

#[cfg(test)]
mod e2e;
#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

pub use client::{
    InstanceDataKind, InvocationRecord, InvocationRequest, InvocationResponse, RuntimeApiError,
    RuntimeClient, TaskRecord,
};

use crate::format::{self, DocumentDialect};
use crate::model::{ElementId, InstanceId, InstanceRecord, TaskId};

/// Display-ready projection of one runtime instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstanceView {
    pub id: String,
    pub workflow: String,
    pub status: String,
    pub start: String,
    pub end: String,
    pub log: Option<String>,
    pub values: Option<String>,
    pub input: Option<String>,
    /// Absent output is normalized to an empty string, never left undefined.
    pub output: String,
    pub request: Option<String>,
    pub response: Option<String>,
    pub children: Vec<ChildRow>,
    pub task_values: Vec<(String, String)>,
}

impl InstanceView {
    pub fn from_record(record: &InstanceRecord) -> Self {
        Self {
            id: record.id.clone(),
            workflow: record.workflow.clone().unwrap_or_default(),
            status: record.status.clone().unwrap_or_default(),
            start: record.start.clone().unwrap_or_default(),
            end: record.end.clone().unwrap_or_default(),
            log: record.log.as_ref().map(format::to_json_pretty),
            values: record.values.as_ref().map(format::to_json_pretty),
            input: record.input.as_ref().map(format::to_json_pretty),
            output: record
                .output
                .as_ref()
                .map(format::to_json_pretty)
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn apply(&mut self, patch: EnrichmentPatch) {
        match patch {
            EnrichmentPatch::Invocation { request, response } => {
                self.request = request;
                self.response = response;
            }
            EnrichmentPatch::Children { rows } => self.children = rows,
            EnrichmentPatch::TaskValues { rows } => self.task_values = rows,
        }
    }
}

/// Fixed-column child instance row; missing fields read as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChildRow {
    pub id: String,
    pub workflow: String,
    pub branch: String,
    pub status: String,
    pub start: String,
    pub end: String,
}

/// A completed background fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentUpdate {
    /// Generation at spawn time; stale updates are discarded by the receiver.
    pub generation: u64,
    pub element_id: ElementId,
    /// Index of the instance view this patch belongs to.
    pub index: usize,
    pub patch: EnrichmentPatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentPatch {
    Invocation {
        request: Option<String>,
        response: Option<String>,
    },
    Children {
        rows: Vec<ChildRow>,
    },
    TaskValues {
        rows: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone)]
pub struct Enricher {
    client: Option<RuntimeClient>,
    dialect: DocumentDialect,
    updates: UnboundedSender<EnrichmentUpdate>,
    generation: Arc<AtomicU64>,
}

impl Enricher {
    pub fn new(
        client: Option<RuntimeClient>,
        dialect: DocumentDialect,
        updates: UnboundedSender<EnrichmentUpdate>,
        generation: Arc<AtomicU64>,
    ) -> Self {
        Self {
            client,
            dialect,
            updates,
            generation,
        }
    }

    pub fn client(&self) -> Option<&RuntimeClient> {
        self.client.as_ref()
    }

    /// The synchronous half: formatting only, no I/O.
    pub fn prepare(&self, records: &[InstanceRecord]) -> Vec<InstanceView> {
        records.iter().map(InstanceView::from_record).collect()
    }

    /// Spawns one detached fetch per applicable rule per instance.
    ///
    /// Requires a tokio runtime context when a client is configured; without
    /// a configured base URL this is a no-op.
    pub fn spawn_fetches(&self, element_id: &ElementId, records: &[InstanceRecord]) {
        if self.client.is_none() {
            return;
        }
        let generation = self.generation.load(Ordering::SeqCst);

        for (index, record) in records.iter().enumerate() {
            if record.is_request_operation() {
                match InstanceId::new(record.id.clone()) {
                    Ok(instance_id) => {
                        self.spawn_invocation(generation, element_id.clone(), index, instance_id);
                    }
                    Err(err) => {
                        tracing::warn!(id = %record.id, error = %err, "unusable instance id");
                    }
                }
            }

            if record.is_fan_out() {
                let parent = record
                    .workflow_instance_id
                    .clone()
                    .unwrap_or_else(|| record.id.clone());
                match (
                    InstanceId::new(parent),
                    InstanceId::new(record.id.clone()),
                ) {
                    (Ok(parent), Ok(parent_state)) => {
                        self.spawn_children(
                            generation,
                            element_id.clone(),
                            index,
                            parent,
                            parent_state,
                        );
                    }
                    _ => {
                        tracing::warn!(id = %record.id, "unusable correlation ids");
                    }
                }
            }

            if let Some(task_id) = record.task_id.as_deref() {
                match TaskId::new(task_id.to_owned()) {
                    Ok(task_id) => {
                        self.spawn_task_values(generation, element_id.clone(), index, task_id);
                    }
                    Err(err) => {
                        tracing::warn!(task = %task_id, error = %err, "unusable task id");
                    }
                }
            }
        }
    }

    /// Pushes edited instance input/output back to the runtime service.
    ///
    /// Fire-and-forget like the read-side fetches; failures are logged.
    pub fn spawn_data_write(&self, record: &InstanceRecord, kind: InstanceDataKind, value: Value) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let workflow = record
            .workflow_instance_id
            .clone()
            .unwrap_or_else(|| record.id.clone());
        let (workflow_id, state_id) =
            match (InstanceId::new(workflow), InstanceId::new(record.id.clone())) {
                (Ok(workflow_id), Ok(state_id)) => (workflow_id, state_id),
                _ => {
                    tracing::warn!(id = %record.id, "unusable instance ids for data write");
                    return;
                }
            };
        tokio::spawn(async move {
            if let Err(err) = client
                .put_data(&workflow_id, kind, Some(&state_id), &value)
                .await
            {
                tracing::warn!(instance = %workflow_id, error = %err, "instance data write failed");
            }
        });
    }

    fn spawn_invocation(
        &self,
        generation: u64,
        element_id: ElementId,
        index: usize,
        instance_id: InstanceId,
    ) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let updates = self.updates.clone();
        let dialect = self.dialect;
        tokio::spawn(async move {
            match client.invocation(&instance_id).await {
                Ok(invocation) => {
                    let patch = invocation_patch(dialect, &invocation);
                    let _ = updates.send(EnrichmentUpdate {
                        generation,
                        element_id,
                        index,
                        patch,
                    });
                }
                Err(err) => {
                    tracing::warn!(instance = %instance_id, error = %err, "invocation fetch failed");
                }
            }
        });
    }

    fn spawn_children(
        &self,
        generation: u64,
        element_id: ElementId,
        index: usize,
        parent: InstanceId,
        parent_state: InstanceId,
    ) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let updates = self.updates.clone();
        tokio::spawn(async move {
            match client.child_instances(&parent, Some(&parent_state)).await {
                Ok(children) => {
                    let rows = children.iter().map(child_row).collect();
                    let _ = updates.send(EnrichmentUpdate {
                        generation,
                        element_id,
                        index,
                        patch: EnrichmentPatch::Children { rows },
                    });
                }
                Err(err) => {
                    tracing::warn!(parent = %parent, error = %err, "child instance fetch failed");
                }
            }
        });
    }

    fn spawn_task_values(
        &self,
        generation: u64,
        element_id: ElementId,
        index: usize,
        task_id: TaskId,
    ) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let updates = self.updates.clone();
        tokio::spawn(async move {
            match client.task(&task_id).await {
                Ok(task) => {
                    let rows = task_rows(&task);
                    let _ = updates.send(EnrichmentUpdate {
                        generation,
                        element_id,
                        index,
                        patch: EnrichmentPatch::TaskValues { rows },
                    });
                }
                Err(err) => {
                    tracing::warn!(task = %task_id, error = %err, "task fetch failed");
                }
            }
        });
    }
}

fn invocation_patch(dialect: DocumentDialect, invocation: &InvocationRecord) -> EnrichmentPatch {
    let request = invocation
        .request
        .as_ref()
        .and_then(|request| serde_json::to_value(request).ok())
        .map(|value| format::format_value(dialect, &value));
    let response = invocation
        .response
        .as_ref()
        .and_then(|response| response.body.as_ref())
        .map(format_response_body);
    EnrichmentPatch::Invocation { request, response }
}

/// Formats a recorded response body for display.
///
/// Single-line string bodies have one layer of surrounding quotes stripped
/// and are re-indented as JSON when bracket-delimited.
// TODO confirm the runtime recorder's string-body encoding; the quote layer
// is mirrored from observed payloads, not from a documented contract.
fn format_response_body(body: &Value) -> String {
    match body {
        Value::String(text) if !text.contains('\n') => {
            let stripped = strip_quote_layer(text);
            let trimmed = stripped.trim();
            let bracketed = (trimmed.starts_with('{') && trimmed.ends_with('}'))
                || (trimmed.starts_with('[') && trimmed.ends_with(']'));
            if bracketed {
                if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
                    return format::to_json_pretty(&value);
                }
            }
            stripped.to_owned()
        }
        Value::String(text) => text.clone(),
        other => format::to_json_pretty(other),
    }
}

fn strip_quote_layer(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && (first == b'"' || first == b'\'') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn child_row(record: &InstanceRecord) -> ChildRow {
    ChildRow {
        id: record.id.clone(),
        workflow: record.workflow.clone().unwrap_or_default(),
        branch: record.branch.clone().unwrap_or_default(),
        status: record.status.clone().unwrap_or_default(),
        start: record.start.clone().unwrap_or_default(),
        end: record.end.clone().unwrap_or_default(),
    }
}

fn task_rows(task: &TaskRecord) -> Vec<(String, String)> {
    task.values
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}
