// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{InstanceId, InstanceRecord, TaskId};

/// Client for the external runtime data API.
///
/// Every request carries `Accept: application/json`; the bearer header is
/// attached only when a token is configured, never sent empty.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RuntimeClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/invocations/{instanceId}`
    pub async fn invocation(
        &self,
        instance_id: &InstanceId,
    ) -> Result<InvocationRecord, RuntimeApiError> {
        let url = format!("{}/invocations/{instance_id}", self.base_url);
        self.fetch_json(self.request(Method::GET, url)).await
    }

    /// `GET {base}/instances?parentInstanceId=&parentStateInstanceId=`
    ///
    /// Both correlation parameters are always sent; an absent parent-state id
    /// goes out as the empty string.
    pub async fn child_instances(
        &self,
        parent: &InstanceId,
        parent_state: Option<&InstanceId>,
    ) -> Result<Vec<InstanceRecord>, RuntimeApiError> {
        let url = format!("{}/instances", self.base_url);
        let parent_state = parent_state.map(InstanceId::as_str).unwrap_or("");
        let builder = self.request(Method::GET, url).query(&[
            ("parentInstanceId", parent.as_str()),
            ("parentStateInstanceId", parent_state),
        ]);
        self.fetch_json(builder).await
    }

    /// `GET {base}/tasks/{taskId}`
    pub async fn task(&self, task_id: &TaskId) -> Result<TaskRecord, RuntimeApiError> {
        let url = format!("{}/tasks/{task_id}", self.base_url);
        self.fetch_json(self.request(Method::GET, url)).await
    }

    /// `PUT {base}/data/{workflowInstanceId}/{input|output}[?stateInstanceId=]`
    pub async fn put_data(
        &self,
        workflow_instance_id: &InstanceId,
        kind: InstanceDataKind,
        state_instance_id: Option<&InstanceId>,
        body: &Value,
    ) -> Result<(), RuntimeApiError> {
        let url = format!("{}/data/{workflow_instance_id}/{kind}", self.base_url);
        let mut builder = self.request(Method::PUT, url).json(body);
        if let Some(state_instance_id) = state_instance_id {
            builder = builder.query(&[("stateInstanceId", state_instance_id.as_str())]);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RuntimeApiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(())
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, RuntimeApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RuntimeApiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceDataKind {
    Input,
    Output,
}

impl fmt::Display for InstanceDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "input",
            Self::Output => "output",
        })
    }
}

/// One recorded operation invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvocationRecord {
    pub request: Option<InvocationRequest>,
    pub response: Option<InvocationResponse>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvocationRequest {
    pub name: Option<String>,
    pub method: Option<String>,
    pub url: Option<String>,
    pub headers: Option<Value>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status: Option<u16>,
    pub headers: Option<Value>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    pub values: BTreeMap<String, Value>,
}

#[derive(Debug)]
pub enum RuntimeApiError {
    Transport(reqwest::Error),
    Status { status: u16, url: String },
}

impl fmt::Display for RuntimeApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "runtime API transport error: {err}"),
            Self::Status { status, url } => {
                write!(f, "runtime API returned HTTP {status} for {url}")
            }
        }
    }
}

impl std::error::Error for RuntimeApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for RuntimeApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}
