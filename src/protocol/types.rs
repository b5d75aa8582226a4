// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::DocumentDialect;
use crate::model::{Descriptor, InstanceRecord, InteractionMode};

/// Per-session configuration the host supplies with `update`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelConfig {
    pub dialect: DocumentDialect,
    /// Base URL of the runtime data API; enrichment is disabled without it.
    pub runtime_url: Option<String>,
    /// Bearer token for the runtime data API; the Authorization header is
    /// omitted entirely when absent, never sent empty.
    pub token: Option<String>,
}

/// Messages the host sends into the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostMessage {
    /// New document text/config/descriptors; triggers full session recreation.
    Update(UpdatePayload),
    /// Runtime instance payload; drives `runtime` mode.
    Instance(InstancePayload),
    /// Replaces the custom toolbox descriptors wholesale.
    Custom(CustomPayload),
    /// Applies a step update.
    Step(StepPayload),
    /// Forwards a user action into the drawing surface.
    Action(ActionForward),
    /// Forces the interaction mode.
    Mode(ModePayload),
    /// Host theme changed; refresh visuals from persisted state.
    ThemeChange,
    /// Delivers a confirmation-dialog reply.
    Confirm(ConfirmReply),
    OpenConfigurator,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePayload {
    pub base: Option<String>,
    pub file: Option<String>,
    pub text: Option<String>,
    pub readonly: Option<bool>,
    pub config: Option<PanelConfig>,
    pub custom: Option<Vec<Descriptor>>,
    pub teams: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InstancePayload {
    pub instances: Vec<InstanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CustomPayload {
    pub descriptors: Vec<Descriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    pub id: String,
    pub patch: StepPatch,
    #[serde(default)]
    pub attr: Option<AttrTarget>,
}

/// Either a structured request description or a bare scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum StepPatch {
    Request(RequestDescription),
    Value(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestDescription {
    pub name: Option<String>,
    pub method: Option<String>,
    pub headers: Option<Value>,
    pub body: Option<Value>,
}

/// Where a scalar step patch lands: an attribute, optionally one cell of a
/// JSON-encoded table attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttrTarget {
    pub name: String,
    #[serde(default)]
    pub row: Option<usize>,
    #[serde(default)]
    pub col: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModePayload {
    pub mode: InteractionMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConfirmReply {
    /// Correlation id issued with the outbound `confirm`; hosts predating
    /// correlation ids omit it, which resolves the oldest pending request.
    pub id: Option<u64>,
    pub result: bool,
}

/// Messages the panel sends to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PanelMessage {
    Alert {
        message: String,
    },
    Confirm {
        id: u64,
        message: String,
    },
    /// Ask the host to create a backing file for a nested flow.
    New {
        name: Option<String>,
    },
    Select {
        element: Option<String>,
    },
    /// Ask the host to start editing an element's backing code.
    Edit {
        element: String,
    },
    Open {
        file: String,
    },
    /// Carries the serialized flow document.
    Change {
        text: String,
    },
    /// The configurator opened/closed; the host should make room.
    Configurator {
        open: bool,
        position: Option<u32>,
    },
    /// Generic action forward.
    Action(ActionForward),
}

/// The generic action carrier used in both directions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionForward {
    pub action: String,
    pub flow: String,
    pub element: Option<String>,
    pub target: Option<String>,
    pub options: Option<Value>,
    pub input: Option<Value>,
}

impl ActionForward {
    pub fn new(action: impl Into<String>, flow: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            flow: flow.into(),
            ..Self::default()
        }
    }
}
