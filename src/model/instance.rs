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

/// Operation references ending in one of these document suffixes count as
/// request-like even without an explicit path token.
const REQUEST_OPERATION_SUFFIXES: [&str; 3] = [".yaml", ".yml", ".json"];

/// State types whose execution fans out into child instances.
const FAN_OUT_STATE_TYPES: [&str; 3] = ["parallel", "foreach", "subflow"];

/// One runtime execution record attached to a flow element, as delivered by
/// the host's `instance` message or the runtime data API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceRecord {
    /// State instance id; doubles as the invocation lookup key.
    pub id: String,
    /// Owning workflow instance, used for child-instance correlation and
    /// data writes.
    pub workflow_instance_id: Option<String>,
    pub workflow: Option<String>,
    pub branch: Option<String>,
    pub status: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// Operation reference: a path token or a spec filename.
    pub operation: Option<String>,
    /// Externally-classified REST operation flag.
    pub rest_operation: Option<bool>,
    pub state_type: Option<String>,
    pub task_id: Option<String>,
    pub log: Option<Value>,
    pub values: Option<Value>,
    pub input: Option<Value>,
    pub output: Option<Value>,
}

impl InstanceRecord {
    /// Whether this instance represents an operation step whose invocation
    /// record can be fetched: an explicit path token, a spec filename suffix,
    /// or the external REST-operation flag.
    pub fn is_request_operation(&self) -> bool {
        if self.rest_operation == Some(true) {
            return true;
        }
        let Some(operation) = self.operation.as_deref() else {
            return false;
        };
        operation.contains('/')
            || REQUEST_OPERATION_SUFFIXES
                .iter()
                .any(|suffix| operation.ends_with(suffix))
    }

    /// Whether this instance is a fan-out construct with child instances.
    pub fn is_fan_out(&self) -> bool {
        self.state_type
            .as_deref()
            .is_some_and(|state_type| FAN_OUT_STATE_TYPES.contains(&state_type))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::InstanceRecord;

    #[rstest]
    #[case(Some("/orders/list"), None, true)]
    #[case(Some("orders.yaml"), None, true)]
    #[case(Some("orders.json"), None, true)]
    #[case(Some("sendEmail"), None, false)]
    #[case(Some("sendEmail"), Some(true), true)]
    #[case(None, None, false)]
    fn request_operation_classification(
        #[case] operation: Option<&str>,
        #[case] rest_operation: Option<bool>,
        #[case] expected: bool,
    ) {
        let record = InstanceRecord {
            operation: operation.map(str::to_owned),
            rest_operation,
            ..InstanceRecord::default()
        };
        assert_eq!(record.is_request_operation(), expected);
    }

    #[rstest]
    #[case(Some("parallel"), true)]
    #[case(Some("foreach"), true)]
    #[case(Some("subflow"), true)]
    #[case(Some("operation"), false)]
    #[case(None, false)]
    fn fan_out_classification(#[case] state_type: Option<&str>, #[case] expected: bool) {
        let record = InstanceRecord {
            state_type: state_type.map(str::to_owned),
            ..InstanceRecord::default()
        };
        assert_eq!(record.is_fan_out(), expected);
    }

    #[test]
    fn record_deserializes_from_camel_case() {
        let record: InstanceRecord = serde_json::from_str(
            r#"{"id":"i1","workflowInstanceId":"w1","restOperation":true,"stateType":"operation"}"#,
        )
        .expect("deserialize");
        assert_eq!(record.workflow_instance_id.as_deref(), Some("w1"));
        assert_eq!(record.rest_operation, Some(true));
    }
}
