// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Expression evaluation collaborator for dynamic configurator defaults.
//!
//! The real evaluator lives outside this crate; embedders plug theirs in via
//! [`ExpressionEvaluator`]. [`DotPathEvaluator`] is the built-in default and
//! resolves plain `a.b.0.c` paths against a JSON context.

use serde_json::Value;

pub trait ExpressionEvaluator {
    /// Evaluates `expression` against `context`; `None` when the expression
    /// does not resolve.
    fn evaluate(&self, expression: &str, context: &Value) -> Option<Value>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DotPathEvaluator;

impl ExpressionEvaluator for DotPathEvaluator {
    fn evaluate(&self, expression: &str, context: &Value) -> Option<Value> {
        let mut current = context;
        for segment in expression.split('.') {
            if segment.is_empty() {
                return None;
            }
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DotPathEvaluator, ExpressionEvaluator};

    #[test]
    fn resolves_nested_paths() {
        let context = json!({"display": {"x": 10.0}, "rows": [["a"], ["b"]]});
        let evaluator = DotPathEvaluator;

        assert_eq!(evaluator.evaluate("display.x", &context), Some(json!(10.0)));
        assert_eq!(evaluator.evaluate("rows.1.0", &context), Some(json!("b")));
    }

    #[test]
    fn missing_paths_resolve_to_none() {
        let context = json!({"a": 1});
        let evaluator = DotPathEvaluator;

        assert_eq!(evaluator.evaluate("b", &context), None);
        assert_eq!(evaluator.evaluate("a.b", &context), None);
        assert_eq!(evaluator.evaluate("", &context), None);
    }
}
