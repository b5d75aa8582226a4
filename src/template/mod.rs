// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Configurator templates.
//!
//! Templates are data: per element kind, an ordered list of tabs with
//! widgets. Tab conditions and predicate names are validated when a template
//! set loads, not when it renders; dynamic defaults and option sources stay
//! lazy and are only evaluated while the configurator is actually drawing.

mod registry;
mod resolver;

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

pub use registry::{ConditionRegistry, Predicate, ResolveContext};
pub use resolver::{resolve_template, ResolvedTab, ResolvedTemplate};

use crate::eval::ExpressionEvaluator;
use crate::model::FlowElement;

/// The raw template sets: `config` for editing modes, `inspect` for
/// `runtime`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateSet {
    config: BTreeMap<String, Vec<TabTemplate>>,
    inspect: BTreeMap<String, Vec<TabTemplate>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabTemplate {
    name: String,
    condition: Option<TabCondition>,
    widgets: Vec<WidgetTemplate>,
}

/// A parsed tab conditional: `identifier` or `identifier(argName)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabCondition {
    predicate: String,
    argument: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetTemplate {
    name: String,
    kind: String,
    label: Option<String>,
    default: WidgetDefault,
    options: WidgetOptions,
}

/// A widget's declared default value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WidgetDefault {
    #[default]
    None,
    Literal(Value),
    /// Single-key `{expression: fallback}` mapping, evaluated at render time.
    Dynamic { expression: String, fallback: Value },
}

/// A widget's declared option list.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WidgetOptions {
    #[default]
    None,
    Static(Vec<String>),
    /// The host-supplied team roster (`teams` indirection name).
    Roster,
    /// First column of a `[["..",".."],..]` document attribute.
    TableAttribute(String),
}

impl TabTemplate {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> Option<&TabCondition> {
        self.condition.as_ref()
    }

    pub fn widgets(&self) -> &[WidgetTemplate] {
        &self.widgets
    }
}

impl TabCondition {
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }
}

impl WidgetTemplate {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn default(&self) -> &WidgetDefault {
        &self.default
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }
}

impl WidgetDefault {
    /// Computes the display default for `element`; never mutates anything.
    ///
    /// Dynamic defaults evaluate their expression against the element's
    /// attributes — with the serialized `display` attribute deserialized into
    /// structured geometry first when the expression is rooted there — and
    /// fall back to the mapping's value when nothing resolves.
    pub fn resolve(
        &self,
        element: &FlowElement,
        evaluator: &dyn ExpressionEvaluator,
    ) -> Option<Value> {
        match self {
            Self::None => None,
            Self::Literal(value) => Some(value.clone()),
            Self::Dynamic {
                expression,
                fallback,
            } => {
                if element.attributes().is_empty() {
                    return Some(fallback.clone());
                }
                let context = evaluation_context(element, expression);
                evaluator
                    .evaluate(expression, &context)
                    .or_else(|| Some(fallback.clone()))
            }
        }
    }
}

fn evaluation_context(element: &FlowElement, expression: &str) -> Value {
    let mut map = serde_json::Map::new();
    for (name, value) in element.attributes() {
        map.insert(name.clone(), Value::String(value.clone()));
    }
    if expression.starts_with("display.") {
        if let Some(geometry) = element.display_geometry() {
            if let Ok(value) = serde_json::to_value(geometry) {
                map.insert("display".to_owned(), value);
            }
        }
    }
    Value::Object(map)
}

impl WidgetOptions {
    /// Computes the option values for the current document state.
    ///
    /// A malformed table attribute yields an empty list; option lists are
    /// display-only and must never fail a render.
    pub fn resolve(&self, ctx: &ResolveContext<'_>) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::Static(values) => values.clone(),
            Self::Roster => ctx.teams.to_vec(),
            Self::TableAttribute(name) => match ctx.document.table_attribute(name) {
                Ok(rows) => rows
                    .into_iter()
                    .filter_map(|row| row.into_iter().next())
                    .collect(),
                Err(err) => {
                    tracing::warn!(attribute = %name, error = %err, "option table unreadable");
                    Vec::new()
                }
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTemplateSet {
    #[serde(default)]
    config: BTreeMap<String, Vec<RawTab>>,
    #[serde(default)]
    inspect: BTreeMap<String, Vec<RawTab>>,
}

#[derive(Debug, Deserialize)]
struct RawTab {
    name: String,
    #[serde(rename = "if")]
    condition: Option<String>,
    #[serde(default)]
    widgets: Vec<RawWidget>,
}

#[derive(Debug, Deserialize)]
struct RawWidget {
    name: String,
    #[serde(default = "default_widget_kind")]
    kind: String,
    label: Option<String>,
    default: Option<Value>,
    options: Option<Value>,
}

fn default_widget_kind() -> String {
    "text".to_owned()
}

impl TemplateSet {
    pub fn load(json: &str, registry: &ConditionRegistry) -> Result<Self, TemplateError> {
        let raw: RawTemplateSet =
            serde_json::from_str(json).map_err(|err| TemplateError::Json {
                detail: err.to_string(),
            })?;
        Self::compile(raw, registry)
    }

    /// The template set shipped with the crate; hosts usually supply their
    /// own via [`TemplateSet::load`].
    pub fn builtin() -> Self {
        Self::load(BUILTIN_TEMPLATES, &ConditionRegistry::default())
            .expect("built-in template set")
    }

    pub fn config(&self) -> &BTreeMap<String, Vec<TabTemplate>> {
        &self.config
    }

    pub fn inspect(&self) -> &BTreeMap<String, Vec<TabTemplate>> {
        &self.inspect
    }

    fn compile(raw: RawTemplateSet, registry: &ConditionRegistry) -> Result<Self, TemplateError> {
        let condition_pattern = condition_pattern();
        Ok(Self {
            config: compile_section(raw.config, registry, &condition_pattern)?,
            inspect: compile_section(raw.inspect, registry, &condition_pattern)?,
        })
    }
}

fn condition_pattern() -> Regex {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:\(\s*([A-Za-z_][A-Za-z0-9_.\-]*)\s*\))?\s*$")
        .expect("static condition pattern")
}

fn compile_section(
    raw: BTreeMap<String, Vec<RawTab>>,
    registry: &ConditionRegistry,
    condition_pattern: &Regex,
) -> Result<BTreeMap<String, Vec<TabTemplate>>, TemplateError> {
    let mut section = BTreeMap::new();
    for (element_key, tabs) in raw {
        let mut compiled = Vec::with_capacity(tabs.len());
        for tab in tabs {
            compiled.push(compile_tab(tab, registry, condition_pattern)?);
        }
        section.insert(element_key, compiled);
    }
    Ok(section)
}

fn compile_tab(
    raw: RawTab,
    registry: &ConditionRegistry,
    condition_pattern: &Regex,
) -> Result<TabTemplate, TemplateError> {
    let condition = match raw.condition {
        None => None,
        Some(text) => {
            let captures =
                condition_pattern
                    .captures(&text)
                    .ok_or_else(|| TemplateError::InvalidCondition {
                        tab: raw.name.clone(),
                        condition: text.clone(),
                    })?;
            let predicate = captures[1].to_owned();
            if !registry.contains(&predicate) {
                return Err(TemplateError::UnknownPredicate {
                    tab: raw.name,
                    predicate,
                });
            }
            Some(TabCondition {
                predicate,
                argument: captures.get(2).map(|m| m.as_str().to_owned()),
            })
        }
    };

    let widgets = raw.widgets.into_iter().map(compile_widget).collect();

    Ok(TabTemplate {
        name: raw.name,
        condition,
        widgets,
    })
}

fn compile_widget(raw: RawWidget) -> WidgetTemplate {
    let default = match raw.default {
        None => WidgetDefault::None,
        Some(Value::Object(map)) if map.len() == 1 => {
            let (expression, fallback) = map.into_iter().next().expect("single-key mapping");
            WidgetDefault::Dynamic {
                expression,
                fallback,
            }
        }
        Some(value) => WidgetDefault::Literal(value),
    };

    let options = match raw.options {
        None => WidgetOptions::None,
        Some(Value::Array(values)) => WidgetOptions::Static(
            values
                .into_iter()
                .filter_map(|value| match value {
                    Value::String(text) => Some(text),
                    other => Some(other.to_string()),
                })
                .collect(),
        ),
        Some(Value::String(name)) if name == "teams" => WidgetOptions::Roster,
        Some(Value::String(name)) => WidgetOptions::TableAttribute(name),
        Some(other) => {
            tracing::warn!(widget = %raw.name, value = %other, "unusable options declaration");
            WidgetOptions::None
        }
    };

    WidgetTemplate {
        name: raw.name,
        kind: raw.kind,
        label: raw.label,
        default,
        options,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    Json { detail: String },
    InvalidCondition { tab: String, condition: String },
    UnknownPredicate { tab: String, predicate: String },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { detail } => write!(f, "template set is not valid JSON: {detail}"),
            Self::InvalidCondition { tab, condition } => {
                write!(f, "tab '{tab}' has an unparseable condition '{condition}'")
            }
            Self::UnknownPredicate { tab, predicate } => {
                write!(f, "tab '{tab}' names unknown predicate '{predicate}'")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

const BUILTIN_TEMPLATES: &str = r#"{
  "config": {
    "flow": [
      {
        "name": "General",
        "widgets": [
          {"name": "name", "kind": "text", "default": {"name": "untitled"}},
          {"name": "description", "kind": "text"}
        ]
      }
    ],
    "step": [
      {
        "name": "General",
        "widgets": [
          {"name": "label", "kind": "text", "default": {"label": ""}},
          {"name": "tsFile", "kind": "text"}
        ]
      },
      {
        "name": "Function",
        "if": "isRestOperation(functionRef)",
        "widgets": [
          {"name": "functionRef", "kind": "select", "options": "functions"},
          {"name": "method", "kind": "text", "default": "GET"}
        ]
      },
      {
        "name": "Subflow",
        "if": "isSubflowStep",
        "widgets": [
          {"name": "subflow", "kind": "text"}
        ]
      },
      {
        "name": "Assignment",
        "widgets": [
          {"name": "assignee", "kind": "select", "options": "teams"}
        ]
      },
      {
        "name": "Layout",
        "widgets": [
          {"name": "x", "kind": "number", "default": {"display.x": 0}},
          {"name": "y", "kind": "number", "default": {"display.y": 0}}
        ]
      }
    ],
    "link": [
      {
        "name": "General",
        "widgets": [
          {"name": "label", "kind": "text"},
          {"name": "condition", "kind": "text"}
        ]
      }
    ]
  },
  "inspect": {
    "step": [
      {
        "name": "State",
        "if": "hasInstances",
        "widgets": [
          {"name": "status", "kind": "table"},
          {"name": "log", "kind": "code"}
        ]
      },
      {
        "name": "Data",
        "if": "hasInstances",
        "widgets": [
          {"name": "input", "kind": "code"},
          {"name": "output", "kind": "code"}
        ]
      }
    ],
    "flow": [
      {
        "name": "Runs",
        "widgets": [
          {"name": "instances", "kind": "table"}
        ]
      }
    ]
  }
}"#;
