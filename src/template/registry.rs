// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use crate::model::{FlowDocument, FlowElement, InteractionMode};

/// Everything a predicate or option source may consult besides the element.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub document: &'a FlowDocument,
    pub mode: InteractionMode,
    /// Host-supplied team roster.
    pub teams: &'a [String],
}

/// A pure tab predicate.
///
/// The third parameter carries the named attribute's value when the condition
/// declared an argument (`identifier(argName)`), `None` for bare conditions —
/// those inspect the element directly.
pub type Predicate = fn(&ResolveContext<'_>, &FlowElement, Option<&str>) -> bool;

/// Explicit name→predicate mapping, consulted at template load time.
///
/// Replaces by-name dispatch at render time: a template naming an unknown
/// predicate fails to load instead of silently dropping tabs later.
#[derive(Debug, Clone)]
pub struct ConditionRegistry {
    predicates: BTreeMap<String, Predicate>,
}

impl ConditionRegistry {
    pub fn empty() -> Self {
        Self {
            predicates: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, predicate: Predicate) {
        self.predicates.insert(name.into(), predicate);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Predicate> {
        self.predicates.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(String::as_str)
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("isRestOperation", is_rest_operation);
        registry.register("isSubflowStep", is_subflow_step);
        registry.register("hasInstances", has_instances);
        registry
    }
}

/// True when the document's `functions` table classifies the referenced
/// function as `rest`. An absent or unreadable table reads as `false`.
fn is_rest_operation(
    ctx: &ResolveContext<'_>,
    _element: &FlowElement,
    value: Option<&str>,
) -> bool {
    let Some(value) = value else {
        return false;
    };
    let Ok(functions) = ctx.document.table_attribute("functions") else {
        return false;
    };
    functions.iter().any(|row| {
        row.first().map(String::as_str) == Some(value)
            && row.get(1).map(String::as_str) == Some("rest")
    })
}

fn is_subflow_step(_ctx: &ResolveContext<'_>, element: &FlowElement, _value: Option<&str>) -> bool {
    element.attribute("subflow").is_some()
}

fn has_instances(_ctx: &ResolveContext<'_>, element: &FlowElement, _value: Option<&str>) -> bool {
    !element.instances().is_empty()
}
