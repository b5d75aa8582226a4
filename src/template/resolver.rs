// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::registry::{ConditionRegistry, ResolveContext};
use super::{TabTemplate, TemplateSet, WidgetTemplate};
use crate::model::{FlowElement, InteractionMode};

/// The element-specific template the configurator renders.
///
/// Widgets keep their lazy default/option resolvers; the surface evaluates
/// them while painting, never earlier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedTemplate {
    pub tabs: Vec<ResolvedTab>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTab {
    pub name: String,
    pub widgets: Vec<WidgetTemplate>,
}

/// Computes the configuration template for one element.
///
/// Runs fresh on every call: attribute values feed the tab conditionals, so
/// nothing may be cached across elements or attribute mutations.
pub fn resolve_template(
    set: &TemplateSet,
    registry: &ConditionRegistry,
    ctx: &ResolveContext<'_>,
    element: &FlowElement,
) -> ResolvedTemplate {
    let section = if ctx.mode == InteractionMode::Runtime {
        set.inspect()
    } else {
        set.config()
    };

    let Some(tabs) = section
        .get(element_template_key(element))
        .or_else(|| section.get(element.kind().as_str()))
    else {
        return ResolvedTemplate::default();
    };

    let tabs = tabs
        .iter()
        .filter(|tab| tab_included(tab, registry, ctx, element))
        .map(|tab| ResolvedTab {
            name: tab.name().to_owned(),
            widgets: tab.widgets().to_vec(),
        })
        .collect();

    ResolvedTemplate { tabs }
}

/// Steps may override their template via a `type` attribute (custom toolbox
/// descriptors introduce specialized step templates).
fn element_template_key(element: &FlowElement) -> &str {
    element
        .attribute("type")
        .unwrap_or_else(|| element.kind().as_str())
}

fn tab_included(
    tab: &TabTemplate,
    registry: &ConditionRegistry,
    ctx: &ResolveContext<'_>,
    element: &FlowElement,
) -> bool {
    let Some(condition) = tab.condition() else {
        return true;
    };
    let Some(predicate) = registry.get(condition.predicate()) else {
        // Load-time validation makes this unreachable for loaded sets, but a
        // registry swapped after load may shrink.
        tracing::warn!(
            predicate = %condition.predicate(),
            tab = %tab.name(),
            "predicate vanished from registry, dropping tab"
        );
        return false;
    };
    let argument_value = condition
        .argument()
        .and_then(|name| element.attribute(name));
    predicate(ctx, element, argument_value)
}
