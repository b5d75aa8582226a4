// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The drawing-library collaborator surface.
//!
//! Canvas drawing, hit-testing, link geometry, the toolbox palette and the
//! configurator widgets all live outside this crate; the session controller
//! talks to them exclusively through [`PanelSurface`].

use crate::enrich::InstanceView;
use crate::model::{Descriptor, ElementId, FlowDocument, InteractionMode};
use crate::protocol::ActionForward;
use crate::template::ResolvedTemplate;

/// What the configurator should currently show for the selected element.
///
/// Widget defaults and option lists inside the template stay lazy; the
/// surface evaluates them while painting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfiguratorView {
    pub element_id: Option<ElementId>,
    pub template: ResolvedTemplate,
    pub instances: Vec<InstanceView>,
    /// Persisted splitter offset in pixels.
    pub position: Option<u32>,
}

pub trait PanelSurface {
    fn render_document(&mut self, document: &FlowDocument);
    fn set_readonly(&mut self, readonly: bool);
    fn set_interaction_mode(&mut self, mode: InteractionMode);
    fn set_selection(&mut self, element_id: Option<&ElementId>);
    /// Replaces the custom toolbox descriptors wholesale.
    fn replace_descriptors(&mut self, descriptors: &[Descriptor]);
    fn show_configurator(&mut self, view: &ConfiguratorView);
    fn close_configurator(&mut self);
    fn forward_action(&mut self, action: &ActionForward);
    fn refresh_theme(&mut self);
}

/// Surface for headless operation; logs instead of drawing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl PanelSurface for NullSurface {
    fn render_document(&mut self, document: &FlowDocument) {
        tracing::debug!(steps = document.steps().len(), "render document");
    }

    fn set_readonly(&mut self, readonly: bool) {
        tracing::debug!(readonly, "set readonly");
    }

    fn set_interaction_mode(&mut self, mode: InteractionMode) {
        tracing::debug!(%mode, "set interaction mode");
    }

    fn set_selection(&mut self, element_id: Option<&ElementId>) {
        tracing::debug!(element = element_id.map(ElementId::as_str), "set selection");
    }

    fn replace_descriptors(&mut self, descriptors: &[Descriptor]) {
        tracing::debug!(count = descriptors.len(), "replace descriptors");
    }

    fn show_configurator(&mut self, view: &ConfiguratorView) {
        tracing::debug!(tabs = view.template.tabs.len(), "show configurator");
    }

    fn close_configurator(&mut self) {
        tracing::debug!("close configurator");
    }

    fn forward_action(&mut self, action: &ActionForward) {
        tracing::debug!(action = %action.action, "forward action");
    }

    fn refresh_theme(&mut self) {
        tracing::debug!("refresh theme");
    }
}
