// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::element::{parse_table, AttributeError, ElementKind, FlowElement};
use super::ids::ElementId;

/// The flow document being edited: document-level attributes plus top-level
/// steps and links.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowDocument {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    steps: Vec<FlowElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    links: Vec<FlowElement>,
    #[serde(skip)]
    newly_created: bool,
}

impl FlowDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in starter document used when the host supplies empty text.
    pub fn starter() -> Self {
        let mut document = Self::default();
        document.attributes.insert("name".to_owned(), "untitled".to_owned());

        let start_id = ElementId::new("start").expect("starter step id");
        let mut start = FlowElement::new(start_id, ElementKind::Step);
        start.set_attribute("label", "Start");
        document.steps.push(start);

        document.newly_created = true;
        document
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Decodes a `[["..",".."],..]` table attribute at document level.
    pub fn table_attribute(&self, name: &str) -> Result<Vec<Vec<String>>, AttributeError> {
        match self.attributes.get(name) {
            Some(raw) => parse_table(name, raw),
            None => Err(AttributeError::Missing {
                name: name.to_owned(),
            }),
        }
    }

    pub fn steps(&self) -> &[FlowElement] {
        &self.steps
    }

    pub fn links(&self) -> &[FlowElement] {
        &self.links
    }

    pub fn add_step(&mut self, step: FlowElement) {
        self.steps.push(step);
    }

    pub fn add_link(&mut self, link: FlowElement) {
        self.links.push(link);
    }

    /// Linear lookup among top-level steps; absence is an expected outcome,
    /// never a fault.
    pub fn find_step(&self, id: &str) -> Option<&FlowElement> {
        self.steps.iter().find(|step| step.element_id().as_str() == id)
    }

    pub fn find_step_mut(&mut self, id: &str) -> Option<&mut FlowElement> {
        self.steps
            .iter_mut()
            .find(|step| step.element_id().as_str() == id)
    }

    /// Lookup across steps and links, for configurator selection.
    pub fn find_element(&self, id: &str) -> Option<&FlowElement> {
        self.find_step(id)
            .or_else(|| self.links.iter().find(|link| link.element_id().as_str() == id))
    }

    pub fn newly_created(&self) -> bool {
        self.newly_created
    }

    pub fn clear_newly_created(&mut self) {
        self.newly_created = false;
    }
}

#[cfg(test)]
mod tests {
    use super::FlowDocument;
    use crate::model::{ElementId, ElementKind, FlowElement};

    #[test]
    fn starter_document_is_flagged_newly_created() {
        let document = FlowDocument::starter();
        assert!(document.newly_created());
        assert_eq!(document.attribute("name"), Some("untitled"));
        assert_eq!(document.steps().len(), 1);
    }

    #[test]
    fn find_step_is_a_linear_id_lookup() {
        let mut document = FlowDocument::new();
        for id in ["fetch", "transform", "store"] {
            document.add_step(FlowElement::new(
                ElementId::new(id).expect("id"),
                ElementKind::Step,
            ));
        }

        assert!(document.find_step("transform").is_some());
        assert!(document.find_step("missing").is_none());
    }

    #[test]
    fn find_element_also_covers_links() {
        let mut document = FlowDocument::new();
        document.add_link(FlowElement::new(
            ElementId::new("l1").expect("id"),
            ElementKind::Link,
        ));

        assert!(document.find_element("l1").is_some());
        assert!(document.find_step("l1").is_none());
    }

    #[test]
    fn document_round_trips_through_json() {
        let mut document = FlowDocument::new();
        document.set_attribute("name", "orders");
        let mut step = FlowElement::new(ElementId::new("s1").expect("id"), ElementKind::Step);
        step.set_attribute("tsFile", "handler.ts");
        document.add_step(step);

        let text = serde_json::to_string(&document).expect("serialize");
        let parsed: FlowDocument = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed, document);
    }
}
