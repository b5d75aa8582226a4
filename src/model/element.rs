// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::ElementId;
use super::instance::InstanceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Flow,
    Step,
    Link,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flow => "flow",
            Self::Step => "step",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node or link in the flow document.
///
/// Attributes are free-form string pairs; values may themselves be
/// JSON-encoded (table attributes like `functions` are `[["name","kind"],..]`
/// encoded into a single string). Runtime instances are attached by the host
/// in `runtime` mode and never serialized with the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowElement {
    element_id: ElementId,
    kind: ElementKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
    #[serde(skip)]
    instances: Vec<InstanceRecord>,
}

impl FlowElement {
    pub fn new(element_id: ElementId, kind: ElementKind) -> Self {
        Self {
            element_id,
            kind,
            attributes: BTreeMap::new(),
            instances: Vec::new(),
        }
    }

    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
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

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Decodes a `[["...",".."],..]` table attribute.
    ///
    /// The stored format carries no schema version, so callers must treat a
    /// malformed value as fatal to the operation that needed the table.
    pub fn table_attribute(&self, name: &str) -> Result<Vec<Vec<String>>, AttributeError> {
        match self.attributes.get(name) {
            Some(raw) => parse_table(name, raw),
            None => Err(AttributeError::Missing {
                name: name.to_owned(),
            }),
        }
    }

    /// Writes one cell of a table attribute, creating the attribute when it
    /// does not exist yet. Rows beyond the current length are appended, and
    /// columns before the target column are padded with empty strings.
    ///
    /// A malformed existing value fails the write before anything mutates.
    pub fn set_table_cell(
        &mut self,
        name: &str,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<(), AttributeError> {
        let mut table = match self.attributes.get(name) {
            Some(raw) => parse_table(name, raw)?,
            None => Vec::new(),
        };

        while table.len() <= row {
            table.push(Vec::new());
        }
        let cells = &mut table[row];
        while cells.len() <= col {
            cells.push(String::new());
        }
        cells[col] = value.into();

        let encoded = serde_json::to_string(&table).map_err(|err| AttributeError::Malformed {
            name: name.to_owned(),
            detail: err.to_string(),
        })?;
        self.attributes.insert(name.to_owned(), encoded);
        Ok(())
    }

    /// Deserializes the `display` attribute into structured geometry.
    ///
    /// Absent or malformed geometry reads as `None`; display data only feeds
    /// configurator defaults and is never load-bearing.
    pub fn display_geometry(&self) -> Option<DisplayGeometry> {
        let raw = self.attributes.get("display")?;
        serde_json::from_str(raw).ok()
    }

    pub fn instances(&self) -> &[InstanceRecord] {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut Vec<InstanceRecord> {
        &mut self.instances
    }

    pub fn set_instances(&mut self, instances: Vec<InstanceRecord>) {
        self.instances = instances;
    }
}

pub(crate) fn parse_table(name: &str, raw: &str) -> Result<Vec<Vec<String>>, AttributeError> {
    serde_json::from_str(raw).map_err(|err| AttributeError::Malformed {
        name: name.to_owned(),
        detail: err.to_string(),
    })
}

/// Serialized node geometry carried in the `display` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    Missing { name: String },
    Malformed { name: String, detail: String },
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { name } => write!(f, "attribute '{name}' not present"),
            Self::Malformed { name, detail } => {
                write!(f, "attribute '{name}' is not a valid table: {detail}")
            }
        }
    }
}

impl std::error::Error for AttributeError {}

#[cfg(test)]
mod tests {
    use super::{AttributeError, ElementKind, FlowElement};
    use crate::model::ElementId;

    fn step(id: &str) -> FlowElement {
        FlowElement::new(ElementId::new(id).expect("element id"), ElementKind::Step)
    }

    #[test]
    fn attributes_can_be_set_and_read() {
        let mut element = step("s1");
        assert_eq!(element.attribute("label"), None);

        element.set_attribute("label", "Fetch orders");
        assert_eq!(element.attribute("label"), Some("Fetch orders"));

        assert_eq!(element.remove_attribute("label"), Some("Fetch orders".to_owned()));
        assert_eq!(element.attribute("label"), None);
    }

    #[test]
    fn table_attribute_decodes_rows() {
        let mut element = step("s1");
        element.set_attribute("functions", r#"[["sendEmail","rest"],["score","expression"]]"#);

        let table = element.table_attribute("functions").expect("table");
        assert_eq!(table.len(), 2);
        assert_eq!(table[0], vec!["sendEmail".to_owned(), "rest".to_owned()]);
    }

    #[test]
    fn table_attribute_reports_missing_and_malformed() {
        let mut element = step("s1");
        assert!(matches!(
            element.table_attribute("functions"),
            Err(AttributeError::Missing { .. })
        ));

        element.set_attribute("functions", "not json");
        assert!(matches!(
            element.table_attribute("functions"),
            Err(AttributeError::Malformed { .. })
        ));
    }

    #[test]
    fn set_table_cell_pads_rows_and_columns() {
        let mut element = step("s1");
        element.set_attribute("rows", r#"[["a","b"]]"#);

        element.set_table_cell("rows", 2, 1, "v").expect("write");

        let table = element.table_attribute("rows").expect("table");
        assert_eq!(table.len(), 3);
        assert_eq!(table[0], vec!["a".to_owned(), "b".to_owned()]);
        assert!(table[1].is_empty());
        assert_eq!(table[2], vec![String::new(), "v".to_owned()]);
    }

    #[test]
    fn set_table_cell_creates_missing_attribute() {
        let mut element = step("s1");
        element.set_table_cell("rows", 0, 0, "only").expect("write");
        assert_eq!(element.attribute("rows"), Some(r#"[["only"]]"#));
    }

    #[test]
    fn set_table_cell_rejects_malformed_table_without_mutating() {
        let mut element = step("s1");
        element.set_attribute("rows", "{broken");

        assert!(element.set_table_cell("rows", 0, 0, "v").is_err());
        assert_eq!(element.attribute("rows"), Some("{broken"));
    }

    #[test]
    fn display_geometry_is_lenient() {
        let mut element = step("s1");
        assert!(element.display_geometry().is_none());

        element.set_attribute("display", r#"{"x":10.0,"y":20.0,"width":120.0,"height":40.0}"#);
        let geometry = element.display_geometry().expect("geometry");
        assert_eq!(geometry.x, 10.0);
        assert_eq!(geometry.height, 40.0);

        element.set_attribute("display", "garbage");
        assert!(element.display_geometry().is_none());
    }
}
