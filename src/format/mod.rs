// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flow document text dialects.
//!
//! The host configures one dialect per session; the same dialect is also used
//! when rendering fetched invocation requests for display.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::FlowDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentDialect {
    #[default]
    Json,
    Yaml,
}

impl DocumentDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for DocumentDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDialectError {
    value: String,
}

impl fmt::Display for ParseDialectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown document dialect '{}'", self.value)
    }
}

impl std::error::Error for ParseDialectError {}

impl FromStr for DocumentDialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(ParseDialectError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Parses and serializes flow documents in one dialect.
pub trait DocumentCodec {
    fn dialect(&self) -> DocumentDialect;
    fn parse(&self, text: &str) -> Result<FlowDocument, CodecError>;
    fn serialize(&self, document: &FlowDocument) -> Result<String, CodecError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn dialect(&self) -> DocumentDialect {
        DocumentDialect::Json
    }

    fn parse(&self, text: &str) -> Result<FlowDocument, CodecError> {
        serde_json::from_str(text).map_err(|err| CodecError::Parse {
            dialect: DocumentDialect::Json,
            detail: err.to_string(),
        })
    }

    fn serialize(&self, document: &FlowDocument) -> Result<String, CodecError> {
        json_pretty(document).map_err(|err| CodecError::Serialize {
            dialect: DocumentDialect::Json,
            detail: err.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn dialect(&self) -> DocumentDialect {
        DocumentDialect::Yaml
    }

    fn parse(&self, text: &str) -> Result<FlowDocument, CodecError> {
        serde_yaml::from_str(text).map_err(|err| CodecError::Parse {
            dialect: DocumentDialect::Yaml,
            detail: err.to_string(),
        })
    }

    fn serialize(&self, document: &FlowDocument) -> Result<String, CodecError> {
        serde_yaml::to_string(document).map_err(|err| CodecError::Serialize {
            dialect: DocumentDialect::Yaml,
            detail: err.to_string(),
        })
    }
}

pub fn codec_for(dialect: DocumentDialect) -> &'static dyn DocumentCodec {
    match dialect {
        DocumentDialect::Json => &JsonCodec,
        DocumentDialect::Yaml => &YamlCodec,
    }
}

/// Renders an arbitrary JSON value in the given dialect, for display fields.
pub fn format_value(dialect: DocumentDialect, value: &Value) -> String {
    match dialect {
        DocumentDialect::Json => to_json_pretty(value),
        DocumentDialect::Yaml => {
            serde_yaml::to_string(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// 2-space pretty printing; the host-side viewers expect this indent.
pub fn to_json_pretty(value: &Value) -> String {
    json_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn json_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf).expect("serde_json emits utf-8"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    Parse {
        dialect: DocumentDialect,
        detail: String,
    },
    Serialize {
        dialect: DocumentDialect,
        detail: String,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { dialect, detail } => {
                write!(f, "cannot parse {dialect} document: {detail}")
            }
            Self::Serialize { dialect, detail } => {
                write!(f, "cannot serialize {dialect} document: {detail}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{codec_for, format_value, to_json_pretty, DocumentCodec, DocumentDialect};
    use crate::model::{ElementId, ElementKind, FlowDocument, FlowElement};

    fn sample_document() -> FlowDocument {
        let mut document = FlowDocument::new();
        document.set_attribute("name", "orders");
        let mut step = FlowElement::new(ElementId::new("s1").expect("id"), ElementKind::Step);
        step.set_attribute("tsFile", "handler.ts");
        document.add_step(step);
        document
    }

    #[test]
    fn json_codec_round_trips() {
        let codec = codec_for(DocumentDialect::Json);
        let text = codec.serialize(&sample_document()).expect("serialize");
        let parsed = codec.parse(&text).expect("parse");
        assert_eq!(parsed, sample_document());
    }

    #[test]
    fn yaml_codec_round_trips() {
        let codec = codec_for(DocumentDialect::Yaml);
        let text = codec.serialize(&sample_document()).expect("serialize");
        let parsed = codec.parse(&text).expect("parse");
        assert_eq!(parsed, sample_document());
    }

    #[test]
    fn parse_failures_are_typed() {
        assert!(codec_for(DocumentDialect::Json).parse("{nope").is_err());
    }

    #[test]
    fn json_pretty_uses_two_space_indent() {
        let text = to_json_pretty(&json!({"a": 1}));
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn format_value_follows_dialect() {
        let value = json!({"method": "GET"});
        assert!(format_value(DocumentDialect::Json, &value).starts_with('{'));
        assert!(format_value(DocumentDialect::Yaml, &value).contains("method: GET"));
    }
}
