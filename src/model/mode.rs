// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the editor reacts to pointer input.
///
/// `runtime` additionally forces the diagram read-only; the effective
/// read-only flag is always derived as `(mode == runtime) || session readonly`
/// and never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    #[default]
    Select,
    Connect,
    Runtime,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Connect => "connect",
            Self::Runtime => "runtime",
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseInteractionModeError {
    value: String,
}

impl fmt::Display for ParseInteractionModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown interaction mode '{}'", self.value)
    }
}

impl std::error::Error for ParseInteractionModeError {}

impl FromStr for InteractionMode {
    type Err = ParseInteractionModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(Self::Select),
            "connect" => Ok(Self::Connect),
            "runtime" => Ok(Self::Runtime),
            other => Err(ParseInteractionModeError {
                value: other.to_owned(),
            }),
        }
    }
}
