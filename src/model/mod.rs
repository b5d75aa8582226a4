// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: flow documents, elements, runtime instances, descriptors.

mod descriptor;
mod document;
mod element;
mod ids;
mod instance;
mod mode;

pub use descriptor::Descriptor;
pub use document::FlowDocument;
pub use element::{AttributeError, DisplayGeometry, ElementKind, FlowElement};
pub use ids::{ElementId, Id, IdError, InstanceId, TaskId};
pub use instance::InstanceRecord;
pub use mode::{InteractionMode, ParseInteractionModeError};
