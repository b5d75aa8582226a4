// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The host↔panel message protocol.
//!
//! The transport is an opaque bidirectional channel provided by the hosting
//! environment; this module only defines the type-tagged message surface and
//! the confirmation-dialog correlation on top of it.

mod dialog;
mod types;

pub use dialog::DialogBridge;
pub use types::{
    ActionForward, AttrTarget, ConfirmReply, CustomPayload, HostMessage, InstancePayload,
    ModePayload, PanelConfig, PanelMessage, RequestDescription, StepPatch, StepPayload,
    UpdatePayload,
};
