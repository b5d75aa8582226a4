// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session lifecycle and controller.
//!
//! [`FlowPanel`] is the owning handle the host process keeps: at most one
//! session is live, and replacing it is an explicit close-then-open
//! transition that invalidates in-flight enrichment and pending dialogs.

mod controller;

pub use controller::{FlowPanel, PanelChannels, Session, UiEvent};
