// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for panel sessions across teardown/recreation.
//!
//! The host may hide the panel at any time, destroying the webview and with
//! it the live session; the state store is the process-wide snapshot a new
//! session restores from.

mod state;

pub use state::{ConfiguratorGeometry, PersistedState, SelectedState, StateStore};
