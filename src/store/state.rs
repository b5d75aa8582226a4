// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::model::{Descriptor, InstanceRecord, InteractionMode};
use crate::protocol::PanelConfig;

/// The flat session snapshot.
///
/// The same type doubles as a delta: a partially-filled value merged into the
/// snapshot with [`PersistedState::merge_from`]. The merge is shallow and
/// right-biased; fields absent from the delta are preserved, so merging an
/// empty delta is a no-op and merging is associative.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<InteractionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PanelConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectedState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configurator: Option<ConfiguratorGeometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_descriptors: Option<Vec<Descriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectedState {
    pub id: Option<String>,
    pub instances: Vec<InstanceRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfiguratorGeometry {
    pub open: bool,
    /// Splitter offset in pixels.
    pub position: Option<u32>,
}

impl PersistedState {
    /// Right-biased shallow merge: every field present in `delta` replaces
    /// the current value; absent fields are untouched.
    pub fn merge_from(&mut self, delta: &PersistedState) {
        if delta.base.is_some() {
            self.base = delta.base.clone();
        }
        if delta.file.is_some() {
            self.file = delta.file.clone();
        }
        if delta.text.is_some() {
            self.text = delta.text.clone();
        }
        if delta.readonly.is_some() {
            self.readonly = delta.readonly;
        }
        if delta.mode.is_some() {
            self.mode = delta.mode;
        }
        if delta.config.is_some() {
            self.config = delta.config.clone();
        }
        if delta.selected.is_some() {
            self.selected = delta.selected.clone();
        }
        if delta.configurator.is_some() {
            self.configurator = delta.configurator;
        }
        if delta.custom_descriptors.is_some() {
            self.custom_descriptors = delta.custom_descriptors.clone();
        }
        if delta.input.is_some() {
            self.input = delta.input.clone();
        }
        if delta.teams.is_some() {
            self.teams = delta.teams.clone();
        }
    }

    pub fn merged(mut self, delta: &PersistedState) -> Self {
        self.merge_from(delta);
        self
    }
}

/// Process-wide snapshot store surviving session teardown.
///
/// Single writer at a time; concurrent saves are last-write-wins merges.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    inner: Arc<Mutex<PersistedState>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, delta: &PersistedState) {
        self.inner
            .lock()
            .expect("state store lock poisoned")
            .merge_from(delta);
    }

    pub fn snapshot(&self) -> PersistedState {
        self.inner
            .lock()
            .expect("state store lock poisoned")
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfiguratorGeometry, PersistedState, SelectedState, StateStore};
    use crate::model::InteractionMode;

    fn delta_a() -> PersistedState {
        PersistedState {
            base: Some("/projects/orders".to_owned()),
            mode: Some(InteractionMode::Connect),
            ..PersistedState::default()
        }
    }

    fn delta_b() -> PersistedState {
        PersistedState {
            mode: Some(InteractionMode::Runtime),
            input: Some("{}".to_owned()),
            ..PersistedState::default()
        }
    }

    #[test]
    fn merge_is_right_biased() {
        let state = PersistedState::default().merged(&delta_a()).merged(&delta_b());

        assert_eq!(state.base.as_deref(), Some("/projects/orders"));
        assert_eq!(state.mode, Some(InteractionMode::Runtime));
        assert_eq!(state.input.as_deref(), Some("{}"));
    }

    #[test]
    fn merge_is_associative() {
        let initial = PersistedState {
            file: Some("orders.flow".to_owned()),
            ..PersistedState::default()
        };

        let left = initial.clone().merged(&delta_a()).merged(&delta_b());
        let right = initial.merged(&delta_a().merged(&delta_b()));
        assert_eq!(left, right);
    }

    #[test]
    fn empty_delta_is_a_noop() {
        let state = delta_a().merged(&delta_b());
        let merged = state.clone().merged(&PersistedState::default());
        assert_eq!(merged, state);
    }

    #[test]
    fn absent_keys_are_preserved() {
        let mut state = PersistedState {
            selected: Some(SelectedState {
                id: Some("s1".to_owned()),
                instances: Vec::new(),
            }),
            configurator: Some(ConfiguratorGeometry {
                open: true,
                position: Some(420),
            }),
            ..PersistedState::default()
        };

        state.merge_from(&delta_b());
        assert_eq!(
            state.selected.as_ref().and_then(|s| s.id.as_deref()),
            Some("s1")
        );
        assert_eq!(state.configurator.and_then(|c| c.position), Some(420));
    }

    #[test]
    fn store_survives_clone_boundaries() {
        let store = StateStore::new();
        store.save(&delta_a());

        let other = store.clone();
        other.save(&delta_b());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.base.as_deref(), Some("/projects/orders"));
        assert_eq!(snapshot.mode, Some(InteractionMode::Runtime));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let state = delta_a().merged(&delta_b());
        let text = serde_json::to_string(&state).expect("serialize");
        let parsed: PersistedState = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed, state);
    }
}
