// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use proteus::model::{InstanceRecord, InteractionMode};
use proteus::store::{PersistedState, SelectedState, StateStore};

// Benchmark identity (keep stable):
// - Group name in this file: `store.merge`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `save_small`, `save_selected`).
fn benches_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store.merge");

    let small_delta = PersistedState {
        mode: Some(InteractionMode::Runtime),
        input: Some("{\"orderId\":7}".to_owned()),
        ..PersistedState::default()
    };
    group.bench_function("save_small", |b| {
        let store = StateStore::new();
        b.iter(|| store.save(black_box(&small_delta)));
    });

    let selected_delta = PersistedState {
        selected: Some(SelectedState {
            id: Some("s1".to_owned()),
            instances: (0..32)
                .map(|i| InstanceRecord {
                    id: format!("i{i}"),
                    status: Some("completed".to_owned()),
                    ..InstanceRecord::default()
                })
                .collect(),
        }),
        ..PersistedState::default()
    };
    group.bench_function("save_selected", |b| {
        let store = StateStore::new();
        b.iter(|| store.save(black_box(&selected_delta)));
    });

    group.bench_function("snapshot", |b| {
        let store = StateStore::new();
        store.save(&selected_delta);
        b.iter(|| black_box(store.snapshot()));
    });

    group.finish();
}

criterion_group!(benches, benches_store);
criterion_main!(benches);
