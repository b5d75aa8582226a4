// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use proteus::model::{ElementId, ElementKind, FlowDocument, FlowElement, InteractionMode};
use proteus::template::{resolve_template, ConditionRegistry, ResolveContext, TemplateSet};

// Benchmark identity (keep stable):
// - Group name in this file: `template.resolve`
// - Case IDs must remain stable across refactors (e.g. `step_config`,
//   `step_inspect`).
fn benches_template(c: &mut Criterion) {
    let set = TemplateSet::builtin();
    let registry = ConditionRegistry::default();

    let mut document = FlowDocument::new();
    document.set_attribute(
        "functions",
        r#"[["sendEmail","rest"],["score","expression"],["notify","rest"]]"#,
    );
    let teams = vec!["payments".to_owned(), "platform".to_owned()];

    let mut element = FlowElement::new(
        ElementId::new("s1").expect("element id"),
        ElementKind::Step,
    );
    element.set_attribute("functionRef", "sendEmail");
    element.set_attribute("label", "Send email");

    let mut group = c.benchmark_group("template.resolve");

    group.bench_function("step_config", |b| {
        b.iter(|| {
            let ctx = ResolveContext {
                document: &document,
                mode: InteractionMode::Select,
                teams: &teams,
            };
            black_box(resolve_template(&set, &registry, &ctx, black_box(&element)))
        })
    });

    group.bench_function("step_inspect", |b| {
        b.iter(|| {
            let ctx = ResolveContext {
                document: &document,
                mode: InteractionMode::Runtime,
                teams: &teams,
            };
            black_box(resolve_template(&set, &registry, &ctx, black_box(&element)))
        })
    });

    group.finish();
}

criterion_group!(benches, benches_template);
criterion_main!(benches);
