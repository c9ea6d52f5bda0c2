use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use compass::app::{AppAction, AppState, ProfileAction, ProfileUpdate, UserAction};
use compass::{RawAction, Store};
use serde_json::json;

fn set_name(i: usize) -> AppAction {
    AppAction::Profile(ProfileAction::SetProfile(ProfileUpdate {
        name: Some(format!("user-{i}")),
        ..ProfileUpdate::default()
    }))
}

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| Store::new(black_box(AppState::default())));
    });
}

fn store_get_benchmark(c: &mut Criterion) {
    let store = Store::new(AppState::default());

    c.bench_function("store_get", |b| {
        b.iter(|| {
            black_box(store.get());
        });
    });
}

fn store_dispatch_benchmark(c: &mut Criterion) {
    let store = Store::new(AppState::default());

    c.bench_function("store_dispatch", |b| {
        let mut i = 0;
        b.iter(|| {
            store.dispatch(black_box(set_name(i))).unwrap();
            i += 1;
        });
    });
}

fn raw_dispatch_benchmark(c: &mut Criterion) {
    let store = Store::new(AppState::default());

    c.bench_function("store_dispatch_raw", |b| {
        b.iter(|| {
            let raw = RawAction::with_payload("profile/setProfile", json!({ "skills": ["Rust"] }));
            store.dispatch_raw(black_box(raw)).unwrap();
        });
    });
}

fn store_subscribe_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_notify");

    for observer_count in [1, 10, 100].iter() {
        let store = Store::new(AppState::default());
        let subscriptions: Vec<_> = (0..*observer_count)
            .map(|_| {
                store.subscribe(|| {
                    // Empty observer
                })
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(observer_count),
            observer_count,
            |b, _| {
                b.iter(|| {
                    store
                        .dispatch(black_box(AppAction::User(UserAction::Logout)))
                        .unwrap();
                });
            },
        );
        drop(subscriptions);
    }
    group.finish();
}

fn selector_benchmark(c: &mut Criterion) {
    let store = Store::new(AppState::default());
    let skills = store.select(|state: &AppState| state.profile.profile.skills.len());

    c.bench_function("selector_reevaluation", |b| {
        let mut i = 0;
        b.iter(|| {
            store.dispatch(set_name(i)).unwrap();
            black_box(skills.get());
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    store_creation_benchmark,
    store_get_benchmark,
    store_dispatch_benchmark,
    raw_dispatch_benchmark,
    store_subscribe_benchmark,
    selector_benchmark,
);
criterion_main!(benches);
