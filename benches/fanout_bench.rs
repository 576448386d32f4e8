//! Benchmarks for mood fan-out
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use emotibot_relay::session::{BroadcastSession, SessionEvent};
use emotibot_relay::store::{MoodStore, StoreConfig, Subscription};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn create_store(subscribers: usize) -> (MoodStore, Vec<Subscription>) {
    let config = StoreConfig {
        max_subscribers: subscribers.max(1),
        ..Default::default()
    };
    let store = MoodStore::new(config).unwrap();
    let subs = (0..subscribers)
        .map(|_| store.subscribe().unwrap())
        .collect();
    (store, subs)
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");

    for count in [0, 10, 100, 1000] {
        let (store, mut subs) = create_store(count);

        group.throughput(Throughput::Elements(count.max(1) as u64));

        group.bench_with_input(BenchmarkId::new("fanout", count), &count, |b, _| {
            b.iter(|| {
                store.set(black_box("happy")).unwrap();
                // Drain so every iteration delivers instead of dropping
                for sub in subs.iter_mut() {
                    while sub.receiver.try_recv().is_ok() {}
                }
            })
        });
    }

    group.finish();
}

fn bench_subscribe(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscribe");

    group.bench_function("subscribe_unsubscribe", |b| {
        let store = MoodStore::new(StoreConfig::default()).unwrap();

        b.iter(|| {
            let sub = store.subscribe().unwrap();
            store.unsubscribe(black_box(sub.id))
        });
    });

    group.bench_function("get", |b| {
        let store = MoodStore::new(StoreConfig::default()).unwrap();

        b.iter(|| black_box(store.get()));
    });

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("session");

    group.bench_function("update_delivery", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let store = Arc::new(MoodStore::new(StoreConfig::default()).unwrap());
                let mut session = BroadcastSession::open(
                    store.clone(),
                    Duration::from_secs(60),
                    CancellationToken::new(),
                )
                .unwrap();

                // Consume the snapshot
                session.next_event().await.unwrap();

                let start = std::time::Instant::now();

                for i in 0..iters {
                    store.set(format!("mood-{}", i)).unwrap();
                    match session.next_event().await {
                        Some(SessionEvent::Update(mood)) => {
                            black_box(mood);
                        }
                        other => panic!("unexpected event: {:?}", other),
                    }
                }

                start.elapsed()
            })
        });
    });

    group.finish();
}

criterion_group!(benches, bench_set, bench_subscribe, bench_session);
criterion_main!(benches);
