use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use perhash::{DenseMap, KeyHandle, SlotContext};
use std::collections::HashMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_intern(c: &mut Criterion) {
    c.bench_function("intern_10k", |b| {
        let names: Vec<_> = lcg(1).take(10_000).map(key).collect();
        b.iter_batched(
            SlotContext::new,
            |ctx| {
                let handles: Vec<KeyHandle> = names.iter().map(|n| ctx.intern(n)).collect();
                black_box((ctx, handles))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_dispose_reintern(c: &mut Criterion) {
    c.bench_function("dispose_reintern", |b| {
        let ctx = SlotContext::new();
        let names: Vec<_> = lcg(3).take(1_000).map(key).collect();
        let _held: Vec<_> = names.iter().map(|n| ctx.intern(n)).collect();
        let mut it = names.iter().cycle();
        b.iter(|| {
            let mut h = ctx.intern(it.next().unwrap());
            black_box(h.dispose(&ctx).unwrap());
        })
    });
}

fn bench_get_dense(c: &mut Criterion) {
    c.bench_function("dense_map_get", |b| {
        let ctx = SlotContext::new();
        let handles: Vec<_> = lcg(7).take(20_000).map(|x| ctx.intern(&key(x))).collect();
        let mut m = DenseMap::new(&ctx);
        for (i, h) in handles.iter().enumerate() {
            m.set(h, i as u64).unwrap();
        }
        let mut it = handles.iter().cycle();
        b.iter(|| {
            let h = it.next().unwrap();
            black_box(m.get(h).unwrap());
        })
    });
}

fn bench_get_std_hashmap(c: &mut Criterion) {
    c.bench_function("std_hashmap_get", |b| {
        let names: Vec<_> = lcg(7).take(20_000).map(key).collect();
        let m: HashMap<&str, u64> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i as u64))
            .collect();
        let mut it = names.iter().cycle();
        b.iter(|| {
            let n = it.next().unwrap();
            black_box(m.get(n.as_str()).unwrap());
        })
    });
}

fn bench_fill_late_map(c: &mut Criterion) {
    c.bench_function("dense_map_fill_presized", |b| {
        let ctx = SlotContext::new();
        let handles: Vec<_> = lcg(11).take(10_000).map(|x| ctx.intern(&key(x))).collect();
        b.iter(|| {
            let mut m = DenseMap::new(&ctx);
            for (i, h) in handles.iter().enumerate() {
                m.set(h, i as u64).unwrap();
            }
            black_box(m)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_intern, bench_dispose_reintern, bench_get_dense, bench_get_std_hashmap, bench_fill_late_map
}
criterion_main!(benches);
