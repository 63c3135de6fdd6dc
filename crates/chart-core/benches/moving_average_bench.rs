use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quotechart_core::{moving_average, volume_bars, PricePoint};

fn gen_quotes(n: usize) -> Vec<PricePoint> {
    let start = Utc.with_ymd_and_hms(2000, 1, 3, 0, 0, 0).unwrap();
    let mut v = Vec::with_capacity(n);
    let mut price = 100.0f64;
    for i in 0..n {
        let open = price;
        let close = open + if i % 3 == 0 { -0.4 } else { 0.3 };
        price = close;
        v.push(PricePoint {
            date: start + Duration::days(i as i64),
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume: Some(1_000.0 + (i % 500) as f64),
        });
    }
    v
}

fn bench_moving_average(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_average");
    for &n in &[5_000usize, 50_000usize] {
        let data = gen_quotes(n);
        for &window in &[20usize, 200usize] {
            group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}_w{window}")), &window, |b, &w| {
                b.iter(|| black_box(moving_average(black_box(&data), w)));
            });
        }
    }
    group.finish();
}

fn bench_volume_bars(c: &mut Criterion) {
    let data = gen_quotes(50_000);
    c.bench_function("volume_bars_n50000", |b| b.iter(|| black_box(volume_bars(black_box(&data)))));
}

criterion_group!(benches, bench_moving_average, bench_volume_bars);
criterion_main!(benches);
