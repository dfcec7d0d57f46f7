//! Benchmarks for the aggregation and recommendation hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qp_common::{Band, MonthKey};
use qp_core::recommend::{best_destinations, Conditions};
use qp_core::{parse_dataset, Mask, QsoDataset};

/// A full-size synthetic snapshot: 20 destinations, the complete 0-300 range
/// axis at width 20, 11 bands, deterministic counts.
fn synthetic_dataset() -> QsoDataset {
    let bands = [160u16, 80, 60, 40, 30, 20, 17, 15, 12, 10, 6];
    let mut root = serde_json::Map::new();

    for d in 0..20u64 {
        let mut months = serde_json::Map::new();
        let mut ranges = serde_json::Map::new();
        for (r, low) in (0..300u64).step_by(20).enumerate() {
            let mut band_map = serde_json::Map::new();
            for (b, band) in bands.iter().enumerate() {
                let mut hour_map = serde_json::Map::new();
                for hour in 0..24u64 {
                    // Arbitrary but stable counts.
                    let count = (d * 7 + r as u64 * 5 + b as u64 * 3 + hour) % 17;
                    hour_map.insert(hour.to_string(), serde_json::json!(count));
                }
                band_map.insert(band.to_string(), serde_json::Value::Object(hour_map));
            }
            ranges.insert(
                format!("({low},{})", low + 20),
                serde_json::Value::Object(band_map),
            );
        }
        months.insert("All".to_string(), serde_json::Value::Object(ranges));
        root.insert(
            format!("Destination {d}"),
            serde_json::Value::Object(months),
        );
    }

    parse_dataset(&serde_json::Value::Object(root).to_string()).expect("synthetic dataset")
}

fn bench_grand_total(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    c.bench_function("sum_unrestricted", |b| {
        b.iter(|| dataset.sum(black_box(&Mask::all())).unwrap())
    });
}

fn bench_best_destinations(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    let conditions = Conditions {
        month: MonthKey::All,
        hour: 12,
        tolerance: 1,
        sfi: 145,
        smoothing: true,
    };
    c.bench_function("best_destinations_smoothed", |b| {
        b.iter(|| {
            best_destinations(
                black_box(&dataset),
                black_box(Band(20)),
                black_box(&conditions),
                10,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_grand_total, bench_best_destinations);
criterion_main!(benches);
