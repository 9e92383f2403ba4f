use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dashboard_core::{
    domain::{Recurrence, TimeInterval, Transaction, TransactionKind},
    engine::{month_window, PeriodAggregator, RecurrenceService},
    snapshot::Snapshot,
};
use tempfile::tempdir;
use uuid::Uuid;

const CATEGORIES: [&str; 6] = [
    "Alimentation",
    "Logement",
    "Transport",
    "Loisirs",
    "Santé",
    "",
];

fn build_transactions(count: usize) -> Vec<Transaction> {
    let user = Uuid::new_v4();
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    (0..count)
        .map(|idx| {
            let day = start + Duration::days((idx % 365) as i64);
            let kind = if idx % 10 == 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let txn = Transaction::new(
                user,
                format!("txn {idx}"),
                10.0 + (idx % 250) as f64,
                kind,
                CATEGORIES[idx % CATEGORIES.len()],
                day.format("%Y-%m-%d").to_string(),
            );
            if idx % 50 == 0 {
                txn.with_recurrence(Recurrence::new(TimeInterval::monthly()))
            } else {
                txn
            }
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let transactions = build_transactions(black_box(10_000));
    let reference = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
    let window = month_window(&reference);

    c.bench_function("month_summary_10k", |b| {
        b.iter(|| {
            let summary = PeriodAggregator::aggregate(&transactions, &window, 1500.0);
            black_box(summary);
        })
    });

    c.bench_function("projected_month_summary_10k", |b| {
        b.iter(|| {
            let expanded = RecurrenceService::expand(&transactions, &window);
            let summary = PeriodAggregator::aggregate(&expanded, &window, 1500.0);
            black_box(summary);
        })
    });
}

fn bench_snapshot_io(c: &mut Criterion) {
    let snapshot = Snapshot {
        transactions: build_transactions(10_000),
        ..Snapshot::default()
    };
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");
    snapshot.save(&path).expect("seed");

    c.bench_function("snapshot_load_10k", |b| {
        b.iter(|| {
            let loaded = Snapshot::load(&path).expect("load snapshot");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_aggregation, bench_snapshot_io);
criterion_main!(benches);
