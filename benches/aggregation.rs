use ccmeter::aggregation::StatisticsAggregator;
use ccmeter_core::{ModelName, SessionId, TimezoneConfig, TokenCounts, UsageEntry};
use ccmeter_pricing::CostCalculator;
use chrono::{TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn create_test_entries(count: usize) -> Vec<UsageEntry> {
    let mut entries = Vec::with_capacity(count);
    let base_time = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();

    for i in 0..count {
        let timestamp = base_time + chrono::Duration::minutes((i * 17) as i64);

        entries.push(UsageEntry {
            project: format!("/Users/dev/project-{}", i % 5),
            timestamp: timestamp.to_rfc3339(),
            model: ModelName::new(if i % 3 == 0 {
                "claude-opus-4-1-20250805"
            } else {
                "claude-sonnet-4-20250514"
            }),
            tokens: TokenCounts::new(
                (i * 100) as u64,
                (i * 50) as u64,
                (i * 10) as u64,
                (i * 5) as u64,
            ),
            cost: (i as f64) * 0.01,
            session_id: Some(SessionId::new(format!("session-{}", i % 40))),
        });
    }

    entries
}

fn benchmark_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    let aggregator = StatisticsAggregator::new(TimezoneConfig::utc());
    for count in [100, 1_000, 10_000] {
        let entries = create_test_entries(count);
        group.bench_function(format!("aggregate_{count}_entries"), |b| {
            b.iter(|| aggregator.aggregate(black_box(&entries), 0));
        });
    }

    let tokyo = StatisticsAggregator::new(TimezoneConfig::from_cli(Some("Asia/Tokyo"), false).unwrap());
    let entries = create_test_entries(1_000);
    group.bench_function("aggregate_1000_entries_tokyo", |b| {
        b.iter(|| tokyo.aggregate(black_box(&entries), 0));
    });

    group.finish();
}

fn benchmark_cost_calculation(c: &mut Criterion) {
    let calculator = CostCalculator::default();
    let tokens = TokenCounts::new(12_000, 3_400, 800, 25_000);
    let models = [
        ModelName::new("claude-opus-4-1-20250805"),
        ModelName::new("claude-sonnet-4-20250514"),
        ModelName::new("claude-3-5-haiku-20241022"),
        ModelName::new("some-future-model"),
    ];

    c.bench_function("calculate_cost_mixed_models", |b| {
        b.iter(|| {
            models
                .iter()
                .map(|model| calculator.calculate_cost(black_box(&tokens), model))
                .sum::<f64>()
        });
    });
}

criterion_group!(benches, benchmark_aggregation, benchmark_cost_calculation);
criterion_main!(benches);
