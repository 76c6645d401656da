// ============================================================================
// Calculation Engine Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Facade - calculate() through the registry, per formula
// 2. Rounding - with_precision() for each standard context
// 3. Aggregation - plan totals over growing line-item counts
// ============================================================================

use calculation_engine::engine::calculations::*;
use calculation_engine::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn d(s: &str) -> DecimalValue {
    s.parse().unwrap()
}

fn benchmark_calculate(c: &mut Criterion) {
    let engine = create_default_engine().unwrap();
    let mut group = c.benchmark_group("calculate");

    let cases: [(&str, Vec<DecimalValue>); 4] = [
        (MARGIN_PERCENTAGE, vec![d("1250.00"), d("1000.00")]),
        (ACTUAL_UNIT_COST, vec![d("1000"), d("50000")]),
        (PACING_INDEX, vec![d("450"), d("500")]),
        (SPEND_PACING, vec![d("400"), d("1500"), d("10"), d("30")]),
    ];

    for (name, args) in cases.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), args, |b, args| {
            b.iter(|| black_box(engine.calculate(name, None, black_box(args)).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_with_precision(c: &mut Criterion) {
    let engine = create_default_engine().unwrap();
    let result = engine
        .calculate(MARGIN_PERCENTAGE, None, &[d("120"), d("100")])
        .unwrap();
    let mut group = c.benchmark_group("with_precision");

    for context in ["storage", "display.dollars", "unit.cost", "percentage"] {
        group.bench_with_input(
            BenchmarkId::from_parameter(context),
            &context,
            |b, context| {
                b.iter(|| black_box(engine.with_precision(&result, context).unwrap()));
            },
        );
    }

    group.finish();
}

fn benchmark_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_plan_cost");

    for count in [10usize, 100, 1000].iter() {
        let items: Vec<DecimalValue> = (0..*count)
            .map(|i| DecimalValue::from_parts(123_456 + i as i128, 2).unwrap())
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter(|| black_box(aggregate_plan_cost(black_box(items)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_calculate,
    benchmark_with_precision,
    benchmark_aggregate
);
criterion_main!(benches);
