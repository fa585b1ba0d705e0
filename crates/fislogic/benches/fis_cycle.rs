//! Benchmarks for a full evaluation cycle.
//!
//! Measures fuzzify + inference + defuzzify for the tipping controller
//! under every sampling defuzzifier and resolution, and for a Sugeno
//! system of the same size.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fislogic::prelude::*;
use std::hint::black_box;

const SERVICE: FisTag = 0;
const FOOD: FisTag = 1;
const TIP: FisTag = 0;

static RULES: &[RuleItem] = &fis_rules! {
    IF SERVICE IS 0 OR FOOD IS 3 THEN TIP IS 0 END
    IF SERVICE IS 1 THEN TIP IS 1 END
    IF SERVICE IS 2 OR FOOD IS 4 THEN TIP IS 2 END
};

static POOR: [f64; 2] = [1.5, 0.0];
static GOOD: [f64; 2] = [1.5, 5.0];
static EXCELLENT: [f64; 2] = [1.5, 10.0];
static RANCID: [f64; 4] = [0.0, 0.0, 1.0, 3.0];
static DELICIOUS: [f64; 4] = [7.0, 9.0, 10.0, 10.0];
static CHEAP: [f64; 3] = [0.0, 5.0, 10.0];
static AVERAGE: [f64; 3] = [10.0, 15.0, 20.0];
static GENEROUS: [f64; 3] = [20.0, 25.0, 30.0];
static CHEAP_K: [f64; 1] = [5.0];
static AVERAGE_K: [f64; 3] = [5.0, 0.5, 10.0];
static GENEROUS_K: [f64; 1] = [25.0];

type Tipper = FisSystem<2, 1, 5, 3, 3>;

fn tipper(architecture: Architecture, config: FisConfig) -> Tipper {
    let mut system = Tipper::with_config(architecture, RULES, config).unwrap();
    system
        .configure(|fis| {
            fis.setup_input(SERVICE, 0.0, 10.0)?;
            fis.setup_input(FOOD, 0.0, 10.0)?;
            fis.setup_output(TIP, 0.0, 30.0)?;
            fis.set_input_mf(SERVICE, 0, Shape::Gaussian, &POOR)?;
            fis.set_input_mf(SERVICE, 1, Shape::Gaussian, &GOOD)?;
            fis.set_input_mf(SERVICE, 2, Shape::Gaussian, &EXCELLENT)?;
            fis.set_input_mf(FOOD, 3, Shape::Trapezoidal, &RANCID)?;
            fis.set_input_mf(FOOD, 4, Shape::Trapezoidal, &DELICIOUS)?;
            match architecture {
                Architecture::Sugeno => {
                    fis.set_output_mf(TIP, 0, Shape::Constant, &CHEAP_K)?;
                    fis.set_output_mf(TIP, 1, Shape::Linear, &AVERAGE_K)?;
                    fis.set_output_mf(TIP, 2, Shape::Constant, &GENEROUS_K)
                }
                _ => {
                    fis.set_output_mf(TIP, 0, Shape::Triangular, &CHEAP)?;
                    fis.set_output_mf(TIP, 1, Shape::Triangular, &AVERAGE)?;
                    fis.set_output_mf(TIP, 2, Shape::Triangular, &GENEROUS)
                }
            }
        })
        .unwrap();
    system
}

fn bench_defuzz_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("mamdani_methods");

    for method in [
        DefuzzMethod::Centroid,
        DefuzzMethod::Bisector,
        DefuzzMethod::MeanOfMaximum,
        DefuzzMethod::LargestOfMaximum,
        DefuzzMethod::SmallestOfMaximum,
    ] {
        let config = FisConfig::mamdani_classic().with_defuzz_method(method);
        let mut system = tipper(Architecture::Mamdani, config);
        group.bench_with_input(BenchmarkId::from_parameter(method), &method, |b, _| {
            b.iter(|| system.evaluate(black_box(&[3.0, 8.0])).unwrap())
        });
    }

    group.finish();
}

fn bench_eval_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("mamdani_resolution");

    for points in [10, 100, 1000] {
        let config = FisConfig::mamdani_classic().with_eval_points(points);
        let mut system = tipper(Architecture::Mamdani, config);
        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(BenchmarkId::from_parameter(points), &points, |b, _| {
            b.iter(|| system.evaluate(black_box(&[3.0, 8.0])).unwrap())
        });
    }

    group.finish();
}

fn bench_sugeno(c: &mut Criterion) {
    let mut system = tipper(Architecture::Sugeno, FisConfig::sugeno_weighted_average());
    c.bench_function("sugeno_cycle", |b| {
        b.iter(|| system.evaluate(black_box(&[3.0, 8.0])).unwrap())
    });
}

criterion_group!(benches, bench_defuzz_methods, bench_eval_points, bench_sugeno);
criterion_main!(benches);
