//! End-to-end checks on the classic restaurant tipping controller.

use approx::assert_abs_diff_eq;
use fislogic::prelude::*;
use fislogic::{FisStorage, InferenceStatus};

const SERVICE: FisTag = 0;
const FOOD: FisTag = 1;
const TIP: FisTag = 0;

const POOR: FisTag = 0;
const GOOD: FisTag = 1;
const EXCELLENT: FisTag = 2;
const RANCID: FisTag = 3;
const DELICIOUS: FisTag = 4;

const CHEAP: FisTag = 0;
const AVERAGE: FisTag = 1;
const GENEROUS: FisTag = 2;

static RULES: [RuleItem; 23] = fis_rules! {
    IF SERVICE IS POOR OR FOOD IS RANCID THEN TIP IS CHEAP END
    IF SERVICE IS GOOD THEN TIP IS AVERAGE END
    IF SERVICE IS EXCELLENT OR FOOD IS DELICIOUS THEN TIP IS GENEROUS END
};

static POOR_P: [f64; 2] = [1.5, 0.0];
static GOOD_P: [f64; 2] = [1.5, 5.0];
static EXCELLENT_P: [f64; 2] = [1.5, 10.0];
static RANCID_P: [f64; 4] = [0.0, 0.0, 1.0, 3.0];
static DELICIOUS_P: [f64; 4] = [7.0, 9.0, 10.0, 10.0];
static CHEAP_P: [f64; 3] = [0.0, 5.0, 10.0];
static AVERAGE_P: [f64; 3] = [10.0, 15.0, 20.0];
static GENEROUS_P: [f64; 3] = [20.0, 25.0, 30.0];

struct Tipper<'p> {
    inputs: [FisInput; 2],
    outputs: [FisOutput<'p>; 1],
    input_mfs: [MembershipFunction<'p>; 5],
    output_mfs: [MembershipFunction<'p>; 3],
    strengths: [f64; 3],
}

impl<'p> Tipper<'p> {
    fn new() -> Self {
        Self {
            inputs: [FisInput::default(); 2],
            outputs: [FisOutput::new()],
            input_mfs: [MembershipFunction::new(); 5],
            output_mfs: [MembershipFunction::new(); 3],
            strengths: [0.0; 3],
        }
    }

    fn fis(&mut self, config: FisConfig) -> Fis<'_, 'p> {
        let storage = FisStorage {
            inputs: &mut self.inputs,
            outputs: &mut self.outputs,
            input_mfs: &mut self.input_mfs,
            output_mfs: &mut self.output_mfs,
            rules: &RULES,
            rule_strengths: &mut self.strengths,
        };
        let mut fis = Fis::setup_with_config(Architecture::Mamdani, storage, 3, config).unwrap();
        fis.setup_input(SERVICE, 0.0, 1.0).unwrap();
        fis.setup_input(FOOD, 0.0, 10.0).unwrap();
        fis.setup_output(TIP, 0.0, 30.0).unwrap();

        fis.set_input_mf(SERVICE, POOR, Shape::Gaussian, &POOR_P).unwrap();
        fis.set_input_mf(SERVICE, GOOD, Shape::Gaussian, &GOOD_P).unwrap();
        fis.set_input_mf(SERVICE, EXCELLENT, Shape::Gaussian, &EXCELLENT_P)
            .unwrap();
        fis.set_input_mf(FOOD, RANCID, Shape::Trapezoidal, &RANCID_P)
            .unwrap();
        fis.set_input_mf(FOOD, DELICIOUS, Shape::Trapezoidal, &DELICIOUS_P)
            .unwrap();

        fis.set_output_mf(TIP, CHEAP, Shape::Triangular, &CHEAP_P).unwrap();
        fis.set_output_mf(TIP, AVERAGE, Shape::Triangular, &AVERAGE_P)
            .unwrap();
        fis.set_output_mf(TIP, GENEROUS, Shape::Triangular, &GENEROUS_P)
            .unwrap();
        fis
    }
}

fn cycle(fis: &mut Fis<'_, '_>, service: f64, food: f64) -> f64 {
    fis.set_input(SERVICE, service).unwrap();
    fis.set_input(FOOD, food).unwrap();
    fis.fuzzify();
    fis.inference().unwrap();
    fis.defuzzify().unwrap();
    fis.output(TIP).unwrap()
}

#[test]
fn test_centroid_regression() {
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_classic());
    let tip = cycle(&mut fis, 1.0, 9.0);
    assert_abs_diff_eq!(tip, 15.197731938483939, epsilon = 1e-3);
    assert_eq!(fis.inference_status(), InferenceStatus::Succeeded);
    assert_eq!(fis.completed_rules(), 3);
}

#[test]
fn test_rule_strengths() {
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_classic());
    cycle(&mut fis, 1.0, 9.0);
    assert_abs_diff_eq!(fis.rule_strength(0).unwrap(), 0.8007374029168081, epsilon = 1e-12);
    assert_abs_diff_eq!(fis.rule_strength(1).unwrap(), 0.028565500784550377, epsilon = 1e-12);
    assert_abs_diff_eq!(fis.rule_strength(2).unwrap(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(fis.membership_degree(DELICIOUS).unwrap(), 1.0);
}

#[test]
fn test_repeated_cycles_are_identical() {
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_classic());
    let first = cycle(&mut fis, 1.0, 9.0);
    for _ in 0..5 {
        assert_eq!(cycle(&mut fis, 1.0, 9.0).to_bits(), first.to_bits());
    }

    // a different input in between must not leave residue
    cycle(&mut fis, 0.2, 1.0);
    assert_eq!(cycle(&mut fis, 1.0, 9.0).to_bits(), first.to_bits());
}

#[test]
fn test_inputs_are_clamped() {
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_classic());
    let tip = cycle(&mut fis, 5.0, 9.0);
    assert_abs_diff_eq!(fis.input(SERVICE).unwrap(), 1.0);
    assert_abs_diff_eq!(tip, 15.197731938483939, epsilon = 1e-3);
}

#[test]
fn test_bad_service_gives_cheap_tip() {
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_classic());
    let tip = cycle(&mut fis, 0.0, 2.0);
    assert_abs_diff_eq!(tip, 5.077190579823533, epsilon = 1e-3);
    assert_abs_diff_eq!(fis.rule_strength(0).unwrap(), 1.0);
}

#[test]
fn test_sampling_methods() {
    let expected = [
        (DefuzzMethod::Bisector, 18.45),
        (DefuzzMethod::MeanOfMaximum, 25.05),
        (DefuzzMethod::LargestOfMaximum, 25.05),
        (DefuzzMethod::SmallestOfMaximum, 25.05),
    ];
    for (method, value) in expected {
        let mut tipper = Tipper::new();
        let config = FisConfig::mamdani_classic().with_defuzz_method(method);
        let mut fis = tipper.fis(config);
        let tip = cycle(&mut fis, 1.0, 9.0);
        assert_abs_diff_eq!(tip, value, epsilon = 1e-9);
    }
}

#[test]
fn test_finer_sampling() {
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_classic().with_eval_points(1000));
    assert_abs_diff_eq!(cycle(&mut fis, 1.0, 9.0), 15.19689094742103, epsilon = 1e-6);

    fis.set_defuzz_method(DefuzzMethod::Bisector).unwrap();
    assert_abs_diff_eq!(cycle(&mut fis, 1.0, 9.0), 18.465, epsilon = 1e-9);

    fis.set_defuzz_method(DefuzzMethod::MeanOfMaximum).unwrap();
    assert_abs_diff_eq!(cycle(&mut fis, 1.0, 9.0), 25.005, epsilon = 1e-9);
}

#[test]
fn test_product_operators() {
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_product());
    assert_abs_diff_eq!(cycle(&mut fis, 1.0, 9.0), 16.08940614406475, epsilon = 1e-6);
}

#[test]
fn test_aggregated_region_is_recorded() {
    let mut xs = [0.0; 100];
    let mut ys = [0.0; 100];
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_classic());
    fis.store_aggregated_region(TIP, &mut xs, &mut ys).unwrap();
    cycle(&mut fis, 1.0, 9.0);

    let (x, y) = fis.output_state(TIP).unwrap().aggregated_region().unwrap();
    assert_abs_diff_eq!(x[0], 0.15, epsilon = 1e-12);
    assert_abs_diff_eq!(x[99], 29.85, epsilon = 1e-12);
    assert!(y.iter().all(|&v| (0.0..=1.0).contains(&v)));

    let (peak, _) = y
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |best, (k, &v)| if v > best.1 { (k, v) } else { best });
    assert_eq!(peak, 83);
    assert_abs_diff_eq!(x[peak], 25.05, epsilon = 1e-9);

    // the centroid of the recorded curve is the crisp output
    let (sxy, sy) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxy, sy), (&xi, &yi)| (sxy + xi * yi, sy + yi));
    assert_abs_diff_eq!(sxy / sy, fis.output(TIP).unwrap(), epsilon = 1e-9);
}

#[test]
fn test_region_capacity_is_checked() {
    let mut xs = [0.0; 100];
    let mut ys = [0.0; 50];
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_classic());
    assert_eq!(
        fis.store_aggregated_region(TIP, &mut xs, &mut ys),
        Err(FisError::RegionTooShort {
            required: 100,
            actual: 50
        })
    );
}

#[test]
fn test_eval_points_cannot_outgrow_region() {
    let mut xs = [0.0; 100];
    let mut ys = [0.0; 100];
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_classic());
    fis.store_aggregated_region(TIP, &mut xs, &mut ys).unwrap();
    assert!(matches!(
        fis.set_eval_points(200),
        Err(FisError::RegionTooShort { required: 200, .. })
    ));
    assert_eq!(fis.config().eval_points, 100);
    fis.set_eval_points(50).unwrap();
}

#[test]
fn test_output_index() {
    let mut tipper = Tipper::new();
    let mut fis = tipper.fis(FisConfig::mamdani_classic());
    let tip = cycle(&mut fis, 1.0, 9.0);
    assert_eq!(fis[TIP].to_bits(), tip.to_bits());
    assert!(fis.output(3).is_err());
}
