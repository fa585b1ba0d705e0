//! Restaurant tipping controller.
//!
//! This example showcases:
//! - Wiring a Mamdani system over stack-allocated tables
//! - Every sampling defuzzifier on the same rule base
//! - Recording the aggregated output curve

use fislogic::prelude::*;

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

static RULES: &[RuleItem] = &fis_rules! {
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

const POINTS: usize = 60;

fn main() -> Result<(), FisError> {
    println!("=== Fuzzy Tipper ===\n");

    let mut xs = [0.0; POINTS];
    let mut ys = [0.0; POINTS];
    let mut inputs = [FisInput::default(); 2];
    let mut outputs = [FisOutput::new()];
    let mut input_mfs = [MembershipFunction::new(); 5];
    let mut output_mfs = [MembershipFunction::new(); 3];
    let mut strengths = [0.0; 3];

    let config = FisConfig::mamdani_classic().with_eval_points(POINTS);
    let mut fis = Fis::setup_with_config(
        Architecture::Mamdani,
        FisStorage {
            inputs: &mut inputs,
            outputs: &mut outputs,
            input_mfs: &mut input_mfs,
            output_mfs: &mut output_mfs,
            rules: RULES,
            rule_strengths: &mut strengths,
        },
        3,
        config,
    )?;

    fis.setup_input(SERVICE, 0.0, 10.0)?;
    fis.setup_input(FOOD, 0.0, 10.0)?;
    fis.setup_output(TIP, 0.0, 30.0)?;
    fis.set_input_mf(SERVICE, POOR, Shape::Gaussian, &POOR_P)?;
    fis.set_input_mf(SERVICE, GOOD, Shape::Gaussian, &GOOD_P)?;
    fis.set_input_mf(SERVICE, EXCELLENT, Shape::Gaussian, &EXCELLENT_P)?;
    fis.set_input_mf(FOOD, RANCID, Shape::Trapezoidal, &RANCID_P)?;
    fis.set_input_mf(FOOD, DELICIOUS, Shape::Trapezoidal, &DELICIOUS_P)?;
    fis.set_output_mf(TIP, CHEAP, Shape::Triangular, &CHEAP_P)?;
    fis.set_output_mf(TIP, AVERAGE, Shape::Triangular, &AVERAGE_P)?;
    fis.set_output_mf(TIP, GENEROUS, Shape::Triangular, &GENEROUS_P)?;
    fis.store_aggregated_region(TIP, &mut xs, &mut ys)?;

    // 1. Tip surface
    println!("1. Centroid tip (%) by service (rows) and food (columns)");
    print!("   svc\\food");
    for food in (0..=10).step_by(2) {
        print!("{food:>7}");
    }
    println!();
    for service in (0..=10).step_by(2) {
        print!("   {service:>8}");
        for food in (0..=10).step_by(2) {
            fis.set_input(SERVICE, service as f64)?;
            fis.set_input(FOOD, food as f64)?;
            fis.fuzzify();
            fis.inference()?;
            fis.defuzzify()?;
            print!("{:>7.2}", fis.output(TIP)?);
        }
        println!();
    }
    println!();

    // 2. Defuzzifiers
    println!("2. Service 3, food 8 under each defuzzifier");
    fis.set_input(SERVICE, 3.0)?;
    fis.set_input(FOOD, 8.0)?;
    fis.fuzzify();
    fis.inference()?;
    for rule in 0..fis.rule_count() {
        println!(
            "   rule {} strength {:.4}",
            rule + 1,
            fis.rule_strength(rule).unwrap_or_default()
        );
    }
    for method in DefuzzMethod::ALL {
        if method.supports(Architecture::Mamdani) {
            fis.set_defuzz_method(method)?;
            fis.defuzzify()?;
            println!("   {:<8} {:>7.3}", method.name(), fis.output(TIP)?);
        }
    }
    println!();

    // 3. Aggregated curve of the last cycle
    println!("3. Aggregated output curve");
    if let Some((x, y)) = fis.output_state(TIP)?.aggregated_region() {
        for (xi, yi) in x.iter().zip(y).step_by(3) {
            let bar = "#".repeat((yi * 40.0).round() as usize);
            println!("   {xi:>6.2} | {bar}");
        }
    }

    println!("\n=== Done ===");
    Ok(())
}
