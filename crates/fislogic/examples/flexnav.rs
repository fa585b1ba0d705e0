//! Sensor blending for a navigation filter.
//!
//! Two outputs decide how much to trust the gyroscope versus the
//! accelerometer for pitch (`phit`) and roll (`thetat`), from the angular
//! rate, the two accelerations and the attitude error. The whole system
//! lives in one fixed-capacity [`FisSystem`].

use fislogic::prelude::*;

const WT: FisTag = 0;
const DAX: FisTag = 1;
const DAY: FisTag = 2;
const AE: FisTag = 3;
const PHIT: FisTag = 0;
const THETAT: FisTag = 1;

const WT_SLOW: FisTag = 0;
const WT_MED: FisTag = 1;
const WT_FAST: FisTag = 2;
const DAX_LOW: FisTag = 3;
const DAX_MED: FisTag = 4;
const DAX_HIGH: FisTag = 5;
const DAY_LOW: FisTag = 6;
const DAY_MED: FisTag = 7;
const DAY_HIGH: FisTag = 8;
const AE_LOW: FisTag = 9;
const AE_MED: FisTag = 10;
const AE_HIGH: FisTag = 11;

const PHIT_GYRO: FisTag = 0;
const PHIT_BOTH: FisTag = 1;
const PHIT_ACCEL: FisTag = 2;
const THETAT_GYRO: FisTag = 3;
const THETAT_BOTH: FisTag = 4;
const THETAT_ACCEL: FisTag = 5;

static RULES: &[RuleItem] = &fis_rules! {
    IF WT IS NOT WT_SLOW THEN PHIT IS PHIT_GYRO AND THETAT IS THETAT_GYRO END
    IF DAX IS DAX_HIGH THEN THETAT IS THETAT_GYRO END
    IF DAY IS DAY_HIGH THEN THETAT IS THETAT_GYRO END
    IF AE IS AE_HIGH THEN PHIT IS PHIT_GYRO AND THETAT IS THETAT_GYRO END
    IF WT IS WT_SLOW AND DAX IS DAX_LOW AND AE IS AE_LOW THEN PHIT IS PHIT_ACCEL END
    IF WT IS WT_SLOW AND DAY IS DAY_LOW AND AE IS AE_LOW THEN THETAT IS THETAT_ACCEL END
    IF WT IS WT_SLOW AND DAX IS DAX_LOW AND AE IS AE_MED THEN PHIT IS PHIT_BOTH END
    IF WT IS WT_SLOW AND DAY IS DAY_LOW AND AE IS AE_MED THEN THETAT IS THETAT_BOTH END
    IF WT IS WT_SLOW AND DAX IS DAX_MED AND AE IS AE_LOW THEN PHIT IS PHIT_BOTH END
    IF WT IS WT_SLOW AND DAY IS DAY_MED AND AE IS AE_LOW THEN THETAT IS THETAT_BOTH END
    IF WT IS WT_MED AND DAX IS DAX_LOW AND AE IS AE_LOW THEN PHIT IS PHIT_BOTH END
    IF WT IS WT_MED AND DAY IS DAY_LOW AND AE IS AE_LOW THEN THETAT IS THETAT_BOTH END
    IF WT IS WT_MED AND DAX IS NOT DAX_LOW THEN PHIT IS PHIT_GYRO END
    IF WT IS WT_MED AND DAY IS NOT DAY_LOW THEN THETAT IS THETAT_GYRO END
    IF WT IS WT_MED AND AE IS NOT AE_LOW THEN PHIT IS PHIT_GYRO AND THETAT IS THETAT_GYRO END
};

static WT_SLOW_P: [f64; 3] = [-0.2, 0.0, 0.2];
static WT_MED_P: [f64; 3] = [0.1, 0.25, 0.4];
static WT_FAST_P: [f64; 3] = [0.3, 0.5, 0.7];
static DAX_LOW_P: [f64; 3] = [-1.0, 0.0, 2.0];
static DAY_LOW_P: [f64; 3] = [-2.0, 0.0, 2.0];
static ACC_MED: [f64; 3] = [1.0, 2.5, 4.0];
static ACC_HIGH: [f64; 3] = [3.0, 5.0, 7.0];
static AE_LOW_P: [f64; 3] = [-8.0, 0.0, 8.0];
static AE_MED_P: [f64; 3] = [5.0, 10.0, 15.0];
static AE_HIGH_P: [f64; 3] = [12.0, 20.0, 28.0];
static GYRO: [f64; 3] = [-0.4, 0.0, 0.4];
static BOTH: [f64; 3] = [0.2, 0.5, 0.8];
static ACCEL: [f64; 3] = [0.6, 1.0, 1.4];

type Flexnav = FisSystem<4, 2, 12, 6, 15>;

fn build() -> Result<Flexnav, FisError> {
    let mut system = Flexnav::new(Architecture::Mamdani, RULES)?;
    system.configure(|fis| {
        fis.setup_input(WT, 0.0, 0.5)?;
        fis.setup_input(DAX, 0.0, 5.0)?;
        fis.setup_input(DAY, 0.0, 5.0)?;
        fis.setup_input(AE, 0.0, 20.0)?;
        fis.setup_output(PHIT, 0.0, 1.0)?;
        fis.setup_output(THETAT, 0.0, 1.0)?;

        fis.set_input_mf(WT, WT_SLOW, Shape::Triangular, &WT_SLOW_P)?;
        fis.set_input_mf(WT, WT_MED, Shape::Triangular, &WT_MED_P)?;
        fis.set_input_mf(WT, WT_FAST, Shape::Triangular, &WT_FAST_P)?;
        fis.set_input_mf(DAX, DAX_LOW, Shape::Triangular, &DAX_LOW_P)?;
        fis.set_input_mf(DAX, DAX_MED, Shape::Triangular, &ACC_MED)?;
        fis.set_input_mf(DAX, DAX_HIGH, Shape::Triangular, &ACC_HIGH)?;
        fis.set_input_mf(DAY, DAY_LOW, Shape::Triangular, &DAY_LOW_P)?;
        fis.set_input_mf(DAY, DAY_MED, Shape::Triangular, &ACC_MED)?;
        fis.set_input_mf(DAY, DAY_HIGH, Shape::Triangular, &ACC_HIGH)?;
        fis.set_input_mf(AE, AE_LOW, Shape::Triangular, &AE_LOW_P)?;
        fis.set_input_mf(AE, AE_MED, Shape::Triangular, &AE_MED_P)?;
        fis.set_input_mf(AE, AE_HIGH, Shape::Triangular, &AE_HIGH_P)?;

        fis.set_output_mf(PHIT, PHIT_GYRO, Shape::Triangular, &GYRO)?;
        fis.set_output_mf(PHIT, PHIT_BOTH, Shape::Triangular, &BOTH)?;
        fis.set_output_mf(PHIT, PHIT_ACCEL, Shape::Triangular, &ACCEL)?;
        fis.set_output_mf(THETAT, THETAT_GYRO, Shape::Triangular, &GYRO)?;
        fis.set_output_mf(THETAT, THETAT_BOTH, Shape::Triangular, &BOTH)?;
        fis.set_output_mf(THETAT, THETAT_ACCEL, Shape::Triangular, &ACCEL)
    })?;
    Ok(system)
}

fn main() -> Result<(), FisError> {
    println!("=== Flexnav Sensor Blending ===\n");

    let mut system = build()?;
    let samples = [
        ("at rest", [0.0, 0.0, 0.0, 0.0]),
        ("lateral push", [0.0, 0.0, 3.0, 0.0]),
        ("slow turn", [0.15, 1.0, 1.0, 6.0]),
        ("fast turn", [0.45, 2.0, 2.0, 4.0]),
        ("large error", [0.05, 0.5, 0.5, 18.0]),
    ];

    println!(
        "{:<14}{:>6}{:>6}{:>6}{:>6} | {:>7}{:>8}",
        "case", "wt", "dax", "day", "ae", "phit", "thetat"
    );
    for (name, inputs) in samples {
        let [phit, thetat] = system.evaluate(&inputs)?;
        println!(
            "{:<14}{:>6.2}{:>6.2}{:>6.2}{:>6.1} | {:>7.4}{:>8.4}",
            name, inputs[0], inputs[1], inputs[2], inputs[3], phit, thetat
        );
    }

    println!("\nA weight of 1 trusts the accelerometer, 0 the gyroscope.");
    println!("\n=== Done ===");
    Ok(())
}
