//! Example: Two-axis tracker on a simulated board.
//!
//! This example demonstrates how to:
//! - Configure an altitude and an azimuth motor sharing microstep lines
//! - Drive them through rotations with travel limits
//! - Pulse a line through the embedded-hal `OutputPin` adapter
//!
//! Run with: `RUST_LOG=stepper_sim=debug cargo run --example two_axis`

use embedded_hal::digital::OutputPin;
use tracing_subscriber::EnvFilter;

use stepper_sim::{
    error::Result, parse_config, Degrees, LineId, MicrostepMode, MotorSystem, Rotation,
    SharedBoard, StdDelay,
};

const CONFIG: &str = r#"
[motors.alt]
steps_per_revolution = 200
gear_ratio = 3.0
step_pin = 17
dir_pin = 27
ms1_pin = 5
ms2_pin = 6
pulse_delay_us = 200

[motors.alt.limits]
ccw_degrees = 350.0
cw_degrees = 95.0

[motors.azi]
steps_per_revolution = 200
step_pin = 22
dir_pin = 23
ms1_pin = 5
ms2_pin = 6
pulse_delay_us = 200
"#;

fn report(system: &MotorSystem) {
    for name in system.motor_names() {
        if let Some(motor) = system.motor(name) {
            println!(
                "  {name}: {:>5} msteps (1/{} step), output {:7.2}°",
                motor.microsteps(),
                motor.microstep_mode().value(),
                motor.gear_output_degrees().0
            );
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Two-Axis Tracker Example ===\n");

    let config = parse_config(CONFIG)?;
    let mut system = MotorSystem::from_config(&config)?;
    let mut delay = StdDelay;

    println!("Half stepping both axes");
    system.set_microstep_mode("alt", MicrostepMode::Half)?;
    report(&system);

    println!("\nAltitude to 60°, azimuth to 270°");
    system.rotate("alt", &Rotation::to(Degrees(60.0)), &mut delay)?;
    system.rotate("azi", &Rotation::to(Degrees(270.0)), &mut delay)?;
    report(&system);

    println!("\nAltitude to 120° (stops short of the 95° limit)");
    let completed = system.rotate("alt", &Rotation::to(Degrees(120.0)), &mut delay)?;
    println!("  completed: {completed}");
    report(&system);

    println!("\nPulsing azimuth step line through OutputPin");
    let shared = SharedBoard::new(system.into_board());
    let mut step = shared.pin(LineId(22));
    for _ in 0..4 {
        step.set_high()?;
        step.set_low()?;
    }
    shared.with(|board| {
        for (_, motor) in board.motors() {
            println!("  {}: {} msteps", motor.name(), motor.microsteps());
        }
        Ok(())
    })?;

    Ok(())
}
