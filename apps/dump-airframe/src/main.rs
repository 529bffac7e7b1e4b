// This file is part of QuadSim.
//
// QuadSim is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// QuadSim is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with QuadSim.  If not, see <http://www.gnu.org/licenses/>.
// Show the rotor and actuation characteristics of the default airframe.
use airframe::{VehicleConfig, Wrench, MOTOR_ARMS};
use anyhow::{ensure, Result};
use motor_mixer::MotorMixer;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "dump-airframe")]
/// Inspect the quadcopter airframe model
enum Opt {
    #[structopt(name = "profile")]
    /// Thrust and reaction torque of one rotor against its speed
    Profile {
        #[structopt(long, default_value = "1000")]
        /// Highest rotor speed to show, in rad/s
        max_speed: f64,

        #[structopt(long, default_value = "50")]
        /// Rotor speed increment, in rad/s
        increment: f64,

        #[structopt(long)]
        /// Emit comma separated values instead of a table
        csv: bool,
    },

    #[structopt(name = "hover")]
    /// Mass properties and the rotor speed needed to hover
    Hover,

    #[structopt(name = "table")]
    /// The motor layout the actuation map is built from
    Table,

    #[structopt(name = "mix")]
    /// Rotor speeds the mixer asks for to produce a thrust and body torque
    Mix {
        /// Collective thrust in newtons
        thrust: f64,
        #[structopt(default_value = "0", allow_hyphen_values = true)]
        /// Roll torque in N m
        roll: f64,
        #[structopt(default_value = "0", allow_hyphen_values = true)]
        /// Pitch torque in N m
        pitch: f64,
        #[structopt(default_value = "0", allow_hyphen_values = true)]
        /// Yaw torque in N m
        yaw: f64,
    },
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let config = VehicleConfig::default();

    match opt {
        Opt::Profile {
            max_speed,
            increment,
            csv,
        } => handle_profile(&config, max_speed, increment, csv),
        Opt::Hover => {
            handle_hover(&config);
            Ok(())
        }
        Opt::Table => {
            handle_table(&config);
            Ok(())
        }
        Opt::Mix {
            thrust,
            roll,
            pitch,
            yaw,
        } => {
            handle_mix(&config, Wrench::new(thrust, roll, pitch, yaw));
            Ok(())
        }
    }
}

fn profile(config: &VehicleConfig, max_speed: f64, increment: f64) -> Vec<(f64, f64, f64)> {
    let count = (max_speed / increment).floor() as usize;
    (0..=count)
        .map(|i| {
            let omega = i as f64 * increment;
            let w2 = omega * omega;
            (omega, config.motor_thrust(w2), config.motor_torque(w2))
        })
        .collect()
}

fn handle_profile(config: &VehicleConfig, max_speed: f64, increment: f64, csv: bool) -> Result<()> {
    ensure!(increment > 0., "increment must be positive");
    ensure!(max_speed >= 0., "max speed must not be negative");
    if csv {
        println!("omega,thrust,torque");
    } else {
        println!("{:>10} {:>12} {:>14}", "rad/s", "thrust N", "torque N m");
    }
    for (omega, thrust, torque) in profile(config, max_speed, increment) {
        if csv {
            println!("{},{},{}", omega, thrust, torque);
        } else {
            println!("{:>10.1} {:>12.5} {:>14.7}", omega, thrust, torque);
        }
    }
    Ok(())
}

fn handle_hover(config: &VehicleConfig) {
    let hover = config.hover_speed();
    println!("mass:          {} kg", config.mass);
    println!("weight:        {:.3} N", config.weight());
    println!(
        "inertia:       [{}, {}, {}] kg m^2",
        config.ixx(),
        config.iyy(),
        config.izz()
    );
    println!("arm length:    {} m", config.arm_length);
    println!("kF:            {:e}", config.thrust_coefficient);
    println!("kM:            {:e}", config.drag_coefficient);
    println!("max thrust:    {} N", config.max_thrust);
    println!("hover speed:   {:.2} rad/s per motor", hover);
    println!(
        "hover share:   {:.1}% of max thrust",
        100. * config.weight() / config.max_thrust
    );
}

fn handle_table(config: &VehicleConfig) {
    println!("{:>5} {:>6} {:>6} {:>6}", "motor", "roll", "pitch", "spin");
    for (i, arm) in MOTOR_ARMS.iter().enumerate() {
        println!(
            "{:>5} {:>+6.0} {:>+6.0} {:>+6.0}",
            i, arm.roll, arm.pitch, arm.spin
        );
    }
    println!();
    println!("thrust = kF * sum(w^2)");
    println!(
        "roll   = {} * kF * sum(roll_i * w_i^2)",
        config.arm_length
    );
    println!(
        "pitch  = {} * kF * sum(pitch_i * w_i^2)",
        config.arm_length
    );
    println!("yaw    = kM * sum(spin_i * w_i^2)");
}

fn handle_mix(config: &VehicleConfig, wrench: Wrench) {
    let mixer = MotorMixer::new(config);
    let signed = mixer.mix_signed(&wrench);
    let speeds = mixer.mix(&wrench);
    let produced = config.wrench(&speeds);
    println!("{:>5} {:>14} {:>10}", "motor", "w^2 rad^2/s^2", "w rad/s");
    for (i, (w2, omega)) in speeds
        .squared()
        .iter()
        .zip(speeds.angular().iter())
        .enumerate()
    {
        let note = if signed[i] < 0. { "  (saturated)" } else { "" };
        println!("{:>5} {:>14.1} {:>10.2}{}", i, w2, omega, note);
    }
    println!(
        "produces thrust {:.4} N, torque [{:.5}, {:.5}, {:.5}] N m",
        produced.thrust,
        produced.roll(),
        produced.pitch(),
        produced.yaw()
    );
    if signed.iter().any(|w2| *w2 < 0.) {
        println!("requested wrench is not reachable; saturated motors were floored at zero");
    }
}
