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
mod ingress;

use airframe::VehicleConfig;
use anyhow::{anyhow, bail, Result};
use flight_controller::{
    AttitudeSource, AutonomousController, FlightController, ManeuverSchedule, PilotedController,
    PositionHold,
};
use log::{info, warn};
use nalgebra::Vector3;
use pilot::CommandSlot;
use simulation::{SimulationLoop, SimulationOpts};
use std::{
    io,
    sync::{atomic::AtomicBool, Arc},
};
use structopt::StructOpt;
use telemetry::{JsonLinesSink, TelemetryBridge, Trail, TrailSink};

/// Simulate a quadcopter in real time. Pilot commands are read as JSON lines
/// on stdin and the vehicle pose is written as JSON lines to stdout.
#[derive(Debug, StructOpt)]
#[structopt(name = "quadsim")]
struct Opt {
    /// Fly the built-in autonomous controller and ignore pilot input
    #[structopt(short, long)]
    autonomous: bool,

    /// With --autonomous, hold this position (x y z in metres) instead of
    /// flying the maneuver script
    #[structopt(long, number_of_values = 3, allow_hyphen_values = true)]
    hold: Vec<f64>,

    /// Thrust at full throttle in newtons
    #[structopt(long)]
    max_thrust: Option<f64>,

    #[structopt(flatten)]
    sim: SimulationOpts,
}

fn build_controller(opt: &Opt, config: &VehicleConfig) -> Result<Box<dyn FlightController>> {
    if !opt.autonomous {
        if !opt.hold.is_empty() {
            bail!("--hold only applies to --autonomous flight");
        }
        return Ok(Box::new(PilotedController::new(config)));
    }
    let source = match opt.hold.as_slice() {
        [] => AttitudeSource::Schedule(ManeuverSchedule::default()),
        [x, y, z] => {
            let target = Vector3::new(*x, *y, *z);
            if !target.iter().all(|v| v.is_finite()) {
                bail!("--hold needs finite coordinates, got {} {} {}", x, y, z);
            }
            AttitudeSource::Hold(PositionHold::new(target))
        }
        other => bail!("--hold takes x y z, got {} values", other.len()),
    };
    Ok(Box::new(AutonomousController::new(config, source)))
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut config = VehicleConfig::default();
    if let Some(max_thrust) = opt.max_thrust {
        if !(max_thrust.is_finite() && max_thrust >= 0.) {
            bail!("--max-thrust must be a non-negative number of newtons");
        }
        config.max_thrust = max_thrust;
    }
    info!(
        "vehicle: {}kg, hover at {:.1} rad/s",
        config.mass,
        config.hover_speed()
    );

    let controller = build_controller(&opt, &config)?;
    let commands = CommandSlot::new();
    let (publisher, subscriber) = telemetry::channel();
    let sim = SimulationLoop::new(config, controller, commands.clone(), publisher, &opt.sim)?;

    if opt.autonomous {
        info!("autonomous flight; pilot input is not read");
    } else {
        // Blocks on stdin for the life of the process, so it is never joined.
        ingress::spawn(io::BufReader::new(io::stdin()), commands)?;
    }

    let sink = TrailSink::new(JsonLinesSink::new(io::stdout()), Trail::default());
    let bridge = TelemetryBridge::new(subscriber, sink, Arc::new(AtomicBool::new(false)))
        .with_timeout(opt.sim.telemetry_timeout())
        .spawn()?;

    let outcome = sim
        .spawn()?
        .join()
        .map_err(|_| anyhow!("simulation thread panicked"))?;

    // The simulation owned the publisher, so the bridge drains and exits.
    let report = bridge
        .join()
        .map_err(|_| anyhow!("telemetry thread panicked"))?;
    let trail = report.sink.trail();
    info!(
        "telemetry: {} forwarded, {} dropped; trail of {} points, {:.2}m long, ceiling {:.2}m",
        report.forwarded,
        report.dropped,
        trail.len(),
        trail.path_length(),
        trail.ceiling().unwrap_or(0.)
    );
    if report.dropped > 0 {
        warn!("{} snapshots could not be written", report.dropped);
    }

    let summary = outcome?;
    info!(
        "ran {} steps ({:.2}s), published {} snapshots ({} replaced unread), {} pacing resyncs",
        summary.steps, summary.elapsed, summary.published, summary.replaced, summary.resyncs
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Opt {
        Opt::from_iter(std::iter::once("quadsim").chain(args.iter().copied()))
    }

    #[test]
    fn test_piloted_by_default() {
        let opt = parse(&[]);
        assert!(!opt.autonomous);
        assert!(opt.hold.is_empty());
        assert!(opt.sim.realtime());
        assert!(build_controller(&opt, &VehicleConfig::default()).is_ok());
    }

    #[test]
    fn test_hold_parses_negative_values() {
        let opt = parse(&["--autonomous", "--hold", "1", "-2.5", "3", "--no-realtime"]);
        assert_eq!(opt.hold, vec![1., -2.5, 3.]);
        assert!(!opt.sim.realtime());
        assert!(build_controller(&opt, &VehicleConfig::default()).is_ok());
    }

    #[test]
    fn test_hold_rejects_non_finite() {
        for bad in ["nan", "inf", "-inf"] {
            let opt = parse(&["--autonomous", "--hold", "1", bad, "3"]);
            assert!(build_controller(&opt, &VehicleConfig::default()).is_err());
        }
    }

    #[test]
    fn test_hold_requires_autonomous() {
        let opt = parse(&["--hold", "1", "2", "3"]);
        assert!(build_controller(&opt, &VehicleConfig::default()).is_err());
    }
}
