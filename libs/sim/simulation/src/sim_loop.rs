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
use crate::{SimulationError, SimulationOpts};
use airframe::VehicleConfig;
use flight_controller::FlightController;
use flight_dynamics::Integrator;
use log::{error, info, trace};
use pacing::{Pacer, TimeStep};
use pilot::CommandSlot;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};
use telemetry::{SnapshotPublisher, SnapshotThrottle, TelemetrySnapshot};
use vehicle_state::VehicleState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    pub elapsed: f64,
    pub published: u64,
    pub replaced: u64,
    pub resyncs: u64,
}

/// The fixed-step pipeline: command, control, mix, integrate, publish.
pub struct SimulationLoop {
    phase: Phase,
    state: VehicleState,
    clock: TimeStep,
    integrator: Integrator,
    controller: Box<dyn FlightController>,
    commands: CommandSlot,
    publisher: SnapshotPublisher,
    throttle: SnapshotThrottle,
    stop: Arc<AtomicBool>,
    step_limit: Option<u64>,
    realtime: bool,
}

impl SimulationLoop {
    /// Largest accepted timestep, in seconds.
    pub const MAX_TIMESTEP: f64 = 1.;

    pub fn new(
        config: VehicleConfig,
        controller: Box<dyn FlightController>,
        commands: CommandSlot,
        publisher: SnapshotPublisher,
        opts: &SimulationOpts,
    ) -> Result<Self, SimulationError> {
        if !(opts.dt.is_finite() && opts.dt > 0. && opts.dt <= Self::MAX_TIMESTEP) {
            return Err(SimulationError::InvalidTimestep(opts.dt));
        }
        Ok(Self {
            phase: Phase::Idle,
            state: VehicleState::at_rest(),
            clock: TimeStep::new(opts.dt),
            integrator: Integrator::new(config),
            controller,
            commands,
            publisher,
            throttle: SnapshotThrottle::new(opts.telemetry_every),
            stop: Arc::new(AtomicBool::new(false)),
            step_limit: opts.step_limit(),
            realtime: opts.realtime(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn steps(&self) -> u64 {
        self.clock.count()
    }

    /// The slot the loop reads each step. Input handlers hold a clone of it;
    /// a pilot reset is `CommandSlot::reset` and leaves the vehicle and the
    /// clock alone.
    pub fn commands(&self) -> &CommandSlot {
        &self.commands
    }

    /// Setting the returned flag ends `run` at the next cycle boundary.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn start(&mut self) {
        self.state = VehicleState::at_rest();
        self.clock.reset();
        self.throttle.reset();
        self.controller.reset();
        self.phase = Phase::Running;
        info!("simulation started with dt={}s", self.clock.dt());
    }

    pub fn step(&mut self) -> Result<(), SimulationError> {
        if self.phase != Phase::Running {
            return Err(SimulationError::NotRunning(self.phase));
        }
        let command = self.commands.latest();
        let speeds = self
            .controller
            .motor_speeds(&command, &self.state, &self.clock);
        let next = self.integrator.step(&self.state, &speeds, self.clock.dt());
        if !next.is_finite() {
            let err = SimulationError::NonFinite {
                step: self.clock.count(),
                elapsed: self.clock.elapsed(),
                state: next,
            };
            error!("{}", err);
            self.phase = Phase::Stopped;
            return Err(err);
        }
        self.state = next;
        self.clock.advance();
        trace!("t={:.2} {}", self.clock.elapsed(), self.state);

        if self.throttle.tick() {
            self.publisher.publish(TelemetrySnapshot::from_state(
                &self.state,
                self.clock.elapsed(),
            ));
        }
        Ok(())
    }

    /// Runs until stopped, the step limit is reached, or a step fails.
    /// Starts the simulation first if it is still idle.
    pub fn run(&mut self, mut pacer: Option<Pacer>) -> Result<RunSummary, SimulationError> {
        if self.phase == Phase::Idle {
            self.start();
        }
        while !self.stop.load(Ordering::Relaxed) {
            if let Some(limit) = self.step_limit {
                if self.clock.count() >= limit {
                    break;
                }
            }
            self.step()?;
            if let Some(pacer) = pacer.as_mut() {
                pacer.wait();
            }
        }
        self.phase = Phase::Stopped;
        let summary = RunSummary {
            steps: self.clock.count(),
            elapsed: self.clock.elapsed(),
            published: self.publisher.published(),
            replaced: self.publisher.replaced(),
            resyncs: pacer.map(|p| p.resyncs()).unwrap_or(0),
        };
        info!(
            "simulation stopped after {} steps ({:.2}s simulated)",
            summary.steps, summary.elapsed
        );
        Ok(summary)
    }

    /// Runs on a dedicated thread, paced to the wall clock unless real time
    /// was turned off.
    pub fn spawn(
        mut self,
    ) -> Result<JoinHandle<Result<RunSummary, SimulationError>>, SimulationError> {
        Ok(thread::Builder::new()
            .name("simulation".to_owned())
            .spawn(move || {
                let pacer = if self.realtime {
                    Some(Pacer::new(self.clock.step_duration()))
                } else {
                    None
                };
                self.run(pacer)
            })?)
    }
}
