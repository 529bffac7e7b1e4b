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
mod autonomous;
mod maneuver;
mod piloted;
mod position_hold;

pub use crate::{
    autonomous::{AltitudeGains, AttitudeSource, AutonomousController, AutonomousGains},
    maneuver::{Maneuver, ManeuverSchedule, ManeuverSegment},
    piloted::{PilotedController, PilotedGains},
    position_hold::PositionHold,
};

use airframe::{MotorSpeeds, Wrench};
use motor_mixer::MotorMixer;
use pacing::TimeStep;
use pilot::PilotCommand;
use vehicle_state::VehicleState;

/// A control law that turns the latest pilot command and vehicle state into
/// a commanded thrust and body torque.
pub trait FlightController: Send {
    fn control(&mut self, command: &PilotCommand, state: &VehicleState, step: &TimeStep)
        -> Wrench;

    fn mixer(&self) -> &MotorMixer;

    /// Forget any accumulated state. Called when a run (re)starts.
    fn reset(&mut self) {}

    fn motor_speeds(
        &mut self,
        command: &PilotCommand,
        state: &VehicleState,
        step: &TimeStep,
    ) -> MotorSpeeds {
        let wrench = self.control(command, state, step);
        self.mixer().mix(&wrench)
    }
}

/// Proportional-derivative attitude hold on one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisGains {
    pub kp: f64,
    pub kd: f64,
}

impl AxisGains {
    pub fn new(kp: f64, kd: f64) -> Self {
        Self { kp, kd }
    }

    pub fn torque(&self, target: f64, angle: f64, rate: f64) -> f64 {
        self.kp * (target - angle) - self.kd * rate
    }
}
