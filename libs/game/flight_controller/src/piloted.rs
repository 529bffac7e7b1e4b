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
use crate::{AxisGains, FlightController};
use airframe::{VehicleConfig, Wrench};
use motor_mixer::MotorMixer;
use pacing::TimeStep;
use pilot::PilotCommand;
use vehicle_state::VehicleState;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PilotedGains {
    pub roll: AxisGains,
    pub pitch: AxisGains,
    pub yaw_rate: f64,
}

impl Default for PilotedGains {
    fn default() -> Self {
        Self {
            roll: AxisGains::new(2., 0.5),
            pitch: AxisGains::new(2., 0.5),
            yaw_rate: 1.,
        }
    }
}

/// Attitude stabilized manual flight. Throttle maps straight to collective
/// thrust with no altitude feedback.
#[derive(Clone, Debug)]
pub struct PilotedController {
    max_thrust: f64,
    gains: PilotedGains,
    mixer: MotorMixer,
}

impl PilotedController {
    pub fn new(config: &VehicleConfig) -> Self {
        Self {
            max_thrust: config.max_thrust,
            gains: PilotedGains::default(),
            mixer: MotorMixer::new(config),
        }
    }

    pub fn with_gains(mut self, gains: PilotedGains) -> Self {
        self.gains = gains;
        self
    }

    pub fn max_thrust(&self) -> f64 {
        self.max_thrust
    }
}

impl FlightController for PilotedController {
    fn control(
        &mut self,
        command: &PilotCommand,
        state: &VehicleState,
        _step: &TimeStep,
    ) -> Wrench {
        Wrench::new(
            (command.throttle * self.max_thrust).max(0.),
            self.gains.roll.torque(command.roll, state.roll(), state.p()),
            self.gains.pitch.torque(command.pitch, state.pitch(), state.q()),
            self.gains.yaw_rate * (command.yaw_rate - state.r()),
        )
    }

    fn mixer(&self) -> &MotorMixer {
        &self.mixer
    }
}
