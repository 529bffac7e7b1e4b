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
use nalgebra::Vector3;
use physical_constants::MAX_TILT_DEGREES;
use vehicle_state::VehicleState;

/// Holds a horizontal position by tilting towards it.
///
/// A desired horizontal acceleration is formed from position and velocity
/// error and turned into roll and pitch targets with the small-angle
/// inversion of the thrust direction: ax = g theta, ay = -g phi.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionHold {
    pub target: Vector3<f64>,
    pub kp: f64,
    pub kd: f64,
    pub max_tilt: f64,
}

impl PositionHold {
    pub fn new(target: Vector3<f64>) -> Self {
        Self {
            target,
            kp: 1.,
            kd: 2.,
            max_tilt: MAX_TILT_DEGREES.to_radians(),
        }
    }

    /// Returns (roll, pitch) targets in radians.
    pub fn attitude_targets(&self, state: &VehicleState, gravity: f64) -> (f64, f64) {
        let ax = self.kp * (self.target.x - state.position.x) - self.kd * state.velocity.x;
        let ay = self.kp * (self.target.y - state.position.y) - self.kd * state.velocity.y;
        let roll = (-ay / gravity).clamp(-self.max_tilt, self.max_tilt);
        let pitch = (ax / gravity).clamp(-self.max_tilt, self.max_tilt);
        (roll, pitch)
    }
}
