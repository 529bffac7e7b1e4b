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
//! Inverse actuation: turn a commanded thrust and body torque into the
//! squared rotor speeds that would produce it.
use airframe::{MotorSpeeds, VehicleConfig, Wrench, MOTOR_ARMS};
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotorMixer {
    // Precomputed reciprocals of the forward map's diagonal.
    thrust_share: f64,
    lever_share: f64,
    drag_share: f64,
}

impl MotorMixer {
    pub fn new(config: &VehicleConfig) -> Self {
        Self {
            thrust_share: 1. / (4. * config.thrust_coefficient),
            lever_share: 1. / (2. * config.arm_length * config.thrust_coefficient),
            drag_share: 1. / (4. * config.drag_coefficient),
        }
    }

    /// Exact inverse of the forward map, before any clamping. Entries may
    /// be negative when the command is not physically reachable.
    pub fn mix_signed(&self, wrench: &Wrench) -> [f64; 4] {
        let base = wrench.thrust * self.thrust_share;
        let mut out = [0f64; 4];
        for (w2, arm) in out.iter_mut().zip(MOTOR_ARMS.iter()) {
            *w2 = base
                + arm.roll * wrench.roll() * self.lever_share
                + arm.pitch * wrench.pitch() * self.lever_share
                + arm.spin * wrench.yaw() * self.drag_share;
        }
        out
    }

    /// Squared speeds for `wrench`, clamped to be non-negative. Clamped
    /// motors are not rebalanced against the others. A non-finite request
    /// passes through untouched so that the fault reaches the dynamics.
    pub fn mix(&self, wrench: &Wrench) -> MotorSpeeds {
        let mut squared = self.mix_signed(wrench);
        for (i, w2) in squared.iter_mut().enumerate() {
            if *w2 < 0. {
                trace!("motor {} saturated at {:.1}", i, w2);
                *w2 = 0.;
            }
        }
        MotorSpeeds::from_squared(squared)
    }
}
