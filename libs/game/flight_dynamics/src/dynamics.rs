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
use crate::ground::GroundContact;
use airframe::{MotorSpeeds, VehicleConfig, Wrench};
use nalgebra::Vector3;
use physical_constants::GIMBAL_LOCK_EPSILON;
use vehicle_state::VehicleState;

/// Third column of R = Rz(yaw) * Ry(pitch) * Rx(roll): the direction of body
/// +z in the inertial frame. Thrust is the only body-frame force, so the
/// other two columns are never needed.
pub fn thrust_axis(attitude: &Vector3<f64>) -> Vector3<f64> {
    let (sphi, cphi) = attitude.x.sin_cos();
    let (stheta, ctheta) = attitude.y.sin_cos();
    let (spsi, cpsi) = attitude.z.sin_cos();
    Vector3::new(
        cpsi * stheta * cphi + spsi * sphi,
        spsi * stheta * cphi - cpsi * sphi,
        ctheta * cphi,
    )
}

/// Map body rates (p, q, r) to Euler angle rates.
///
/// The transform is singular at pitch = +-90 degrees. Near there the
/// 1/cos(pitch) factor is dropped to zero, which keeps the result finite but
/// makes the yaw rate wrong; pitch is expected to stay well away from that
/// region.
pub fn euler_rates(attitude: &Vector3<f64>, rates: &Vector3<f64>) -> Vector3<f64> {
    let (sphi, cphi) = attitude.x.sin_cos();
    let theta = attitude.y;
    let ctheta = theta.cos();
    let sec_theta = if ctheta.abs() < GIMBAL_LOCK_EPSILON {
        0.
    } else {
        1. / ctheta
    };
    let (p, q, r) = (rates.x, rates.y, rates.z);
    let coupled = q * sphi + r * cphi;
    Vector3::new(
        p + coupled * theta.tan(),
        q * cphi - r * sphi,
        coupled * sec_theta,
    )
}

/// Six degree of freedom rigid body with a diagonal inertia tensor, driven
/// by four rotors.
#[derive(Clone, Debug)]
pub struct RigidBodyDynamics {
    config: VehicleConfig,
    ground: GroundContact,
}

impl RigidBodyDynamics {
    pub fn new(config: VehicleConfig) -> Self {
        let ground = GroundContact::new(config.weight());
        Self { config, ground }
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    pub fn ground(&self) -> &GroundContact {
        &self.ground
    }

    /// Time derivative of `state` with the rotors spinning at `speeds`.
    pub fn derivative(&self, state: &VehicleState, speeds: &MotorSpeeds) -> VehicleState {
        self.derivative_from_wrench(state, &self.config.wrench(speeds))
    }

    /// Same as `derivative`, for callers that already have the wrench the
    /// rotors produce.
    pub fn derivative_from_wrench(&self, state: &VehicleState, wrench: &Wrench) -> VehicleState {
        let (position_dot, velocity_dot) = if self.ground.is_resting(state, wrench.thrust) {
            (
                Vector3::new(state.velocity.x, state.velocity.y, 0.),
                Vector3::zeros(),
            )
        } else {
            let m = self.config.mass;
            let mut accel = thrust_axis(&state.attitude) * (wrench.thrust / m);
            accel.z -= self.config.gravity;
            (state.velocity, accel)
        };

        let (ixx, iyy, izz) = (self.config.ixx(), self.config.iyy(), self.config.izz());
        let (p, q, r) = (state.p(), state.q(), state.r());
        let body_rates_dot = Vector3::new(
            (wrench.roll() - (izz - iyy) * q * r) / ixx,
            (wrench.pitch() - (ixx - izz) * p * r) / iyy,
            (wrench.yaw() - (iyy - ixx) * p * q) / izz,
        );

        VehicleState {
            position: position_dot,
            velocity: velocity_dot,
            attitude: euler_rates(&state.attitude, &state.body_rates),
            body_rates: body_rates_dot,
        }
    }
}
