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
use std::{
    fmt,
    ops::{Add, Mul},
};

/// The 12-component rigid body state.
///
/// Position and velocity are in the East-North-Up inertial frame, so z is
/// altitude. Attitude holds (roll, pitch, yaw) Euler angles in the Z-Y-X
/// convention. Body rates are (p, q, r) about the body x, y and z axes.
///
/// The same shape doubles as a time derivative of the state, which is what
/// the dynamics produce and the integrator consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VehicleState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub attitude: Vector3<f64>,
    pub body_rates: Vector3<f64>,
}

impl VehicleState {
    pub fn at_rest() -> Self {
        Self::default()
    }

    pub fn altitude(&self) -> f64 {
        self.position.z
    }

    pub fn climb_rate(&self) -> f64 {
        self.velocity.z
    }

    pub fn roll(&self) -> f64 {
        self.attitude.x
    }

    pub fn pitch(&self) -> f64 {
        self.attitude.y
    }

    pub fn yaw(&self) -> f64 {
        self.attitude.z
    }

    pub fn p(&self) -> f64 {
        self.body_rates.x
    }

    pub fn q(&self) -> f64 {
        self.body_rates.y
    }

    pub fn r(&self) -> f64 {
        self.body_rates.z
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// [x, y, z, vx, vy, vz, roll, pitch, yaw, p, q, r]
    pub fn to_array(&self) -> [f64; 12] {
        let mut out = [0.; 12];
        for (i, v) in [
            &self.position,
            &self.velocity,
            &self.attitude,
            &self.body_rates,
        ]
        .iter()
        .enumerate()
        {
            out[i * 3..i * 3 + 3].copy_from_slice(v.as_slice());
        }
        out
    }

    pub fn from_array(v: [f64; 12]) -> Self {
        Self {
            position: Vector3::new(v[0], v[1], v[2]),
            velocity: Vector3::new(v[3], v[4], v[5]),
            attitude: Vector3::new(v[6], v[7], v[8]),
            body_rates: Vector3::new(v[9], v[10], v[11]),
        }
    }
}

impl Add for VehicleState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            position: self.position + other.position,
            velocity: self.velocity + other.velocity,
            attitude: self.attitude + other.attitude,
            body_rates: self.body_rates + other.body_rates,
        }
    }
}

impl Mul<f64> for VehicleState {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self {
            position: self.position * s,
            velocity: self.velocity * s,
            attitude: self.attitude * s,
            body_rates: self.body_rates * s,
        }
    }
}

impl fmt::Display for VehicleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos=({:.3}, {:.3}, {:.3}) vel=({:.3}, {:.3}, {:.3}) att=({:.2}°, {:.2}°, {:.2}°)",
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
            self.roll().to_degrees(),
            self.pitch().to_degrees(),
            self.yaw().to_degrees(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_array_layout() {
        let raw = [0., 1., 2., 3., 4., 5., 6., 7., 8., 9., 10., 11.];
        let state = VehicleState::from_array(raw);
        assert_eq!(state.altitude(), 2.);
        assert_eq!(state.climb_rate(), 5.);
        assert_eq!(state.roll(), 6.);
        assert_eq!(state.pitch(), 7.);
        assert_eq!(state.yaw(), 8.);
        assert_eq!(state.r(), 11.);
        assert_eq!(state.to_array(), raw);
    }

    #[test]
    fn test_arithmetic() {
        let a = VehicleState::from_array([1.; 12]);
        let b = VehicleState::from_array([2.; 12]);
        let c = a + b * 0.5;
        for v in c.to_array() {
            assert_relative_eq!(v, 2.);
        }
    }

    #[test]
    fn test_finite_check() {
        let mut state = VehicleState::at_rest();
        assert!(state.is_finite());
        state.body_rates.y = f64::NAN;
        assert!(!state.is_finite());
        state.body_rates.y = 0.;
        state.position.x = f64::INFINITY;
        assert!(!state.is_finite());
    }
}
