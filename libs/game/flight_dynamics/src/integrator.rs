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
use crate::dynamics::RigidBodyDynamics;
use airframe::{MotorSpeeds, VehicleConfig};
use log::trace;
use std::ops::{Add, Mul};
use vehicle_state::VehicleState;

/// One classic fourth order Runge-Kutta step of `ds/dt = f(s)`.
pub fn rk4<S, F>(state: S, dt: f64, f: F) -> S
where
    S: Copy + Add<Output = S> + Mul<f64, Output = S>,
    F: Fn(&S) -> S,
{
    let half = dt / 2.;
    let k1 = f(&state);
    let k2 = f(&(state + k1 * half));
    let k3 = f(&(state + k2 * half));
    let k4 = f(&(state + k3 * dt));
    state + (k1 + k2 * 2. + k3 * 2. + k4) * (dt / 6.)
}

/// Advances the vehicle by fixed steps.
///
/// Rotor speeds are held constant across the four RK4 stages; the
/// controller only runs once per outer step.
#[derive(Clone, Debug)]
pub struct Integrator {
    dynamics: RigidBodyDynamics,
}

impl Integrator {
    pub fn new(config: VehicleConfig) -> Self {
        Self {
            dynamics: RigidBodyDynamics::new(config),
        }
    }

    pub fn dynamics(&self) -> &RigidBodyDynamics {
        &self.dynamics
    }

    pub fn config(&self) -> &VehicleConfig {
        self.dynamics.config()
    }

    pub fn step(&self, state: &VehicleState, speeds: &MotorSpeeds, dt: f64) -> VehicleState {
        let wrench = self.dynamics.config().wrench(speeds);
        let mut next = rk4(*state, dt, |s| {
            self.dynamics.derivative_from_wrench(s, &wrench)
        });
        if self.dynamics.ground().settle(&mut next, wrench.thrust) {
            trace!("on the ground with {:.3}N of thrust", wrench.thrust);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn integrate<F: Fn(f64, f64) -> f64 + Copy>(dt: f64, end: f64, f: F) -> f64 {
        let mut y = 1.;
        for _ in 0..(end / dt).round() as usize {
            y = rk4(y, dt, |y| f(0., *y));
        }
        y
    }

    #[test]
    fn test_rk4_exponential() {
        let y = integrate(0.01, 1., |_, y| y);
        assert_relative_eq!(y, std::f64::consts::E, max_relative = 1e-9);
    }

    #[test]
    fn test_rk4_fourth_order_scalar() {
        let e = std::f64::consts::E;
        let coarse = (integrate(0.1, 1., |_, y| y) - e).abs();
        let fine = (integrate(0.05, 1., |_, y| y) - e).abs();
        let ratio = coarse / fine;
        assert!(ratio > 14. && ratio < 18., "ratio was {}", ratio);
    }

    #[test]
    fn test_vertical_climb_is_exact() {
        let integrator = Integrator::new(VehicleConfig::default());
        let speeds = MotorSpeeds::from_angular([600.; 4]);
        let config = integrator.config();
        let accel = config.wrench(&speeds).thrust / config.mass - config.gravity;

        let dt = 0.01;
        let mut state = VehicleState::at_rest();
        for _ in 0..200 {
            state = integrator.step(&state, &speeds, dt);
        }
        let t = 2.;
        assert_relative_eq!(state.altitude(), 0.5 * accel * t * t, max_relative = 1e-9);
        assert_relative_eq!(state.climb_rate(), accel * t, max_relative = 1e-9);
        assert_abs_diff_eq!(state.position.x, 0.);
        assert_abs_diff_eq!(state.attitude.norm(), 0.);
    }

    // Constant excess thrust while rolling at a constant rate has a closed
    // form, but is not polynomial in time, so RK4 error shows up and should
    // shrink by 2^4 when dt halves.
    #[test]
    fn test_fourth_order_convergence_rolling_climb() -> Result<()> {
        let integrator = Integrator::new(VehicleConfig::default());
        let config = integrator.config().clone();
        let w2 = 2. * config.weight() / (4. * config.thrust_coefficient);
        let speeds = MotorSpeeds::from_squared([w2; 4]);
        let thrust = config.wrench(&speeds).thrust;
        let p = 1.;
        let end = 1.;

        let expect_y = thrust / (config.mass * p) * ((p * end).sin() / p - end);
        let expect_z = thrust / (config.mass * p * p) * (1. - (p * end).cos())
            - 0.5 * config.gravity * end * end;

        let run = |dt: f64| {
            let mut state = VehicleState::at_rest();
            state.body_rates.x = p;
            for _ in 0..(end / dt).round() as usize {
                state = integrator.step(&state, &speeds, dt);
            }
            state
        };

        let coarse = run(0.1);
        let fine = run(0.05);
        assert_relative_eq!(fine.roll(), p * end, max_relative = 1e-12);

        let ratio_y = (coarse.position.y - expect_y).abs() / (fine.position.y - expect_y).abs();
        let ratio_z = (coarse.position.z - expect_z).abs() / (fine.position.z - expect_z).abs();
        assert!(ratio_y > 14. && ratio_y < 18., "y ratio was {}", ratio_y);
        assert!(ratio_z > 14. && ratio_z < 18., "z ratio was {}", ratio_z);
        assert!((fine.position.y - expect_y).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_ground_clamp_after_one_step() {
        let integrator = Integrator::new(VehicleConfig::default());
        let mut state = VehicleState::at_rest();
        state.velocity.z = -2.;
        let next = integrator.step(&state, &MotorSpeeds::from_angular([300.; 4]), 0.01);
        assert_eq!(next.position.z, 0.);
        assert_eq!(next.velocity.z, 0.);
    }

    #[test]
    fn test_resting_vehicle_stays_on_floor() {
        let integrator = Integrator::new(VehicleConfig::default());
        let mut state = VehicleState::at_rest();
        for _ in 0..100 {
            state = integrator.step(&state, &MotorSpeeds::default(), 0.01);
            assert_eq!(state.position.z, 0.);
            assert_eq!(state.velocity.z, 0.);
        }
    }

    #[test]
    fn test_falling_vehicle_lands() {
        let integrator = Integrator::new(VehicleConfig::default());
        let mut state = VehicleState::at_rest();
        state.position.z = 1.;
        for _ in 0..200 {
            state = integrator.step(&state, &MotorSpeeds::default(), 0.01);
        }
        assert_eq!(state.position.z, 0.);
        assert_eq!(state.velocity.z, 0.);
    }
}
