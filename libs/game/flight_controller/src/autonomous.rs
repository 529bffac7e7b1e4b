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
use crate::{AxisGains, FlightController, ManeuverSchedule, PositionHold};
use airframe::{VehicleConfig, Wrench};
use log::{debug, trace};
use motor_mixer::MotorMixer;
use pacing::TimeStep;
use pilot::PilotCommand;
use vehicle_state::VehicleState;

/// Altitude is a PD loop around the hover thrust with an optional integral.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AltitudeGains {
    pub kp: f64,
    pub kd: f64,
    /// Zero disables integration entirely.
    pub ki: f64,
}

impl Default for AltitudeGains {
    fn default() -> Self {
        Self {
            kp: 20.,
            kd: 10.,
            ki: 0.,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutonomousGains {
    pub altitude: AltitudeGains,
    pub roll: AxisGains,
    pub pitch: AxisGains,
    pub yaw_rate: f64,
}

impl Default for AutonomousGains {
    fn default() -> Self {
        Self {
            altitude: AltitudeGains::default(),
            roll: AxisGains::new(5., 1.),
            pitch: AxisGains::new(5., 1.),
            yaw_rate: 2.,
        }
    }
}

/// Where the autonomous controller gets its attitude references from.
#[derive(Clone, Debug, PartialEq)]
pub enum AttitudeSource {
    Schedule(ManeuverSchedule),
    Hold(PositionHold),
}

impl Default for AttitudeSource {
    fn default() -> Self {
        Self::Schedule(ManeuverSchedule::default())
    }
}

/// Flies itself: holds an altitude and either follows a maneuver script or
/// holds a horizontal position. Pilot input is ignored.
#[derive(Clone, Debug)]
pub struct AutonomousController {
    mass: f64,
    gravity: f64,
    gains: AutonomousGains,
    target_altitude: f64,
    source: AttitudeSource,
    altitude_integral: f64,
    mixer: MotorMixer,
}

impl AutonomousController {
    pub const DEFAULT_ALTITUDE: f64 = 5.;

    pub fn new(config: &VehicleConfig, source: AttitudeSource) -> Self {
        let target_altitude = match &source {
            AttitudeSource::Hold(hold) => hold.target.z,
            AttitudeSource::Schedule(_) => Self::DEFAULT_ALTITUDE,
        };
        Self {
            mass: config.mass,
            gravity: config.gravity,
            gains: AutonomousGains::default(),
            target_altitude,
            source,
            altitude_integral: 0.,
            mixer: MotorMixer::new(config),
        }
    }

    pub fn with_gains(mut self, gains: AutonomousGains) -> Self {
        self.gains = gains;
        self
    }

    pub fn with_target_altitude(mut self, altitude: f64) -> Self {
        self.target_altitude = altitude;
        self
    }

    pub fn gains(&self) -> &AutonomousGains {
        &self.gains
    }

    pub fn target_altitude(&self) -> f64 {
        self.target_altitude
    }

    pub fn source(&self) -> &AttitudeSource {
        &self.source
    }

    pub fn altitude_integral(&self) -> f64 {
        self.altitude_integral
    }

    fn references(&self, state: &VehicleState, t: f64) -> (f64, f64, f64) {
        match &self.source {
            AttitudeSource::Schedule(schedule) => {
                let maneuver = schedule.at(t);
                (maneuver.roll, maneuver.pitch, maneuver.yaw_rate)
            }
            AttitudeSource::Hold(hold) => {
                let (roll, pitch) = hold.attitude_targets(state, self.gravity);
                (roll, pitch, 0.)
            }
        }
    }
}

impl FlightController for AutonomousController {
    fn control(
        &mut self,
        _command: &PilotCommand,
        state: &VehicleState,
        step: &TimeStep,
    ) -> Wrench {
        let altitude = &self.gains.altitude;
        let error = self.target_altitude - state.altitude();
        if altitude.ki != 0. {
            self.altitude_integral += error * step.dt();
        }
        let thrust = self.mass * self.gravity + altitude.kp * error
            - altitude.kd * state.climb_rate()
            + altitude.ki * self.altitude_integral;

        let (roll, pitch, yaw_rate) = self.references(state, step.elapsed());
        let wrench = Wrench::new(
            thrust,
            self.gains.roll.torque(roll, state.roll(), state.p()),
            self.gains.pitch.torque(pitch, state.pitch(), state.q()),
            self.gains.yaw_rate * (yaw_rate - state.r()),
        );
        trace!(
            "t={:.2} refs=({:.3}, {:.3}, {:.3}) wrench={:?}",
            step.elapsed(),
            roll,
            pitch,
            yaw_rate,
            wrench
        );
        wrench
    }

    fn mixer(&self) -> &MotorMixer {
        &self.mixer
    }

    fn reset(&mut self) {
        debug!("autonomous controller reset");
        self.altitude_integral = 0.;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Maneuver, ManeuverSegment};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use flight_dynamics::Integrator;
    use nalgebra::Vector3;

    fn fly(controller: &mut AutonomousController, seconds: f64) -> VehicleState {
        let integrator = Integrator::new(VehicleConfig::default());
        let mut step = TimeStep::new(0.01);
        let mut state = VehicleState::at_rest();
        while step.elapsed() < seconds {
            let speeds = controller.motor_speeds(&PilotCommand::default(), &state, &step);
            state = integrator.step(&state, &speeds, step.dt());
            step.advance();
        }
        state
    }

    #[test]
    fn test_hover_thrust_on_target() {
        let config = VehicleConfig::default();
        let mut controller =
            AutonomousController::new(&config, AttitudeSource::Schedule(ManeuverSchedule::hover()));
        let mut state = VehicleState::at_rest();
        state.position.z = 5.;
        let wrench = controller.control(&PilotCommand::default(), &state, &TimeStep::new(0.01));
        assert_relative_eq!(wrench.thrust, config.weight());
        assert_eq!(wrench.torque, Vector3::zeros());
    }

    #[test]
    fn test_climbs_from_ground() {
        let config = VehicleConfig::default();
        let mut controller = AutonomousController::new(&config, AttitudeSource::default());
        let wrench = controller.control(
            &PilotCommand::default(),
            &VehicleState::at_rest(),
            &TimeStep::new(0.01),
        );
        assert_relative_eq!(wrench.thrust, config.weight() + 20. * 5.);
    }

    #[test]
    fn test_ignores_pilot() {
        let config = VehicleConfig::default();
        let mut controller = AutonomousController::new(&config, AttitudeSource::default());
        let step = TimeStep::new(0.01);
        let state = VehicleState::at_rest();
        let a = controller.control(&PilotCommand::default(), &state, &step);
        let b = controller.control(&PilotCommand::new(1., 0.5, 0.5, 1.), &state, &step);
        assert_eq!(a, b);
    }

    #[test]
    fn test_settles_at_target_altitude() {
        let config = VehicleConfig::default();
        let mut controller =
            AutonomousController::new(&config, AttitudeSource::Schedule(ManeuverSchedule::hover()));
        let state = fly(&mut controller, 4.);
        assert_abs_diff_eq!(state.altitude(), 5., epsilon = 0.05);
        assert_abs_diff_eq!(state.position.x, 0.);
        assert_abs_diff_eq!(state.attitude.norm(), 0.);
    }

    #[test]
    fn test_follows_roll_maneuver() {
        let config = VehicleConfig::default();
        let mut controller = AutonomousController::new(&config, AttitudeSource::default());
        let state = fly(&mut controller, 3.9);
        assert_abs_diff_eq!(state.roll(), 0.1, epsilon = 1e-3);
        // Tilting right slides the vehicle towards -y.
        assert!(state.velocity.y < 0.);
    }

    #[test]
    fn test_yaw_rate_maneuver() {
        let config = VehicleConfig::default();
        let schedule = ManeuverSchedule::new(vec![ManeuverSegment::new(
            0.,
            10.,
            Maneuver::yaw_rate(0.5),
        )]);
        let mut controller = AutonomousController::new(&config, AttitudeSource::Schedule(schedule));
        let state = fly(&mut controller, 3.);
        assert_abs_diff_eq!(state.r(), 0.5, epsilon = 1e-3);
        assert!(state.yaw() > 1.);
    }

    #[test]
    fn test_position_hold_converges() {
        let config = VehicleConfig::default();
        let hold = PositionHold::new(Vector3::new(1., -1., 3.));
        let mut controller = AutonomousController::new(&config, AttitudeSource::Hold(hold));
        assert_eq!(controller.target_altitude(), 3.);
        let state = fly(&mut controller, 20.);
        assert_abs_diff_eq!(state.position.x, 1., epsilon = 0.05);
        assert_abs_diff_eq!(state.position.y, -1., epsilon = 0.05);
        assert_abs_diff_eq!(state.position.z, 3., epsilon = 0.05);
    }

    #[test]
    fn test_altitude_integral_accumulates_and_resets() {
        let config = VehicleConfig::default();
        let gains = AutonomousGains {
            altitude: AltitudeGains {
                ki: 1.,
                ..AltitudeGains::default()
            },
            ..AutonomousGains::default()
        };
        let mut controller =
            AutonomousController::new(&config, AttitudeSource::default()).with_gains(gains);
        let step = TimeStep::new(0.01);
        let state = VehicleState::at_rest();
        controller.control(&PilotCommand::default(), &state, &step);
        assert_relative_eq!(controller.altitude_integral(), 0.05);
        let wrench = controller.control(&PilotCommand::default(), &state, &step);
        assert_relative_eq!(wrench.thrust, config.weight() + 100. + 0.1);
        controller.reset();
        assert_eq!(controller.altitude_integral(), 0.);
    }

    #[test]
    fn test_integral_disabled_by_default() {
        let mut controller =
            AutonomousController::new(&VehicleConfig::default(), AttitudeSource::default());
        controller.control(
            &PilotCommand::default(),
            &VehicleState::at_rest(),
            &TimeStep::new(0.01),
        );
        assert_eq!(controller.altitude_integral(), 0.);
    }
}
