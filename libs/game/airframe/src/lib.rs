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
//! The physical description of the vehicle: mass properties, rotor
//! coefficients, and the single motor table that both the forward
//! actuation map here and the mixer's inverse are derived from.
use nalgebra::Vector3;
use physical_constants::STANDARD_GRAVITY;

/// Where a rotor sits relative to the roll and pitch axes and which way it
/// spins. Each sign is -1, 0 or +1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotorArm {
    pub roll: f64,
    pub pitch: f64,
    pub spin: f64,
}

/// Motor index assignment.
///
///   0: pitch arm, negative side, spins against +yaw
///   1: roll arm, negative side, spins with +yaw
///   2: pitch arm, positive side, spins against +yaw
///   3: roll arm, positive side, spins with +yaw
///
/// So tau_roll = L * (T3 - T1), tau_pitch = L * (T2 - T0) and
/// tau_yaw = (Q1 + Q3) - (Q0 + Q2).
pub const MOTOR_ARMS: [MotorArm; 4] = [
    MotorArm {
        roll: 0.,
        pitch: -1.,
        spin: -1.,
    },
    MotorArm {
        roll: -1.,
        pitch: 0.,
        spin: 1.,
    },
    MotorArm {
        roll: 0.,
        pitch: 1.,
        spin: -1.,
    },
    MotorArm {
        roll: 1.,
        pitch: 0.,
        spin: 1.,
    },
];

/// Squared rotor angular velocities, in rad^2/s^2.
///
/// The squared form is what both the mixer produces and the dynamics
/// consume, so no square roots are taken inside the simulation loop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotorSpeeds([f64; 4]);

impl MotorSpeeds {
    pub fn from_squared(squared: [f64; 4]) -> Self {
        debug_assert!(!squared.iter().any(|w| *w < 0.), "negative motor speed");
        Self(squared)
    }

    /// Build from rotor angular velocities in rad/s.
    pub fn from_angular(omega: [f64; 4]) -> Self {
        Self(omega.map(|w| w * w))
    }

    pub fn squared(&self) -> &[f64; 4] {
        &self.0
    }

    pub fn angular(&self) -> [f64; 4] {
        self.0.map(f64::sqrt)
    }
}

/// Collective thrust along body +z and the body torques, in N and N*m.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Wrench {
    pub thrust: f64,
    pub torque: Vector3<f64>,
}

impl Wrench {
    pub fn new(thrust: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            thrust,
            torque: Vector3::new(roll, pitch, yaw),
        }
    }

    pub fn roll(&self) -> f64 {
        self.torque.x
    }

    pub fn pitch(&self) -> f64 {
        self.torque.y
    }

    pub fn yaw(&self) -> f64 {
        self.torque.z
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VehicleConfig {
    /// kg
    pub mass: f64,

    /// m/s^2
    pub gravity: f64,

    /// Principal moments (Ixx, Iyy, Izz) in kg*m^2; products of inertia are
    /// assumed to be zero.
    pub inertia: Vector3<f64>,

    /// Distance from the center of mass to each rotor, m.
    pub arm_length: f64,

    /// kF: thrust per squared rad/s.
    pub thrust_coefficient: f64,

    /// kM: reaction torque per squared rad/s.
    pub drag_coefficient: f64,

    /// Collective thrust at full throttle in piloted mode, N.
    pub max_thrust: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity: STANDARD_GRAVITY,
            inertia: Vector3::new(0.01, 0.01, 0.02),
            arm_length: 0.25,
            thrust_coefficient: 8.875e-6,
            drag_coefficient: 1.203e-7,
            max_thrust: 30.0,
        }
    }
}

impl VehicleConfig {
    pub fn weight(&self) -> f64 {
        self.mass * self.gravity
    }

    pub fn ixx(&self) -> f64 {
        self.inertia.x
    }

    pub fn iyy(&self) -> f64 {
        self.inertia.y
    }

    pub fn izz(&self) -> f64 {
        self.inertia.z
    }

    /// Thrust of a single rotor given its squared speed.
    pub fn motor_thrust(&self, speed_squared: f64) -> f64 {
        self.thrust_coefficient * speed_squared
    }

    /// Reaction torque of a single rotor given its squared speed.
    pub fn motor_torque(&self, speed_squared: f64) -> f64 {
        self.drag_coefficient * speed_squared
    }

    /// Rotor speed in rad/s at which four equal rotors carry the weight.
    pub fn hover_speed(&self) -> f64 {
        (self.weight() / (4. * self.thrust_coefficient)).sqrt()
    }

    /// Forward actuation map: what the rotors actually produce.
    pub fn wrench(&self, speeds: &MotorSpeeds) -> Wrench {
        let mut thrust = 0.;
        let mut torque = Vector3::zeros();
        for (arm, &w2) in MOTOR_ARMS.iter().zip(speeds.squared()) {
            let t = self.motor_thrust(w2);
            thrust += t;
            torque.x += arm.roll * self.arm_length * t;
            torque.y += arm.pitch * self.arm_length * t;
            torque.z += arm.spin * self.motor_torque(w2);
        }
        Wrench { thrust, torque }
    }
}
