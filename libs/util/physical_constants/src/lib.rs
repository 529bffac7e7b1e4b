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

/// Gravitational acceleration used throughout the simulation, in m/s^2.
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Largest tilt the autonomous controller will ask for, in degrees.
pub const MAX_TILT_DEGREES: f64 = 20.0;

/// Below this magnitude cos(pitch) is treated as singular.
pub const GIMBAL_LOCK_EPSILON: f64 = 1e-3;

/// Telemetry values are rounded to this many decimal places.
pub const TELEMETRY_DECIMALS: i32 = 4;

pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
