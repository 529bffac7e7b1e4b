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
use vehicle_state::VehicleState;

/// The only contact model: a flat floor at z = 0 that stops a vehicle which
/// is on or below it, sinking, and not producing enough thrust to climb.
///
/// This is not a restitution model. It never touches attitude or
/// horizontal velocity and it only engages under net downward force.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundContact {
    weight: f64,
}

impl GroundContact {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    pub fn is_resting(&self, state: &VehicleState, thrust: f64) -> bool {
        state.position.z <= 0. && thrust < self.weight && state.velocity.z < 0.
    }

    /// Pin a resting vehicle to the floor. Returns true if it was pinned.
    pub fn settle(&self, state: &mut VehicleState, thrust: f64) -> bool {
        if self.is_resting(state, thrust) {
            state.position.z = 0.;
            state.velocity.z = 0.;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resting_requires_all_three_conditions() {
        let ground = GroundContact::new(9.81);
        let mut state = VehicleState::at_rest();
        state.velocity.z = -0.1;
        assert!(ground.is_resting(&state, 0.));
        assert!(!ground.is_resting(&state, 10.));

        state.position.z = 0.01;
        assert!(!ground.is_resting(&state, 0.));

        state.position.z = -0.01;
        state.velocity.z = 0.;
        assert!(!ground.is_resting(&state, 0.));
    }

    #[test]
    fn test_settle_pins_to_floor() {
        let ground = GroundContact::new(9.81);
        let mut state = VehicleState::at_rest();
        state.position.z = -0.002;
        state.velocity.z = -0.3;
        state.velocity.x = 1.;
        state.attitude.x = 0.2;
        assert!(ground.settle(&mut state, 1.));
        assert_eq!(state.position.z, 0.);
        assert_eq!(state.velocity.z, 0.);
        assert_eq!(state.velocity.x, 1.);
        assert_eq!(state.attitude.x, 0.2);
        assert!(!ground.settle(&mut state, 1.));
    }
}
