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
use json::JsonValue;
use physical_constants::{round_to_decimals, TELEMETRY_DECIMALS};
use std::num::NonZeroU32;
use vehicle_state::VehicleState;

/// Pose of the vehicle as published to observers: position then Euler
/// angles, each rounded for the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TelemetrySnapshot {
    data: [f64; 6],
    elapsed: f64,
}

impl TelemetrySnapshot {
    pub fn from_state(state: &VehicleState, elapsed: f64) -> Self {
        let p = state.position;
        let a = state.attitude;
        let mut data = [p.x, p.y, p.z, a.x, a.y, a.z];
        for v in data.iter_mut() {
            *v = round_to_decimals(*v, TELEMETRY_DECIMALS);
        }
        Self { data, elapsed }
    }

    pub fn data(&self) -> &[f64; 6] {
        &self.data
    }

    pub fn position(&self) -> [f64; 3] {
        [self.data[0], self.data[1], self.data[2]]
    }

    pub fn attitude(&self) -> [f64; 3] {
        [self.data[3], self.data[4], self.data[5]]
    }

    /// Simulated time at which the snapshot was taken. Not sent on the wire.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn to_json(&self) -> JsonValue {
        let mut value = JsonValue::new_object();
        value["data"] = self.data.to_vec().into();
        value
    }

    pub fn encode(&self) -> String {
        self.to_json().dump()
    }
}

/// Lets one in every `every` steps through.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotThrottle {
    every: NonZeroU32,
    since: u32,
}

impl SnapshotThrottle {
    pub fn new(every: NonZeroU32) -> Self {
        Self { every, since: 0 }
    }

    pub fn every(&self) -> NonZeroU32 {
        self.every
    }

    /// Count a step; true when this step should be published.
    pub fn tick(&mut self) -> bool {
        self.since += 1;
        if self.since >= self.every.get() {
            self.since = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.since = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_snapshot_rounds() {
        let mut state = VehicleState::at_rest();
        state.position = Vector3::new(1.234_56, -0.000_01, 5.);
        state.attitude = Vector3::new(0.1, -0.123_449, 3.141_592_6);
        let snap = TelemetrySnapshot::from_state(&state, 1.5);
        assert_relative_eq!(snap.data()[0], 1.234_6);
        assert_eq!(snap.data()[1], 0.);
        assert_relative_eq!(snap.data()[4], -0.123_4);
        assert_relative_eq!(snap.data()[5], 3.141_6);
        assert_eq!(snap.elapsed(), 1.5);
    }

    #[test]
    fn test_wire_format() -> Result<()> {
        let mut state = VehicleState::at_rest();
        state.position = Vector3::new(1., 2., 3.5);
        state.attitude.z = 0.25;
        let text = TelemetrySnapshot::from_state(&state, 0.).encode();
        let value = json::parse(&text)?;
        assert!(value.is_object());
        assert_eq!(value.len(), 1);
        let data = &value["data"];
        assert_eq!(data.len(), 6);
        let expect = [1., 2., 3.5, 0., 0., 0.25];
        for (i, e) in expect.iter().enumerate() {
            assert_relative_eq!(data[i].as_f64().unwrap_or(f64::NAN), *e);
        }
        Ok(())
    }

    #[test]
    fn test_throttle_every_third() {
        let mut throttle = SnapshotThrottle::new(NonZeroU32::new(3).unwrap());
        let fired = (0..9).map(|_| throttle.tick()).collect::<Vec<_>>();
        assert_eq!(
            fired,
            vec![false, false, true, false, false, true, false, false, true]
        );
    }

    #[test]
    fn test_throttle_every_step() {
        let mut throttle = SnapshotThrottle::new(NonZeroU32::new(1).unwrap());
        assert!((0..5).all(|_| throttle.tick()));
    }
}
