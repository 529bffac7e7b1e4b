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
mod ingress;
mod slot;

pub use crate::{
    ingress::{IngressError, IngressMessage},
    slot::CommandSlot,
};

/// What the pilot is asking for. Throttle is a fraction of maximum thrust,
/// roll and pitch are attitude references in radians and yaw is a rate
/// reference in rad/s.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PilotCommand {
    pub throttle: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw_rate: f64,
}

impl PilotCommand {
    pub fn new(throttle: f64, roll: f64, pitch: f64, yaw_rate: f64) -> Self {
        Self {
            throttle,
            roll,
            pitch,
            yaw_rate,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}
