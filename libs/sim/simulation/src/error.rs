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
use crate::Phase;
use thiserror::Error;
use vehicle_state::VehicleState;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("non-finite vehicle state after step {step} (t={elapsed:.3}s): {state}")]
    NonFinite {
        step: u64,
        elapsed: f64,
        state: VehicleState,
    },
    #[error("simulation is {0:?}, not running")]
    NotRunning(Phase),
    #[error("timestep must be in (0, 1] seconds, got {0}")]
    InvalidTimestep(f64),
    #[error("failed to start simulation thread")]
    Spawn(#[from] std::io::Error),
}
