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
use std::{num::NonZeroU32, time::Duration};
use structopt::StructOpt;

const DEFAULT_TELEMETRY_EVERY: NonZeroU32 = match NonZeroU32::new(3) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Clone, Debug, StructOpt)]
pub struct SimulationOpts {
    /// Integration timestep in seconds
    #[structopt(long, default_value = "0.01")]
    pub dt: f64,

    /// Publish telemetry once every this many steps
    #[structopt(long, default_value = "3")]
    pub telemetry_every: NonZeroU32,

    /// How long the telemetry thread waits for a snapshot before checking
    /// whether it should stop, in milliseconds
    #[structopt(long, default_value = "1000")]
    pub telemetry_timeout_ms: u64,

    /// Run as fast as possible instead of pacing to the wall clock
    #[structopt(long)]
    pub no_realtime: bool,

    /// Stop after this many simulated seconds (default: run until stopped)
    #[structopt(short, long)]
    pub duration: Option<f64>,
}

impl Default for SimulationOpts {
    fn default() -> Self {
        Self {
            dt: 0.01,
            telemetry_every: DEFAULT_TELEMETRY_EVERY,
            telemetry_timeout_ms: 1000,
            no_realtime: false,
            duration: None,
        }
    }
}

impl SimulationOpts {
    pub fn realtime(&self) -> bool {
        !self.no_realtime
    }

    pub fn telemetry_timeout(&self) -> Duration {
        Duration::from_millis(self.telemetry_timeout_ms)
    }

    /// Number of steps in `duration`, if one was given.
    pub fn step_limit(&self) -> Option<u64> {
        self.duration
            .map(|seconds| (seconds.max(0.) / self.dt).round() as u64)
    }
}
