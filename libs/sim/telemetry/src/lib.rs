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
mod bridge;
mod channel;
mod sink;
mod snapshot;
mod trail;

pub use crate::{
    bridge::{BridgeReport, TelemetryBridge},
    channel::{channel, SnapshotPublisher, SnapshotSubscriber},
    sink::{JsonLinesSink, SinkError, TelemetrySink, TrailSink},
    snapshot::{SnapshotThrottle, TelemetrySnapshot},
    trail::Trail,
};
