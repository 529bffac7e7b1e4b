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
//! Pilot input from a line-oriented stream.
use log::{debug, info, warn};
use pilot::{CommandSlot, IngressMessage};
use std::{
    io::{self, BufRead},
    thread::{self, JoinHandle},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub commands: u64,
    pub resets: u64,
    pub ignored: u64,
    pub malformed: u64,
}

pub fn spawn<R: BufRead + Send + 'static>(
    reader: R,
    commands: CommandSlot,
) -> io::Result<JoinHandle<IngestStats>> {
    thread::Builder::new()
        .name("pilot-input".to_owned())
        .spawn(move || ingest(reader, &commands))
}

/// Apply every message on `reader` to the slot. At end of input the last
/// command stays in force.
pub fn ingest<R: BufRead>(reader: R, commands: &CommandSlot) -> IngestStats {
    let mut stats = IngestStats::default();
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("pilot input failed: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match IngressMessage::parse(line) {
            Ok(Some(IngressMessage::Control(command))) => {
                debug!("pilot command {:?}", command);
                commands.set(command);
                stats.commands += 1;
            }
            Ok(Some(IngressMessage::Reset)) => {
                info!("pilot requested reset");
                commands.reset();
                stats.resets += 1;
            }
            Ok(None) => stats.ignored += 1,
            Err(e) => {
                warn!("ignoring pilot input: {}", e);
                stats.malformed += 1;
            }
        }
    }
    info!("pilot input closed; holding the last command");
    stats
}
