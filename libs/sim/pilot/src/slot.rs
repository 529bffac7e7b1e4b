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
use crate::PilotCommand;
use parking_lot::Mutex;
use std::sync::Arc;

/// The single shared command cell between ingestion and the simulation.
///
/// Writers overwrite, readers copy; the lock is only ever held for the
/// length of a copy, so the simulation thread never waits on input.
#[derive(Clone, Debug, Default)]
pub struct CommandSlot {
    inner: Arc<Mutex<PilotCommand>>,
}

impl CommandSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, command: PilotCommand) {
        *self.inner.lock() = command;
    }

    pub fn latest(&self) -> PilotCommand {
        *self.inner.lock()
    }

    pub fn reset(&self) {
        self.set(PilotCommand::default());
    }
}
