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
//! A single-slot channel where the newest snapshot always wins.
//!
//! The publisher keeps a handle on the receiving side so that it can pull a
//! stale, unread snapshot back out when the slot is full. Publishing never
//! blocks and the subscriber only ever sees the most recent pose.
use crate::TelemetrySnapshot;
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use std::time::Duration;

pub fn channel() -> (SnapshotPublisher, SnapshotSubscriber) {
    let (tx, rx) = bounded(1);
    (
        SnapshotPublisher {
            tx,
            evict: rx.clone(),
            published: 0,
            replaced: 0,
        },
        SnapshotSubscriber { rx },
    )
}

#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: Sender<TelemetrySnapshot>,
    evict: Receiver<TelemetrySnapshot>,
    published: u64,
    replaced: u64,
}

impl SnapshotPublisher {
    /// Offer a snapshot, replacing any unread one.
    pub fn publish(&mut self, snapshot: TelemetrySnapshot) {
        let mut pending = snapshot;
        loop {
            match self.tx.try_send(pending) {
                Ok(()) => {
                    self.published += 1;
                    return;
                }
                Err(TrySendError::Full(back)) => {
                    if self.evict.try_recv().is_ok() {
                        self.replaced += 1;
                    }
                    pending = back;
                }
                // We hold a receiver ourselves, so this cannot happen.
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    /// Snapshots that were overwritten before anyone read them.
    pub fn replaced(&self) -> u64 {
        self.replaced
    }
}

#[derive(Clone, Debug)]
pub struct SnapshotSubscriber {
    rx: Receiver<TelemetrySnapshot>,
}

impl SnapshotSubscriber {
    pub fn recv_timeout(&self, timeout: Duration) -> Result<TelemetrySnapshot, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Result<TelemetrySnapshot, TryRecvError> {
        self.rx.try_recv()
    }
}
