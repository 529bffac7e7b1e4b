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
use crate::{SnapshotSubscriber, TelemetrySink};
use crossbeam::channel::RecvTimeoutError;
use log::{debug, info, warn};
use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

/// What the bridge did over its lifetime, along with the sink so that the
/// caller can inspect whatever it accumulated.
#[derive(Debug)]
pub struct BridgeReport<S> {
    pub sink: S,
    pub forwarded: u64,
    pub dropped: u64,
}

/// Forwards snapshots from the simulation to a sink on its own thread.
///
/// Snapshots arrive already throttled. The bridge blocks on the channel for
/// at most `timeout` at a time so that it notices a stop request, and it
/// exits on its own once the simulation side of the channel is gone.
pub struct TelemetryBridge<S> {
    subscriber: SnapshotSubscriber,
    sink: S,
    stop: Arc<AtomicBool>,
    timeout: Duration,
}

impl<S: TelemetrySink + 'static> TelemetryBridge<S> {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    pub fn new(subscriber: SnapshotSubscriber, sink: S, stop: Arc<AtomicBool>) -> Self {
        Self {
            subscriber,
            sink,
            stop,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn spawn(self) -> io::Result<JoinHandle<BridgeReport<S>>> {
        thread::Builder::new()
            .name("telemetry".to_owned())
            .spawn(move || self.run())
    }

    pub fn run(mut self) -> BridgeReport<S> {
        info!("telemetry bridge running");
        let mut forwarded = 0;
        let mut dropped = 0;
        while !self.stop.load(Ordering::Relaxed) {
            match self.subscriber.recv_timeout(self.timeout) {
                Ok(snapshot) => match self.sink.send(&snapshot) {
                    Ok(()) => forwarded += 1,
                    Err(e) => {
                        if dropped == 0 {
                            warn!("dropping telemetry: {}", e);
                        } else {
                            debug!("dropping telemetry: {}", e);
                        }
                        dropped += 1;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("telemetry source disconnected");
                    break;
                }
            }
        }
        if let Err(e) = self.sink.flush() {
            debug!("final telemetry flush failed: {}", e);
        }
        info!(
            "telemetry bridge stopped: {} forwarded, {} dropped",
            forwarded, dropped
        );
        BridgeReport {
            sink: self.sink,
            forwarded,
            dropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{channel, JsonLinesSink, TelemetrySnapshot};
    use anyhow::Result;
    use std::io::Write;
    use vehicle_state::VehicleState;

    struct Unplugged;

    impl Write for Unplugged {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn snap() -> TelemetrySnapshot {
        TelemetrySnapshot::from_state(&VehicleState::at_rest(), 0.)
    }

    #[test]
    fn test_forwards_then_exits_on_disconnect() -> Result<()> {
        let (mut publisher, subscriber) = channel();
        let stop = Arc::new(AtomicBool::new(false));
        let handle = TelemetryBridge::new(subscriber, JsonLinesSink::new(Vec::new()), stop)
            .with_timeout(Duration::from_millis(10))
            .spawn()?;
        publisher.publish(snap());
        drop(publisher);
        let report = handle.join().map_err(|_| anyhow::anyhow!("bridge panicked"))?;
        assert_eq!(report.forwarded, 1);
        assert_eq!(report.dropped, 0);
        let text = String::from_utf8(report.sink.into_inner())?;
        assert!(text.ends_with('\n'));
        let value = json::parse(text.trim_end())?;
        assert_eq!(value["data"].len(), 6);
        Ok(())
    }

    #[test]
    fn test_stop_flag_ends_bridge() -> Result<()> {
        let (_publisher, subscriber) = channel();
        let stop = Arc::new(AtomicBool::new(false));
        let handle = TelemetryBridge::new(subscriber, JsonLinesSink::new(Vec::new()), stop.clone())
            .with_timeout(Duration::from_millis(5))
            .spawn()?;
        stop.store(true, Ordering::Relaxed);
        let report = handle.join().map_err(|_| anyhow::anyhow!("bridge panicked"))?;
        assert_eq!(report.forwarded, 0);
        Ok(())
    }

    #[test]
    fn test_unavailable_sink_drops() {
        let (mut publisher, subscriber) = channel();
        publisher.publish(snap());
        drop(publisher);
        let report = TelemetryBridge::new(
            subscriber,
            JsonLinesSink::new(Unplugged),
            Arc::new(AtomicBool::new(false)),
        )
        .run();
        assert_eq!(report.forwarded, 0);
        assert_eq!(report.dropped, 1);
    }
}
