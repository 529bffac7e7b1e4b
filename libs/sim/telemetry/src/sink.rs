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
use crate::{TelemetrySnapshot, Trail};
use nalgebra::Vector3;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("telemetry sink unavailable: {0}")]
    Unavailable(String),
    #[error("telemetry write failed")]
    Io(#[from] io::Error),
}

/// Somewhere snapshots go once they leave the simulation.
///
/// An error means this snapshot could not be delivered; the caller drops it
/// and carries on with the next one.
pub trait TelemetrySink: Send {
    fn send(&mut self, snapshot: &TelemetrySnapshot) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Writes one JSON document per line.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
    written: u64,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> TelemetrySink for JsonLinesSink<W> {
    fn send(&mut self, snapshot: &TelemetrySnapshot) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", snapshot.encode()).map_err(classify)?;
        self.writer.flush().map_err(classify)?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(classify)
    }
}

/// A reader that has gone away is reported as unavailable rather than as a
/// generic write failure.
fn classify(err: io::Error) -> SinkError {
    match err.kind() {
        io::ErrorKind::BrokenPipe
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected => SinkError::Unavailable(err.to_string()),
        _ => SinkError::Io(err),
    }
}

/// Records every forwarded position into a bounded trail before handing the
/// snapshot on.
#[derive(Debug)]
pub struct TrailSink<S> {
    inner: S,
    trail: Trail,
}

impl<S: TelemetrySink> TrailSink<S> {
    pub fn new(inner: S, trail: Trail) -> Self {
        Self { inner, trail }
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_parts(self) -> (S, Trail) {
        (self.inner, self.trail)
    }
}

impl<S: TelemetrySink> TelemetrySink for TrailSink<S> {
    fn send(&mut self, snapshot: &TelemetrySnapshot) -> Result<(), SinkError> {
        self.trail.push(Vector3::from(snapshot.position()));
        self.inner.send(snapshot)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.inner.flush()
    }
}
