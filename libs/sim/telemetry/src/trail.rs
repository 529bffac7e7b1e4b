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
use nalgebra::Vector3;
use ringbuffer::{AllocRingBuffer, RingBuffer, RingBufferExt, RingBufferWrite};

/// The most recent positions the vehicle has passed through, oldest first.
pub struct Trail {
    points: AllocRingBuffer<Vector3<f64>>,
    recorded: u64,
}

impl Trail {
    pub const DEFAULT_CAPACITY: usize = 2048;

    /// `capacity` must be a power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: AllocRingBuffer::with_capacity(capacity),
            recorded: 0,
        }
    }

    pub fn push(&mut self, point: Vector3<f64>) {
        self.points.push(point);
        self.recorded += 1;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }

    /// Total points ever pushed, including ones that have aged out.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    pub fn latest(&self) -> Option<Vector3<f64>> {
        self.points.back().copied()
    }

    pub fn oldest(&self) -> Option<Vector3<f64>> {
        self.points.front().copied()
    }

    pub fn points(&self) -> Vec<Vector3<f64>> {
        self.points.to_vec()
    }

    /// Distance travelled along the retained points.
    pub fn path_length(&self) -> f64 {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .map(|(a, b)| (b - a).norm())
            .sum()
    }

    /// Highest altitude among the retained points.
    pub fn ceiling(&self) -> Option<f64> {
        self.points.iter().map(|p| p.z).reduce(f64::max)
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for Trail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trail")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("recorded", &self.recorded)
            .finish()
    }
}
