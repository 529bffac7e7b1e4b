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
//! Time-indexed attitude scripts for the autonomous controller.

/// Attitude and yaw-rate references in effect at some instant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Maneuver {
    pub roll: f64,
    pub pitch: f64,
    pub yaw_rate: f64,
}

impl Maneuver {
    pub fn hover() -> Self {
        Self::default()
    }

    pub fn roll(roll: f64) -> Self {
        Self {
            roll,
            ..Self::default()
        }
    }

    pub fn pitch(pitch: f64) -> Self {
        Self {
            pitch,
            ..Self::default()
        }
    }

    pub fn yaw_rate(yaw_rate: f64) -> Self {
        Self {
            yaw_rate,
            ..Self::default()
        }
    }
}

/// A maneuver that applies on `[start, end)` seconds of simulated time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManeuverSegment {
    pub start: f64,
    pub end: f64,
    pub maneuver: Maneuver,
}

impl ManeuverSegment {
    pub fn new(start: f64, end: f64, maneuver: Maneuver) -> Self {
        Self {
            start,
            end,
            maneuver,
        }
    }

    fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}

/// Outside every segment the vehicle hovers. Where segments overlap the
/// earliest listed wins.
#[derive(Clone, Debug, PartialEq)]
pub struct ManeuverSchedule {
    segments: Vec<ManeuverSegment>,
}

impl Default for ManeuverSchedule {
    fn default() -> Self {
        Self::new(vec![
            ManeuverSegment::new(2., 4., Maneuver::roll(0.1)),
            ManeuverSegment::new(4., 6., Maneuver::pitch(0.1)),
            ManeuverSegment::new(6., 8., Maneuver::yaw_rate(0.5)),
        ])
    }
}

impl ManeuverSchedule {
    pub fn new(segments: Vec<ManeuverSegment>) -> Self {
        Self { segments }
    }

    pub fn hover() -> Self {
        Self::new(vec![])
    }

    pub fn segments(&self) -> &[ManeuverSegment] {
        &self.segments
    }

    pub fn at(&self, t: f64) -> Maneuver {
        self.segments
            .iter()
            .find(|segment| segment.contains(t))
            .map(|segment| segment.maneuver)
            .unwrap_or_default()
    }

    /// Time at which the last scripted segment ends.
    pub fn duration(&self) -> f64 {
        self.segments.iter().map(|s| s.end).fold(0., f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let schedule = ManeuverSchedule::default();
        assert_eq!(schedule.at(0.), Maneuver::hover());
        assert_eq!(schedule.at(1.99), Maneuver::hover());
        assert_eq!(schedule.at(2.), Maneuver::roll(0.1));
        assert_eq!(schedule.at(3.99), Maneuver::roll(0.1));
        assert_eq!(schedule.at(4.), Maneuver::pitch(0.1));
        assert_eq!(schedule.at(6.5), Maneuver::yaw_rate(0.5));
        assert_eq!(schedule.at(8.), Maneuver::hover());
        assert_eq!(schedule.at(1000.), Maneuver::hover());
        assert_eq!(schedule.duration(), 8.);
    }

    #[test]
    fn test_empty_schedule_hovers() {
        let schedule = ManeuverSchedule::hover();
        assert_eq!(schedule.at(3.), Maneuver::hover());
        assert_eq!(schedule.duration(), 0.);
    }
}
