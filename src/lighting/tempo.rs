// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

/// Beats per bar assumed by the bar phase. The tempo clock reports 4/4.
pub const BEATS_PER_BAR: f64 = 4.0;

/// Fallback tempo when the clock reports nothing usable.
pub const DEFAULT_BPM: f64 = 120.0;

/// Absorbs floating point error right at a beat boundary, e.g. 0.5s at 120 BPM.
const BEAT_EPSILON: f64 = 1e-9;

/// Read-only output of the tempo clock for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatSnapshot {
    pub bpm: f64,
    /// Position within the current beat, 0.0 to 1.0 (exclusive).
    pub beat_phase: f64,
    /// Position within the current 4-beat bar, 0.0 to 1.0 (exclusive).
    pub bar_phase: f64,
    /// Seconds since the clock started.
    pub elapsed: f64,
}

impl Default for BeatSnapshot {
    fn default() -> Self {
        Self::at(DEFAULT_BPM, 0.0)
    }
}

impl BeatSnapshot {
    pub fn new(bpm: f64, beat_phase: f64, bar_phase: f64, elapsed: f64) -> Self {
        Self {
            bpm,
            beat_phase,
            bar_phase,
            elapsed,
        }
    }

    /// Derives a snapshot for a steady tempo, as a free-running clock would report it.
    pub fn at(bpm: f64, elapsed: f64) -> Self {
        let mut snapshot = Self::new(bpm, 0.0, 0.0, elapsed);
        let beats = snapshot.total_beats();
        snapshot.beat_phase = phase_of(beats);
        snapshot.bar_phase = phase_of(beats / BEATS_PER_BAR);
        snapshot
    }

    /// Seconds per beat, or `None` when the tempo is not positive.
    pub fn beat_duration(&self) -> Option<f64> {
        if self.bpm.is_finite() && self.bpm > 0.0 {
            Some(60.0 / self.bpm)
        } else {
            None
        }
    }

    /// Fractional number of beats since the clock started.
    pub fn total_beats(&self) -> f64 {
        match self.beat_duration() {
            Some(duration) if self.elapsed.is_finite() => (self.elapsed / duration).max(0.0),
            _ => 0.0,
        }
    }

    /// Index of the current beat, counting from 0.
    pub fn beat_index(&self) -> u64 {
        (self.total_beats() + BEAT_EPSILON).floor() as u64
    }

    /// Index of the current bar, counting from 0.
    pub fn bar_index(&self) -> u64 {
        ((self.total_beats() + BEAT_EPSILON) / BEATS_PER_BAR).floor() as u64
    }
}

fn phase_of(value: f64) -> f64 {
    let phase = value.fract();
    if phase + BEAT_EPSILON >= 1.0 {
        0.0
    } else {
        phase
    }
}
