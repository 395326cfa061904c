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

use crate::lighting::params::EffectParams;
use crate::lighting::tempo::BeatSnapshot;
use crate::lighting::types::{FixtureOutput, Position};

use super::MovementEffect;

const DEFAULT_SLOT_COUNT: i64 = 8;

/// Slot count from params, never less than 1.
fn slot_count(params: &EffectParams) -> u64 {
    params.int("slotCount", DEFAULT_SLOT_COUNT).max(1) as u64
}

/// Wraps `start + steps` into `0..slots`.
fn wrap_slot(start: i64, steps: i64, slots: u64) -> u32 {
    let slots = slots as i64;
    start.wrapping_add(steps).rem_euclid(slots) as u32
}

fn gobo_only(slot: u32) -> FixtureOutput {
    FixtureOutput {
        gobo: Some(slot),
        ..FixtureOutput::EMPTY
    }
}

/// Steps the gobo wheel once per beat, or once per bar.
///
/// Parameters:
/// - `slotCount` (8).
/// - `changeOnBeat` (true): false steps once per bar instead.
/// - `startSlot` (0).
#[derive(Debug, Clone, Copy, Default)]
pub struct GoboBeatSync;

impl MovementEffect for GoboBeatSync {
    type Context = u32;

    fn id(&self) -> &'static str {
        "gobo_beat_sync"
    }

    fn prepare(&self, params: &EffectParams, _time: f64, beat: &BeatSnapshot) -> u32 {
        let steps = if params.bool("changeOnBeat", true) {
            beat.beat_index()
        } else {
            beat.bar_index()
        };
        let steps = i64::try_from(steps).unwrap_or(i64::MAX);
        wrap_slot(params.int("startSlot", 0), steps, slot_count(params))
    }

    fn compute_movement(&self, _position: Position, context: &u32) -> FixtureOutput {
        gobo_only(*context)
    }
}

/// Rotates through the gobo wheel at a fixed rate.
///
/// Parameters:
/// - `slotCount` (8).
/// - `speed` (1.0): slots per second, negative rotates backwards.
/// - `startSlot` (0).
#[derive(Debug, Clone, Copy, Default)]
pub struct GoboRotate;

impl MovementEffect for GoboRotate {
    type Context = u32;

    fn id(&self) -> &'static str {
        "gobo_rotate"
    }

    fn prepare(&self, params: &EffectParams, time: f64, _beat: &BeatSnapshot) -> u32 {
        let slots = slot_count(params);
        let travelled = (params.float("speed", 1.0) * time).floor();
        // Reduce before converting so huge times cannot overflow.
        let steps = if travelled.is_finite() {
            travelled.rem_euclid(slots as f64) as i64
        } else {
            0
        };
        wrap_slot(params.int("startSlot", 0), steps, slots)
    }

    fn compute_movement(&self, _position: Position, context: &u32) -> FixtureOutput {
        gobo_only(*context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beat_sync(params: &EffectParams, elapsed: f64) -> FixtureOutput {
        let beat = BeatSnapshot::at(120.0, elapsed);
        let context = GoboBeatSync.prepare(params, elapsed, &beat);
        GoboBeatSync.compute_movement(Position::ORIGIN, &context)
    }

    #[test]
    fn test_gobo_changes_on_every_beat() {
        let params = EffectParams::new()
            .with("slotCount", 4_i64)
            .with("changeOnBeat", true);
        let slots: Vec<Option<u32>> = [0.0, 0.5, 1.0, 1.5]
            .iter()
            .map(|&t| beat_sync(&params, t).gobo)
            .collect();
        assert_eq!(slots, vec![Some(0), Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_gobo_wraps_slot_count() {
        let params = EffectParams::new().with("slotCount", 3_i64);
        assert_eq!(beat_sync(&params, 1.5).gobo, Some(0));
    }

    #[test]
    fn test_gobo_changes_on_bar() {
        let params = EffectParams::new().with("changeOnBeat", false);
        assert_eq!(beat_sync(&params, 1.5).gobo, Some(0));
        assert_eq!(beat_sync(&params, 2.0).gobo, Some(1));
        assert_eq!(beat_sync(&params, 4.0).gobo, Some(2));
    }

    #[test]
    fn test_gobo_sets_only_gobo() {
        let params = EffectParams::new();
        let output = beat_sync(&params, 0.5);
        assert_eq!(
            output,
            FixtureOutput {
                gobo: Some(1),
                ..FixtureOutput::EMPTY
            }
        );
    }

    #[test]
    fn test_bad_slot_count() {
        let params = EffectParams::new().with("slotCount", 0_i64).with("startSlot", -5_i64);
        assert_eq!(beat_sync(&params, 3.0).gobo, Some(0));
    }

    #[test]
    fn test_rotate_from_start_slot() {
        let params = EffectParams::new()
            .with("slotCount", 5_i64)
            .with("speed", 2.0)
            .with("startSlot", 3_i64);
        let beat = BeatSnapshot::default();
        let slot_at = |t: f64| {
            let context = GoboRotate.prepare(&params, t, &beat);
            GoboRotate.compute_movement(Position::ORIGIN, &context).gobo
        };
        assert_eq!(slot_at(0.0), Some(3));
        assert_eq!(slot_at(0.5), Some(4));
        assert_eq!(slot_at(1.0), Some(0));
        assert_eq!(slot_at(1e12), Some(3));
    }

    #[test]
    fn test_rotate_backwards() {
        let params = EffectParams::new().with("slotCount", 4_i64).with("speed", -1.0);
        let context = GoboRotate.prepare(&params, 1.0, &BeatSnapshot::default());
        assert_eq!(context, 3);
    }
}
