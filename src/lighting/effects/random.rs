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

/// Salts separating the pan and tilt streams.
const PAN_SALT: u64 = 0x7061_6e00_0000_0001;
const TILT_SALT: u64 = 0x7469_6c74_0000_0002;

/// Positions are keyed at millimetre resolution.
const POSITION_QUANTUM: f64 = 1000.0;

/// SplitMix64 finalizer. The same input always yields the same output and
/// neighbouring inputs land far apart.
#[inline]
pub fn hash64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Maps a hash onto 0.0 to 1.0 (exclusive) using its top 53 bits.
#[inline]
pub fn unit_from_hash(hash: u64) -> f64 {
    (hash >> 11) as f64 / (1u64 << 53) as f64
}

#[inline]
fn combine(seed: u64, value: u64) -> u64 {
    hash64(seed ^ value.wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

fn position_key(position: Position) -> u64 {
    let q = |v: f64| (v * POSITION_QUANTUM).round() as i64 as u64;
    combine(combine(hash64(q(position.x)), q(position.y)), q(position.z))
}

/// Jumps to a new pseudo-random pan/tilt on every beat (or bar).
///
/// Without `perFixture` every fixture gets the same position; with it, each
/// fixture is keyed by its position and gets its own.
///
/// Parameters:
/// - `perFixture` (false).
/// - `seed` (0).
/// - `center` (0.5), `range` (1.0): values land in `center ± range / 2`.
/// - `changeOnBeat` (true): false changes once per bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMovement;

#[derive(Debug, Clone, Copy)]
pub struct RandomContext {
    step_hash: u64,
    per_fixture: bool,
    center: f64,
    range: f64,
    shared: FixtureOutput,
}

impl RandomContext {
    fn output_for(&self, key: u64) -> FixtureOutput {
        let pan = unit_from_hash(combine(key, PAN_SALT));
        let tilt = unit_from_hash(combine(key, TILT_SALT));
        FixtureOutput::pan_tilt(
            self.center + (pan - 0.5) * self.range,
            self.center + (tilt - 0.5) * self.range,
        )
    }
}

impl MovementEffect for RandomMovement {
    type Context = RandomContext;

    fn id(&self) -> &'static str {
        "random_movement"
    }

    fn prepare(&self, params: &EffectParams, _time: f64, beat: &BeatSnapshot) -> RandomContext {
        let step = if params.bool("changeOnBeat", true) {
            beat.beat_index()
        } else {
            beat.bar_index()
        };
        let seed = params.int("seed", 0) as u64;
        let mut context = RandomContext {
            step_hash: combine(hash64(seed), step),
            per_fixture: params.bool("perFixture", false),
            center: params.float("center", 0.5),
            range: params.float("range", 1.0),
            shared: FixtureOutput::EMPTY,
        };
        context.shared = context.output_for(context.step_hash);
        context
    }

    fn compute_movement(&self, position: Position, context: &RandomContext) -> FixtureOutput {
        if context.per_fixture {
            context.output_for(combine(context.step_hash, position_key(position)))
        } else {
            context.shared
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_hash_is_deterministic_and_spread() {
        assert_eq!(hash64(42), hash64(42));
        let outputs: HashSet<u64> = (0..10_000).map(hash64).collect();
        assert_eq!(outputs.len(), 10_000);

        // Unit values should fill all ten deciles.
        let mut buckets = [0usize; 10];
        for i in 0..10_000u64 {
            let bucket = (unit_from_hash(hash64(i)) * 10.0) as usize;
            buckets[bucket] += 1;
        }
        for count in buckets {
            assert!((800..1200).contains(&count), "{:?}", buckets);
        }
    }

    fn random_at(params: &EffectParams, elapsed: f64, position: Position) -> FixtureOutput {
        let beat = BeatSnapshot::at(120.0, elapsed);
        let context = RandomMovement.prepare(params, elapsed, &beat);
        RandomMovement.compute_movement(position, &context)
    }

    #[test]
    fn test_stable_within_a_beat() {
        let params = EffectParams::new();
        let a = random_at(&params, 0.1, Position::ORIGIN);
        let b = random_at(&params, 0.4, Position::ORIGIN);
        let c = random_at(&params, 0.6, Position::ORIGIN);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_shared_across_fixtures() {
        let params = EffectParams::new();
        let a = random_at(&params, 1.2, Position::new(1.0, 2.0, 3.0));
        let b = random_at(&params, 1.2, Position::new(-4.0, 0.0, 8.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_per_fixture_differs() {
        let params = EffectParams::new().with("perFixture", true);
        let a = random_at(&params, 1.2, Position::new(1.0, 2.0, 3.0));
        let b = random_at(&params, 1.2, Position::new(-4.0, 0.0, 8.0));
        assert_ne!(a, b);
        assert_eq!(a, random_at(&params, 1.2, Position::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_seed_changes_sequence() {
        let a = random_at(&EffectParams::new(), 0.0, Position::ORIGIN);
        let b = random_at(&EffectParams::new().with("seed", 7_i64), 0.0, Position::ORIGIN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_values_in_range() {
        let params = EffectParams::new()
            .with("perFixture", true)
            .with("center", 0.6)
            .with("range", 0.2);
        for i in 0..200 {
            let output = random_at(&params, i as f64 * 0.5, Position::new(i as f64, 0.0, 0.0));
            let pan = output.pan.unwrap();
            let tilt = output.tilt.unwrap();
            assert!((0.5..0.7).contains(&pan), "{}", pan);
            assert!((0.5..0.7).contains(&tilt), "{}", tilt);
            assert_eq!(output.gobo, None);
        }
    }
}
