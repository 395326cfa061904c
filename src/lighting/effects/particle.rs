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

use crate::lighting::color::{clamp_unit, Color};
use crate::lighting::params::EffectParams;
use crate::lighting::tempo::BeatSnapshot;
use crate::lighting::types::Position;

use super::{linear_falloff, SpatialEffect};

/// Upper bound on particles per burst.
pub const MAX_PARTICLES: usize = 256;

/// Golden angle in radians, used to spread directions over the sphere.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Direction of particle `index` in a burst of `count` particles.
///
/// Directions lie on a Fibonacci sphere: unit length, evenly spread and
/// pairwise distinct. `index` wraps modulo `count`; a count of 0 is treated as 1.
pub fn particle_direction(index: usize, count: usize) -> Position {
    let count = count.max(1);
    let index = index % count;
    let y = 1.0 - 2.0 * (index as f64 + 0.5) / count as f64;
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let theta = GOLDEN_ANGLE * index as f64;
    Position::new(ring * theta.cos(), y, ring * theta.sin())
}

/// A burst of particles flying out from a center and fading away.
///
/// Each fixture takes the brightest contribution of any particle, using a
/// quadratic falloff over `size`, scaled by the remaining life of the burst.
///
/// Parameters:
/// - `count` (12): particles, 1 to 256.
/// - `speed` (2.0): units per second.
/// - `fade` (2.0): burst lifetime in seconds.
/// - `size` (0.75): falloff radius around each particle.
/// - `centerX`, `centerY`, `centerZ` (0.0).
/// - `repeat` (false): start a new burst every `fade` seconds.
/// - `color` (white).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticleBurst3D;

#[derive(Debug, Clone)]
pub struct BurstContext {
    particles: Vec<Position>,
    size: f64,
    life: f64,
    color: Color,
}

impl BurstContext {
    pub fn particles(&self) -> &[Position] {
        &self.particles
    }

    /// Remaining life of the burst, 1.0 at emission down to 0.0.
    pub fn life(&self) -> f64 {
        self.life
    }
}

impl SpatialEffect for ParticleBurst3D {
    type Context = BurstContext;

    fn id(&self) -> &'static str {
        "particle_burst3d"
    }

    fn prepare(&self, params: &EffectParams, time: f64, _beat: &BeatSnapshot) -> BurstContext {
        let count = params.int("count", 12).clamp(1, MAX_PARTICLES as i64) as usize;
        let speed = params.float("speed", 2.0);
        let mut fade = params.float("fade", 2.0);
        if fade <= 0.0 {
            fade = 2.0;
        }
        let age = if params.bool("repeat", false) {
            time.rem_euclid(fade)
        } else {
            time.max(0.0)
        };
        let center = Position::new(
            params.float("centerX", 0.0),
            params.float("centerY", 0.0),
            params.float("centerZ", 0.0),
        );
        let travelled = speed * age;
        let particles = (0..count)
            .map(|i| center + particle_direction(i, count).scale(travelled))
            .collect();

        BurstContext {
            particles,
            size: params.float("size", 0.75).max(0.0),
            life: clamp_unit(1.0 - age / fade),
            color: params.color("color", Color::WHITE),
        }
    }

    fn compute(&self, position: Position, context: &BurstContext) -> Color {
        if context.life <= 0.0 {
            return Color::BLACK;
        }
        let mut brightest: f64 = 0.0;
        for particle in &context.particles {
            let falloff = linear_falloff(position.distance(particle), context.size);
            brightest = brightest.max(falloff * falloff);
        }
        context.color.scale(brightest * context.life).clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_are_unit_and_distinct() {
        for count in [1, 2, 3, 7, 12, 64, MAX_PARTICLES] {
            let directions: Vec<Position> =
                (0..count).map(|i| particle_direction(i, count)).collect();
            for d in &directions {
                assert!((d.length() - 1.0).abs() < 1e-9);
            }
            for i in 0..count {
                for j in (i + 1)..count {
                    assert!(
                        directions[i].distance(&directions[j]) > 1e-3,
                        "count {} directions {} and {} coincide",
                        count,
                        i,
                        j
                    );
                }
            }
        }
    }

    #[test]
    fn test_direction_index_wraps() {
        assert_eq!(particle_direction(13, 12), particle_direction(1, 12));
        assert_eq!(particle_direction(0, 0), particle_direction(0, 1));
    }

    #[test]
    fn test_particles_travel_outward() {
        let params = EffectParams::new().with("count", 6_i64).with("speed", 1.0);
        let context = ParticleBurst3D.prepare(&params, 0.5, &BeatSnapshot::default());
        assert_eq!(context.particles().len(), 6);
        for particle in context.particles() {
            assert!((particle.length() - 0.5).abs() < 1e-9);
        }
        assert!((context.life() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_brightness_follows_particles_and_fades() {
        let params = EffectParams::new().with("count", 1_i64).with("speed", 1.0);
        // A single particle travels along +x.
        let early = ParticleBurst3D.prepare(&params, 0.5, &BeatSnapshot::default());
        let on_particle = ParticleBurst3D.compute(Position::new(0.5, 0.0, 0.0), &early);
        let far_away = ParticleBurst3D.compute(Position::new(-3.0, 0.0, 0.0), &early);
        assert!((on_particle.r - 0.75).abs() < 1e-9);
        assert_eq!(far_away, Color::BLACK);

        let late = ParticleBurst3D.prepare(&params, 1.5, &BeatSnapshot::default());
        let later_on_particle = ParticleBurst3D.compute(Position::new(1.5, 0.0, 0.0), &late);
        assert!(later_on_particle.r < on_particle.r);

        let dead = ParticleBurst3D.prepare(&params, 5.0, &BeatSnapshot::default());
        assert_eq!(ParticleBurst3D.compute(Position::new(5.0, 0.0, 0.0), &dead), Color::BLACK);
    }

    #[test]
    fn test_repeat_restarts_burst() {
        let params = EffectParams::new().with("repeat", true).with("fade", 1.0);
        let context = ParticleBurst3D.prepare(&params, 3.25, &BeatSnapshot::default());
        assert!((context.life() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_count_is_clamped() {
        let params = EffectParams::new().with("count", 100_000_i64);
        let context = ParticleBurst3D.prepare(&params, 0.0, &BeatSnapshot::default());
        assert_eq!(context.particles().len(), MAX_PARTICLES);

        let params = EffectParams::new().with("count", -4_i64);
        let context = ParticleBurst3D.prepare(&params, 0.0, &BeatSnapshot::default());
        assert_eq!(context.particles().len(), 1);
    }
}
