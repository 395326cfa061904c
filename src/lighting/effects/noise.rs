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

use crate::lighting::color::Color;
use crate::lighting::palette;
use crate::lighting::params::EffectParams;
use crate::lighting::tempo::BeatSnapshot;
use crate::lighting::types::Position;

use super::SpatialEffect;

const MAX_OCTAVES: i64 = 4;

/// Permutation table for the noise lattice, doubled to avoid index wrapping.
static PERMUTATION: [u8; 512] = build_permutation(0x5eed_c0de_1ab5_d00d);

/// Fisher-Yates shuffle of 0..=255 driven by xorshift64*.
const fn build_permutation(seed: u64) -> [u8; 512] {
    let mut base = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        base[i] = i as u8;
        i += 1;
    }

    let mut state = seed;
    let mut i = 255;
    while i > 0 {
        state ^= state >> 12;
        state ^= state << 25;
        state ^= state >> 27;
        let r = state.wrapping_mul(0x2545_f491_4f6c_dd1d);
        let j = (r % (i as u64 + 1)) as usize;
        let tmp = base[i];
        base[i] = base[j];
        base[j] = tmp;
        i -= 1;
    }

    let mut table = [0u8; 512];
    let mut k = 0;
    while k < 512 {
        table[k] = base[k & 255];
        k += 1;
    }
    table
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[inline]
fn lattice(v: f64) -> usize {
    (v as i64 & 255) as usize
}

/// Improved gradient noise. Continuous, deterministic and roughly in -1..1.
pub fn perlin3(x: f64, y: f64, z: f64) -> f64 {
    let (xf, yf, zf) = (x.floor(), y.floor(), z.floor());
    let (xi, yi, zi) = (lattice(xf), lattice(yf), lattice(zf));
    let (x, y, z) = (x - xf, y - yf, z - zf);
    let (u, v, w) = (fade(x), fade(y), fade(z));

    let p = &PERMUTATION;
    let a = p[xi] as usize + yi;
    let aa = p[a] as usize + zi;
    let ab = p[a + 1] as usize + zi;
    let b = p[xi + 1] as usize + yi;
    let ba = p[b] as usize + zi;
    let bb = p[b + 1] as usize + zi;

    lerp(
        w,
        lerp(
            v,
            lerp(u, grad(p[aa], x, y, z), grad(p[ba], x - 1.0, y, z)),
            lerp(
                u,
                grad(p[ab], x, y - 1.0, z),
                grad(p[bb], x - 1.0, y - 1.0, z),
            ),
        ),
        lerp(
            v,
            lerp(
                u,
                grad(p[aa + 1], x, y, z - 1.0),
                grad(p[ba + 1], x - 1.0, y, z - 1.0),
            ),
            lerp(
                u,
                grad(p[ab + 1], x, y - 1.0, z - 1.0),
                grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
            ),
        ),
    )
}

/// Coherent noise field drifting through the rig, mapped through a palette.
///
/// Sampled at `position·scale + speed·time` on each axis.
///
/// Parameters:
/// - `scale` (0.5): spatial frequency.
/// - `speed` (0.3): drift in noise units per second.
/// - `octaves` (1): layered octaves, 1 to 4.
/// - `colors` (the "ocean" palette).
#[derive(Debug, Clone, Copy, Default)]
pub struct PerlinNoise3D;

#[derive(Debug, Clone)]
pub struct NoiseContext {
    scale: f64,
    offset: f64,
    octaves: u32,
    colors: Vec<Color>,
}

impl SpatialEffect for PerlinNoise3D {
    type Context = NoiseContext;

    fn id(&self) -> &'static str {
        "perlin_noise3d"
    }

    fn prepare(&self, params: &EffectParams, time: f64, _beat: &BeatSnapshot) -> NoiseContext {
        let default_colors = palette::named("ocean").unwrap_or(&[]);
        NoiseContext {
            scale: params.float("scale", 0.5),
            offset: params.float("speed", 0.3) * time,
            octaves: params.int("octaves", 1).clamp(1, MAX_OCTAVES) as u32,
            colors: params.colors("colors", default_colors),
        }
    }

    fn compute(&self, position: Position, context: &NoiseContext) -> Color {
        let p = position.scale(context.scale);
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut norm = 0.0;
        for _ in 0..context.octaves {
            total += amplitude
                * perlin3(
                    p.x * frequency + context.offset,
                    p.y * frequency + context.offset,
                    p.z * frequency + context.offset,
                );
            norm += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        palette::sample(&context.colors, (total / norm) * 0.5 + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_is_a_permutation() {
        let mut seen = [false; 256];
        for &v in &PERMUTATION[..256] {
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(&PERMUTATION[..256], &PERMUTATION[256..]);
    }

    #[test]
    fn test_noise_is_zero_on_lattice() {
        assert_eq!(perlin3(0.0, 0.0, 0.0), 0.0);
        assert_eq!(perlin3(3.0, -7.0, 12.0), 0.0);
    }

    #[test]
    fn test_noise_is_bounded_and_continuous() {
        let mut x = -5.0;
        while x < 5.0 {
            let a = perlin3(x, x * 0.7, 1.3 - x);
            let b = perlin3(x + 1e-4, x * 0.7, 1.3 - x);
            assert!((-1.1..=1.1).contains(&a));
            assert!((a - b).abs() < 1e-2, "jump at {}", x);
            x += 0.037;
        }
    }

    #[test]
    fn test_colors_stay_in_palette_range() {
        let params = EffectParams::new()
            .with("colors", vec![Color::new(0.2, 0.2, 0.2), Color::new(0.6, 0.6, 0.6)])
            .with("octaves", 3_i64);
        for step in 0..50 {
            let t = step as f64 * 0.13;
            let context = PerlinNoise3D.prepare(&params, t, &BeatSnapshot::default());
            let c = PerlinNoise3D.compute(Position::new(t, -t, 2.0 * t), &context);
            assert!((0.2 - 1e-9..=0.6 + 1e-9).contains(&c.r), "{:?}", c);
        }
    }

    #[test]
    fn test_noise_varies_over_time() {
        let params = EffectParams::new();
        let position = Position::new(1.3, 0.4, 2.2);
        let first = PerlinNoise3D.prepare(&params, 0.0, &BeatSnapshot::default());
        let later = PerlinNoise3D.prepare(&params, 1.7, &BeatSnapshot::default());
        assert_ne!(
            PerlinNoise3D.compute(position, &first),
            PerlinNoise3D.compute(position, &later)
        );
    }
}
