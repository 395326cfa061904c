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

use std::f64::consts::TAU;

use crate::lighting::color::Color;
use crate::lighting::palette;
use crate::lighting::params::EffectParams;
use crate::lighting::tempo::BeatSnapshot;
use crate::lighting::types::{Axis, Position};

use super::SpatialEffect;

const DEFAULT_COLORS: [Color; 2] = [Color::BLUE, Color::MAGENTA];

/// A sine wave travelling along an axis, blended across a color list.
///
/// The wave value is `sin(2π·(p / wavelength - speed·t))`, remapped from
/// -1..1 onto the color stops.
///
/// Parameters:
/// - `axis` (x).
/// - `wavelength` (2.0): units per cycle. Non-positive values fall back to the default.
/// - `speed` (0.5): cycles per second.
/// - `colors` ([blue, magenta]): two or more stops, or a palette name.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wave3D;

#[derive(Debug, Clone)]
pub struct WaveContext {
    axis: Axis,
    inverse_wavelength: f64,
    phase: f64,
    colors: Vec<Color>,
}

impl SpatialEffect for Wave3D {
    type Context = WaveContext;

    fn id(&self) -> &'static str {
        "wave3d"
    }

    fn prepare(&self, params: &EffectParams, time: f64, _beat: &BeatSnapshot) -> WaveContext {
        let mut wavelength = params.float("wavelength", 2.0);
        if wavelength <= 0.0 {
            wavelength = 2.0;
        }
        let speed = params.float("speed", 0.5);
        let mut colors = params.colors("colors", &DEFAULT_COLORS);
        if colors.len() < 2 {
            colors.push(colors.first().copied().unwrap_or(Color::BLACK));
        }
        WaveContext {
            axis: params.axis("axis", Axis::X),
            inverse_wavelength: 1.0 / wavelength,
            // Reduced to one cycle so large times keep their precision.
            phase: (speed * time).rem_euclid(1.0),
            colors,
        }
    }

    fn compute(&self, position: Position, context: &WaveContext) -> Color {
        let cycles = position.along(context.axis) * context.inverse_wavelength - context.phase;
        let value = (TAU * cycles).sin();
        palette::sample(&context.colors, (value + 1.0) * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(params: &EffectParams, time: f64, x: f64) -> Color {
        let context = Wave3D.prepare(params, time, &BeatSnapshot::default());
        Wave3D.compute(Position::new(x, 0.0, 0.0), &context)
    }

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < 1e-9 && (a.g - b.g).abs() < 1e-9 && (a.b - b.b).abs() < 1e-9
    }

    #[test]
    fn test_wave_peaks_and_troughs() {
        let params = EffectParams::new()
            .with("wavelength", 4.0)
            .with("colors", vec![Color::BLACK, Color::WHITE]);
        // sin(2π·0.25) = 1 at x = 1, sin(2π·0.75) = -1 at x = 3.
        assert!(close(wave(&params, 0.0, 1.0), Color::WHITE));
        assert!(close(wave(&params, 0.0, 3.0), Color::BLACK));
        assert!(close(wave(&params, 0.0, 0.0), Color::gray(0.5)));
    }

    #[test]
    fn test_speed_shifts_phase() {
        let params = EffectParams::new()
            .with("wavelength", 4.0)
            .with("speed", 0.25)
            .with("colors", vec![Color::BLACK, Color::WHITE]);
        // After one second the peak has moved from x = 1 to x = 2.
        assert!(close(wave(&params, 1.0, 2.0), Color::WHITE));
        assert!(!close(wave(&params, 1.0, 1.0), Color::WHITE));

        let still = params.with("speed", 0.0);
        assert!(close(wave(&still, 1.0, 1.0), Color::WHITE));
    }

    #[test]
    fn test_single_color_list_is_padded() {
        let params = EffectParams::new().with("colors", Color::RED);
        for x in [0.0, 0.5, 1.0, 1.5] {
            assert_eq!(wave(&params, 0.3, x), Color::RED);
        }
    }

    #[test]
    fn test_bad_wavelength_falls_back() {
        let params = EffectParams::new().with("wavelength", 0.0);
        let fallback = EffectParams::new();
        assert_eq!(wave(&params, 0.7, 1.3), wave(&fallback, 0.7, 1.3));
    }
}
