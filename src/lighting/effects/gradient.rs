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
use crate::lighting::types::{Axis, Position};

use super::SpatialEffect;

/// A hue rotation laid out along an axis and scrolling over time.
///
/// Parameters:
/// - `axis` (x).
/// - `wavelength` (4.0): units per full hue cycle.
/// - `speed` (0.25): hue cycles per second.
/// - `saturation` (1.0), `brightness` (1.0).
#[derive(Debug, Clone, Copy, Default)]
pub struct RainbowSweep3D;

#[derive(Debug, Clone, Copy)]
pub struct RainbowContext {
    axis: Axis,
    inverse_wavelength: f64,
    offset: f64,
    saturation: f64,
    brightness: f64,
}

impl SpatialEffect for RainbowSweep3D {
    type Context = RainbowContext;

    fn id(&self) -> &'static str {
        "rainbow3d"
    }

    fn prepare(&self, params: &EffectParams, time: f64, _beat: &BeatSnapshot) -> RainbowContext {
        let wavelength = params.float("wavelength", 4.0);
        RainbowContext {
            axis: params.axis("axis", Axis::X),
            inverse_wavelength: if wavelength > 0.0 { 1.0 / wavelength } else { 0.0 },
            offset: (params.float("speed", 0.25) * time).rem_euclid(1.0),
            saturation: params.float("saturation", 1.0),
            brightness: params.float("brightness", 1.0),
        }
    }

    fn compute(&self, position: Position, context: &RainbowContext) -> Color {
        let cycle = position.along(context.axis) * context.inverse_wavelength + context.offset;
        let hue = cycle.rem_euclid(1.0) * 360.0;
        Color::from_hsv(hue, context.saturation, context.brightness).clamped()
    }
}

/// A color gradient stretched between two points on an axis.
///
/// Parameters:
/// - `axis` (x).
/// - `min` (0.0), `max` (10.0): axis span covered by the gradient.
/// - `speed` (0.0): gradient lengths scrolled per second.
/// - `wrap` (false): repeat the gradient instead of holding the end colors.
/// - `colors` ([red, blue]): stops, or a palette name.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientSweep3D;

#[derive(Debug, Clone)]
pub struct GradientContext {
    axis: Axis,
    min: f64,
    inverse_span: f64,
    offset: f64,
    wrap: bool,
    colors: Vec<Color>,
}

impl SpatialEffect for GradientSweep3D {
    type Context = GradientContext;

    fn id(&self) -> &'static str {
        "gradient3d"
    }

    fn prepare(&self, params: &EffectParams, time: f64, _beat: &BeatSnapshot) -> GradientContext {
        let min = params.float("min", 0.0);
        let max = params.float("max", 10.0);
        let span = max - min;
        GradientContext {
            axis: params.axis("axis", Axis::X),
            min,
            inverse_span: if span.abs() > f64::EPSILON { 1.0 / span } else { 0.0 },
            offset: params.float("speed", 0.0) * time,
            wrap: params.bool("wrap", false),
            colors: params.colors("colors", &[Color::RED, Color::BLUE]),
        }
    }

    fn compute(&self, position: Position, context: &GradientContext) -> Color {
        let t = (position.along(context.axis) - context.min) * context.inverse_span + context.offset;
        if context.wrap {
            palette::sample_cyclic(&context.colors, t)
        } else {
            palette::sample(&context.colors, t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rainbow_spreads_hue_along_axis() {
        let params = EffectParams::new().with("speed", 0.0).with("wavelength", 3.0);
        let context = RainbowSweep3D.prepare(&params, 0.0, &BeatSnapshot::default());
        let red = RainbowSweep3D.compute(Position::new(0.0, 0.0, 0.0), &context);
        let green = RainbowSweep3D.compute(Position::new(1.0, 0.0, 0.0), &context);
        let wrapped = RainbowSweep3D.compute(Position::new(3.0, 0.0, 0.0), &context);
        assert_eq!(red, Color::RED);
        assert!(green.g > 0.99 && green.r < 0.01);
        assert!((wrapped.r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rainbow_scrolls() {
        let params = EffectParams::new();
        let a = RainbowSweep3D.prepare(&params, 0.0, &BeatSnapshot::default());
        let b = RainbowSweep3D.prepare(&params, 1.0, &BeatSnapshot::default());
        assert_ne!(
            RainbowSweep3D.compute(Position::ORIGIN, &a),
            RainbowSweep3D.compute(Position::ORIGIN, &b)
        );
    }

    #[test]
    fn test_gradient_span() {
        let params = EffectParams::new().with("min", 2.0).with("max", 4.0);
        let context = GradientSweep3D.prepare(&params, 0.0, &BeatSnapshot::default());
        assert_eq!(GradientSweep3D.compute(Position::new(0.0, 0.0, 0.0), &context), Color::RED);
        assert_eq!(
            GradientSweep3D.compute(Position::new(3.0, 0.0, 0.0), &context),
            Color::new(0.5, 0.0, 0.5)
        );
        assert_eq!(GradientSweep3D.compute(Position::new(9.0, 0.0, 0.0), &context), Color::BLUE);
    }

    #[test]
    fn test_gradient_wraps() {
        let params = EffectParams::new()
            .with("min", 0.0)
            .with("max", 1.0)
            .with("wrap", true);
        let context = GradientSweep3D.prepare(&params, 0.0, &BeatSnapshot::default());
        assert_eq!(
            GradientSweep3D.compute(Position::new(1.0, 0.0, 0.0), &context),
            GradientSweep3D.compute(Position::new(0.0, 0.0, 0.0), &context)
        );
    }

    #[test]
    fn test_degenerate_span() {
        let params = EffectParams::new().with("min", 1.0).with("max", 1.0);
        let context = GradientSweep3D.prepare(&params, 0.0, &BeatSnapshot::default());
        assert_eq!(GradientSweep3D.compute(Position::new(5.0, 0.0, 0.0), &context), Color::RED);
    }
}
