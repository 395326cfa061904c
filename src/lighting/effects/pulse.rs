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
use crate::lighting::params::EffectParams;
use crate::lighting::tempo::BeatSnapshot;
use crate::lighting::types::Position;

use super::{linear_falloff, SpatialEffect};

/// An expanding spherical shell.
///
/// The shell radius grows at `speed` units per second from the center and
/// stops at `maxRadius`, or restarts from zero when `repeat` is set. Fixtures
/// on the shell are at full brightness, falling linearly to zero `width`
/// units either side of it.
///
/// Parameters:
/// - `centerX`, `centerY`, `centerZ` (0.0).
/// - `speed` (2.0): units per second.
/// - `maxRadius` (10.0).
/// - `width` (1.0).
/// - `repeat` (false).
/// - `color` (white).
#[derive(Debug, Clone, Copy, Default)]
pub struct RadialPulse3D;

#[derive(Debug, Clone, Copy)]
pub struct PulseContext {
    center: Position,
    radius: f64,
    width: f64,
    color: Color,
}

impl PulseContext {
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl SpatialEffect for RadialPulse3D {
    type Context = PulseContext;

    fn id(&self) -> &'static str {
        "radial_pulse3d"
    }

    fn prepare(&self, params: &EffectParams, time: f64, _beat: &BeatSnapshot) -> PulseContext {
        let speed = params.float("speed", 2.0);
        let max_radius = params.float("maxRadius", 10.0).max(0.0);
        let travelled = (speed * time).max(0.0);
        let radius = if params.bool("repeat", false) && max_radius > 0.0 {
            travelled.rem_euclid(max_radius)
        } else {
            travelled.min(max_radius)
        };
        PulseContext {
            center: Position::new(
                params.float("centerX", 0.0),
                params.float("centerY", 0.0),
                params.float("centerZ", 0.0),
            ),
            radius,
            width: params.float("width", 1.0).max(0.0),
            color: params.color("color", Color::WHITE),
        }
    }

    fn compute(&self, position: Position, context: &PulseContext) -> Color {
        let offset = position.distance(&context.center) - context.radius;
        context.color.scale(linear_falloff(offset, context.width)).clamped()
    }
}
