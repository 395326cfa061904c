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
use crate::lighting::types::{Axis, Position};

use super::{linear_falloff, smoothstep, SpatialEffect};

/// A bright head travelling along an axis, trailing a fading tail.
///
/// The head starts at the axis origin at time 0 and moves at `speed` units
/// per second. Fixtures at the head are at full brightness; brightness falls
/// to zero `tail` units behind it. Fixtures ahead of the head are dark.
///
/// Parameters:
/// - `axis` (x): `x`, `y` or `z`.
/// - `speed` (1.0): units per second, negative runs backwards.
/// - `tail` (1.0): tail length in units.
/// - `length` (0.0): when positive, the head wraps back to the origin after
///   travelling this far.
/// - `smooth` (false): smoothstep the tail instead of a linear ramp.
/// - `color` (white).
#[derive(Debug, Clone, Copy, Default)]
pub struct Chase3D;

#[derive(Debug, Clone, Copy)]
pub struct ChaseContext {
    axis: Axis,
    head: f64,
    direction: f64,
    tail: f64,
    smooth: bool,
    color: Color,
}

impl ChaseContext {
    /// Position of the head along the chase axis.
    pub fn head(&self) -> f64 {
        self.head
    }
}

impl SpatialEffect for Chase3D {
    type Context = ChaseContext;

    fn id(&self) -> &'static str {
        "chase3d"
    }

    fn prepare(&self, params: &EffectParams, time: f64, _beat: &BeatSnapshot) -> ChaseContext {
        let speed = params.float("speed", 1.0);
        let length = params.float("length", 0.0);
        let mut head = speed * time;
        if length > 0.0 {
            head = head.rem_euclid(length);
        }
        ChaseContext {
            axis: params.axis("axis", Axis::X),
            head,
            direction: if speed < 0.0 { -1.0 } else { 1.0 },
            tail: params.float("tail", 1.0).max(0.0),
            smooth: params.bool("smooth", false),
            color: params.color("color", Color::WHITE),
        }
    }

    fn compute(&self, position: Position, context: &ChaseContext) -> Color {
        // Distance behind the head, in the direction of travel.
        let behind = (context.head - position.along(context.axis)) * context.direction;
        if behind < 0.0 {
            return Color::BLACK;
        }
        let mut brightness = linear_falloff(behind, context.tail);
        if context.smooth {
            brightness = smoothstep(brightness);
        }
        context.color.scale(brightness).clamped()
    }
}
