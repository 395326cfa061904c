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

use super::SpatialEffect;

/// A single static color everywhere. Parameter `color` (white).
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidColor;

impl SpatialEffect for SolidColor {
    type Context = Color;

    fn id(&self) -> &'static str {
        "solid"
    }

    fn prepare(&self, params: &EffectParams, _time: f64, _beat: &BeatSnapshot) -> Color {
        params.color("color", Color::WHITE).clamped()
    }

    fn compute(&self, _position: Position, context: &Color) -> Color {
        *context
    }
}
