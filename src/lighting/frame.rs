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

use super::color::Color;
use super::effects::{PreparedMovement, PreparedSpatial};
use super::stack::EffectStack;
use super::tempo::BeatSnapshot;
use super::types::{BlendMode, FixtureOutput, Position};

struct ColorStep<'a> {
    prepared: Box<dyn PreparedSpatial + 'a>,
    blend_mode: BlendMode,
    opacity: f64,
}

struct MovementStep<'a> {
    prepared: Box<dyn PreparedMovement + 'a>,
    blend_mode: BlendMode,
}

/// A stack bound to one (time, beat) pair.
///
/// Every enabled layer has already been prepared, so evaluating a fixture
/// only runs the per-position part of each effect. Disabled layers are left
/// out entirely.
pub struct Frame<'a> {
    color: Vec<ColorStep<'a>>,
    movement: Vec<MovementStep<'a>>,
    master_dimmer: f64,
    time: f64,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(stack: &'a EffectStack, time: f64, beat: &BeatSnapshot) -> Self {
        let color = stack
            .layers()
            .iter()
            .filter(|layer| layer.is_enabled())
            .map(|layer| ColorStep {
                prepared: layer.effect().prepare_frame(layer.params(), time, beat),
                blend_mode: layer.blend_mode(),
                opacity: layer.opacity(),
            })
            .collect();
        let movement = stack
            .movement_layers()
            .iter()
            .filter(|layer| layer.is_enabled())
            .map(|layer| MovementStep {
                prepared: layer.effect().prepare_frame(layer.params(), time, beat),
                blend_mode: layer.blend_mode(),
            })
            .collect();

        Self {
            color,
            movement,
            master_dimmer: stack.master_dimmer(),
            time,
        }
    }

    /// Composes every color layer at `position`, then applies the master dimmer.
    pub fn evaluate_color(&self, position: Position) -> Color {
        let composed = self.color.iter().fold(Color::BLACK, |acc, step| {
            acc.blend(&step.prepared.compute(position), step.blend_mode, step.opacity)
        });
        composed.scale(self.master_dimmer).clamped()
    }

    /// Merges every movement layer at `position`. The dimmer does not apply.
    pub fn evaluate_movement(&self, position: Position) -> FixtureOutput {
        let mut output = FixtureOutput::EMPTY;
        for step in &self.movement {
            output.merge(&step.prepared.compute_movement(position), step.blend_mode);
        }
        output
    }

    pub fn evaluate_fixture_output(&self, position: Position) -> (Color, FixtureOutput) {
        (self.evaluate_color(position), self.evaluate_movement(position))
    }

    /// True when at least one enabled movement layer exists. Callers use this
    /// to skip movement work entirely.
    pub fn has_movement_layers(&self) -> bool {
        !self.movement.is_empty()
    }

    /// Number of enabled color layers in this frame.
    pub fn layer_count(&self) -> usize {
        self.color.len()
    }

    pub fn movement_layer_count(&self) -> usize {
        self.movement.len()
    }

    /// Time this frame was prepared for, in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }
}
