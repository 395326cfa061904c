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

//! Layer stack: ordered color and movement layers plus the master dimmer.
//!
//! Index-based mutations ignore indices that are out of range and report it
//! through their return value. Control code holding a stale index must never
//! take the show down.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::color::{clamp_unit, Color};
use super::effects::{DynMovementEffect, DynSpatialEffect};
use super::frame::Frame;
use super::params::EffectParams;
use super::tempo::BeatSnapshot;
use super::types::{BlendMode, FixtureOutput, Position};

/// A spatial effect with its parameters and compositing state.
#[derive(Clone)]
pub struct EffectLayer {
    effect: Arc<dyn DynSpatialEffect>,
    params: EffectParams,
    blend_mode: BlendMode,
    opacity: f64,
    enabled: bool,
}

impl EffectLayer {
    /// Creates an enabled, fully opaque layer with normal blending.
    pub fn new(effect: Arc<dyn DynSpatialEffect>, params: EffectParams) -> Self {
        Self {
            effect,
            params,
            blend_mode: BlendMode::Normal,
            opacity: 1.0,
            enabled: true,
        }
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = clamp_unit(opacity);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn effect(&self) -> &Arc<dyn DynSpatialEffect> {
        &self.effect
    }

    pub fn effect_id(&self) -> &'static str {
        self.effect.effect_id()
    }

    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Opacity in 0.0 to 1.0.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl fmt::Debug for EffectLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectLayer")
            .field("effect", &self.effect_id())
            .field("params", &self.params)
            .field("blend_mode", &self.blend_mode)
            .field("opacity", &self.opacity)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// A movement effect with its parameters. Movement has no opacity.
#[derive(Clone)]
pub struct MovementLayer {
    effect: Arc<dyn DynMovementEffect>,
    params: EffectParams,
    blend_mode: BlendMode,
    enabled: bool,
}

impl MovementLayer {
    pub fn new(effect: Arc<dyn DynMovementEffect>, params: EffectParams) -> Self {
        Self {
            effect,
            params,
            blend_mode: BlendMode::Normal,
            enabled: true,
        }
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn effect(&self) -> &Arc<dyn DynMovementEffect> {
        &self.effect
    }

    pub fn effect_id(&self) -> &'static str {
        self.effect.effect_id()
    }

    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl fmt::Debug for MovementLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovementLayer")
            .field("effect", &self.effect_id())
            .field("params", &self.params)
            .field("blend_mode", &self.blend_mode)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Ordered color layers (bottom to top), ordered movement layers and a master
/// dimmer.
#[derive(Debug, Clone)]
pub struct EffectStack {
    layers: Vec<EffectLayer>,
    movement_layers: Vec<MovementLayer>,
    master_dimmer: f64,
}

impl Default for EffectStack {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectStack {
    /// Creates an empty stack with the dimmer at full.
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            movement_layers: Vec::new(),
            master_dimmer: 1.0,
        }
    }

    pub fn layers(&self) -> &[EffectLayer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&EffectLayer> {
        self.layers.get(index)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn movement_layers(&self) -> &[MovementLayer] {
        &self.movement_layers
    }

    pub fn movement_layer(&self, index: usize) -> Option<&MovementLayer> {
        self.movement_layers.get(index)
    }

    pub fn movement_layer_count(&self) -> usize {
        self.movement_layers.len()
    }

    pub fn master_dimmer(&self) -> f64 {
        self.master_dimmer
    }

    /// Sets the master dimmer, clamped to 0.0 to 1.0. NaN turns the rig off.
    pub fn set_master_dimmer(&mut self, value: f64) {
        self.master_dimmer = clamp_unit(value);
        debug!(master_dimmer = self.master_dimmer, "Master dimmer set");
    }

    /// Appends a color layer on top of the stack and returns its index.
    pub fn add_layer(&mut self, layer: EffectLayer) -> usize {
        debug!(effect = layer.effect_id(), "Adding layer");
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Inserts a color layer at `index`. An index past the end is a no-op.
    pub fn insert_layer(&mut self, index: usize, layer: EffectLayer) -> bool {
        if index > self.layers.len() {
            debug!(index, "Ignoring layer insert past the end of the stack");
            return false;
        }
        debug!(effect = layer.effect_id(), index, "Inserting layer");
        self.layers.insert(index, layer);
        true
    }

    /// Removes and returns the color layer at `index`, if there is one.
    pub fn remove_layer(&mut self, index: usize) -> Option<EffectLayer> {
        if index >= self.layers.len() {
            debug!(index, "Ignoring removal of missing layer");
            return None;
        }
        let layer = self.layers.remove(index);
        debug!(effect = layer.effect_id(), index, "Removed layer");
        Some(layer)
    }

    /// Moves the color layer at `from` so that it ends up at `to`.
    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.layers, from, to)
    }

    pub fn clear_layers(&mut self) {
        debug!(count = self.layers.len(), "Clearing layers");
        self.layers.clear();
    }

    /// Sets a color layer's opacity, clamped to 0.0 to 1.0.
    pub fn set_opacity(&mut self, index: usize, opacity: f64) -> bool {
        self.update_layer(index, |layer| layer.opacity = clamp_unit(opacity))
    }

    pub fn set_blend_mode(&mut self, index: usize, blend_mode: BlendMode) -> bool {
        self.update_layer(index, |layer| layer.blend_mode = blend_mode)
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        self.update_layer(index, |layer| layer.enabled = enabled)
    }

    /// Flips a color layer's enabled flag and returns the new state.
    pub fn toggle_enabled(&mut self, index: usize) -> Option<bool> {
        let layer = self.layers.get_mut(index)?;
        layer.enabled = !layer.enabled;
        debug!(index, enabled = layer.enabled, "Toggled layer");
        Some(layer.enabled)
    }

    /// Replaces a color layer's parameters.
    pub fn set_params(&mut self, index: usize, params: EffectParams) -> bool {
        self.update_layer(index, |layer| layer.params = params)
    }

    fn update_layer(&mut self, index: usize, f: impl FnOnce(&mut EffectLayer)) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                f(layer);
                debug!(index, "Updated layer");
                true
            }
            None => {
                debug!(index, "Ignoring update of missing layer");
                false
            }
        }
    }

    /// Appends a movement layer and returns its index.
    pub fn add_movement_layer(&mut self, layer: MovementLayer) -> usize {
        debug!(effect = layer.effect_id(), "Adding movement layer");
        self.movement_layers.push(layer);
        self.movement_layers.len() - 1
    }

    pub fn insert_movement_layer(&mut self, index: usize, layer: MovementLayer) -> bool {
        if index > self.movement_layers.len() {
            debug!(index, "Ignoring movement layer insert past the end");
            return false;
        }
        debug!(effect = layer.effect_id(), index, "Inserting movement layer");
        self.movement_layers.insert(index, layer);
        true
    }

    pub fn remove_movement_layer(&mut self, index: usize) -> Option<MovementLayer> {
        if index >= self.movement_layers.len() {
            debug!(index, "Ignoring removal of missing movement layer");
            return None;
        }
        Some(self.movement_layers.remove(index))
    }

    pub fn move_movement_layer(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.movement_layers, from, to)
    }

    pub fn clear_movement_layers(&mut self) {
        debug!(count = self.movement_layers.len(), "Clearing movement layers");
        self.movement_layers.clear();
    }

    pub fn set_movement_blend_mode(&mut self, index: usize, blend_mode: BlendMode) -> bool {
        self.update_movement_layer(index, |layer| layer.blend_mode = blend_mode)
    }

    pub fn set_movement_enabled(&mut self, index: usize, enabled: bool) -> bool {
        self.update_movement_layer(index, |layer| layer.enabled = enabled)
    }

    pub fn toggle_movement_enabled(&mut self, index: usize) -> Option<bool> {
        let layer = self.movement_layers.get_mut(index)?;
        layer.enabled = !layer.enabled;
        Some(layer.enabled)
    }

    pub fn set_movement_params(&mut self, index: usize, params: EffectParams) -> bool {
        self.update_movement_layer(index, |layer| layer.params = params)
    }

    fn update_movement_layer(&mut self, index: usize, f: impl FnOnce(&mut MovementLayer)) -> bool {
        match self.movement_layers.get_mut(index) {
            Some(layer) => {
                f(layer);
                true
            }
            None => {
                debug!(index, "Ignoring update of missing movement layer");
                false
            }
        }
    }

    /// Prepares every enabled layer for one (time, beat) pair.
    pub fn build_frame(&self, time: f64, beat: &BeatSnapshot) -> Frame<'_> {
        Frame::new(self, time, beat)
    }

    /// Composes the color for a single position. Prefer [`Self::build_frame`]
    /// when evaluating more than one fixture.
    pub fn evaluate(&self, position: Position, time: f64, beat: &BeatSnapshot) -> Color {
        self.build_frame(time, beat).evaluate_color(position)
    }

    /// Composes the movement for a single position.
    pub fn evaluate_movement(
        &self,
        position: Position,
        time: f64,
        beat: &BeatSnapshot,
    ) -> FixtureOutput {
        self.build_frame(time, beat).evaluate_movement(position)
    }
}

fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        debug!(from, to, len = items.len(), "Ignoring out of range layer move");
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}
