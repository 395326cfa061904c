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

//! Effect contracts and the effect catalog.
//!
//! Every effect is evaluated in two phases. `prepare` runs once per layer per
//! frame and folds everything that depends on time and tempo into a context.
//! `compute` then runs once per fixture against that context; it must be pure,
//! constant time and must not allocate.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::color::{clamp_unit, Color};
use super::params::EffectParams;
use super::tempo::BeatSnapshot;
use super::types::{FixtureOutput, Position};

mod chase;
mod gobo;
mod gradient;
mod movement;
mod noise;
mod particle;
mod pulse;
mod random;
mod solid;
mod strobe;
mod wave;

#[cfg(test)]
mod tests;

pub use chase::Chase3D;
pub use gobo::{GoboBeatSync, GoboRotate};
pub use gradient::{GradientSweep3D, RainbowSweep3D};
pub use movement::{Circle, Follow, PositionHold, Sweep};
pub use noise::{perlin3, PerlinNoise3D};
pub use particle::{particle_direction, ParticleBurst3D, MAX_PARTICLES};
pub use pulse::RadialPulse3D;
pub use random::{hash64, unit_from_hash, RandomMovement};
pub use solid::SolidColor;
pub use strobe::Strobe;
pub use wave::Wave3D;

/// An effect that produces a color from a fixture position.
pub trait SpatialEffect: Send + Sync + 'static {
    /// Per-frame state shared by every fixture in the frame.
    type Context: Send + Sync + 'static;

    /// Registry id of this effect.
    fn id(&self) -> &'static str;

    fn prepare(&self, params: &EffectParams, time: f64, beat: &BeatSnapshot) -> Self::Context;

    fn compute(&self, position: Position, context: &Self::Context) -> Color;
}

/// An effect that drives some of a fixture's movement channels.
pub trait MovementEffect: Send + Sync + 'static {
    type Context: Send + Sync + 'static;

    fn id(&self) -> &'static str;

    fn prepare(&self, params: &EffectParams, time: f64, beat: &BeatSnapshot) -> Self::Context;

    fn compute_movement(&self, position: Position, context: &Self::Context) -> FixtureOutput;
}

/// A spatial effect bound to one frame's context.
pub trait PreparedSpatial {
    fn compute(&self, position: Position) -> Color;
}

/// A movement effect bound to one frame's context.
pub trait PreparedMovement {
    fn compute_movement(&self, position: Position) -> FixtureOutput;
}

/// Object-safe form of [`SpatialEffect`], so layers can hold any effect.
pub trait DynSpatialEffect: Send + Sync {
    fn effect_id(&self) -> &'static str;

    fn prepare_frame<'a>(
        &'a self,
        params: &EffectParams,
        time: f64,
        beat: &BeatSnapshot,
    ) -> Box<dyn PreparedSpatial + 'a>;
}

/// Object-safe form of [`MovementEffect`].
pub trait DynMovementEffect: Send + Sync {
    fn effect_id(&self) -> &'static str;

    fn prepare_frame<'a>(
        &'a self,
        params: &EffectParams,
        time: f64,
        beat: &BeatSnapshot,
    ) -> Box<dyn PreparedMovement + 'a>;
}

struct BoundSpatial<'a, E: SpatialEffect> {
    effect: &'a E,
    context: E::Context,
}

impl<E: SpatialEffect> PreparedSpatial for BoundSpatial<'_, E> {
    #[inline]
    fn compute(&self, position: Position) -> Color {
        SpatialEffect::compute(self.effect, position, &self.context)
    }
}

impl<E: SpatialEffect> DynSpatialEffect for E {
    fn effect_id(&self) -> &'static str {
        SpatialEffect::id(self)
    }

    fn prepare_frame<'a>(
        &'a self,
        params: &EffectParams,
        time: f64,
        beat: &BeatSnapshot,
    ) -> Box<dyn PreparedSpatial + 'a> {
        Box::new(BoundSpatial {
            effect: self,
            context: SpatialEffect::prepare(self, params, time, beat),
        })
    }
}

struct BoundMovement<'a, E: MovementEffect> {
    effect: &'a E,
    context: E::Context,
}

impl<E: MovementEffect> PreparedMovement for BoundMovement<'_, E> {
    #[inline]
    fn compute_movement(&self, position: Position) -> FixtureOutput {
        MovementEffect::compute_movement(self.effect, position, &self.context)
    }
}

impl<E: MovementEffect> DynMovementEffect for E {
    fn effect_id(&self) -> &'static str {
        MovementEffect::id(self)
    }

    fn prepare_frame<'a>(
        &'a self,
        params: &EffectParams,
        time: f64,
        beat: &BeatSnapshot,
    ) -> Box<dyn PreparedMovement + 'a> {
        Box::new(BoundMovement {
            effect: self,
            context: MovementEffect::prepare(self, params, time, beat),
        })
    }
}

type SpatialFactory = Box<dyn Fn() -> Arc<dyn DynSpatialEffect> + Send + Sync>;
type MovementFactory = Box<dyn Fn() -> Arc<dyn DynMovementEffect> + Send + Sync>;

/// Maps effect ids to constructors. Built once at startup and passed to
/// whatever needs to instantiate effects by name.
#[derive(Default)]
pub struct EffectRegistry {
    spatial: HashMap<String, SpatialFactory>,
    movement: HashMap<String, MovementFactory>,
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("spatial", &self.spatial_ids())
            .field("movement", &self.movement_ids())
            .finish()
    }
}

impl EffectRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in effect catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_spatial(Strobe);
        registry.register_spatial(SolidColor);
        registry.register_spatial(Chase3D);
        registry.register_spatial(Wave3D);
        registry.register_spatial(RadialPulse3D);
        registry.register_spatial(PerlinNoise3D);
        registry.register_spatial(ParticleBurst3D);
        registry.register_spatial(RainbowSweep3D);
        registry.register_spatial(GradientSweep3D);

        registry.register_movement(GoboBeatSync);
        registry.register_movement(GoboRotate);
        registry.register_movement(Sweep);
        registry.register_movement(Circle);
        registry.register_movement(Follow);
        registry.register_movement(RandomMovement);
        registry.register_movement(PositionHold);
        registry
    }

    /// Registers a spatial effect under its own id, replacing any previous entry.
    pub fn register_spatial<E: SpatialEffect + Clone>(&mut self, effect: E) {
        let id = SpatialEffect::id(&effect);
        self.register_spatial_factory(id, move || -> Arc<dyn DynSpatialEffect> {
            Arc::new(effect.clone())
        });
    }

    pub fn register_spatial_factory<F>(&mut self, id: &str, factory: F)
    where
        F: Fn() -> Arc<dyn DynSpatialEffect> + Send + Sync + 'static,
    {
        debug!(effect = id, "Registering spatial effect");
        self.spatial.insert(id.to_string(), Box::new(factory));
    }

    /// Registers a movement effect under its own id, replacing any previous entry.
    pub fn register_movement<E: MovementEffect + Clone>(&mut self, effect: E) {
        let id = MovementEffect::id(&effect);
        self.register_movement_factory(id, move || -> Arc<dyn DynMovementEffect> {
            Arc::new(effect.clone())
        });
    }

    pub fn register_movement_factory<F>(&mut self, id: &str, factory: F)
    where
        F: Fn() -> Arc<dyn DynMovementEffect> + Send + Sync + 'static,
    {
        debug!(effect = id, "Registering movement effect");
        self.movement.insert(id.to_string(), Box::new(factory));
    }

    pub fn spatial(&self, id: &str) -> Option<Arc<dyn DynSpatialEffect>> {
        self.spatial.get(id).map(|factory| factory())
    }

    pub fn movement(&self, id: &str) -> Option<Arc<dyn DynMovementEffect>> {
        self.movement.get(id).map(|factory| factory())
    }

    /// Sorted ids of the registered spatial effects.
    pub fn spatial_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.spatial.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Sorted ids of the registered movement effects.
    pub fn movement_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.movement.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// 1.0 at distance 0, falling linearly to 0.0 at `width`.
#[inline]
pub(crate) fn linear_falloff(distance: f64, width: f64) -> f64 {
    if width <= 0.0 || !width.is_finite() {
        return if distance.abs() <= f64::EPSILON { 1.0 } else { 0.0 };
    }
    clamp_unit(1.0 - distance.abs() / width)
}

/// Hermite smoothstep of `t` in 0.0 to 1.0.
#[inline]
pub(crate) fn smoothstep(t: f64) -> f64 {
    let t = clamp_unit(t);
    t * t * (3.0 - 2.0 * t)
}
