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
pub mod color;
pub mod effects;
pub mod engine;
pub mod frame;
pub mod palette;
pub mod params;
pub mod stack;
pub mod tempo;
pub mod types;

// Re-export the main types for convenience
pub use color::Color;
pub use effects::EffectRegistry;
pub use engine::{EngineError, LightingEngine};
pub use frame::Frame;
pub use params::{EffectParams, ParamValue};
pub use stack::{EffectLayer, EffectStack, MovementLayer};
pub use tempo::BeatSnapshot;
pub use types::{BlendMode, Fixture3D, FixtureInfo, FixtureOutput, Position};
