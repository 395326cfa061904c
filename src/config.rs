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

//! YAML rig configuration: fixtures, layers and engine settings.

use std::path::Path;

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::lighting::{EffectRegistry, EffectStack, Fixture3D, LightingEngine};

mod error;
mod fixture;
mod layer;

pub use error::ConfigError;
pub use fixture::Fixture;
pub use layer::{Layer, ParamSpec};

/// The default frame rate of the simulate loop.
pub const DEFAULT_FPS: f64 = 44.0;

/// The default tempo of the free-running clock.
pub const DEFAULT_BPM: f64 = 120.0;

/// A YAML representation of the engine settings.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Engine {
    /// Frames per second.
    fps: Option<f64>,

    /// Tempo of the free-running beat clock.
    bpm: Option<f64>,

    /// Initial master dimmer, 0.0 to 1.0.
    master_dimmer: Option<f64>,
}

impl Engine {
    /// Gets the frame rate, falling back to the default when it isn't positive.
    pub fn fps(&self) -> f64 {
        match self.fps {
            Some(fps) if fps.is_finite() && fps > 0.0 => fps,
            Some(fps) => {
                warn!(fps, "Invalid frame rate, using default");
                DEFAULT_FPS
            }
            None => DEFAULT_FPS,
        }
    }

    /// Gets the tempo, falling back to the default when it isn't positive.
    pub fn bpm(&self) -> f64 {
        match self.bpm {
            Some(bpm) if bpm.is_finite() && bpm > 0.0 => bpm,
            Some(bpm) => {
                warn!(bpm, "Invalid tempo, using default");
                DEFAULT_BPM
            }
            None => DEFAULT_BPM,
        }
    }

    pub fn master_dimmer(&self) -> f64 {
        self.master_dimmer.unwrap_or(1.0)
    }
}

/// A YAML representation of a whole rig.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Rig {
    /// Engine settings.
    #[serde(default)]
    engine: Engine,

    /// The fixtures, in output order.
    fixtures: Vec<Fixture>,

    /// Color layers, bottom to top.
    #[serde(default)]
    layers: Vec<Layer>,

    /// Movement layers, bottom to top.
    #[serde(default)]
    movement: Vec<Layer>,
}

impl Rig {
    /// Deserializes a file from the path into a rig configuration.
    pub fn deserialize(path: &Path) -> Result<Rig, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Rig>()?)
    }

    /// Parses a rig configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Rig, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize::<Rig>()?)
    }

    /// Serializes the configuration back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yml::to_string(self)?)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn fixture_configs(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn movement(&self) -> &[Layer] {
        &self.movement
    }

    /// Converts the fixture configurations into placed fixtures.
    pub fn fixtures(&self) -> Result<Vec<Fixture3D>, ConfigError> {
        self.fixtures.iter().map(Fixture::to_fixture).collect()
    }

    /// Builds the layer stack, resolving effect ids through the registry.
    pub fn build_stack(&self, registry: &EffectRegistry) -> Result<EffectStack, ConfigError> {
        let mut stack = EffectStack::new();
        for (index, layer) in self.layers.iter().enumerate() {
            stack.add_layer(layer.to_layer(registry, index)?);
        }
        for (index, layer) in self.movement.iter().enumerate() {
            stack.add_movement_layer(layer.to_movement_layer(registry, index)?);
        }
        stack.set_master_dimmer(self.engine.master_dimmer());
        Ok(stack)
    }

    /// Builds a ready-to-tick engine.
    pub fn build_engine(&self, registry: &EffectRegistry) -> Result<LightingEngine, ConfigError> {
        let fixtures = self.fixtures()?;
        let stack = self.build_stack(registry)?;
        info!(
            fixtures = fixtures.len(),
            layers = stack.layer_count(),
            movement_layers = stack.movement_layer_count(),
            "Rig loaded"
        );
        Ok(LightingEngine::new(fixtures, stack)?)
    }
}
