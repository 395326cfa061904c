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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ConfigError;
use crate::lighting::{
    BlendMode, Color, EffectLayer, EffectParams, EffectRegistry, MovementLayer, ParamValue,
};

/// A YAML representation of an effect parameter.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ParamSpec {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Rgb { r: f64, g: f64, b: f64 },
    /// A list of colors, each a name, a hex string or an rgb map.
    List(Vec<ParamSpec>),
}

impl ParamSpec {
    fn to_value(&self, key: &str) -> Result<ParamValue, ConfigError> {
        Ok(match self {
            ParamSpec::Bool(v) => ParamValue::Bool(*v),
            ParamSpec::Int(v) => ParamValue::Int(*v),
            ParamSpec::Float(v) => ParamValue::Float(*v),
            ParamSpec::Text(v) => ParamValue::Text(v.clone()),
            ParamSpec::Rgb { r, g, b } => ParamValue::Color(Color::new(*r, *g, *b)),
            ParamSpec::List(items) => ParamValue::Colors(
                items
                    .iter()
                    .map(|item| item.to_color(key))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }

    fn to_color(&self, key: &str) -> Result<Color, ConfigError> {
        let invalid = |value: String| ConfigError::InvalidColor {
            key: key.to_string(),
            value,
        };
        match self {
            ParamSpec::Rgb { r, g, b } => Ok(Color::new(*r, *g, *b)),
            ParamSpec::Text(text) => Color::from_name(text)
                .or_else(|| Color::from_hex(text).ok())
                .ok_or_else(|| invalid(text.clone())),
            other => Err(invalid(format!("{:?}", other))),
        }
    }
}

/// A YAML representation of a color or movement layer.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Layer {
    /// Registry id of the effect.
    effect: String,

    /// Blend mode. Defaults to normal.
    blend: Option<BlendMode>,

    /// Opacity, 0.0 to 1.0. Color layers only.
    opacity: Option<f64>,

    /// Whether the layer starts enabled. Defaults to true.
    enabled: Option<bool>,

    /// Effect parameters. Missing keys use the effect's defaults.
    params: Option<HashMap<String, ParamSpec>>,
}

impl Layer {
    /// Creates a new layer configuration.
    pub fn new(effect: &str, params: HashMap<String, ParamSpec>) -> Layer {
        Layer {
            effect: effect.to_string(),
            blend: None,
            opacity: None,
            enabled: None,
            params: Some(params),
        }
    }

    /// Gets the effect id.
    pub fn effect(&self) -> &str {
        &self.effect
    }

    pub fn blend(&self) -> BlendMode {
        self.blend.unwrap_or_default()
    }

    /// Gets the opacity. Out of range values are clamped by the stack.
    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }

    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Converts the parameters into effect parameters.
    pub fn params(&self) -> Result<EffectParams, ConfigError> {
        let mut values = HashMap::new();
        if let Some(params) = &self.params {
            for (key, spec) in params {
                values.insert(key.clone(), spec.to_value(key)?);
            }
        }
        Ok(EffectParams::from_map(values))
    }

    /// Builds a color layer, looking the effect up in the registry.
    pub(crate) fn to_layer(
        &self,
        registry: &EffectRegistry,
        index: usize,
    ) -> Result<EffectLayer, ConfigError> {
        let effect = registry
            .spatial(&self.effect)
            .ok_or_else(|| ConfigError::UnknownEffect {
                kind: "color",
                id: self.effect.clone(),
                index,
            })?;
        let opacity = self.opacity();
        if !(0.0..=1.0).contains(&opacity) {
            warn!(layer = index, opacity, "Layer opacity out of range, clamping");
        }
        Ok(EffectLayer::new(effect, self.params()?)
            .with_blend_mode(self.blend())
            .with_opacity(opacity)
            .with_enabled(self.enabled()))
    }

    /// Builds a movement layer, looking the effect up in the registry.
    pub(crate) fn to_movement_layer(
        &self,
        registry: &EffectRegistry,
        index: usize,
    ) -> Result<MovementLayer, ConfigError> {
        let effect = registry
            .movement(&self.effect)
            .ok_or_else(|| ConfigError::UnknownEffect {
                kind: "movement",
                id: self.effect.clone(),
                index,
            })?;
        if self.opacity.is_some() {
            warn!(layer = index, "Movement layers have no opacity, ignoring it");
        }
        Ok(MovementLayer::new(effect, self.params()?)
            .with_blend_mode(self.blend())
            .with_enabled(self.enabled()))
    }
}
