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

use super::color::clamp_unit;

/// A fixture's location in venue space. y is up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (*self - *other).length()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn scale(&self, factor: f64) -> Position {
        Position::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Component along the given axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

impl std::ops::Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Venue axis used by directional effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    pub fn parse(name: &str) -> Option<Axis> {
        match name.to_lowercase().as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Blend mode for combining a layer with the layers below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Crossfade from the accumulator to the layer by opacity
    #[default]
    Normal,
    /// Add the layer scaled by opacity (good for color mixing)
    Additive,
    /// Multiply the accumulator by the layer (good for masking)
    Multiply,
    /// Photographic overlay, multiply on darks and screen on lights
    Overlay,
}

/// Movement channels driven by a layer. `None` means the layer does not drive
/// the channel, which is not the same as driving it to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixtureOutput {
    /// 0.0 to 1.0 across the fixture's pan range.
    pub pan: Option<f64>,
    /// 0.0 to 1.0 across the fixture's tilt range.
    pub tilt: Option<f64>,
    /// Gobo wheel slot index.
    pub gobo: Option<u32>,
    pub focus: Option<f64>,
    pub zoom: Option<f64>,
    /// Strobe rate in Hz.
    pub strobe: Option<f64>,
}

impl FixtureOutput {
    pub const EMPTY: FixtureOutput = FixtureOutput {
        pan: None,
        tilt: None,
        gobo: None,
        focus: None,
        zoom: None,
        strobe: None,
    };

    pub fn pan_tilt(pan: f64, tilt: f64) -> Self {
        Self {
            pan: Some(clamp_unit(pan)),
            tilt: Some(clamp_unit(tilt)),
            ..Self::EMPTY
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Merges a layer's partial output into this accumulated output.
    ///
    /// Additive layers add to channels that already have a value and set the
    /// ones that don't. Every other blend mode overwrites.
    pub fn merge(&mut self, layer: &FixtureOutput, mode: BlendMode) {
        let additive = mode == BlendMode::Additive;
        merge_unit(&mut self.pan, layer.pan, additive);
        merge_unit(&mut self.tilt, layer.tilt, additive);
        merge_unit(&mut self.focus, layer.focus, additive);
        merge_unit(&mut self.zoom, layer.zoom, additive);

        if let Some(rate) = layer.strobe {
            let rate = if rate.is_nan() { 0.0 } else { rate.max(0.0) };
            self.strobe = Some(match self.strobe {
                Some(existing) if additive => existing + rate,
                _ => rate,
            });
        }

        if let Some(slot) = layer.gobo {
            self.gobo = Some(match self.gobo {
                Some(existing) if additive => existing.saturating_add(slot),
                _ => slot,
            });
        }
    }
}

fn merge_unit(acc: &mut Option<f64>, value: Option<f64>, additive: bool) {
    if let Some(value) = value {
        *acc = Some(match *acc {
            Some(existing) if additive => clamp_unit(existing + value),
            _ => clamp_unit(value),
        });
    }
}

/// Fixture information: identity and channel layout
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureInfo {
    pub name: String,
    pub universe: u16,
    /// 1-based DMX start address.
    pub address: u16,
    pub fixture_type: String,
    /// Channel name to 1-based offset from the start address.
    pub channels: HashMap<String, u16>,
    /// Fastest strobe the fixture supports, in Hz.
    pub max_strobe_frequency: Option<f64>,
    /// DMX value distance between consecutive gobo slots.
    pub gobo_slot_width: Option<u8>,
}

impl FixtureInfo {
    pub fn new(name: &str, universe: u16, address: u16, channels: HashMap<String, u16>) -> Self {
        Self {
            name: name.to_string(),
            universe,
            address,
            fixture_type: "generic".to_string(),
            channels,
            max_strobe_frequency: None,
            gobo_slot_width: None,
        }
    }

    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Zero-based index into the universe for the given channel name.
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        let offset = *self.channels.get(name)?;
        let dmx_channel = usize::from(self.address) + usize::from(offset);
        // DMX channel calculation: address + offset - 1, then zero-based.
        dmx_channel.checked_sub(2)
    }

    /// Highest channel this fixture occupies, 1-based.
    pub fn footprint_end(&self) -> usize {
        let highest = self.channels.values().copied().max().unwrap_or(1);
        usize::from(self.address) + usize::from(highest) - 1
    }
}

/// A fixture placed in the venue
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture3D {
    pub info: FixtureInfo,
    pub position: Position,
    pub group: Option<String>,
}

impl Fixture3D {
    pub fn new(info: FixtureInfo, position: Position) -> Self {
        Self {
            info,
            position,
            group: None,
        }
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }
}
