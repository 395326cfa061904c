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

use super::error::ConfigError;
use crate::lighting::{Fixture3D, FixtureInfo, Position};

/// The universe fixtures are patched into when the config doesn't say.
pub const DEFAULT_UNIVERSE: u16 = 1;

/// Channel layouts for the fixture types that don't need an explicit map.
fn builtin_channels(fixture_type: &str) -> Option<&'static [(&'static str, u16)]> {
    let layout: &'static [(&'static str, u16)] = match fixture_type.to_lowercase().as_str() {
        "rgb" => &[("red", 1), ("green", 2), ("blue", 3)],
        "rgbw" => &[("red", 1), ("green", 2), ("blue", 3), ("white", 4)],
        "drgb" => &[("dimmer", 1), ("red", 2), ("green", 3), ("blue", 4)],
        "moving_head" => &[
            ("pan", 1),
            ("pan_fine", 2),
            ("tilt", 3),
            ("tilt_fine", 4),
            ("dimmer", 5),
            ("red", 6),
            ("green", 7),
            ("blue", 8),
            ("gobo", 9),
            ("strobe", 10),
            ("focus", 11),
            ("zoom", 12),
        ],
        _ => return None,
    };
    Some(layout)
}

/// A YAML representation of a fixture placed in the venue.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Fixture {
    /// Unique name of the fixture.
    name: String,

    /// The DMX universe. Defaults to 1.
    universe: Option<u16>,

    /// The 1-based DMX start address.
    address: u16,

    /// The fixture type. Known types (rgb, rgbw, drgb, moving_head) supply a
    /// channel map when `channels` is absent.
    #[serde(rename = "type")]
    fixture_type: Option<String>,

    /// Location in venue space, in meters.
    #[serde(default)]
    position: Position,

    /// Optional group the fixture belongs to.
    group: Option<String>,

    /// Channel name to 1-based offset from the start address.
    channels: Option<HashMap<String, u16>>,

    /// Fastest strobe the fixture supports, in Hz.
    max_strobe_frequency: Option<f64>,

    /// DMX value distance between consecutive gobo slots.
    gobo_slot_width: Option<u8>,
}

impl Fixture {
    /// Creates a new fixture configuration with an explicit channel map.
    pub fn new(name: &str, address: u16, position: Position, channels: HashMap<String, u16>) -> Fixture {
        Fixture {
            name: name.to_string(),
            universe: None,
            address,
            fixture_type: None,
            position,
            group: None,
            channels: Some(channels),
            max_strobe_frequency: None,
            gobo_slot_width: None,
        }
    }

    /// Gets the name of the fixture.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the universe, defaulting to 1.
    pub fn universe(&self) -> u16 {
        self.universe.unwrap_or(DEFAULT_UNIVERSE)
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Gets the channel map, falling back to the layout of a known type.
    pub fn channels(&self) -> Result<HashMap<String, u16>, ConfigError> {
        if let Some(channels) = &self.channels {
            if !channels.is_empty() {
                return Ok(channels.clone());
            }
        }
        self.fixture_type
            .as_deref()
            .and_then(builtin_channels)
            .map(|layout| {
                layout
                    .iter()
                    .map(|(name, offset)| (name.to_string(), *offset))
                    .collect()
            })
            .ok_or_else(|| ConfigError::NoChannels {
                name: self.name.clone(),
            })
    }

    /// Converts the configuration into a placed fixture.
    pub fn to_fixture(&self) -> Result<Fixture3D, ConfigError> {
        let mut info = FixtureInfo::new(&self.name, self.universe(), self.address, self.channels()?);
        if let Some(fixture_type) = &self.fixture_type {
            info.fixture_type = fixture_type.clone();
        }
        info.max_strobe_frequency = self.max_strobe_frequency;
        info.gobo_slot_width = self.gobo_slot_width;

        let fixture = Fixture3D::new(info, self.position);
        Ok(match &self.group {
            Some(group) => fixture.with_group(group),
            None => fixture,
        })
    }
}
