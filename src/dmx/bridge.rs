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

use std::collections::BTreeMap;

use crate::lighting::color::{clamp_unit, Color};
use crate::lighting::types::{Fixture3D, FixtureInfo, FixtureOutput};

/// A DMX universe is 512 channels.
pub const UNIVERSE_SIZE: usize = 512;

/// Gobo wheel distance between slots when the fixture doesn't say.
const DEFAULT_GOBO_SLOT_WIDTH: u8 = 8;

/// Strobe rate that maps to full scale when the fixture doesn't say.
const DEFAULT_MAX_STROBE_HZ: f64 = 20.0;

/// Channel values for every universe touched by a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmxFrame {
    universes: BTreeMap<u16, Box<[u8; UNIVERSE_SIZE]>>,
}

impl DmxFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// The channel data for a universe, if any fixture is patched into it.
    pub fn universe(&self, universe: u16) -> Option<&[u8; UNIVERSE_SIZE]> {
        self.universes.get(&universe).map(|data| &**data)
    }

    /// Value of a 1-based channel. Unpatched universes read as zero.
    pub fn channel(&self, universe: u16, channel: u16) -> u8 {
        let Some(index) = usize::from(channel).checked_sub(1) else {
            return 0;
        };
        self.universes
            .get(&universe)
            .and_then(|data| data.get(index).copied())
            .unwrap_or(0)
    }

    pub fn universes(&self) -> impl Iterator<Item = (u16, &[u8; UNIVERSE_SIZE])> {
        self.universes.iter().map(|(id, data)| (*id, &**data))
    }

    /// Zeroes every universe, keeping the allocations.
    pub fn clear(&mut self) {
        for data in self.universes.values_mut() {
            data.fill(0);
        }
    }

    fn universe_mut(&mut self, universe: u16) -> &mut [u8; UNIVERSE_SIZE] {
        self.universes
            .entry(universe)
            .or_insert_with(|| Box::new([0; UNIVERSE_SIZE]))
    }
}

/// Converts per-fixture colors and movement into DMX channel values.
///
/// Each value lands at the fixture's start address plus the 1-based channel
/// offset from its channel map. Channels the fixture doesn't have are
/// skipped, as are channels that would fall outside the universe.
#[derive(Debug, Clone, Copy, Default)]
pub struct DmxBridge;

impl DmxBridge {
    /// Converts one frame. `outputs` may be shorter than `fixtures` (or empty
    /// when nothing drives movement); missing entries drive nothing.
    pub fn convert(fixtures: &[Fixture3D], colors: &[Color], outputs: &[FixtureOutput]) -> DmxFrame {
        let mut frame = DmxFrame::new();
        Self::convert_into(&mut frame, fixtures, colors, outputs);
        frame
    }

    /// Like [`Self::convert`], reusing the universes already allocated in `frame`.
    pub fn convert_into(
        frame: &mut DmxFrame,
        fixtures: &[Fixture3D],
        colors: &[Color],
        outputs: &[FixtureOutput],
    ) {
        frame.clear();
        for (i, fixture) in fixtures.iter().enumerate() {
            let color = colors.get(i).copied().unwrap_or(Color::BLACK);
            let output = outputs.get(i).copied().unwrap_or(FixtureOutput::EMPTY);
            let data = frame.universe_mut(fixture.info.universe);
            write_fixture(data, &fixture.info, color, &output);
        }
    }
}

fn write_fixture(
    data: &mut [u8; UNIVERSE_SIZE],
    info: &FixtureInfo,
    color: Color,
    output: &FixtureOutput,
) {
    let mut put = |name: &str, value: u8| {
        if let Some(slot) = info.channel_index(name).and_then(|index| data.get_mut(index)) {
            *slot = value;
        }
    };

    put("red", quantize(color.r));
    put("green", quantize(color.g));
    put("blue", quantize(color.b));
    // Color carries the intensity, so a dedicated dimmer is opened fully.
    put("dimmer", u8::MAX);

    for (coarse, fine, value) in [
        ("pan", "pan_fine", output.pan),
        ("tilt", "tilt_fine", output.tilt),
    ] {
        let Some(value) = value else { continue };
        if info.has_channel(fine) {
            let (hi, lo) = quantize_16(value);
            put(coarse, hi);
            put(fine, lo);
        } else {
            put(coarse, quantize(value));
        }
    }

    if let Some(focus) = output.focus {
        put("focus", quantize(focus));
    }
    if let Some(zoom) = output.zoom {
        put("zoom", quantize(zoom));
    }
    if let Some(slot) = output.gobo {
        let width = u32::from(info.gobo_slot_width.unwrap_or(DEFAULT_GOBO_SLOT_WIDTH));
        let value = slot.saturating_mul(width).min(u32::from(u8::MAX));
        put("gobo", value as u8);
    }
    if let Some(rate) = output.strobe {
        let max = info.max_strobe_frequency.unwrap_or(DEFAULT_MAX_STROBE_HZ);
        let value = if max > 0.0 { rate / max } else { 0.0 };
        put("strobe", quantize(value));
    }
}

/// Quantizes 0.0 to 1.0 to a DMX byte. Out of range values are clamped and
/// NaN is zero.
pub fn quantize(value: f64) -> u8 {
    (clamp_unit(value) * 255.0).round() as u8
}

/// Splits 0.0 to 1.0 into coarse and fine bytes of a 16-bit channel pair.
pub fn quantize_16(value: f64) -> (u8, u8) {
    let value = (clamp_unit(value) * 65535.0).round() as u16;
    ((value >> 8) as u8, (value & 0xff) as u8)
}
