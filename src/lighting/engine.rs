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

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::color::Color;
use super::stack::EffectStack;
use super::tempo::BeatSnapshot;
use super::types::{Fixture3D, FixtureOutput};
use crate::dmx::bridge::UNIVERSE_SIZE;
use crate::dmx::buffer::{DoubleBuffer, FrameReader};

/// Errors raised while setting up the engine. Ticking never fails.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Fixture '{0}' has DMX address 0; addresses start at 1")]
    ZeroAddress(String),
    #[error("Fixture '{name}' channel '{channel}' has offset 0; offsets start at 1")]
    ZeroOffset { name: String, channel: String },
    #[error("Fixture '{name}' ends at channel {end}, past the end of the universe")]
    PastUniverseEnd { name: String, end: usize },
    #[error("Fixture name '{0}' is used more than once")]
    DuplicateName(String),
}

/// Runs one frame at a time: prepares the stack, evaluates every fixture
/// and publishes the results to the color and movement buffers.
pub struct LightingEngine {
    stack: EffectStack,
    fixtures: Vec<Fixture3D>,
    colors: Arc<DoubleBuffer<Color>>,
    outputs: Arc<DoubleBuffer<FixtureOutput>>,
    /// Number of ticks run so far.
    ticks: u64,
    /// Number of ticks whose frame could not be published.
    dropped: u64,
}

impl LightingEngine {
    /// Creates an engine for a fixed list of fixtures. Buffers are sized
    /// here; changing the fixture list means building a new engine.
    pub fn new(fixtures: Vec<Fixture3D>, stack: EffectStack) -> Result<Self, EngineError> {
        validate_fixtures(&fixtures)?;
        info!(
            fixtures = fixtures.len(),
            layers = stack.layer_count(),
            movement_layers = stack.movement_layer_count(),
            "Lighting engine created"
        );
        Ok(Self {
            colors: Arc::new(DoubleBuffer::new(fixtures.len())),
            outputs: Arc::new(DoubleBuffer::new(fixtures.len())),
            stack,
            fixtures,
            ticks: 0,
            dropped: 0,
        })
    }

    /// Evaluates and publishes one frame. Returns false when a reader held on
    /// to a slot long enough that either buffer dropped this frame.
    pub fn tick(&mut self, time: f64, beat: &BeatSnapshot) -> bool {
        self.ticks += 1;
        let frame = self.stack.build_frame(time, beat);
        let fixtures = &self.fixtures;

        let colors_staged = self.colors.stage(|slot| {
            for (value, fixture) in slot.iter_mut().zip(fixtures) {
                *value = frame.evaluate_color(fixture.position);
            }
        });
        let outputs_staged = self.outputs.stage(|slot| {
            if frame.has_movement_layers() {
                for (value, fixture) in slot.iter_mut().zip(fixtures) {
                    *value = frame.evaluate_movement(fixture.position);
                }
            } else {
                slot.fill(FixtureOutput::EMPTY);
            }
        });

        let published = colors_staged && outputs_staged;
        self.colors.commit();
        self.outputs.commit();
        if !published {
            self.dropped += 1;
            debug!(tick = self.ticks, dropped = self.dropped, "Frame dropped");
        }
        published
    }

    /// Evaluates one frame into caller-owned slices without publishing it.
    /// Slices shorter than the fixture list are filled as far as they go.
    pub fn evaluate_into(
        &self,
        time: f64,
        beat: &BeatSnapshot,
        colors: &mut [Color],
        outputs: &mut [FixtureOutput],
    ) {
        let frame = self.stack.build_frame(time, beat);
        for (value, fixture) in colors.iter_mut().zip(&self.fixtures) {
            *value = frame.evaluate_color(fixture.position);
        }
        for (value, fixture) in outputs.iter_mut().zip(&self.fixtures) {
            *value = frame.evaluate_movement(fixture.position);
        }
    }

    pub fn stack(&self) -> &EffectStack {
        &self.stack
    }

    /// Mutable access for control code. Must not be used while a tick runs,
    /// which the borrow rules already guarantee.
    pub fn stack_mut(&mut self) -> &mut EffectStack {
        &mut self.stack
    }

    pub fn into_stack(self) -> EffectStack {
        self.stack
    }

    pub fn fixtures(&self) -> &[Fixture3D] {
        &self.fixtures
    }

    /// A reader of the per-fixture colors.
    pub fn color_reader(&self) -> FrameReader<Color> {
        self.colors.reader()
    }

    /// A reader of the per-fixture movement.
    pub fn output_reader(&self) -> FrameReader<FixtureOutput> {
        self.outputs.reader()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped
    }
}

fn validate_fixtures(fixtures: &[Fixture3D]) -> Result<(), EngineError> {
    let mut names = HashSet::new();
    for fixture in fixtures {
        let info = &fixture.info;
        if !names.insert(info.name.as_str()) {
            return Err(EngineError::DuplicateName(info.name.clone()));
        }
        if info.address == 0 {
            return Err(EngineError::ZeroAddress(info.name.clone()));
        }
        if let Some((channel, _)) = info.channels.iter().find(|(_, offset)| **offset == 0) {
            return Err(EngineError::ZeroOffset {
                name: info.name.clone(),
                channel: channel.clone(),
            });
        }
        let end = info.footprint_end();
        if end > UNIVERSE_SIZE {
            return Err(EngineError::PastUniverseEnd {
                name: info.name.clone(),
                end,
            });
        }

        let rgb = ["red", "green", "blue"]
            .iter()
            .filter(|channel| info.has_channel(channel))
            .count();
        if rgb != 0 && rgb != 3 {
            warn!(
                fixture = info.name.as_str(),
                "Fixture has a partial RGB channel set; missing colors will not be output"
            );
        }
    }
    Ok(())
}
