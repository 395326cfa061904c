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

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lightcore::dmx::DmxBridge;
use lightcore::lighting::{
    BeatSnapshot, BlendMode, Color, EffectLayer, EffectParams, EffectRegistry, EffectStack,
    Fixture3D, FixtureInfo, FixtureOutput, LightingEngine, MovementLayer, Position,
};

/// A grid of moving heads, eight per row, spread over as many universes as needed.
fn rig(count: usize) -> Vec<Fixture3D> {
    let channels: HashMap<String, u16> = [
        ("pan", 1),
        ("pan_fine", 2),
        ("tilt", 3),
        ("tilt_fine", 4),
        ("red", 5),
        ("green", 6),
        ("blue", 7),
        ("gobo", 8),
    ]
    .iter()
    .map(|(name, offset)| (name.to_string(), *offset))
    .collect();

    (0..count)
        .map(|i| {
            let universe = (i / 64) as u16 + 1;
            let address = (i % 64) as u16 * 8 + 1;
            let info = FixtureInfo::new(&format!("head-{}", i), universe, address, channels.clone());
            let position = Position::new((i % 8) as f64, 4.0, (i / 8) as f64 * 0.5);
            Fixture3D::new(info, position)
        })
        .collect()
}

fn stack(movement_layers: usize) -> EffectStack {
    let registry = EffectRegistry::with_builtins();
    let mut stack = EffectStack::new();
    stack.add_layer(EffectLayer::new(
        registry.spatial("perlin_noise3d").unwrap(),
        EffectParams::new(),
    ));
    stack.add_layer(
        EffectLayer::new(registry.spatial("chase3d").unwrap(), EffectParams::new())
            .with_blend_mode(BlendMode::Additive)
            .with_opacity(0.8),
    );
    stack.add_layer(
        EffectLayer::new(
            registry.spatial("particle_burst3d").unwrap(),
            EffectParams::new().with("repeat", true),
        )
        .with_blend_mode(BlendMode::Overlay),
    );
    let movement = ["circle", "gobo_beat_sync"];
    for id in movement.iter().take(movement_layers) {
        stack.add_movement_layer(MovementLayer::new(
            registry.movement(id).unwrap(),
            EffectParams::new(),
        ));
    }
    stack
}

fn benchmark_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    let fixtures = rig(240);
    let beat = BeatSnapshot::at(128.0, 12.5);

    for movement_layers in [1, 2] {
        let stack = stack(movement_layers);
        group.bench_function(BenchmarkId::new("evaluate_240", movement_layers), |b| {
            b.iter(|| {
                let frame = stack.build_frame(black_box(12.5), &beat);
                for fixture in &fixtures {
                    black_box(frame.evaluate_fixture_output(fixture.position));
                }
            })
        });
    }

    let mut engine = LightingEngine::new(fixtures.clone(), stack(2)).unwrap();
    group.bench_function("tick_240", |b| {
        b.iter(|| engine.tick(black_box(12.5), &beat))
    });

    let colors = vec![Color::new(0.2, 0.4, 0.6); fixtures.len()];
    let outputs = vec![FixtureOutput::pan_tilt(0.3, 0.7); fixtures.len()];
    group.bench_function("dmx_convert_240", |b| {
        b.iter(|| DmxBridge::convert(&fixtures, black_box(&colors), black_box(&outputs)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_frame);
criterion_main!(benches);
