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

use super::*;
use crate::lighting::params::EffectParams;

fn sample_positions() -> Vec<Position> {
    let mut positions = Vec::new();
    for i in 0..6 {
        for j in 0..4 {
            let f = i as f64;
            let g = j as f64;
            positions.push(Position::new(f * 1.7 - 4.0, g * 0.9, (f * g).sin() * 3.0));
        }
    }
    positions
}

fn sample_beats() -> Vec<(f64, BeatSnapshot)> {
    [0.0, 0.13, 0.5, 1.99, 7.25, 31.0]
        .iter()
        .map(|&t| (t, BeatSnapshot::at(128.0, t)))
        .collect()
}

#[test]
fn test_registry_holds_catalog() {
    let registry = EffectRegistry::with_builtins();
    assert_eq!(
        registry.spatial_ids(),
        vec![
            "chase3d",
            "gradient3d",
            "particle_burst3d",
            "perlin_noise3d",
            "radial_pulse3d",
            "rainbow3d",
            "solid",
            "strobe",
            "wave3d",
        ]
    );
    assert_eq!(
        registry.movement_ids(),
        vec![
            "circle",
            "follow",
            "gobo_beat_sync",
            "gobo_rotate",
            "position_hold",
            "random_movement",
            "sweep",
        ]
    );
    for id in registry.spatial_ids() {
        assert_eq!(registry.spatial(id).unwrap().effect_id(), id);
    }
    for id in registry.movement_ids() {
        assert_eq!(registry.movement(id).unwrap().effect_id(), id);
    }
    assert!(registry.spatial("laser_show").is_none());
    assert!(registry.movement("strobe").is_none());
}

#[test]
fn test_registries_are_isolated() {
    let mut custom = EffectRegistry::new();
    custom.register_spatial_factory("house_red", || -> Arc<dyn DynSpatialEffect> {
        Arc::new(SolidColor)
    });
    assert!(custom.spatial("house_red").is_some());
    assert!(EffectRegistry::with_builtins().spatial("house_red").is_none());
    assert!(custom.spatial("solid").is_none());
}

#[test]
fn test_spatial_effects_are_deterministic() {
    let registry = EffectRegistry::with_builtins();
    let params = EffectParams::new();
    for id in registry.spatial_ids() {
        let effect = registry.spatial(id).unwrap();
        for (time, beat) in sample_beats() {
            let prepared = effect.prepare_frame(&params, time, &beat);
            for position in sample_positions() {
                assert_eq!(prepared.compute(position), prepared.compute(position), "{}", id);
            }
        }
    }
}

#[test]
fn test_movement_effects_are_deterministic() {
    let registry = EffectRegistry::with_builtins();
    let params = EffectParams::new().with("perFixture", true).with("pan", 0.3);
    for id in registry.movement_ids() {
        let effect = registry.movement(id).unwrap();
        for (time, beat) in sample_beats() {
            let prepared = effect.prepare_frame(&params, time, &beat);
            for position in sample_positions() {
                assert_eq!(
                    prepared.compute_movement(position),
                    prepared.compute_movement(position),
                    "{}",
                    id
                );
            }
        }
    }
}

#[test]
fn test_temporal_effects_ignore_position() {
    let registry = EffectRegistry::with_builtins();
    let params = EffectParams::new();
    for (time, beat) in sample_beats() {
        let strobe = registry.spatial("strobe").unwrap();
        let prepared = strobe.prepare_frame(&params, time, &beat);
        let reference = prepared.compute(Position::ORIGIN);
        for position in sample_positions() {
            assert_eq!(prepared.compute(position), reference);
        }

        for id in ["gobo_beat_sync", "gobo_rotate", "random_movement"] {
            let effect = registry.movement(id).unwrap();
            let prepared = effect.prepare_frame(&params, time, &beat);
            let reference = prepared.compute_movement(Position::ORIGIN);
            for position in sample_positions() {
                assert_eq!(prepared.compute_movement(position), reference, "{}", id);
            }
        }
    }
}

#[test]
fn test_colors_stay_in_unit_range() {
    let registry = EffectRegistry::with_builtins();
    let wild = EffectParams::new()
        .with("speed", 37.0)
        .with("scale", 11.0)
        .with("tail", -1.0)
        .with("width", 0.0)
        .with("color", Color::new(3.0, -2.0, 0.5));
    for params in [EffectParams::new(), wild] {
        for id in registry.spatial_ids() {
            let effect = registry.spatial(id).unwrap();
            for (time, beat) in sample_beats() {
                let prepared = effect.prepare_frame(&params, time, &beat);
                for position in sample_positions() {
                    let c = prepared.compute(position);
                    for channel in [c.r, c.g, c.b] {
                        assert!((0.0..=1.0).contains(&channel), "{} produced {:?}", id, c);
                    }
                }
            }
        }
    }
}

#[test]
fn test_movement_stays_in_range() {
    let registry = EffectRegistry::with_builtins();
    let params = EffectParams::new()
        .with("slotCount", 5_i64)
        .with("radius", 0.8)
        .with("range", 3.0)
        .with("perFixture", true);
    for id in registry.movement_ids() {
        let effect = registry.movement(id).unwrap();
        for (time, beat) in sample_beats() {
            let prepared = effect.prepare_frame(&params, time, &beat);
            for position in sample_positions() {
                let output = prepared.compute_movement(position);
                for value in [output.pan, output.tilt].into_iter().flatten() {
                    assert!((0.0..=1.0).contains(&value), "{} produced {:?}", id, output);
                }
                if let Some(slot) = output.gobo {
                    assert!(slot < 5, "{} produced slot {}", id, slot);
                }
            }
        }
    }
}

#[test]
fn test_gobo_effects_drive_only_gobo() {
    let registry = EffectRegistry::with_builtins();
    let params = EffectParams::new();
    for id in ["gobo_beat_sync", "gobo_rotate"] {
        let effect = registry.movement(id).unwrap();
        let beat = BeatSnapshot::at(120.0, 3.3);
        let output = effect
            .prepare_frame(&params, 3.3, &beat)
            .compute_movement(Position::new(1.0, 2.0, 3.0));
        assert!(output.gobo.is_some());
        assert_eq!(
            FixtureOutput {
                gobo: None,
                ..output
            },
            FixtureOutput::EMPTY
        );
    }
}

#[test]
fn test_falloff_helpers() {
    assert_eq!(linear_falloff(0.0, 2.0), 1.0);
    assert_eq!(linear_falloff(-1.0, 2.0), 0.5);
    assert_eq!(linear_falloff(3.0, 2.0), 0.0);
    assert_eq!(linear_falloff(0.0, 0.0), 1.0);
    assert_eq!(linear_falloff(0.1, 0.0), 0.0);
    assert_eq!(linear_falloff(f64::NAN, 1.0), 0.0);
    assert_eq!(smoothstep(0.5), 0.5);
    assert_eq!(smoothstep(2.0), 1.0);
}
