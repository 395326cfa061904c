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

use std::f64::consts::TAU;

use crate::lighting::color::clamp_unit;
use crate::lighting::params::EffectParams;
use crate::lighting::tempo::BeatSnapshot;
use crate::lighting::types::{FixtureOutput, Position};

use super::MovementEffect;

/// Which of pan and tilt a sweep drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepTarget {
    Pan,
    Tilt,
    Both,
}

/// Sinusoidal pan and/or tilt oscillation around a center.
///
/// Parameters:
/// - `target` (pan): `pan`, `tilt` or `both`.
/// - `center` (0.5).
/// - `range` (0.5): peak-to-peak travel.
/// - `speed` (0.25): cycles per second.
/// - `spread` (0.0): phase offset in cycles per unit of x, fans fixtures out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sweep;

#[derive(Debug, Clone, Copy)]
pub struct SweepContext {
    target: SweepTarget,
    center: f64,
    amplitude: f64,
    phase: f64,
    spread: f64,
}

impl MovementEffect for Sweep {
    type Context = SweepContext;

    fn id(&self) -> &'static str {
        "sweep"
    }

    fn prepare(&self, params: &EffectParams, time: f64, _beat: &BeatSnapshot) -> SweepContext {
        let target = match params.text("target", "pan").to_lowercase().as_str() {
            "tilt" => SweepTarget::Tilt,
            "both" => SweepTarget::Both,
            _ => SweepTarget::Pan,
        };
        SweepContext {
            target,
            center: params.float("center", 0.5),
            amplitude: params.float("range", 0.5) * 0.5,
            phase: (params.float("speed", 0.25) * time).rem_euclid(1.0),
            spread: params.float("spread", 0.0),
        }
    }

    fn compute_movement(&self, position: Position, context: &SweepContext) -> FixtureOutput {
        let cycles = context.phase + context.spread * position.x;
        let value = clamp_unit(context.center + context.amplitude * (TAU * cycles).sin());
        let (pan, tilt) = match context.target {
            SweepTarget::Pan => (Some(value), None),
            SweepTarget::Tilt => (None, Some(value)),
            SweepTarget::Both => (Some(value), Some(value)),
        };
        FixtureOutput {
            pan,
            tilt,
            ..FixtureOutput::EMPTY
        }
    }
}

/// Traces a circle in pan/tilt space.
///
/// At time 0 the beam sits at `(panCenter + radius, tiltCenter)`.
///
/// Parameters:
/// - `center` (0.5): center for both axes.
/// - `panCenter`, `tiltCenter`: per-axis overrides of `center`.
/// - `radius` (0.25).
/// - `speed` (0.25): revolutions per second.
/// - `direction` (cw): `ccw` mirrors the tilt component.
/// - `spread` (0.0): phase offset in revolutions per unit of x.
#[derive(Debug, Clone, Copy, Default)]
pub struct Circle;

#[derive(Debug, Clone, Copy)]
pub struct CircleContext {
    pan_center: f64,
    tilt_center: f64,
    radius: f64,
    phase: f64,
    tilt_sign: f64,
    spread: f64,
}

impl MovementEffect for Circle {
    type Context = CircleContext;

    fn id(&self) -> &'static str {
        "circle"
    }

    fn prepare(&self, params: &EffectParams, time: f64, _beat: &BeatSnapshot) -> CircleContext {
        let center = params.float("center", 0.5);
        let tilt_sign = match params.text("direction", "cw").to_lowercase().as_str() {
            "ccw" => -1.0,
            _ => 1.0,
        };
        CircleContext {
            pan_center: params.float("panCenter", center),
            tilt_center: params.float("tiltCenter", center),
            radius: params.float("radius", 0.25),
            phase: (params.float("speed", 0.25) * time).rem_euclid(1.0),
            tilt_sign,
            spread: params.float("spread", 0.0),
        }
    }

    fn compute_movement(&self, position: Position, context: &CircleContext) -> FixtureOutput {
        let angle = TAU * (context.phase + context.spread * position.x);
        FixtureOutput::pan_tilt(
            context.pan_center + context.radius * angle.cos(),
            context.tilt_center + context.tilt_sign * context.radius * angle.sin(),
        )
    }
}

/// Points every beam at a target in venue space.
///
/// Pan is the heading around the vertical axis, measured from +z towards +x;
/// tilt is the angle away from straight down. Both are normalized so that 0.5
/// is the middle of the fixture's range.
///
/// Parameters:
/// - `targetX`, `targetY`, `targetZ` (0.0).
/// - `panRange` (540.0): degrees of pan travel.
/// - `tiltRange` (270.0): degrees of tilt travel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Follow;

#[derive(Debug, Clone, Copy)]
pub struct FollowContext {
    target: Position,
    pan_per_radian: f64,
    tilt_per_radian: f64,
}

impl MovementEffect for Follow {
    type Context = FollowContext;

    fn id(&self) -> &'static str {
        "follow"
    }

    fn prepare(&self, params: &EffectParams, _time: f64, _beat: &BeatSnapshot) -> FollowContext {
        let per_radian = |range: f64| {
            if range > 0.0 {
                1.0 / range.to_radians()
            } else {
                0.0
            }
        };
        FollowContext {
            target: Position::new(
                params.float("targetX", 0.0),
                params.float("targetY", 0.0),
                params.float("targetZ", 0.0),
            ),
            pan_per_radian: per_radian(params.float("panRange", 540.0)),
            tilt_per_radian: per_radian(params.float("tiltRange", 270.0)),
        }
    }

    fn compute_movement(&self, position: Position, context: &FollowContext) -> FixtureOutput {
        let v = context.target - position;
        let horizontal = (v.x * v.x + v.z * v.z).sqrt();
        if horizontal < 1e-9 && v.y.abs() < 1e-9 {
            return FixtureOutput::pan_tilt(0.5, 0.5);
        }
        let pan = if horizontal < 1e-9 { 0.0 } else { v.x.atan2(v.z) };
        let tilt = horizontal.atan2(-v.y);
        FixtureOutput::pan_tilt(
            0.5 + pan * context.pan_per_radian,
            0.5 + tilt * context.tilt_per_radian,
        )
    }
}

/// Holds fixed movement values. Only the keys present are driven.
///
/// Parameters: `pan`, `tilt`, `focus`, `zoom` (0.0 to 1.0), `strobe` (Hz),
/// `gobo` (slot).
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionHold;

impl MovementEffect for PositionHold {
    type Context = FixtureOutput;

    fn id(&self) -> &'static str {
        "position_hold"
    }

    fn prepare(&self, params: &EffectParams, _time: f64, _beat: &BeatSnapshot) -> FixtureOutput {
        let unit = |key: &str| params.try_float(key).map(clamp_unit);
        FixtureOutput {
            pan: unit("pan"),
            tilt: unit("tilt"),
            focus: unit("focus"),
            zoom: unit("zoom"),
            strobe: params.try_float("strobe").map(|rate| rate.max(0.0)),
            gobo: params
                .contains("gobo")
                .then(|| params.int("gobo", 0).clamp(0, i64::from(u32::MAX)) as u32),
        }
    }

    fn compute_movement(&self, _position: Position, context: &FixtureOutput) -> FixtureOutput {
        *context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(value: Option<f64>, expected: f64) -> bool {
        value.is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_sweep_oscillates_pan_only() {
        let params = EffectParams::new()
            .with("range", 0.4)
            .with("speed", 1.0);
        let beat = BeatSnapshot::default();
        let at = |t: f64| {
            let context = Sweep.prepare(&params, t, &beat);
            Sweep.compute_movement(Position::ORIGIN, &context)
        };
        assert!(approx(at(0.0).pan, 0.5));
        assert!(approx(at(0.25).pan, 0.7));
        assert!(approx(at(0.75).pan, 0.3));
        assert_eq!(at(0.25).tilt, None);
        assert_eq!(at(0.25).gobo, None);
    }

    #[test]
    fn test_sweep_targets() {
        let beat = BeatSnapshot::default();
        let tilt = EffectParams::new().with("target", "tilt");
        let context = Sweep.prepare(&tilt, 1.0, &beat);
        let output = Sweep.compute_movement(Position::ORIGIN, &context);
        assert!(output.pan.is_none() && output.tilt.is_some());

        let both = EffectParams::new().with("target", "both");
        let context = Sweep.prepare(&both, 1.0, &beat);
        let output = Sweep.compute_movement(Position::ORIGIN, &context);
        assert_eq!(output.pan, output.tilt);
    }

    #[test]
    fn test_sweep_spread_fans_out() {
        let params = EffectParams::new().with("spread", 0.25);
        let context = Sweep.prepare(&params, 0.0, &BeatSnapshot::default());
        let left = Sweep.compute_movement(Position::new(0.0, 0.0, 0.0), &context);
        let right = Sweep.compute_movement(Position::new(1.0, 0.0, 0.0), &context);
        assert_ne!(left.pan, right.pan);
    }

    #[test]
    fn test_circle_starting_point() {
        let params = EffectParams::new().with("radius", 0.1).with("center", 0.3);
        let context = Circle.prepare(&params, 0.0, &BeatSnapshot::default());
        let output = Circle.compute_movement(Position::ORIGIN, &context);
        assert!(approx(output.pan, 0.4));
        assert!(approx(output.tilt, 0.3));
    }

    #[test]
    fn test_circle_direction_mirrors_tilt() {
        let cw = EffectParams::new().with("speed", 1.0);
        let ccw = cw.with("direction", "ccw");
        let beat = BeatSnapshot::default();
        let a = Circle.compute_movement(Position::ORIGIN, &Circle.prepare(&cw, 0.25, &beat));
        let b = Circle.compute_movement(Position::ORIGIN, &Circle.prepare(&ccw, 0.25, &beat));
        assert!(approx(a.tilt, 0.75));
        assert!(approx(b.tilt, 0.25));
        assert!(approx(a.pan, 0.5));
        assert!(approx(b.pan, 0.5));
    }

    #[test]
    fn test_circle_per_axis_centers() {
        let params = EffectParams::new()
            .with("radius", 0.0)
            .with("panCenter", 0.2)
            .with("tiltCenter", 0.9);
        let context = Circle.prepare(&params, 3.0, &BeatSnapshot::default());
        let output = Circle.compute_movement(Position::ORIGIN, &context);
        assert!(approx(output.pan, 0.2));
        assert!(approx(output.tilt, 0.9));
    }

    #[test]
    fn test_follow_points_at_target() {
        let params = EffectParams::new().with("targetY", 0.0);
        let context = Follow.prepare(&params, 0.0, &BeatSnapshot::default());

        // Directly above the target: straight down, pan centered.
        let above = Follow.compute_movement(Position::new(0.0, 5.0, 0.0), &context);
        assert!(approx(above.pan, 0.5));
        assert!(approx(above.tilt, 0.5));

        // Target ahead along +z at the same height: tilted 90 degrees.
        let level = Follow.compute_movement(Position::new(0.0, 0.0, -3.0), &context);
        assert!(approx(level.tilt, 0.5 + 90.0 / 270.0));
        assert!(approx(level.pan, 0.5));

        // Target to the +x side: pan turns by 90 degrees.
        let side = Follow.compute_movement(Position::new(-3.0, 3.0, 0.0), &context);
        assert!(approx(side.pan, 0.5 + 90.0 / 540.0));
    }

    #[test]
    fn test_follow_at_target() {
        let context = Follow.prepare(&EffectParams::new(), 0.0, &BeatSnapshot::default());
        let output = Follow.compute_movement(Position::ORIGIN, &context);
        assert_eq!(output, FixtureOutput::pan_tilt(0.5, 0.5));
    }

    #[test]
    fn test_follow_stays_in_range() {
        let params = EffectParams::new().with("panRange", 90.0).with("tiltRange", 45.0);
        let context = Follow.prepare(&params, 0.0, &BeatSnapshot::default());
        for (x, y, z) in [(5.0, -2.0, -5.0), (-8.0, 9.0, 1.0), (0.1, -4.0, 0.0)] {
            let output = Follow.compute_movement(Position::new(x, y, z), &context);
            let pan = output.pan.unwrap();
            let tilt = output.tilt.unwrap();
            assert!((0.0..=1.0).contains(&pan));
            assert!((0.0..=1.0).contains(&tilt));
        }
    }

    #[test]
    fn test_position_hold_drives_only_given_keys() {
        let params = EffectParams::new()
            .with("pan", 0.25)
            .with("zoom", 4.0)
            .with("gobo", 2_i64);
        let context = PositionHold.prepare(&params, 0.0, &BeatSnapshot::default());
        let output = PositionHold.compute_movement(Position::ORIGIN, &context);
        assert_eq!(
            output,
            FixtureOutput {
                pan: Some(0.25),
                zoom: Some(1.0),
                gobo: Some(2),
                ..FixtureOutput::EMPTY
            }
        );
    }
}
