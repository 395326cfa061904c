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

use crate::lighting::color::{clamp_unit, Color};
use crate::lighting::params::EffectParams;
use crate::lighting::tempo::BeatSnapshot;
use crate::lighting::types::Position;

use super::SpatialEffect;

/// Beat-locked strobe.
///
/// Parameters:
/// - `color` (white): color while the strobe is on.
/// - `dutyCycle` (0.5): fraction of each beat the strobe is on. Clamped to
///   0.0 to 1.0, so 0.0 is always off and 1.0 is always on.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strobe;

#[derive(Debug, Clone, Copy)]
pub struct StrobeContext {
    output: Color,
}

impl SpatialEffect for Strobe {
    type Context = StrobeContext;

    fn id(&self) -> &'static str {
        "strobe"
    }

    fn prepare(&self, params: &EffectParams, _time: f64, beat: &BeatSnapshot) -> StrobeContext {
        let color = params.color("color", Color::WHITE).clamped();
        let duty_cycle = clamp_unit(params.float("dutyCycle", 0.5));
        let on = beat.beat_phase < duty_cycle;
        StrobeContext {
            output: if on { color } else { Color::BLACK },
        }
    }

    fn compute(&self, _position: Position, context: &StrobeContext) -> Color {
        context.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strobe_at(duty: f64, phase: f64) -> Color {
        let params = EffectParams::new().with("dutyCycle", duty);
        let beat = BeatSnapshot::new(120.0, phase, 0.0, 0.0);
        let context = Strobe.prepare(&params, 0.0, &beat);
        Strobe.compute(Position::ORIGIN, &context)
    }

    #[test]
    fn test_strobe_follows_beat_phase() {
        assert_eq!(strobe_at(0.5, 0.1), Color::WHITE);
        assert_eq!(strobe_at(0.5, 0.6), Color::BLACK);
    }

    #[test]
    fn test_duty_cycle_extremes() {
        for phase in [0.0, 0.3, 0.99] {
            assert_eq!(strobe_at(0.0, phase), Color::BLACK);
            assert_eq!(strobe_at(1.0, phase), Color::WHITE);
        }
    }

    #[test]
    fn test_out_of_range_duty_cycle() {
        assert_eq!(strobe_at(-3.0, 0.0), Color::BLACK);
        assert_eq!(strobe_at(7.5, 0.5), Color::WHITE);
    }

    #[test]
    fn test_strobe_color() {
        let params = EffectParams::new().with("color", Color::MAGENTA);
        let beat = BeatSnapshot::new(120.0, 0.0, 0.0, 0.0);
        let context = Strobe.prepare(&params, 0.0, &beat);
        assert_eq!(Strobe.compute(Position::new(3.0, 1.0, 2.0), &context), Color::MAGENTA);
    }
}
