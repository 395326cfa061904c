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

use super::color::{clamp_unit, Color};

const RAINBOW: [Color; 7] = [
    Color::RED,
    Color::ORANGE,
    Color::YELLOW,
    Color::GREEN,
    Color::CYAN,
    Color::BLUE,
    Color::MAGENTA,
];
const FIRE: [Color; 4] = [
    Color::new(0.2, 0.0, 0.0),
    Color::RED,
    Color::ORANGE,
    Color::new(1.0, 0.9, 0.4),
];
const OCEAN: [Color; 4] = [
    Color::new(0.0, 0.05, 0.3),
    Color::BLUE,
    Color::new(0.0, 0.6, 0.8),
    Color::CYAN,
];
const SUNSET: [Color; 4] = [
    Color::PURPLE,
    Color::MAGENTA,
    Color::new(1.0, 0.3, 0.2),
    Color::ORANGE,
];
const FOREST: [Color; 3] = [
    Color::new(0.0, 0.2, 0.05),
    Color::GREEN,
    Color::new(0.6, 0.9, 0.2),
];

/// Looks up one of the built-in palettes by name.
pub fn named(name: &str) -> Option<&'static [Color]> {
    let palette: &'static [Color] = match name.to_lowercase().as_str() {
        "rainbow" => &RAINBOW,
        "fire" => &FIRE,
        "ocean" => &OCEAN,
        "sunset" => &SUNSET,
        "forest" => &FOREST,
        _ => return None,
    };
    Some(palette)
}

/// Names of the built-in palettes.
pub fn names() -> &'static [&'static str] {
    &["rainbow", "fire", "ocean", "sunset", "forest"]
}

/// Samples an ordered list of color stops at `t` in 0.0 to 1.0, interpolating
/// linearly between neighbouring stops. Stops are evenly spaced.
///
/// An empty list samples as black and a single stop is returned unchanged.
/// The result is always clamped.
pub fn sample(stops: &[Color], t: f64) -> Color {
    match stops {
        [] => Color::BLACK,
        [only] => only.clamped(),
        _ => {
            let scaled = clamp_unit(t) * (stops.len() - 1) as f64;
            let index = (scaled.floor() as usize).min(stops.len() - 2);
            let local = scaled - index as f64;
            stops[index].lerp(&stops[index + 1], local).clamped()
        }
    }
}

/// Like [`sample`], but wraps around so the last stop blends back into the first.
pub fn sample_cyclic(stops: &[Color], t: f64) -> Color {
    match stops {
        [] => Color::BLACK,
        [only] => only.clamped(),
        _ => {
            let t = t.rem_euclid(1.0);
            let t = if t.is_finite() { t } else { 0.0 };
            let scaled = t * stops.len() as f64;
            let index = (scaled.floor() as usize).min(stops.len() - 1);
            let next = (index + 1) % stops.len();
            stops[index].lerp(&stops[next], scaled - index as f64).clamped()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints() {
        let stops = [Color::RED, Color::BLUE];
        assert_eq!(sample(&stops, 0.0), Color::RED);
        assert_eq!(sample(&stops, 1.0), Color::BLUE);
        assert_eq!(sample(&stops, 0.5), Color::new(0.5, 0.0, 0.5));
        assert_eq!(sample(&stops, -3.0), Color::RED);
        assert_eq!(sample(&stops, 7.0), Color::BLUE);
    }

    #[test]
    fn test_sample_three_stops() {
        let stops = [Color::RED, Color::GREEN, Color::BLUE];
        assert_eq!(sample(&stops, 0.5), Color::GREEN);
        assert_eq!(sample(&stops, 0.25), Color::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_sample_degenerate() {
        assert_eq!(sample(&[], 0.3), Color::BLACK);
        assert_eq!(sample(&[Color::CYAN], 0.9), Color::CYAN);
        assert_eq!(sample(&[Color::new(2.0, -1.0, 0.5)], 0.0), Color::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_sample_cyclic_wraps() {
        let stops = [Color::RED, Color::BLUE];
        assert_eq!(sample_cyclic(&stops, 0.0), Color::RED);
        assert_eq!(sample_cyclic(&stops, 0.5), Color::BLUE);
        assert_eq!(sample_cyclic(&stops, 1.0), Color::RED);
        assert_eq!(sample_cyclic(&stops, 0.75), Color::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn test_named_palettes() {
        for name in names() {
            let palette = named(name).expect("built-in palette");
            assert!(palette.len() >= 2);
        }
        assert!(named("OCEAN").is_some());
        assert!(named("plaid").is_none());
    }
}
