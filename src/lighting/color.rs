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

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use super::types::BlendMode;

/// Color representation. Components are nominally in 0.0 to 1.0, but this is
/// not enforced at construction; composition clamps at every blend step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::new(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0);
    pub const ORANGE: Color = Color::new(1.0, 165.0 / 255.0, 0.0);
    pub const PURPLE: Color = Color::new(128.0 / 255.0, 0.0, 128.0 / 255.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Same value on all three channels.
    pub const fn gray(v: f64) -> Self {
        Self { r: v, g: v, b: v }
    }

    pub fn from_hex(hex: &str) -> Result<Self, std::num::ParseIntError> {
        let hex = hex.trim_start_matches('#');
        let component = |range: std::ops::Range<usize>| -> Result<f64, std::num::ParseIntError> {
            let digits = hex.get(range).unwrap_or("");
            Ok(f64::from(u8::from_str_radix(digits, 16)?) / 255.0)
        };
        Ok(Color {
            r: component(0..2)?,
            g: component(2..4)?,
            b: component(4..6)?,
        })
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_lowercase().as_str() {
            "red" => Color::RED,
            "green" => Color::GREEN,
            "blue" => Color::BLUE,
            "white" => Color::WHITE,
            "black" => Color::BLACK,
            "yellow" => Color::YELLOW,
            "cyan" => Color::CYAN,
            "magenta" => Color::MAGENTA,
            "orange" => Color::ORANGE,
            "purple" => Color::PURPLE,
            _ => return None,
        };
        Some(color)
    }

    /// Hue in degrees, saturation and value in 0.0 to 1.0.
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let h = h.rem_euclid(360.0);
        let s = s.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let c = v * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = v - c;

        // Each sector is 60 degrees, with different RGB component ordering
        let sector = (h / 60.0).floor() as u8 % 6;
        let (r, g, b) = match sector {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::new(r + m, g + m, b + m)
    }

    /// Linearly interpolate between two colors.
    /// `t` should be between 0.0 (returns `self`) and 1.0 (returns `other`).
    pub fn lerp(&self, other: &Color, t: f64) -> Self {
        let t = clamp_unit(t);
        let t_inv = 1.0 - t;
        Self {
            r: self.r * t_inv + other.r * t,
            g: self.g * t_inv + other.g * t,
            b: self.b * t_inv + other.b * t,
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Clamps every channel to 0.0 to 1.0. NaN becomes 0.0.
    pub fn clamped(&self) -> Self {
        Self::new(clamp_unit(self.r), clamp_unit(self.g), clamp_unit(self.b))
    }

    fn map2(&self, other: &Color, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }

    /// Composite `top` over `self` with the given blend mode and opacity.
    /// The result is always clamped.
    pub fn blend(&self, top: &Color, mode: BlendMode, opacity: f64) -> Self {
        let opacity = clamp_unit(opacity);
        let blended = match mode {
            BlendMode::Normal => self.lerp(top, opacity),
            BlendMode::Additive => *self + top.scale(opacity),
            BlendMode::Multiply => self.lerp(&(*self * *top), opacity),
            BlendMode::Overlay => self.lerp(&self.map2(top, overlay_channel), opacity),
        };
        blended.clamped()
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        self.map2(&rhs, |a, b| a + b)
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        self.map2(&rhs, |a, b| a * b)
    }
}

/// Photographic overlay: multiply if base < 0.5, screen otherwise.
fn overlay_channel(base: f64, top: f64) -> f64 {
    if base < 0.5 {
        2.0 * base * top
    } else {
        1.0 - 2.0 * (1.0 - base) * (1.0 - top)
    }
}

/// Clamps to 0.0 to 1.0, mapping NaN to 0.0 so it never reaches hardware.
#[inline]
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
