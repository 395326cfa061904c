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
use std::sync::Arc;

use super::color::Color;
use super::palette;
use super::types::Axis;

/// A single effect parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Color(Color),
    Colors(Vec<Color>),
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<Color> for ParamValue {
    fn from(value: Color) -> Self {
        ParamValue::Color(value)
    }
}

impl From<Vec<Color>> for ParamValue {
    fn from(value: Vec<Color>) -> Self {
        ParamValue::Colors(value)
    }
}

/// Immutable effect parameters. Setting a value returns a new instance; the
/// underlying map is shared until then.
///
/// Every getter takes the default to use when the key is missing or holds a
/// value of the wrong kind, so each effect documents its own defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectParams {
    values: Arc<HashMap<String, ParamValue>>,
}

impl EffectParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: HashMap<String, ParamValue>) -> Self {
        Self {
            values: Arc::new(values),
        }
    }

    /// Returns a copy of these parameters with `key` set to `value`.
    pub fn with(&self, key: &str, value: impl Into<ParamValue>) -> Self {
        let mut values = (*self.values).clone();
        values.insert(key.to_string(), value.into());
        Self::from_map(values)
    }

    /// Returns a copy of these parameters without `key`.
    pub fn without(&self, key: &str) -> Self {
        if !self.values.contains_key(key) {
            return self.clone();
        }
        let mut values = (*self.values).clone();
        values.remove(key);
        Self::from_map(values)
    }

    /// Looks up `key` exactly, then ignoring ASCII case.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key).or_else(|| {
            self.values
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Finite float value. Ints are widened.
    pub fn float(&self, key: &str, default: f64) -> f64 {
        self.try_float(key).unwrap_or(default)
    }

    pub fn try_float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            ParamValue::Float(v) if v.is_finite() => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer value. Finite floats are truncated.
    pub fn int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(ParamValue::Int(v)) => *v,
            Some(ParamValue::Float(v)) if v.is_finite() => v.trunc() as i64,
            _ => default,
        }
    }

    pub fn bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(ParamValue::Bool(v)) => *v,
            _ => default,
        }
    }

    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get(key) {
            Some(ParamValue::Text(v)) => v.as_str(),
            _ => default,
        }
    }

    /// Color value. Hex strings and color names are accepted as text.
    pub fn color(&self, key: &str, default: Color) -> Color {
        match self.get(key) {
            Some(ParamValue::Color(c)) => *c,
            Some(ParamValue::Text(text)) => Color::from_name(text)
                .or_else(|| Color::from_hex(text).ok())
                .unwrap_or(default),
            _ => default,
        }
    }

    /// Color list. A single color becomes a one-stop list and text names a
    /// built-in palette. An empty list falls back to the default.
    pub fn colors(&self, key: &str, default: &[Color]) -> Vec<Color> {
        match self.get(key) {
            Some(ParamValue::Colors(list)) if !list.is_empty() => list.clone(),
            Some(ParamValue::Color(c)) => vec![*c],
            Some(ParamValue::Text(name)) => palette::named(name)
                .map(<[Color]>::to_vec)
                .unwrap_or_else(|| default.to_vec()),
            _ => default.to_vec(),
        }
    }

    pub fn axis(&self, key: &str, default: Axis) -> Axis {
        match self.get(key) {
            Some(ParamValue::Text(name)) => Axis::parse(name).unwrap_or(default),
            _ => default,
        }
    }
}
