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

use crate::lighting::EngineError;

/// Typed error for rig config failures so callers can tell a bad file from a
/// bad effect reference without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Config serialization error: {0}")]
    Serialize(#[from] serde_yml::Error),
    #[error("Unknown {kind} effect '{id}' in layer {index}")]
    UnknownEffect {
        kind: &'static str,
        id: String,
        index: usize,
    },
    #[error("Invalid color '{value}' for parameter '{key}'")]
    InvalidColor { key: String, value: String },
    #[error("Fixture '{name}' has no channels; set `channels` or a known `type`")]
    NoChannels { name: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
}
