// EDB - Ethereum Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Memory snapshot representation
//!
//! Tracers disagree on how memory is reported: geth and hardhat emit a list of
//! 32-byte words, some tools emit one long hex string, and others emit an
//! arbitrary JSON structure. The shape is resolved once, while decoding, so
//! nothing downstream has to inspect raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Memory contents recorded for a single step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<Value>", into = "Option<Value>")]
pub enum Memory {
    /// No memory was recorded (missing, `null`, or an empty value)
    #[default]
    Absent,
    /// One encoded string covering the whole memory
    Encoded(String),
    /// A list of word-sized chunks
    Chunks(Vec<String>),
    /// Any other non-empty structure, kept verbatim
    Other(Value),
}

impl Memory {
    /// Whether this step carries no memory data at all
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<Value> for Memory {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(encoded) if encoded.is_empty() => Self::Absent,
            Value::String(encoded) => Self::Encoded(encoded),
            Value::Array(items) if items.is_empty() => Self::Absent,
            Value::Array(items) if items.iter().all(Value::is_string) => Self::Chunks(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(chunk) => Some(chunk),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Object(map) if map.is_empty() => Self::Absent,
            other => Self::Other(other),
        }
    }
}

impl From<Option<Value>> for Memory {
    fn from(value: Option<Value>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl From<Memory> for Option<Value> {
    fn from(memory: Memory) -> Self {
        match memory {
            Memory::Absent => None,
            Memory::Encoded(encoded) => Some(Value::String(encoded)),
            Memory::Chunks(chunks) => {
                Some(Value::Array(chunks.into_iter().map(Value::String).collect()))
            }
            Memory::Other(value) => Some(value),
        }
    }
}
