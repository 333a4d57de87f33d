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

//! Display payload construction
//!
//! Rendering is a pure function of the step sequence and the cursor. The
//! result is plain data: the terminal UI, the plain text printer and any
//! other consumer (e.g. JSON) all work from the same [`DisplayPayload`].

use std::fmt;

use serde::Serialize;
use tracewalk_common::{Memory, StepRecord, Storage};

use crate::tree::TraceTree;

/// Number of steps shown on each side of the current one
pub const DEFAULT_WINDOW_RADIUS: usize = 2;

/// Width of one memory line, in characters (32 bytes, hex encoded)
pub const MEMORY_LINE_WIDTH: usize = 64;

/// Placeholder for a step without stack data
pub const EMPTY_STACK: &str = "Empty stack";
/// Placeholder for a step without memory data
pub const NO_MEMORY: &str = "No memory data";
/// Placeholder for a step without storage data
pub const NO_STORAGE: &str = "No storage changes";

/// One entry of the opcode context window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpcodeLine {
    /// Position of the step in the trace
    pub index: usize,
    /// Operation name
    pub op: String,
    /// Call depth of the step
    pub depth: u64,
    /// Whether this is the step under the cursor
    pub selected: bool,
}

/// Cursor position, displayed as `"<index+1> of <total>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Zero-based step index
    pub index: usize,
    /// Number of steps in the trace
    pub total: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(f, "0 of 0");
        }
        write!(f, "{} of {}", self.index + 1, self.total)
    }
}

/// Stack contents, top of stack first
///
/// A missing stack and an empty stack are both shown as [`StackView::Empty`];
/// tracers do not distinguish the two consistently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "lines", rename_all = "snake_case")]
pub enum StackView {
    /// Nothing on the stack
    Empty,
    /// Stack values, last pushed first
    Values(Vec<String>),
}

/// Memory contents as fixed-width lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "lines", rename_all = "snake_case")]
pub enum MemoryView {
    /// The step carries no memory data
    NoData,
    /// Memory lines
    Lines(Vec<String>),
}

/// Storage slots as `key: value` lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "lines", rename_all = "snake_case")]
pub enum StorageView {
    /// The step touched no storage
    NoChanges,
    /// One line per slot, in reported order
    Entries(Vec<String>),
}

macro_rules! impl_lines {
    ($view:ident, $placeholder_variant:ident, $lines_variant:ident, $placeholder:expr) => {
        impl $view {
            /// Lines to display, or a single placeholder line when there is no data
            pub fn lines(&self) -> Vec<&str> {
                match self {
                    Self::$placeholder_variant => vec![$placeholder],
                    Self::$lines_variant(lines) => lines.iter().map(String::as_str).collect(),
                }
            }

            /// Whether this section shows its placeholder instead of data
            pub fn is_placeholder(&self) -> bool {
                matches!(self, Self::$placeholder_variant)
            }
        }
    };
}

impl_lines!(StackView, Empty, Values, EMPTY_STACK);
impl_lines!(MemoryView, NoData, Lines, NO_MEMORY);
impl_lines!(StorageView, NoChanges, Entries, NO_STORAGE);

/// Everything a presentation layer needs to show one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayPayload {
    /// Cursor position
    pub position: Position,
    /// One-line summary of the current step
    pub summary: String,
    /// Operations of the enclosing calls, outermost first (empty without a tree)
    pub call_path: Vec<String>,
    /// Steps around the cursor
    pub opcodes: Vec<OpcodeLine>,
    /// Stack of the current step
    pub stack: StackView,
    /// Memory of the current step
    pub memory: MemoryView,
    /// Storage of the current step
    pub storage: StorageView,
}

/// Renderer with a fixed context window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRenderer {
    window_radius: usize,
}

impl Default for TraceRenderer {
    fn default() -> Self {
        Self { window_radius: DEFAULT_WINDOW_RADIUS }
    }
}

impl TraceRenderer {
    /// Create a renderer showing `window_radius` steps on each side of the cursor
    pub fn new(window_radius: usize) -> Self {
        Self { window_radius }
    }

    /// Context window radius
    pub fn window_radius(&self) -> usize {
        self.window_radius
    }

    /// Render the step at `current_index`, with call path context when a tree is given
    pub fn render(
        &self,
        steps: &[StepRecord],
        current_index: usize,
        tree: Option<&TraceTree<'_>>,
    ) -> DisplayPayload {
        let Some(last) = steps.len().checked_sub(1) else {
            return DisplayPayload {
                position: Position { index: 0, total: 0 },
                summary: String::new(),
                call_path: Vec::new(),
                opcodes: Vec::new(),
                stack: StackView::Empty,
                memory: MemoryView::NoData,
                storage: StorageView::NoChanges,
            };
        };

        let index = current_index.min(last);
        let step = &steps[index];

        DisplayPayload {
            position: Position { index, total: steps.len() },
            summary: format_summary(step),
            call_path: tree
                .map(|tree| tree.call_path(index).into_iter().map(str::to_string).collect())
                .unwrap_or_default(),
            opcodes: opcode_window(steps, index, self.window_radius),
            stack: format_stack(step.stack.as_deref()),
            memory: format_memory(&step.memory),
            storage: format_storage(step.storage.as_ref()),
        }
    }
}

/// Render the step at `current_index` of a linear sequence
pub fn render(steps: &[StepRecord], current_index: usize, window_radius: usize) -> DisplayPayload {
    TraceRenderer::new(window_radius).render(steps, current_index, None)
}

/// Render the step at `current_index`, including its call path from `tree`
pub fn render_with_tree(
    tree: &TraceTree<'_>,
    current_index: usize,
    window_radius: usize,
) -> DisplayPayload {
    TraceRenderer::new(window_radius).render(tree.steps(), current_index, Some(tree))
}

/// Steps in `[index - radius, index + radius]`, clamped to the trace bounds
fn opcode_window(steps: &[StepRecord], index: usize, radius: usize) -> Vec<OpcodeLine> {
    let start = index.saturating_sub(radius);
    let end = index.saturating_add(radius).min(steps.len() - 1);

    (start..=end)
        .map(|i| OpcodeLine {
            index: i,
            op: steps[i].op.clone(),
            depth: steps[i].depth,
            selected: i == index,
        })
        .collect()
}

fn format_summary(step: &StepRecord) -> String {
    let mut parts = Vec::new();
    if let Some(pc) = step.pc {
        parts.push(format!("pc {pc}"));
    }
    parts.push(step.op.clone());
    parts.push(format!("depth {}", step.depth));
    if let Some(gas) = step.gas {
        parts.push(format!("gas {gas}"));
    }
    if let Some(cost) = step.gas_cost {
        parts.push(format!("cost {cost}"));
    }
    if let Some(error) = &step.error {
        parts.push(format!("error: {error}"));
    }
    parts.join(" | ")
}

/// Reverse the stack so the top of the stack comes first
pub fn format_stack(stack: Option<&[String]>) -> StackView {
    match stack {
        Some(values) if !values.is_empty() => {
            StackView::Values(values.iter().rev().cloned().collect())
        }
        _ => StackView::Empty,
    }
}

/// Normalize memory into lines of [`MEMORY_LINE_WIDTH`] characters
///
/// - an encoded string is cut into consecutive chunks (the last may be shorter)
/// - word chunks are left-padded with `0`; longer chunks are kept as they are
/// - any other structure is pretty-printed as JSON
pub fn format_memory(memory: &Memory) -> MemoryView {
    match memory {
        Memory::Absent => MemoryView::NoData,
        Memory::Encoded(encoded) => {
            let chars: Vec<char> = encoded.chars().collect();
            MemoryView::Lines(
                chars.chunks(MEMORY_LINE_WIDTH).map(|chunk| chunk.iter().collect()).collect(),
            )
        }
        Memory::Chunks(chunks) => MemoryView::Lines(
            chunks
                .iter()
                .map(|chunk| format!("{chunk:0>width$}", width = MEMORY_LINE_WIDTH))
                .collect(),
        ),
        Memory::Other(value) => {
            let dump = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            MemoryView::Lines(dump.lines().map(str::to_string).collect())
        }
    }
}

/// One `key: value` line per touched slot
pub fn format_storage(storage: Option<&Storage>) -> StorageView {
    match storage {
        Some(slots) if !slots.is_empty() => StorageView::Entries(
            slots.iter().map(|(key, value)| format!("{key}: {value}")).collect(),
        ),
        _ => StorageView::NoChanges,
    }
}
