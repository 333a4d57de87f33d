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

// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! tracewalk engine
//!
//! Turns a flat, depth-annotated execution trace into a call tree and drives
//! step-by-step exploration of it:
//!
//! - [`TraceTree`] rebuilds the nested call structure from step depths
//! - [`TraceNavigator`] owns the cursor over the linear step sequence
//! - [`render()`] turns a cursor position into a [`DisplayPayload`]
//! - [`InteractiveSession`] is the command loop tying them together
//! - [`acquire`] fetches or loads the step sequence in the first place

pub mod acquire;
pub mod error;
pub mod navigator;
pub mod render;
pub mod rpc;
pub mod session;
pub mod tree;

pub use acquire::{load_trace_file, parse_trace, parse_tx_hash, RawTrace};
pub use error::{AcquisitionError, SessionError};
pub use navigator::TraceNavigator;
pub use render::{
    render, render_with_tree, DisplayPayload, MemoryView, OpcodeLine, Position, StackView,
    StorageView, TraceRenderer, DEFAULT_WINDOW_RADIUS, MEMORY_LINE_WIDTH,
};
pub use rpc::TraceFetcher;
pub use session::{
    Command, CommandSource, InteractiveSession, Presenter, ScriptedCommands, SessionState,
    SessionSummary, FAREWELL_MESSAGE,
};
pub use tree::{TraceNode, TraceTree};
