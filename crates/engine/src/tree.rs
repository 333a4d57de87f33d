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

//! Call tree reconstruction
//!
//! A flat trace only records the call depth of each step. The tree is rebuilt
//! in a single pass with a stack of open nodes: every step closes the open
//! nodes at its own depth or deeper, becomes the last child of whatever node
//! is left on top, and is then opened itself.
//!
//! The top-level nodes are the children of an implicit root whose depth sits
//! below every real depth. The root is never popped and never displayed.
//!
//! The builder does not validate anything. Any sequence of depths produces a
//! well-formed forest, even when it does not describe a sensible call tree.

use std::fmt::Write as _;

use tracewalk_common::StepRecord;
use tracing::debug;

/// A step together with the steps executed in calls it made
#[derive(Debug, Clone, PartialEq)]
pub struct TraceNode<'a> {
    /// The recorded step
    pub step: &'a StepRecord,
    /// Position of the step in the linear trace
    pub index: usize,
    /// Direct children, in execution order
    pub children: Vec<TraceNode<'a>>,
}

impl<'a> TraceNode<'a> {
    fn new(step: &'a StepRecord, index: usize) -> Self {
        Self { step, index, children: Vec::new() }
    }

    /// Number of nodes in this subtree, including this one
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(TraceNode::subtree_size).sum::<usize>()
    }
}

/// Call tree rebuilt from a flat step sequence
#[derive(Debug, Clone)]
pub struct TraceTree<'a> {
    steps: &'a [StepRecord],
    roots: Vec<TraceNode<'a>>,
    /// `parents[i]` is the index of the step that step `i` is nested under
    parents: Vec<Option<usize>>,
}

impl<'a> TraceTree<'a> {
    /// Rebuild the call tree of `steps`
    pub fn build(steps: &'a [StepRecord]) -> Self {
        let mut roots = Vec::new();
        let mut parents = Vec::with_capacity(steps.len());
        let mut open: Vec<TraceNode<'a>> = Vec::new();

        for (index, step) in steps.iter().enumerate() {
            // Equal depth is a sibling: close it so the new node lands on the shared parent
            while open.last().is_some_and(|top| top.step.depth >= step.depth) {
                close_top(&mut open, &mut roots);
            }

            parents.push(open.last().map(|parent| parent.index));
            open.push(TraceNode::new(step, index));
        }

        while !open.is_empty() {
            close_top(&mut open, &mut roots);
        }

        debug!("Built trace tree: {} steps, {} top-level nodes", steps.len(), roots.len());
        Self { steps, roots, parents }
    }

    /// Top-level nodes, i.e. the children of the implicit root
    pub fn roots(&self) -> &[TraceNode<'a>] {
        &self.roots
    }

    /// The linear step sequence the tree was built from
    pub fn steps(&self) -> &'a [StepRecord] {
        self.steps
    }

    /// Total number of nodes in the forest
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the forest has no nodes
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the step that `index` is nested under, if any
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    /// Operations of the enclosing steps of `index`, outermost first
    pub fn call_path(&self, index: usize) -> Vec<&'a str> {
        let mut path = Vec::new();
        let mut current = self.parent(index);
        while let Some(parent) = current {
            path.push(self.steps[parent].op.as_str());
            current = self.parent(parent);
        }
        path.reverse();
        path
    }

    /// All nodes in pre-order, which is the original execution order
    pub fn flatten(&self) -> Vec<&TraceNode<'a>> {
        let mut flat = Vec::with_capacity(self.len());
        let mut pending: Vec<&TraceNode<'a>> = self.roots.iter().rev().collect();
        while let Some(node) = pending.pop() {
            flat.push(node);
            pending.extend(node.children.iter().rev());
        }
        flat
    }

    /// Indented outline of the forest, one step per line
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for node in self.flatten() {
            let indent = self.call_path(node.index).len();
            let _ = writeln!(
                out,
                "{:indent$}{} (depth {}, step {})",
                "",
                node.step.op,
                node.step.depth,
                node.index + 1,
                indent = indent * 2
            );
        }
        out
    }
}

/// Pop the top open node and attach it to its parent (or to the root)
fn close_top<'a>(open: &mut Vec<TraceNode<'a>>, roots: &mut Vec<TraceNode<'a>>) {
    if let Some(node) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}
