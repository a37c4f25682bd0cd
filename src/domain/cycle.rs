//! Cycle detection over the dependency graph.
//!
//! The search is an iterative depth-first traversal: each stack frame holds a
//! node and the index of the next outgoing edge to explore, so arbitrarily
//! deep dependency chains never touch the call stack.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::graph::DependencyGraph;

/// A closed dependency path. The first and last entries are the same module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cycle {
    path: Vec<String>,
}

impl Cycle {
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Number of distinct modules on the cycle.
    pub fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.path.iter().any(|m| m == name)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.join(" → "))
    }
}

#[derive(Clone, Copy)]
struct Frame<'a> {
    node: &'a str,
    next: usize,
}

/// Find the first dependency cycle, or `None` if the graph is acyclic.
///
/// Start nodes are taken in ascending name order and edges in stored order, so
/// the reported cycle is reproducible. Only the first cycle is returned.
pub fn find_cycle(graph: &DependencyGraph) -> Option<Cycle> {
    let mut visited: HashSet<&str> = HashSet::with_capacity(graph.module_count());
    let mut on_stack: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();

    for start in graph.nodes() {
        if !visited.insert(start) {
            continue;
        }
        on_stack.insert(start);
        stack.push(Frame {
            node: start,
            next: 0,
        });

        while let Some(&Frame { node, next }) = stack.last() {
            let Some(dep) = graph.dependencies(node).get(next) else {
                on_stack.remove(node);
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.next += 1;
            }

            let dep = dep.as_str();
            if on_stack.contains(dep) {
                let from = stack
                    .iter()
                    .position(|frame| frame.node == dep)
                    .unwrap_or_default();
                let mut path: Vec<String> =
                    stack[from..].iter().map(|frame| frame.node.to_string()).collect();
                path.push(dep.to_string());
                return Some(Cycle { path });
            }

            if visited.insert(dep) {
                on_stack.insert(dep);
                stack.push(Frame { node: dep, next: 0 });
            }
        }
    }

    None
}
