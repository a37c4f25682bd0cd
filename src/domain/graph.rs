//! Dependency graph construction.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::manifest::ManifestSet;

/// Directed graph from each module to the known modules it references.
///
/// Every known module is a key, including modules with no internal edges.
/// Targets keep the order in which the manifest first declared them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the graph, dropping references to modules outside the set.
    ///
    /// External references (packages, `GUID:` references, typos) are not an
    /// error; they are simply not tracked. A reference repeated within one
    /// manifest produces a single edge.
    pub fn build(manifests: &ManifestSet) -> Self {
        let mut edges = BTreeMap::new();

        for (name, manifest) in manifests.iter() {
            let mut targets: Vec<String> = Vec::with_capacity(manifest.references.len());
            for reference in &manifest.references {
                if manifests.contains(reference) && !targets.contains(reference) {
                    targets.push(reference.clone());
                }
            }
            edges.insert(name.clone(), targets);
        }

        Self { edges }
    }

    /// Module names in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Outgoing edges of `name` in declaration order; empty for unknown names.
    pub fn dependencies(&self, name: &str) -> &[String] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All edges as `(source, target)`, sources ascending.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from.as_str(), to.as_str())))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    pub fn module_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
