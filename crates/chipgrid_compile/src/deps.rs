//! Which custom types a root depends on, and in what order to build them.
//!
//! Nodes are custom types; an edge `a -> b` means a wired child of `a` has
//! type `b`. Standard types never appear: they are inlined, not built.

use crate::error::CompileError;
use chipgrid_ir::{ChipTypeData, TypeName};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet};

/// Custom types reachable from one root.
#[derive(Debug)]
pub struct TypeGraph {
    graph: DiGraph<TypeName, ()>,
    nodes: BTreeMap<TypeName, NodeIndex>,
}

impl TypeGraph {
    /// Walks the wired children of `root` and, recursively, of every custom
    /// type found.
    ///
    /// Unwired children are ignored, so a dead chip of an unknown type does
    /// not fail the build.
    pub fn build(root: &TypeName, types: &BTreeMap<TypeName, ChipTypeData>) -> Result<Self, CompileError> {
        let mut this = Self {
            graph: DiGraph::new(),
            nodes: BTreeMap::new(),
        };
        let mut work = vec![root.clone()];
        this.node(root);

        while let Some(owner) = work.pop() {
            let Some(data) = types.get(&owner) else {
                continue;
            };
            let from = this.node(&owner);
            for chip in data.content.connected_chips() {
                let Some(child) = types.get(&chip.type_name) else {
                    return Err(CompileError::UnknownType {
                        chip_type: chip.type_name.clone(),
                        owner: owner.clone(),
                        chip: chip.id.clone(),
                    });
                };
                if !child.is_composite() {
                    continue;
                }
                if !this.nodes.contains_key(&chip.type_name) {
                    work.push(chip.type_name.clone());
                }
                let to = this.node(&chip.type_name);
                this.graph.update_edge(from, to, ());
            }
        }
        Ok(this)
    }

    fn node(&mut self, name: &TypeName) -> NodeIndex {
        if let Some(&index) = self.nodes.get(name) {
            return index;
        }
        let index = self.graph.add_node(name.clone());
        self.nodes.insert(name.clone(), index);
        index
    }

    /// Number of custom types, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph holds no types.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `name` is reachable from the root.
    pub fn contains(&self, name: &TypeName) -> bool {
        self.nodes.contains_key(name)
    }

    /// Custom types used directly by wired children of `name`, in name order.
    pub fn dependencies(&self, name: &TypeName) -> Vec<TypeName> {
        let Some(&index) = self.nodes.get(name) else {
            return Vec::new();
        };
        let deps: BTreeSet<TypeName> = self.graph.neighbors(index).map(|n| self.graph[n].clone()).collect();
        deps.into_iter().collect()
    }

    /// Every type after all of its dependencies.
    ///
    /// Fails with the members of a cycle, in name order, if types contain
    /// each other.
    pub fn build_order(&self) -> Result<Vec<TypeName>, CompileError> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order.into_iter().rev().map(|n| self.graph[n].clone()).collect()),
            Err(cycle) => {
                let at = cycle.node_id();
                let members = tarjan_scc(&self.graph)
                    .into_iter()
                    .find(|scc| scc.contains(&at))
                    .unwrap_or_else(|| vec![at]);
                let mut cycle: Vec<TypeName> = members.into_iter().map(|n| self.graph[n].clone()).collect();
                cycle.sort();
                Err(CompileError::DependencyCycle { cycle })
            }
        }
    }
}
