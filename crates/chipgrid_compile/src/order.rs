//! Ordering the children of one custom type for emission.
//!
//! Each wired child gets a score: `seed` if any wire into it comes from
//! another child, zero otherwise. Each relaxation round then adds the current
//! score of every child driving one of its inputs, updating in place and
//! walking children in id order.
//!
//! Scores saturate after a fixed number of rounds, so they cannot order deep
//! chains on their own. When the wired children form no loop, emission
//! follows a topological order of the wire graph and scores only break ties
//! between children that are ready at the same time. Loops are found with a
//! strongly connected component pass and reported; a graph with loops is
//! emitted by ascending score, ties in id order.

use crate::compiler::CompileSettings;
use chipgrid_ir::{ChipContent, ChipId, Connection, TypeName};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet};

/// The emission plan for one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipOrder {
    /// Wired children in emission order.
    pub order: Vec<ChipId>,
    /// Final score of each wired child.
    pub scores: BTreeMap<ChipId, u64>,
    /// Children without wires, in id order. They are not emitted.
    pub dead: Vec<ChipId>,
    /// Groups of children that drive each other, each in id order.
    pub loops: Vec<Vec<ChipId>>,
}

/// Wires that drive an input of `chip`.
pub fn inputs_of<'a>(content: &'a ChipContent, chip: &'a ChipId) -> impl Iterator<Item = &'a Connection> + 'a {
    content
        .connections
        .iter()
        .filter(move |c| !c.target.output && c.target.chip == *chip)
}

/// Wires driven by an output of `chip`.
pub fn outputs_of<'a>(content: &'a ChipContent, chip: &'a ChipId) -> impl Iterator<Item = &'a Connection> + 'a {
    content
        .connections
        .iter()
        .filter(move |c| c.source.output && c.source.chip == *chip)
}

/// Plans the emission order of the children of `owner`.
pub fn order_chips(owner: &TypeName, content: &ChipContent, settings: &CompileSettings) -> ChipOrder {
    let live: Vec<ChipId> = content.connected_chips().map(|c| c.id.clone()).collect();
    let dead: Vec<ChipId> = content
        .chips
        .keys()
        .filter(|id| !live.contains(id))
        .cloned()
        .collect();

    let mut scores: BTreeMap<ChipId, u64> = live
        .iter()
        .map(|id| {
            let fed = inputs_of(content, id).any(|c| !c.source.chip.is_boundary_of(owner));
            (id.clone(), if fed { settings.seed_score } else { 0 })
        })
        .collect();

    for _ in 0..settings.relaxation_rounds {
        for id in &live {
            let gain = inputs_of(content, id)
                .map(|c| scores.get(&c.source.chip).copied().unwrap_or(0))
                .fold(0u64, u64::saturating_add);
            if let Some(score) = scores.get_mut(id) {
                *score = score.saturating_add(gain);
            }
        }
    }

    let graph = ChipGraph::build(content, &live);
    let loops = graph.feedback_loops();
    let order = if loops.is_empty() {
        graph.drivers_first(&scores)
    } else {
        let mut order = live.clone();
        order.sort_by_key(|id| scores.get(id).copied().unwrap_or(0));
        order
    };

    ChipOrder {
        order,
        scores,
        dead,
        loops,
    }
}

/// Wired children and the wires between them.
struct ChipGraph {
    graph: DiGraph<ChipId, ()>,
}

impl ChipGraph {
    fn build(content: &ChipContent, live: &[ChipId]) -> Self {
        let mut graph: DiGraph<ChipId, ()> = DiGraph::new();
        let nodes: BTreeMap<&ChipId, NodeIndex> = live.iter().map(|id| (id, graph.add_node(id.clone()))).collect();
        for con in &content.connections {
            if let (Some(&from), Some(&to)) = (nodes.get(&con.source.chip), nodes.get(&con.target.chip)) {
                graph.update_edge(from, to, ());
            }
        }
        Self { graph }
    }

    fn feedback_loops(&self) -> Vec<Vec<ChipId>> {
        let graph = &self.graph;
        let mut loops: Vec<Vec<ChipId>> = tarjan_scc(graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut ids: Vec<ChipId> = scc.into_iter().map(|n| graph[n].clone()).collect();
                ids.sort();
                ids
            })
            .collect();
        loops.sort();
        loops
    }

    /// Topological order of an acyclic graph. Among children whose drivers
    /// are all placed, the lowest score goes first, then the lowest id.
    fn drivers_first(&self, scores: &BTreeMap<ChipId, u64>) -> Vec<ChipId> {
        let graph = &self.graph;
        let key = |n: NodeIndex| (scores.get(&graph[n]).copied().unwrap_or(0), graph[n].clone(), n);

        let mut pending: BTreeMap<NodeIndex, usize> = graph
            .node_indices()
            .map(|n| (n, graph.neighbors_directed(n, Direction::Incoming).count()))
            .collect();
        let mut ready: BTreeSet<(u64, ChipId, NodeIndex)> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(&n, _)| key(n))
            .collect();

        let mut order = Vec::with_capacity(graph.node_count());
        while let Some((_, id, n)) = ready.pop_first() {
            order.push(id);
            for next in graph.neighbors_directed(n, Direction::Outgoing) {
                if let Some(count) = pending.get_mut(&next) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(key(next));
                    }
                }
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chipgrid_common::Vec2;
    use chipgrid_ir::{Chip, Pin};

    fn owner() -> TypeName {
        TypeName::new("top")
    }

    fn content(chips: &[&str], wires: &[(&str, &str)]) -> ChipContent {
        let mut content = ChipContent::new(Vec2::new(4, 4));
        for id in chips {
            content.chips.insert(ChipId::new(id), Chip::new(*id, "and", Vec2::ZERO));
        }
        for (from, to) in wires {
            let source = if *from == "top" {
                Pin::input("top", "X")
            } else {
                Pin::output(*from, "R")
            };
            let target = if *to == "top" {
                Pin::output("top", "Z")
            } else {
                Pin::input(*to, "A")
            };
            content.connections.push(Connection::new(source, target, 0));
        }
        content
    }

    fn ids(order: &[ChipId]) -> Vec<&str> {
        order.iter().map(ChipId::as_str).collect()
    }

    #[test]
    fn chain_orders_drivers_first() {
        let c = content(&["a", "b", "c"], &[("top", "a"), ("a", "b"), ("b", "c"), ("c", "top")]);
        let plan = order_chips(&owner(), &c, &CompileSettings::default());
        assert_eq!(ids(&plan.order), ["a", "b", "c"]);
        assert!(plan.loops.is_empty());
    }

    #[test]
    fn chain_against_id_order() {
        let c = content(&["x", "y", "z"], &[("top", "z"), ("z", "y"), ("y", "x")]);
        let plan = order_chips(&owner(), &c, &CompileSettings::default());
        assert_eq!(ids(&plan.order), ["z", "y", "x"]);
        assert_eq!(plan.scores[&ChipId::new("z")], 0);
        assert!(plan.scores[&ChipId::new("x")] > plan.scores[&ChipId::new("y")]);
    }

    #[test]
    fn deep_chain_against_id_order_keeps_drivers_first() {
        let names: Vec<String> = (0..13).map(|i| format!("g{i:02}")).collect();
        let chips: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut wires = vec![("top", chips[12])];
        for i in (1..13).rev() {
            wires.push((chips[i], chips[i - 1]));
        }
        let c = content(&chips, &wires);
        let plan = order_chips(&owner(), &c, &CompileSettings::default());

        let expected: Vec<&str> = chips.iter().rev().copied().collect();
        assert_eq!(ids(&plan.order), expected);
        assert_eq!(plan.scores[&ChipId::new("g00")], plan.scores[&ChipId::new("g01")]);
    }

    #[test]
    fn ready_chips_are_ordered_by_score_then_id() {
        let c = content(
            &["a", "b", "c", "d"],
            &[("top", "d"), ("top", "c"), ("d", "b"), ("c", "a"), ("b", "a")],
        );
        let plan = order_chips(&owner(), &c, &CompileSettings::default());
        assert_eq!(ids(&plan.order), ["c", "d", "b", "a"]);
    }

    #[test]
    fn boundary_fed_chips_start_at_zero() {
        let c = content(&["a"], &[("top", "a")]);
        let plan = order_chips(&owner(), &c, &CompileSettings::default());
        assert_eq!(plan.scores[&ChipId::new("a")], 0);
    }

    #[test]
    fn unwired_chips_are_dead() {
        let c = content(&["a", "b", "idle"], &[("a", "b")]);
        let plan = order_chips(&owner(), &c, &CompileSettings::default());
        assert_eq!(ids(&plan.dead), ["idle"]);
        assert_eq!(plan.order.len(), 2);
    }

    #[test]
    fn loops_are_found_and_scores_saturate() {
        let c = content(&["a", "b", "c"], &[("a", "b"), ("b", "a"), ("c", "c")]);
        let settings = CompileSettings {
            relaxation_rounds: 200,
            ..CompileSettings::default()
        };
        let plan = order_chips(&owner(), &c, &settings);
        assert_eq!(plan.loops.len(), 2);
        assert_eq!(ids(&plan.loops[0]), ["a", "b"]);
        assert_eq!(ids(&plan.loops[1]), ["c"]);
        assert_eq!(plan.scores[&ChipId::new("a")], u64::MAX);
    }
}
