// src/dag/frontier.rs

//! Repeated extraction of ready nodes from a shrinking dependency graph.

use std::collections::BTreeSet;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use crate::dag::node::NodeId;

/// Mutable copy of a dependency graph plus the worklist of nodes not yet
/// taken.
///
/// Edges point from a node to its dependencies, so a node is *ready* once
/// it has no outgoing edge left. Taking a node removes it from the graph,
/// which can only unblock its dependents on the *next* call to
/// [`take_ready`](Self::take_ready).
#[derive(Debug)]
pub struct Frontier {
    live: StableDiGraph<NodeId, ()>,
    pending: BTreeSet<NodeId>,
}

impl Frontier {
    /// Build a frontier from per-node dependency lists, in id order.
    pub fn new<'a, I>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = &'a [NodeId]>,
    {
        let adjacency: Vec<&[NodeId]> = adjacency.into_iter().collect();
        let mut live = StableDiGraph::with_capacity(adjacency.len(), 0);

        for id in 0..adjacency.len() {
            live.add_node(id);
        }
        for (id, deps) in adjacency.iter().enumerate() {
            for &dep in deps.iter() {
                if dep < adjacency.len() {
                    live.add_edge(NodeIndex::new(id), NodeIndex::new(dep), ());
                }
            }
        }

        Self {
            live,
            pending: (0..adjacency.len()).collect(),
        }
    }

    /// Drop a node from both the worklist and the graph without handing it
    /// out (used for nodes launched elsewhere).
    pub fn exclude(&mut self, id: NodeId) {
        if self.pending.remove(&id) {
            self.live.remove_node(NodeIndex::new(id));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of nodes still waiting to be taken.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// One scan: remove and return every pending node with no remaining
    /// dependency in the live graph, in id order.
    ///
    /// Returns an empty vector when nothing is ready, which for a non-empty
    /// frontier means the remaining nodes form a cycle.
    pub fn take_ready(&mut self) -> Vec<NodeId> {
        let ready: Vec<NodeId> = self
            .pending
            .iter()
            .copied()
            .filter(|&id| {
                self.live
                    .neighbors_directed(NodeIndex::new(id), Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .collect();

        for &id in ready.iter() {
            self.exclude(id);
        }
        ready
    }
}
