//! Storage for the routing resource graph.
//!
//! Node storage is sized up front from a [`NodeCountEstimate`] and never grows past it, so a
//! wrong estimate shows up as an error instead of a silent reallocation.

use anyhow::{anyhow, Result};
use rrg_common::device_grid::Side;
use rrg_common::RrGraphError;
use serde::Serialize;
use std::collections::HashMap;

use crate::chan_details::TrackDirection;
use crate::estimate::NodeCountEstimate;

mod serialization;

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RrNodeKind {
    /// Virtual node driving an output pin
    Source,
    /// Virtual node fed by an input pin
    Sink,
    InputPin,
    OutputPin,
    /// X-direction routing wire
    ChanX,
    /// Y-direction routing wire
    ChanY,
}

pub const NUM_RR_NODE_KINDS: usize = 6;

pub const ALL_RR_NODE_KINDS: [RrNodeKind; NUM_RR_NODE_KINDS] = [
    RrNodeKind::Source,
    RrNodeKind::Sink,
    RrNodeKind::InputPin,
    RrNodeKind::OutputPin,
    RrNodeKind::ChanX,
    RrNodeKind::ChanY,
];

impl RrNodeKind {
    #[inline]
    pub(crate) fn to_idx(self) -> usize {
        match self {
            RrNodeKind::Source => 0,
            RrNodeKind::Sink => 1,
            RrNodeKind::InputPin => 2,
            RrNodeKind::OutputPin => 3,
            RrNodeKind::ChanX => 4,
            RrNodeKind::ChanY => 5,
        }
    }
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RrNodeId(pub u32);

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SwitchId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RrNode {
    pub kind: RrNodeKind,
    pub xlow: u32,
    pub ylow: u32,
    pub xhigh: u32,
    pub yhigh: u32,
    /// Pin index for pins and terminals, starting track index for wires
    pub ptc: u32,
    pub capacity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<TrackDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Segment type of a wire, which doubles as its cost index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<usize>,
    /// Track occupied at each position along a wire, starting from its driver
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub track_ids: Vec<u32>,
}

impl RrNode {
    pub fn terminal(kind: RrNodeKind, x: u32, y: u32, ptc: u32, side: Side) -> Self {
        Self {
            kind,
            xlow: x,
            ylow: y,
            xhigh: x,
            yhigh: y,
            ptc,
            capacity: 1,
            direction: None,
            side: Some(side),
            segment_id: None,
            track_ids: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RrEdge {
    pub from: RrNodeId,
    pub to: RrNodeId,
    pub switch: SwitchId,
}

/// Fast look-up key: what occupies a given resource at a given grid position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub kind: RrNodeKind,
    pub x: u32,
    pub y: u32,
    pub ptc: u32,
    pub side: Option<Side>,
}

#[derive(Debug)]
pub struct RrGraph {
    nodes: Vec<RrNode>,
    edges: Vec<RrEdge>,

    reserved: NodeCountEstimate,
    counts: NodeCountEstimate,

    lookup: HashMap<NodeKey, RrNodeId>,
}

impl RrGraph {
    /// Allocate exactly as many node slots as `reserved` asks for
    pub fn with_capacity(reserved: NodeCountEstimate) -> Self {
        Self {
            nodes: Vec::with_capacity(reserved.total()),
            edges: Vec::new(),
            reserved,
            counts: NodeCountEstimate::default(),
            lookup: HashMap::with_capacity(reserved.total()),
        }
    }

    pub fn add_node(&mut self, node: RrNode) -> Result<RrNodeId> {
        let kind = node.kind;
        if self.counts[kind] >= self.reserved[kind] {
            Err(RrGraphError::InternalInconsistency(format!(
                "more {:?} nodes than the {} estimated",
                kind, self.reserved[kind]
            )))?
        }
        let id = RrNodeId(
            self.nodes
                .len()
                .try_into()
                .map_err(|_| anyhow!("Node count exceeds u32::MAX"))?,
        );
        self.nodes.push(node);
        self.counts[kind] += 1;
        Ok(id)
    }

    /// Record that `id` occupies the resource described by `key`
    pub fn register(&mut self, key: NodeKey, id: RrNodeId) -> Result<()> {
        if let Some(existing) = self.lookup.insert(key, id) {
            Err(RrGraphError::InternalInconsistency(format!(
                "{:?} is claimed by both {:?} and {:?}",
                key, existing, id
            )))?
        }
        Ok(())
    }

    pub fn add_edge(&mut self, from: RrNodeId, to: RrNodeId, switch: SwitchId) -> Result<()> {
        for id in [from, to] {
            if id.0 as usize >= self.nodes.len() {
                Err(RrGraphError::InvalidInput(format!(
                    "edge endpoint {:?} does not exist ({} nodes)",
                    id,
                    self.nodes.len()
                )))?
            }
        }
        self.edges.push(RrEdge { from, to, switch });
        Ok(())
    }

    pub fn node(&self, id: RrNodeId) -> Option<&RrNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn nodes(&self) -> &[RrNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RrEdge] {
        &self.edges
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn out_edges(&self, id: RrNodeId) -> impl Iterator<Item = &RrEdge> {
        self.edges.iter().filter(move |e| e.from == id)
    }

    pub fn find_node(&self, key: &NodeKey) -> Option<RrNodeId> {
        self.lookup.get(key).copied()
    }

    /// Nodes added so far, per kind
    pub fn counts(&self) -> &NodeCountEstimate {
        &self.counts
    }

    /// Check every reserved slot got filled
    pub fn verify_counts(&self) -> Result<()> {
        if self.counts != self.reserved {
            Err(RrGraphError::InternalInconsistency(format!(
                "populated {:?} nodes but estimated {:?}",
                self.counts, self.reserved
            )))?
        }
        Ok(())
    }
}
