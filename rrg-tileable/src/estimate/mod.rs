//! Exact node counts for a tileable routing graph, computed before any node is created.

use anyhow::{Context, Result};
use log::info;
use rrg_common::arch::{BlockKind, ChannelWidth, PinClass, SegmentSpec};
use rrg_common::device_grid::{BlockTypeIndex, DeviceGrid};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::ops::{Index, IndexMut};

use crate::chan_details::strip::DeviceChannels;
use crate::pins::{active_pin_sides, count_grid_pins};
use crate::rr_graph::{RrNodeKind, ALL_RR_NODE_KINDS, NUM_RR_NODE_KINDS};

#[cfg(test)]
mod tests;

/// Number of nodes of every kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeCountEstimate([usize; NUM_RR_NODE_KINDS]);

impl NodeCountEstimate {
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RrNodeKind, usize)> + '_ {
        ALL_RR_NODE_KINDS.iter().map(move |kind| (*kind, self[*kind]))
    }
}

impl Index<RrNodeKind> for NodeCountEstimate {
    type Output = usize;

    fn index(&self, kind: RrNodeKind) -> &usize {
        &self.0[kind.to_idx()]
    }
}

impl IndexMut<RrNodeKind> for NodeCountEstimate {
    fn index_mut(&mut self, kind: RrNodeKind) -> &mut usize {
        &mut self.0[kind.to_idx()]
    }
}

impl Serialize for NodeCountEstimate {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut map = s.serialize_map(Some(NUM_RR_NODE_KINDS))?;
        for (kind, count) in self.iter() {
            map.serialize_entry(&kind, &count)?;
        }
        map.end()
    }
}

/// Estimate the number of routing graph nodes of every kind for `grid`.
pub fn estimate_num_rr_nodes(
    grid: &DeviceGrid,
    chan_width: ChannelWidth,
    segments: &[SegmentSpec],
) -> Result<NodeCountEstimate> {
    let channels = DeviceChannels::build(grid.extent(), chan_width, segments)?;
    count_rr_nodes(grid, &channels)
}

/// Node counts for `grid` with channel layouts that were already built
pub fn count_rr_nodes(grid: &DeviceGrid, channels: &DeviceChannels) -> Result<NodeCountEstimate> {
    let mut counts = NodeCountEstimate::default();

    for ((x, y), cell) in grid.iter_cell_coords() {
        if !cell.is_anchor() || cell.block_type == BlockTypeIndex::EMPTY {
            continue;
        }
        let block_type = grid.block_type_at(x, y)?;
        if block_type.kind == BlockKind::Empty {
            continue;
        }

        let sides = active_pin_sides(grid, x, y)
            .with_context(|| format!("Pin sides of the block at ({}, {})", x, y))?;
        counts[RrNodeKind::OutputPin] += count_grid_pins(block_type, PinClass::Driver, sides)?;
        counts[RrNodeKind::InputPin] += count_grid_pins(block_type, PinClass::Receiver, sides)?;
    }

    // One virtual terminal per physical pin
    counts[RrNodeKind::Source] = counts[RrNodeKind::OutputPin];
    counts[RrNodeKind::Sink] = counts[RrNodeKind::InputPin];

    counts[RrNodeKind::ChanX] =
        channels.chanx_rows() as usize * channels.chanx.num_starting_tracks();
    counts[RrNodeKind::ChanY] =
        channels.chany_columns() as usize * channels.chany.num_starting_tracks();

    info!("Estimated {} routing nodes: {:?}", counts.total(), counts);

    Ok(counts)
}
