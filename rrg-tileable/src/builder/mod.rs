//! Construction of a tileable routing graph with unidirectional wires.
//!
//! Nodes are created here. Edges beyond the pin-to-terminal ones come from the connection stages
//! handed to [`build_tileable_unidir_rr_graph`], which run once every node is in place.

use anyhow::{anyhow, Context, Result};
use itertools::iproduct;
use log::{debug, info};
use rrg_common::arch::{BlockKind, ChannelWidth, PinClass, SegmentSpec};
use rrg_common::device_grid::{BlockTypeIndex, DeviceGrid};
use rrg_common::RrGraphError;

use crate::chan_details::strip::{ChannelStrip, DeviceChannels};
use crate::chan_details::TrackDirection;
use crate::estimate::count_rr_nodes;
use crate::pins::{active_pin_sides, enumerate_grid_pins};
use crate::rr_graph::{NodeKey, RrGraph, RrNode, RrNodeKind, SwitchId};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub chan_width: ChannelWidth,
    /// Switch used between pins and their terminals
    pub delayless_switch: SwitchId,
}

impl BuildOptions {
    pub fn new(chan_width: ChannelWidth) -> Self {
        Self {
            chan_width,
            delayless_switch: SwitchId(0),
        }
    }
}

/// Everything a connection stage may look at while adding edges
pub struct StageContext<'a> {
    pub grid: &'a DeviceGrid,
    pub segments: &'a [SegmentSpec],
    pub channels: &'a DeviceChannels,
    pub options: &'a BuildOptions,
}

/// A pass adding edges to a fully populated graph, such as pin-to-track or switch block wiring.
pub trait ConnectionStage {
    fn name(&self) -> &str;

    fn connect(&self, ctx: &StageContext<'_>, graph: &mut RrGraph) -> Result<()>;
}

pub fn build_tileable_unidir_rr_graph(
    grid: &DeviceGrid,
    segments: &[SegmentSpec],
    options: &BuildOptions,
    stages: &[Box<dyn ConnectionStage>],
) -> Result<RrGraph> {
    let channels = DeviceChannels::build(grid.extent(), options.chan_width, segments)
        .context("Build channel layouts")?;
    let estimate = count_rr_nodes(grid, &channels).context("Estimate routing graph size")?;

    let mut graph = RrGraph::with_capacity(estimate);

    info!("Add pin nodes");
    add_pin_nodes(grid, options.delayless_switch, &mut graph).context("Add pin nodes")?;

    info!("Add channel nodes");
    add_chan_nodes(&channels.chanx, RrNodeKind::ChanX, channels.chanx_rows(), &mut graph)
        .context("Add X channel nodes")?;
    add_chan_nodes(&channels.chany, RrNodeKind::ChanY, channels.chany_columns(), &mut graph)
        .context("Add Y channel nodes")?;

    graph.verify_counts()?;

    let ctx = StageContext {
        grid,
        segments,
        channels: &channels,
        options,
    };
    for stage in stages.iter() {
        info!("Run connection stage {:?}", stage.name());
        stage
            .connect(&ctx, &mut graph)
            .with_context(|| anyhow!("Connection stage {:?}", stage.name()))?;
    }

    info!(
        "Built routing graph with {} nodes and {} edges",
        graph.num_nodes(),
        graph.num_edges()
    );

    Ok(graph)
}

fn add_pin_nodes(grid: &DeviceGrid, switch: SwitchId, graph: &mut RrGraph) -> Result<()> {
    for ((x, y), cell) in grid.iter_cell_coords() {
        if !cell.is_anchor() || cell.block_type == BlockTypeIndex::EMPTY {
            continue;
        }
        let block_type = grid.block_type_at(x, y)?;
        if block_type.kind == BlockKind::Empty {
            continue;
        }
        let sides = active_pin_sides(grid, x, y)?;

        for class in [PinClass::Driver, PinClass::Receiver] {
            for grid_pin in enumerate_grid_pins(block_type, class, sides)? {
                let py = y + grid_pin.height;
                let (terminal_kind, pin_kind) = match class {
                    PinClass::Driver => (RrNodeKind::Source, RrNodeKind::OutputPin),
                    PinClass::Receiver => (RrNodeKind::Sink, RrNodeKind::InputPin),
                };

                let terminal = graph.add_node(RrNode::terminal(
                    terminal_kind,
                    x,
                    py,
                    grid_pin.pin,
                    grid_pin.side,
                ))?;
                let pin =
                    graph.add_node(RrNode::terminal(pin_kind, x, py, grid_pin.pin, grid_pin.side))?;

                for (kind, id) in [(terminal_kind, terminal), (pin_kind, pin)] {
                    graph.register(
                        NodeKey {
                            kind,
                            x,
                            y: py,
                            ptc: grid_pin.pin,
                            side: Some(grid_pin.side),
                        },
                        id,
                    )?;
                }

                match class {
                    PinClass::Driver => graph.add_edge(terminal, pin, switch)?,
                    PinClass::Receiver => graph.add_edge(pin, terminal, switch)?,
                }
            }
        }
    }

    Ok(())
}

/// Create one node per starting track of every channel position along `lines` parallel strips.
fn add_chan_nodes(
    strip: &ChannelStrip,
    kind: RrNodeKind,
    lines: u32,
    graph: &mut RrGraph,
) -> Result<()> {
    let span = strip.span();

    for (line, pos) in iproduct!(0..lines, 1..=span) {
        let layout = strip.layout_at(pos)?;

        for track in layout.tracks().iter().filter(|t| t.is_start) {
            let reach = match track.direction {
                TrackDirection::Increasing => span - pos + 1,
                TrackDirection::Decreasing => pos,
            };
            let len = std::cmp::min(layout.group_remaining(track), reach);

            let track_ids = (0..len)
                .map(|step| layout.rotated_track(track, step))
                .collect::<Option<Vec<u32>>>()
                .ok_or_else(|| {
                    RrGraphError::InternalInconsistency(format!(
                        "track {} at position {} has no rotation for its {} positions",
                        track.index, pos, len
                    ))
                })?;

            let (low, high) = match track.direction {
                TrackDirection::Increasing => (pos, pos + len - 1),
                TrackDirection::Decreasing => (pos + 1 - len, pos),
            };
            let ((xlow, ylow), (xhigh, yhigh)) = match kind {
                RrNodeKind::ChanX => ((low, line), (high, line)),
                _ => ((line, low), (line, high)),
            };

            let id = graph.add_node(RrNode {
                kind,
                xlow,
                ylow,
                xhigh,
                yhigh,
                ptc: track.index,
                capacity: 1,
                direction: Some(track.direction),
                side: None,
                segment_id: Some(track.segment_id),
                track_ids: track_ids.clone(),
            })?;

            for (step, occupied) in track_ids.into_iter().enumerate() {
                let step = step as u32;
                let at = match track.direction {
                    TrackDirection::Increasing => pos + step,
                    TrackDirection::Decreasing => pos - step,
                };
                let (x, y) = match kind {
                    RrNodeKind::ChanX => (at, line),
                    _ => (line, at),
                };
                graph.register(
                    NodeKey {
                        kind,
                        x,
                        y,
                        ptc: occupied,
                        side: None,
                    },
                    id,
                )?;
            }
        }
    }

    debug!("Added {} {:?} nodes", graph.counts()[kind], kind);

    Ok(())
}
