//! Architecture description types. These are read from a JSON architecture file and stay
//! read-only for the lifetime of a graph build.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::device_grid::Side;

/// One routing segment type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSpec {
    #[serde(default)]
    pub name: String,
    /// Number of tiles spanned before a new switch point is needed
    pub length: u32,
    /// Relative weight of this type among all segment types
    pub frequency: u32,
    /// Long lines span the whole device regardless of `length`
    #[serde(default)]
    pub longline: bool,
}

impl SegmentSpec {
    pub fn new(length: u32, frequency: u32) -> Self {
        Self {
            name: format!("L{}", length),
            length,
            frequency,
            longline: false,
        }
    }

    pub fn longline(length: u32, frequency: u32) -> Self {
        Self {
            name: "longline".into(),
            length,
            frequency,
            longline: true,
        }
    }
}

/// Polarity of a block pin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinClass {
    /// Output pin, driven by the block
    Driver,
    /// Input pin, driving into the block
    Receiver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Empty,
    Io,
    Logic,
}

/// Physical location of a pin on the perimeter of a block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinLocation {
    pub side: Side,
    /// Height slice, 0 at the anchor row of the block
    #[serde(default)]
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinSpec {
    pub class: PinClass,
    pub locations: Vec<PinLocation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockType {
    pub name: String,
    pub kind: BlockKind,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub pins: Vec<PinSpec>,
}

fn default_height() -> u32 {
    1
}

impl BlockType {
    pub fn empty() -> Self {
        Self {
            name: "EMPTY".into(),
            kind: BlockKind::Empty,
            height: 1,
            pins: Vec::new(),
        }
    }

    pub fn num_pins(&self) -> usize {
        self.pins.len()
    }

    /// Is `pin` physically present on `side` of the height slice `height`
    pub fn is_pin_present(&self, pin: usize, side: Side, height: u32) -> bool {
        self.pins
            .get(pin)
            .map(|p| {
                p.locations
                    .iter()
                    .any(|l| l.side == side && l.height == height)
            })
            .unwrap_or(false)
    }

    pub fn pin_class(&self, pin: usize) -> Option<PinClass> {
        self.pins.get(pin).map(|p| p.class)
    }
}

/// Channel widths, which may differ between X-direction and Y-direction channels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelWidth {
    pub x: u32,
    pub y: u32,
}

impl ChannelWidth {
    pub fn uniform(w: u32) -> Self {
        Self { x: w, y: w }
    }
}

/// Explicit placement of a block at an anchor position
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub x: u32,
    pub y: u32,
    pub block_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Core width (without the I/O ring)
    pub width: u32,
    /// Core height (without the I/O ring)
    pub height: u32,
    /// Block type placed on the border ring, corners excluded
    #[serde(default)]
    pub perimeter: Option<String>,
    /// Block type filling the core
    #[serde(default)]
    pub fill: Option<String>,
    /// Explicit placements. These take precedence over `perimeter` and `fill`.
    #[serde(default)]
    pub tiles: Vec<TilePlacement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    pub block_types: Vec<BlockType>,
    pub segments: Vec<SegmentSpec>,
    pub layout: Layout,
    pub channel_width: ChannelWidth,
}

impl Architecture {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Parse architecture description")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let inf = std::fs::File::open(path)
            .with_context(|| format!("Open architecture file {:?}", path))?;
        serde_json::from_reader(std::io::BufReader::new(inf))
            .with_context(|| format!("Parse architecture file {:?}", path))
    }
}
