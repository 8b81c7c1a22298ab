//! Enumeration of the block pins that take part in the routing graph.

use anyhow::{anyhow, Context, Result};
use rrg_common::arch::{BlockKind, BlockType, PinClass};
use rrg_common::device_grid::{DeviceExtent, DeviceGrid, Side, ALL_SIDES};
use rrg_common::RrGraphError;


/// Sides of a block whose pins connect to the routing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinSides {
    /// Perimeter I/O blocks only face the core on one side
    Only(Side),
    All,
}

impl PinSides {
    #[inline]
    pub fn contains(self, side: Side) -> bool {
        match self {
            PinSides::Only(s) => s == side,
            PinSides::All => true,
        }
    }
}

/// One physical pin location on a block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPin {
    pub side: Side,
    pub height: u32,
    pub pin: u32,
}

/// Determine which side of an I/O block on the device border faces the core.
///
/// I/O blocks on the top row only have bottom side pins, on the right column only left side pins,
/// and so on. Corners and positions off the border are not valid I/O placements.
pub fn determine_io_pin_side(extent: DeviceExtent, x: u32, y: u32) -> Result<Side> {
    let top = y + 1 == extent.height;
    let bottom = y == 0;
    let right = x + 1 == extent.width;
    let left = x == 0;

    if (top || bottom) && (left || right) {
        Err(RrGraphError::Unsupported(format!(
            "I/O block at ({}, {}) is on a corner of the device",
            x, y
        )))?
    }

    if top {
        Ok(Side::Bottom)
    } else if right {
        Ok(Side::Left)
    } else if bottom {
        Ok(Side::Top)
    } else if left {
        Ok(Side::Right)
    } else {
        Err(anyhow!(RrGraphError::Unsupported(format!(
            "I/O block at ({}, {}) is in the center part of the device",
            x, y
        ))))
    }
}

/// Sides contributing pins for the block anchored at (x, y)
pub fn active_pin_sides(grid: &DeviceGrid, x: u32, y: u32) -> Result<PinSides> {
    let block_type = grid.block_type_at(x, y)?;
    match block_type.kind {
        BlockKind::Io => Ok(PinSides::Only(
            determine_io_pin_side(grid.extent(), x, y)
                .with_context(|| anyhow!("I/O block {:?}", block_type.name))?,
        )),
        BlockKind::Logic | BlockKind::Empty => Ok(PinSides::All),
    }
}

/// Pins of `class` physically present on `side` of the height slice `height`
pub fn grid_side_pins(block_type: &BlockType, class: PinClass, side: Side, height: u32) -> Vec<u32> {
    (0..block_type.num_pins())
        .filter(|ipin| {
            block_type.is_pin_present(*ipin, side, height)
                && block_type.pin_class(*ipin) == Some(class)
        })
        .map(|ipin| ipin as u32)
        .collect()
}

/// All pin locations of `class` on the allowed sides, side by side and then slice by slice.
pub fn enumerate_grid_pins(
    block_type: &BlockType,
    class: PinClass,
    sides: PinSides,
) -> Result<Vec<GridPin>> {
    if block_type.kind == BlockKind::Io && sides == PinSides::All {
        Err(RrGraphError::InvalidInput(format!(
            "I/O block type {:?} needs a designated pin side",
            block_type.name
        )))?
    }

    let mut pins = Vec::new();
    for side in ALL_SIDES.into_iter().filter(|s| sides.contains(*s)) {
        for height in 0..block_type.height {
            pins.extend(
                grid_side_pins(block_type, class, side, height)
                    .into_iter()
                    .map(|pin| GridPin { side, height, pin }),
            );
        }
    }

    Ok(pins)
}

/// Number of pins of `class` connecting to the routing
pub fn count_grid_pins(block_type: &BlockType, class: PinClass, sides: PinSides) -> Result<usize> {
    Ok(enumerate_grid_pins(block_type, class, sides)?.len())
}
