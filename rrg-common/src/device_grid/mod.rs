//! Storage for the device grid: every tile position of the fabric, including the I/O ring around
//! the core.

pub mod iter;


use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::arch::{Architecture, BlockKind, BlockType};
use crate::{RrGraphError, BORDER_MARGIN};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Y+
    Top,
    /// X+
    Right,
    /// Y-
    Bottom,
    /// X-
    Left,
}

pub const ALL_SIDES: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

/// Represents a type index into the DeviceGrid's block type palette.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BlockTypeIndex(u32);

impl BlockTypeIndex {
    /// The palette always starts with the empty block type
    pub const EMPTY: BlockTypeIndex = BlockTypeIndex(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub block_type: BlockTypeIndex,
    /// 0 at the anchor row of a block, >0 for the rows covered by a taller block
    pub offset: u32,
}

impl GridCell {
    pub const EMPTY: GridCell = GridCell {
        block_type: BlockTypeIndex::EMPTY,
        offset: 0,
    };

    #[inline]
    pub fn is_anchor(&self) -> bool {
        self.offset == 0
    }
}

/// Size of the device in tiles, I/O ring included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceExtent {
    pub width: u32,
    pub height: u32,
}

impl DeviceExtent {
    pub fn from_core(nx: u32, ny: u32) -> Result<Self> {
        let with_ring = |n: u32| {
            n.checked_add(2 * BORDER_MARGIN).ok_or_else(|| {
                RrGraphError::InvalidInput(format!("core size {}x{} is too large", nx, ny))
            })
        };
        Ok(Self {
            width: with_ring(nx)?,
            height: with_ring(ny)?,
        })
    }

    /// Number of core columns (`nx`)
    pub fn core_width(&self) -> u32 {
        self.width.saturating_sub(2 * BORDER_MARGIN)
    }

    /// Number of core rows (`ny`)
    pub fn core_height(&self) -> u32 {
        self.height.saturating_sub(2 * BORDER_MARGIN)
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

pub struct DeviceGrid {
    extent: DeviceExtent,
    /// Scale to use for X coordinates when computing indicies
    xsi: u32,

    palette: Vec<BlockType>,

    /// Stored in x - y order, so iteration visits a column at a time
    cells: Vec<GridCell>,
}

impl DeviceGrid {
    pub fn new(extent: DeviceExtent) -> Result<Self> {
        if extent.width < 2 * BORDER_MARGIN || extent.height < 2 * BORDER_MARGIN {
            Err(RrGraphError::InvalidInput(format!(
                "device extent {}x{} is smaller than the I/O ring",
                extent.width, extent.height
            )))?
        }

        // Flat indices are computed in u32, so the whole grid has to fit
        let total_size = extent.width.checked_mul(extent.height).ok_or_else(|| {
            RrGraphError::InvalidInput(format!(
                "device extent {}x{} has too many cells",
                extent.width, extent.height
            ))
        })? as usize;

        Ok(Self {
            extent,
            xsi: extent.height,
            palette: vec![BlockType::empty()],
            cells: vec![GridCell::EMPTY; total_size],
        })
    }

    /// Build the grid described by an architecture's layout section.
    ///
    /// Explicit tiles go first, then the perimeter ring (corners stay empty), then the core fill.
    /// Ring and fill only take positions that are still empty.
    pub fn from_architecture(arch: &Architecture) -> Result<Self> {
        let layout = &arch.layout;
        let mut grid = DeviceGrid::new(DeviceExtent::from_core(layout.width, layout.height)?)?;

        for block_type in arch.block_types.iter() {
            grid.add_block_type(block_type.clone())
                .with_context(|| anyhow!("Register block type {:?}", block_type.name))?;
        }

        for tile in layout.tiles.iter() {
            let idx = grid.lookup_block_type(&tile.block_type)?;
            grid.place(tile.x, tile.y, idx)
                .with_context(|| anyhow!("Place {:?} at ({}, {})", tile.block_type, tile.x, tile.y))?;
        }

        let nx = layout.width;
        let ny = layout.height;

        if let Some(ref perimeter) = layout.perimeter {
            let idx = grid.lookup_block_type(perimeter)?;
            let ring = (1..=nx)
                .flat_map(|x| [(x, 0), (x, ny + 1)])
                .chain((1..=ny).flat_map(|y| [(0, y), (nx + 1, y)]));
            for (x, y) in ring {
                if grid.is_free_for(x, y, idx)? {
                    grid.place(x, y, idx)?;
                }
            }
        }

        if let Some(ref fill) = layout.fill {
            let idx = grid.lookup_block_type(fill)?;
            for x in 1..=nx {
                for y in 1..=ny {
                    if grid.is_free_for(x, y, idx)? {
                        grid.place(x, y, idx)?;
                    }
                }
            }
        }

        Ok(grid)
    }

    /// Adds a block type to the palette. Re-adding an identical type returns the existing index.
    pub fn add_block_type(&mut self, b: BlockType) -> Result<BlockTypeIndex> {
        for (i, bti) in self.palette.iter().enumerate() {
            if bti == &b {
                return Ok(BlockTypeIndex(i as u32));
            }
            if bti.name == b.name {
                Err(RrGraphError::InvalidInput(format!(
                    "duplicate block type name {:?}",
                    b.name
                )))?
            }
        }
        if b.height == 0 {
            Err(RrGraphError::InvalidInput(format!(
                "block type {:?} has zero height",
                b.name
            )))?
        }
        let iidx = self.palette.len();
        self.palette.push(b);
        Ok(BlockTypeIndex(iidx as u32))
    }

    pub fn lookup_block_type(&self, name: &str) -> Result<BlockTypeIndex> {
        self.palette
            .iter()
            .position(|b| b.name == name)
            .map(|i| BlockTypeIndex(i as u32))
            .ok_or_else(|| RrGraphError::InvalidInput(format!("unknown block type {:?}", name)))
            .map_err(anyhow::Error::from)
    }

    pub fn extent(&self) -> DeviceExtent {
        self.extent
    }

    pub fn info_for_index(&self, index: BlockTypeIndex) -> Option<&BlockType> {
        self.palette.get(index.0 as usize)
    }

    /// Block type occupying (x, y). Covered rows of tall blocks report the tall block.
    pub fn block_type_at(&self, x: u32, y: u32) -> Result<&BlockType> {
        let cell = self.get_cell(x, y)?;
        self.info_for_index(cell.block_type).ok_or_else(|| {
            anyhow!(RrGraphError::InternalInconsistency(format!(
                "cell ({}, {}) refers to block type {:?} missing from the palette",
                x, y, cell.block_type
            )))
        })
    }

    #[inline]
    pub fn get_cell(&self, x: u32, y: u32) -> Result<&GridCell> {
        let i = self.pos_to_idx(x, y)?;
        Ok(&self.cells[i])
    }

    /// Places a block with its anchor at (x, y), marking the rows it covers above the anchor.
    pub fn place(&mut self, x: u32, y: u32, index: BlockTypeIndex) -> Result<()> {
        let height = self
            .info_for_index(index)
            .ok_or_else(|| {
                RrGraphError::InvalidInput(format!("block type {:?} not in palette", index))
            })?
            .height;

        for offset in 0..height {
            let cell = self.get_cell(x, y + offset)?;
            if cell.block_type != BlockTypeIndex::EMPTY {
                Err(RrGraphError::InvalidInput(format!(
                    "position ({}, {}) is already occupied by {:?}",
                    x,
                    y + offset,
                    cell.block_type
                )))?
            }
        }

        for offset in 0..height {
            let i = self.pos_to_idx(x, y + offset)?;
            self.cells[i] = GridCell {
                block_type: index,
                offset,
            };
        }

        Ok(())
    }

    fn is_free_for(&self, x: u32, y: u32, index: BlockTypeIndex) -> Result<bool> {
        let height = match self.info_for_index(index) {
            Some(b) if b.kind != BlockKind::Empty => b.height,
            _ => return Ok(false),
        };
        for offset in 0..height {
            if !self.extent.contains(x, y + offset) {
                return Ok(false);
            }
            if self.get_cell(x, y + offset)?.block_type != BlockTypeIndex::EMPTY {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn iter_cell_coords(&self) -> iter::CellCoordIter {
        iter::CellCoordIter::new(self)
    }

    #[inline(always)]
    fn pos_to_idx(&self, x: u32, y: u32) -> Result<usize> {
        if !self.extent.contains(x, y) {
            Err(RrGraphError::OutOfBounds {
                pos: (x, y),
                bounds: (self.extent.width, self.extent.height),
            })?
        } else {
            Ok((y + x * self.xsi) as usize)
        }
    }
}
