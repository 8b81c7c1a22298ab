//! Channel layouts along a full row (or column) of the device.
//!
//! A strip of channel positions `1..=span` uses the low-border layout at position 1, the
//! high-border layout at position `span` and the interior layout everywhere in between.

use anyhow::Result;
use log::info;
use rrg_common::arch::{ChannelWidth, SegmentSpec};
use rrg_common::device_grid::{DeviceExtent, Side};
use rrg_common::RrGraphError;

use super::{build_unidir_chan_layout, ChannelLayout, ChannelSide};

#[derive(Clone, Debug, Default)]
pub struct ChannelStrip {
    span: u32,
    low: ChannelLayout,
    high: ChannelLayout,
    interior: ChannelLayout,
    /// Used when the strip has a single position, which touches both borders
    single: ChannelLayout,
}

impl ChannelStrip {
    pub fn build(
        span: u32,
        chan_width: u32,
        low_side: Side,
        high_side: Side,
        segments: &[SegmentSpec],
    ) -> Result<Self> {
        if span == 0 {
            return Ok(Self::default());
        }

        let low = build_unidir_chan_layout(chan_width, span, ChannelSide::Border(low_side), segments)?;
        let high =
            build_unidir_chan_layout(chan_width, span, ChannelSide::Border(high_side), segments)?;
        let interior = build_unidir_chan_layout(chan_width, span, ChannelSide::Interior, segments)?;

        let mut single = low.clone();
        single.apply_border(high_side);

        Ok(Self {
            span,
            low,
            high,
            interior,
            single,
        })
    }

    /// Number of channel positions along the strip
    pub fn span(&self) -> u32 {
        self.span
    }

    pub fn low(&self) -> &ChannelLayout {
        &self.low
    }

    pub fn high(&self) -> &ChannelLayout {
        &self.high
    }

    pub fn interior(&self) -> &ChannelLayout {
        &self.interior
    }

    pub fn layout_at(&self, pos: u32) -> Result<&ChannelLayout> {
        if pos == 0 || pos > self.span {
            Err(RrGraphError::InvalidInput(format!(
                "channel position {} outside of 1..={}",
                pos, self.span
            )))?
        }
        Ok(if self.span == 1 {
            &self.single
        } else if pos == 1 {
            &self.low
        } else if pos == self.span {
            &self.high
        } else {
            &self.interior
        })
    }

    /// Number of wires originating anywhere along one strip
    pub fn num_starting_tracks(&self) -> usize {
        match self.span {
            0 => 0,
            1 => self.single.num_starting_tracks(),
            span => {
                self.low.num_starting_tracks()
                    + self.high.num_starting_tracks()
                    + (span as usize - 2) * self.interior.num_starting_tracks()
            }
        }
    }
}

/// Horizontal and vertical channel strips of a device.
///
/// X-direction channels run along rows `0..=ny` between the left and right borders, Y-direction
/// channels along columns `0..=nx` between the bottom and top borders. Their widths may differ.
#[derive(Clone, Debug)]
pub struct DeviceChannels {
    pub chanx: ChannelStrip,
    pub chany: ChannelStrip,
    extent: DeviceExtent,
}

impl DeviceChannels {
    pub fn build(
        extent: DeviceExtent,
        chan_width: ChannelWidth,
        segments: &[SegmentSpec],
    ) -> Result<Self> {
        info!(
            "Build channel layouts for a {}x{} device (W_x = {}, W_y = {})",
            extent.width, extent.height, chan_width.x, chan_width.y
        );
        Ok(Self {
            chanx: ChannelStrip::build(
                extent.core_width(),
                chan_width.x,
                Side::Left,
                Side::Right,
                segments,
            )?,
            chany: ChannelStrip::build(
                extent.core_height(),
                chan_width.y,
                Side::Bottom,
                Side::Top,
                segments,
            )?,
            extent,
        })
    }

    /// Number of X-direction channel rows
    pub fn chanx_rows(&self) -> u32 {
        self.extent.height.saturating_sub(1)
    }

    /// Number of Y-direction channel columns
    pub fn chany_columns(&self) -> u32 {
        self.extent.width.saturating_sub(1)
    }
}
