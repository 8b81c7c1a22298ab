//! Track layout of unidirectional routing channels.
//!
//! Every channel is built from pairs of tracks: one carrying signals towards increasing
//! coordinates and one towards decreasing coordinates. Each segment type gets a run of pairs, and
//! every `length` pairs within a run a new wire starts. For a length-4 segment type in a W=12
//! channel:
//!
//! | Index | Direction | Start |
//! |-------|-----------|-------|
//! |   0   | --------> |  Yes  |
//! |   1   | <-------- |  Yes  |
//! |   2   | --------> |  No   |
//! |   3   | <-------- |  No   |
//! |   4   | --------> |  No   |
//! |   5   | <-------- |  No   |
//! |   6   | --------> |  No   |
//! |   7   | <-------- |  No   |
//! |   8   | --------> |  Yes  |
//! |   9   | <-------- |  Yes  |
//! |   10  | --------> |  No   |
//! |   11  | <-------- |  No   |
//!
//! If the run is not a multiple of the length the last group is shorter. The graph stays
//! tileable, which is what matters.

use anyhow::{anyhow, Result};
use log::debug;
use rrg_common::arch::SegmentSpec;
use rrg_common::device_grid::Side;
use rrg_common::RrGraphError;
use serde::Serialize;

use crate::track_alloc::allocate_tracks;


pub mod strip;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackDirection {
    Increasing,
    Decreasing,
}

/// Where a channel sits relative to the device borders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelSide {
    /// Adjacent to the given device border
    Border(Side),
    Interior,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub index: u32,
    pub direction: TrackDirection,
    /// Index of the segment specification this track belongs to
    pub segment_id: usize,
    /// Effective length used to place start points
    pub segment_length: u32,
    /// Index of the track pair within the run of its segment type
    pub pair_index: u32,
    pub is_start: bool,
    pub is_end: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelLayout {
    tracks: Vec<Track>,
    /// Number of track pairs allocated to each segment type
    pairs_per_segment: Vec<u32>,
    /// Index of the first track of each segment type's run
    segment_base: Vec<u32>,
}

impl ChannelLayout {
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: u32) -> Option<&Track> {
        self.tracks.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn pairs_per_segment(&self) -> &[u32] {
        &self.pairs_per_segment
    }

    /// Number of distinct wires that originate in this channel
    pub fn num_starting_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_start).count()
    }

    pub fn num_ending_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_end).count()
    }

    /// Number of positions a wire starting on `track` travels before leaving its length-aligned
    /// group of pairs, the starting position included.
    pub fn group_remaining(&self, track: &Track) -> u32 {
        let offset = track.pair_index % track.segment_length;
        let group_start = track.pair_index - offset;
        let run = self
            .pairs_per_segment
            .get(track.segment_id)
            .copied()
            .unwrap_or(0);
        let group_size = std::cmp::min(track.segment_length, run.saturating_sub(group_start));
        group_size.saturating_sub(offset)
    }

    /// Track occupied by a wire `step` positions downstream of `track`. Wires shift to the next
    /// pair of their group at every position, which keeps each position's pattern identical.
    pub fn rotated_track(&self, track: &Track, step: u32) -> Option<u32> {
        if step >= self.group_remaining(track) {
            return None;
        }
        let base = self.segment_base.get(track.segment_id)?;
        let lane = match track.direction {
            TrackDirection::Increasing => 0,
            TrackDirection::Decreasing => 1,
        };
        Some(base + 2 * (track.pair_index + step) + lane)
    }

    fn set_tracks_start(&mut self, direction: TrackDirection) {
        for track in self.tracks.iter_mut().filter(|t| t.direction == direction) {
            track.is_start = true;
        }
    }

    fn set_tracks_end(&mut self, direction: TrackDirection) {
        for track in self.tracks.iter_mut().filter(|t| t.direction == direction) {
            track.is_end = true;
        }
    }

    /// Make segments start and end cleanly at a device border instead of running off the fabric.
    pub(crate) fn apply_border(&mut self, side: Side) {
        match side {
            Side::Top | Side::Right => {
                self.set_tracks_end(TrackDirection::Increasing);
                self.set_tracks_start(TrackDirection::Decreasing);
            }
            Side::Bottom | Side::Left => {
                self.set_tracks_start(TrackDirection::Increasing);
                self.set_tracks_end(TrackDirection::Decreasing);
            }
        }
    }
}

/// Build the track layout of a unidirectional channel.
///
/// Odd widths are rounded up, since every track needs a partner running the other way. Channels
/// on a device border (`ChannelSide::Border`) get all their tracks in one direction starting and
/// all tracks in the other direction ending.
pub fn build_unidir_chan_layout(
    chan_width: u32,
    max_seg_length: u32,
    side: ChannelSide,
    segments: &[SegmentSpec],
) -> Result<ChannelLayout> {
    let chan_width = chan_width.checked_add(chan_width % 2).ok_or_else(|| {
        RrGraphError::InvalidInput(format!("channel width {} cannot be made even", chan_width))
    })?;

    if chan_width == 0 {
        return Ok(ChannelLayout::default());
    }

    let pairs = allocate_tracks(chan_width / 2, segments, true)?;
    if pairs.total().checked_mul(2) != Some(chan_width) {
        return Err(anyhow!(RrGraphError::InternalInconsistency(format!(
            "allocated {:?} pairs for a channel of width {}",
            pairs.as_slice(),
            chan_width
        ))));
    }

    let mut layout = ChannelLayout {
        tracks: Vec::with_capacity(chan_width as usize),
        pairs_per_segment: pairs.as_slice().to_vec(),
        segment_base: Vec::with_capacity(segments.len()),
    };

    let mut cur_track = 0u32;
    for (segment_id, (segment, num_pairs)) in segments.iter().zip(pairs.iter()).enumerate() {
        let seg_len = if segment.longline {
            max_seg_length
        } else {
            segment.length
        };
        if seg_len == 0 && num_pairs > 0 {
            Err(RrGraphError::InvalidInput(format!(
                "segment type {:?} has an effective length of 0",
                segment.name
            )))?
        }

        layout.segment_base.push(cur_track);
        for pair_index in 0..num_pairs {
            let is_start = pair_index % seg_len == 0;
            for direction in [TrackDirection::Increasing, TrackDirection::Decreasing] {
                layout.tracks.push(Track {
                    index: cur_track,
                    direction,
                    segment_id,
                    segment_length: seg_len,
                    pair_index,
                    is_start,
                    is_end: false,
                });
                cur_track += 1;
            }
        }
    }

    if let ChannelSide::Border(side) = side {
        layout.apply_border(side);
    }

    debug!(
        "Channel of width {} on {:?}: {} starting tracks",
        chan_width,
        side,
        layout.num_starting_tracks()
    );

    Ok(layout)
}
