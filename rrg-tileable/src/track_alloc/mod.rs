//! Assignment of routing segment types to the tracks of a channel.

use anyhow::Result;
use log::debug;
use rrg_common::arch::SegmentSpec;
use rrg_common::RrGraphError;


/// Number of tracks of each segment type, in the order of the segment specifications
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackAllocation(Vec<u32>);

impl TrackAllocation {
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Generate the number of tracks for each segment type w.r.t. the frequency of each type and the
/// channel width.
///
/// Computing `chan_width * frequency / total_frequency` directly does not guarantee the counts add
/// up to the channel width, so tracks are handed out one unit at a time to whichever type is
/// furthest below its share. With `use_full_seg_groups` a unit is a whole group of `length`
/// tracks instead of a single track.
///
/// If the last unit overshoots the target by more than half a unit it is taken back, so with
/// grouping the total may end up short of `chan_width` by up to half a unit.
pub fn allocate_tracks(
    chan_width: u32,
    segments: &[SegmentSpec],
    use_full_seg_groups: bool,
) -> Result<TrackAllocation> {
    if segments.is_empty() {
        Err(RrGraphError::InvalidInput(
            "no segment types to allocate tracks to".into(),
        ))?
    }
    if let Some(seg) = segments.iter().find(|s| s.length == 0) {
        Err(RrGraphError::InvalidInput(format!(
            "segment type {:?} has zero length",
            seg.name
        )))?
    }

    // Scale factor so we can divide by any length and still use integers
    let overflow = || {
        RrGraphError::InvalidInput(format!(
            "segment lengths and frequencies overflow the allocation demand for width {}",
            chan_width
        ))
    };
    let scale = segments
        .iter()
        .try_fold(1i64, |acc, s| acc.checked_mul(s.length as i64))
        .ok_or_else(overflow)?;
    let freq_sum: i64 = segments.iter().map(|s| s.frequency as i64).sum();
    if freq_sum == 0 {
        Err(RrGraphError::InvalidInput(
            "all segment frequencies are zero".into(),
        ))?
    }
    let reduce = scale.checked_mul(freq_sum).ok_or_else(overflow)?;

    let mut demand = segments
        .iter()
        .map(|s| {
            let d = scale
                .checked_mul(chan_width as i64)
                .and_then(|d| d.checked_mul(s.frequency as i64))
                .ok_or_else(overflow)?;
            Ok(if use_full_seg_groups {
                d / s.length as i64
            } else {
                d
            })
        })
        .collect::<Result<Vec<i64>>>()?;

    let mut result = vec![0u32; segments.len()];
    let mut assigned = 0u32;
    let mut size = 0u32;
    let mut imax = 0usize;

    while assigned < chan_width {
        // Highest demand wins, ties go to the lowest index. Types without frequency never get
        // tracks, even once every other demand has dropped below theirs.
        imax = segments
            .iter()
            .zip(demand.iter())
            .enumerate()
            .filter(|(_, (s, _))| s.frequency > 0)
            .fold(None, |best: Option<(usize, i64)>, (i, (_, d))| match best {
                Some((_, bd)) if bd >= *d => best,
                _ => Some((i, *d)),
            })
            .map(|(i, _)| i)
            .ok_or_else(|| {
                RrGraphError::InternalInconsistency("no segment type left to allocate".into())
            })?;

        size = if use_full_seg_groups {
            segments[imax].length
        } else {
            1
        };
        demand[imax] -= reduce;
        assigned = assigned.checked_add(size).ok_or_else(|| {
            RrGraphError::InvalidInput(format!(
                "group of {} tracks overflows the allocation for width {}",
                size, chan_width
            ))
        })?;
        result[imax] += size;
    }

    // Undo the last assignment if we were closer to the goal without it
    if assigned - chan_width > size / 2 {
        debug!(
            "Undo last group of {} tracks of segment {} ({} assigned for width {})",
            size, imax, assigned, chan_width
        );
        result[imax] -= size;
    }

    Ok(TrackAllocation(result))
}
