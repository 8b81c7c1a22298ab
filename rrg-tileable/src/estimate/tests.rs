use anyhow::Error;
use rrg_common::arch::{Architecture, ChannelWidth, SegmentSpec};
use rrg_common::RrGraphError;

use super::*;
use crate::test_arch::{arch, tile, SMALL_ARCH};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn check_chain_for_error(
    err: Error,
    predicate: impl FnMut(&&(dyn std::error::Error + 'static)) -> bool,
) -> bool {
    err.chain().find(predicate).is_some()
}

fn estimate_arch(arch: &Architecture) -> Result<NodeCountEstimate> {
    let grid = DeviceGrid::from_architecture(arch)?;
    estimate_num_rr_nodes(&grid, arch.channel_width, &arch.segments)
}

#[test]
fn small_device() -> Result<()> {
    init();
    let arch = Architecture::from_json_str(SMALL_ARCH)?;
    let counts = estimate_arch(&arch)?;

    // 4 blocks, 2 pins per side and class
    assert_eq!(counts[RrNodeKind::OutputPin], 32);
    assert_eq!(counts[RrNodeKind::InputPin], 32);
    assert_eq!(counts[RrNodeKind::Source], 32);
    assert_eq!(counts[RrNodeKind::Sink], 32);
    // 3 rows, each with a left (3 starts) and a right (3 starts) position
    assert_eq!(counts[RrNodeKind::ChanX], 18);
    assert_eq!(counts[RrNodeKind::ChanY], 18);
    assert_eq!(counts.total(), 164);

    Ok(())
}

#[test]
fn terminals_mirror_pins() -> Result<()> {
    init();
    let arch = arch(
        3,
        2,
        true,
        vec![tile(2, 1, "ram")],
        vec![SegmentSpec::new(1, 1), SegmentSpec::new(4, 2)],
        ChannelWidth::uniform(12),
    );
    let counts = estimate_arch(&arch)?;

    assert_eq!(counts[RrNodeKind::Source], counts[RrNodeKind::OutputPin]);
    assert_eq!(counts[RrNodeKind::Sink], counts[RrNodeKind::InputPin]);
    assert!(counts[RrNodeKind::OutputPin] > 0);

    Ok(())
}

#[test]
fn perimeter_io_only_counts_the_inner_side() -> Result<()> {
    init();
    let arch = arch(
        2,
        2,
        true,
        Vec::new(),
        vec![SegmentSpec::new(2, 1)],
        ChannelWidth::uniform(4),
    );
    let counts = estimate_arch(&arch)?;

    // 8 ring positions with a single pin of each class facing the core
    assert_eq!(counts[RrNodeKind::OutputPin], 32 + 8);
    assert_eq!(counts[RrNodeKind::InputPin], 32 + 8);
    assert_eq!(counts[RrNodeKind::ChanX], 18);

    Ok(())
}

#[test]
fn tall_blocks_are_counted_once() -> Result<()> {
    init();
    let arch = arch(
        2,
        2,
        false,
        vec![tile(1, 1, "ram")],
        vec![SegmentSpec::new(2, 1)],
        ChannelWidth::uniform(4),
    );
    let counts = estimate_arch(&arch)?;

    // Two logic blocks in the right column, the ram covers the left one
    assert_eq!(counts[RrNodeKind::OutputPin], 2 * 8 + 2);
    assert_eq!(counts[RrNodeKind::InputPin], 2 * 8 + 2);

    Ok(())
}

#[test]
fn channel_directions_use_their_own_width() -> Result<()> {
    init();
    let arch = arch(
        2,
        2,
        false,
        Vec::new(),
        vec![SegmentSpec::new(2, 1)],
        ChannelWidth { x: 4, y: 8 },
    );
    let counts = estimate_arch(&arch)?;

    assert_eq!(counts[RrNodeKind::ChanX], 18);
    // W=8: 6 starts at each border position, 3 columns
    assert_eq!(counts[RrNodeKind::ChanY], 3 * (6 + 6));

    Ok(())
}

#[test]
fn single_column_devices() -> Result<()> {
    init();
    let arch = arch(
        1,
        1,
        false,
        Vec::new(),
        vec![SegmentSpec::new(2, 1)],
        ChannelWidth::uniform(4),
    );
    let counts = estimate_arch(&arch)?;

    // The only position touches both borders, so every track starts there
    assert_eq!(counts[RrNodeKind::ChanX], 2 * 4);
    assert_eq!(counts[RrNodeKind::ChanY], 2 * 4);
    assert_eq!(counts[RrNodeKind::OutputPin], 8);

    Ok(())
}

#[test]
fn zero_width_channels_have_no_wires() -> Result<()> {
    init();
    let arch = arch(
        2,
        2,
        false,
        Vec::new(),
        vec![SegmentSpec::new(2, 1)],
        ChannelWidth::uniform(0),
    );
    let counts = estimate_arch(&arch)?;

    assert_eq!(counts[RrNodeKind::ChanX], 0);
    assert_eq!(counts[RrNodeKind::ChanY], 0);
    assert_eq!(counts.total(), 4 * 32);

    Ok(())
}

#[test]
fn corner_io_is_rejected() -> Result<()> {
    init();
    let arch = arch(
        2,
        2,
        false,
        vec![tile(0, 0, "io")],
        vec![SegmentSpec::new(2, 1)],
        ChannelWidth::uniform(4),
    );
    let err = estimate_arch(&arch).expect_err("Corner I/O unexpectedly accepted");

    assert!(check_chain_for_error(err, |e| matches!(
        e.downcast_ref(),
        Some(RrGraphError::Unsupported(_))
    )));

    Ok(())
}

#[test]
fn counts_serialize_by_kind() -> Result<()> {
    let mut counts = NodeCountEstimate::default();
    counts[RrNodeKind::ChanX] = 3;
    counts[RrNodeKind::Sink] = 1;

    let value = serde_json::to_value(&counts)?;
    assert_eq!(value["CHAN_X"], 3);
    assert_eq!(value["SINK"], 1);
    assert_eq!(value["SOURCE"], 0);

    Ok(())
}
