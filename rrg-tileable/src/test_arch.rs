//! Architectures shared by the estimator and builder tests.

use rrg_common::arch::{
    Architecture, BlockKind, BlockType, ChannelWidth, Layout, PinClass, PinLocation, PinSpec,
    SegmentSpec, TilePlacement,
};
use rrg_common::device_grid::{Side, ALL_SIDES};

/// Core of 2x2 logic blocks with 2 input and 2 output pins on every side, L2 wires, W=4
pub const SMALL_ARCH: &str = r#"{
    "block_types": [
        {
            "name": "clb",
            "kind": "logic",
            "pins": [
                { "class": "receiver", "locations": [{ "side": "top" }] },
                { "class": "receiver", "locations": [{ "side": "top" }] },
                { "class": "receiver", "locations": [{ "side": "right" }] },
                { "class": "receiver", "locations": [{ "side": "right" }] },
                { "class": "receiver", "locations": [{ "side": "bottom" }] },
                { "class": "receiver", "locations": [{ "side": "bottom" }] },
                { "class": "receiver", "locations": [{ "side": "left" }] },
                { "class": "receiver", "locations": [{ "side": "left" }] },
                { "class": "driver", "locations": [{ "side": "top" }] },
                { "class": "driver", "locations": [{ "side": "top" }] },
                { "class": "driver", "locations": [{ "side": "right" }] },
                { "class": "driver", "locations": [{ "side": "right" }] },
                { "class": "driver", "locations": [{ "side": "bottom" }] },
                { "class": "driver", "locations": [{ "side": "bottom" }] },
                { "class": "driver", "locations": [{ "side": "left" }] },
                { "class": "driver", "locations": [{ "side": "left" }] }
            ]
        }
    ],
    "segments": [{ "name": "L2", "length": 2, "frequency": 1 }],
    "layout": { "width": 2, "height": 2, "fill": "clb" },
    "channel_width": { "x": 4, "y": 4 }
}"#;

fn pin(class: PinClass, locations: &[(Side, u32)]) -> PinSpec {
    PinSpec {
        class,
        locations: locations
            .iter()
            .map(|(side, height)| PinLocation {
                side: *side,
                height: *height,
            })
            .collect(),
    }
}

/// One pin of each class present on every side
pub fn io_type() -> BlockType {
    let everywhere: Vec<_> = ALL_SIDES.iter().map(|s| (*s, 0)).collect();
    BlockType {
        name: "io".into(),
        kind: BlockKind::Io,
        height: 1,
        pins: vec![
            pin(PinClass::Receiver, &everywhere),
            pin(PinClass::Driver, &everywhere),
        ],
    }
}

/// 8 pins of each class, two per side
pub fn clb_type() -> BlockType {
    let mut pins = Vec::new();
    for class in [PinClass::Receiver, PinClass::Driver] {
        for side in ALL_SIDES {
            pins.push(pin(class, &[(side, 0)]));
            pins.push(pin(class, &[(side, 0)]));
        }
    }
    BlockType {
        name: "clb".into(),
        kind: BlockKind::Logic,
        height: 1,
        pins,
    }
}

/// Two rows tall: one driver per row on the right, one receiver on the top and left of row 1
pub fn ram_type() -> BlockType {
    BlockType {
        name: "ram".into(),
        kind: BlockKind::Logic,
        height: 2,
        pins: vec![
            pin(PinClass::Driver, &[(Side::Right, 0)]),
            pin(PinClass::Driver, &[(Side::Right, 1)]),
            pin(PinClass::Receiver, &[(Side::Left, 1), (Side::Top, 1)]),
        ],
    }
}

pub fn arch(
    nx: u32,
    ny: u32,
    perimeter: bool,
    tiles: Vec<TilePlacement>,
    segments: Vec<SegmentSpec>,
    channel_width: ChannelWidth,
) -> Architecture {
    Architecture {
        block_types: vec![io_type(), clb_type(), ram_type()],
        segments,
        layout: Layout {
            width: nx,
            height: ny,
            perimeter: perimeter.then(|| "io".to_string()),
            fill: Some("clb".into()),
            tiles,
        },
        channel_width,
    }
}

pub fn tile(x: u32, y: u32, block_type: &str) -> TilePlacement {
    TilePlacement {
        x,
        y,
        block_type: block_type.into(),
    }
}
