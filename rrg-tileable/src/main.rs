mod config;

use anyhow::{Context, Result};
use config::Config;
use log::info;
use rrg_common::arch::Architecture;
use rrg_common::device_grid::DeviceGrid;
use rrg_tileable::builder::{build_tileable_unidir_rr_graph, BuildOptions};
use rrg_tileable::estimate::estimate_num_rr_nodes;
use serde::Serialize;
use std::io::BufWriter;
use std::path::Path;

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let outf =
        std::fs::File::create(path).with_context(|| format!("Create output file {:?}", path))?;
    let outf = BufWriter::new(outf);
    if pretty {
        serde_json::ser::to_writer_pretty(outf, value)?;
    } else {
        serde_json::ser::to_writer(outf, value)?;
    }
    Ok(())
}

/// Output is only written once the estimate or graph is complete
fn run(config: &Config) -> Result<()> {
    let arch = Architecture::from_file(&config.io.input_file)?;
    let grid = DeviceGrid::from_architecture(&arch).context("Build device grid")?;
    let chan_width = config.chan_width.apply(arch.channel_width);

    info!(
        "Device is {}x{} tiles, {} segment types",
        grid.extent().width,
        grid.extent().height,
        arch.segments.len()
    );

    if config.estimate_only {
        let estimate = estimate_num_rr_nodes(&grid, chan_width, &arch.segments)?;
        for (kind, count) in estimate.iter() {
            info!("{:?}: {}", kind, count);
        }
        write_json(&config.io.output_file, &estimate, true)
    } else {
        let graph = build_tileable_unidir_rr_graph(
            &grid,
            &arch.segments,
            &BuildOptions::new(chan_width),
            &[],
        )?;
        for (kind, count) in graph.counts().iter() {
            info!("{:?}: {}", kind, count);
        }
        write_json(&config.io.output_file, &graph, false)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_args(&config::command().get_matches())?;

    run(&config)
}
