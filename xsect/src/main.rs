mod chart;
mod cloud;
mod input;
mod options;
mod raster;
mod sections;
mod volume;

use anyhow::Result;
use clap::Parser;
use options::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli {
        Cli::Sections(sections) => sections.run(),
        Cli::Dem(dem) => dem.run(),
        Cli::Cloud(cloud) => cloud.run(),
        Cli::Volume(volume) => volume.run(),
    }
}
