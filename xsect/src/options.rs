use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

/// Generate river cross-sections and compare surveys along them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Generate cross-section lines along a centerline.
    Sections(Sections),

    /// Sample elevation grids (one per survey) along cross-sections.
    Dem(Dem),

    /// Project point-cloud slices (one directory per survey) onto
    /// cross-sections.
    Cloud(Cloud),

    /// Summarize deposition and erosion in elevation difference grids.
    Volume(Volume),
}

/// Where to cut cross-sections.
#[derive(Debug, Clone, Args)]
pub struct Layout {
    /// Centerline file, GeoJSON or CSV with `x,y` columns.
    #[arg(short, long)]
    pub centerline: PathBuf,

    /// Distance between cross-sections along the centerline.
    #[arg(short, long, default_value_t = 25.0)]
    pub interval: f64,

    /// Length of each cross-section on either side of the centerline.
    #[arg(short, long)]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
    Geojson,
}

#[derive(Debug, Clone, Args)]
pub struct Sections {
    #[command(flatten)]
    pub layout: Layout,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,
}

#[derive(Debug, Clone, Args)]
pub struct Dem {
    #[command(flatten)]
    pub layout: Layout,

    /// Directory of `.flt` or GeoTIFF elevation grids, each named
    /// after its survey (e.g. `2019.tif`).
    #[arg(short, long)]
    pub dem_dir: PathBuf,

    /// Samples between the two ends of each cross-section.
    #[arg(short, long, default_value_t = xsection::profile::DEFAULT_POINTS)]
    pub points: usize,

    /// Memory map grids instead of reading them into memory.
    #[arg(long)]
    pub memmap: bool,

    /// Plot to this SVG file instead of printing CSV.
    #[arg(long)]
    pub svg: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct Cloud {
    #[command(flatten)]
    pub layout: Layout,

    /// Directory holding one sub-directory of CSV slices per survey.
    #[arg(short = 'd', long)]
    pub cloud_dir: PathBuf,

    /// First rename `Section cloud#<n>` exports to their section ids.
    #[arg(short, long)]
    pub rename: bool,

    /// Plot to this SVG file instead of printing CSV.
    #[arg(long)]
    pub svg: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct Volume {
    /// Directory of `.flt` or GeoTIFF elevation difference grids.
    #[arg(short, long)]
    pub dem_dir: PathBuf,

    /// Differences of this magnitude or more are ignored.
    #[arg(short, long, default_value_t = xsection::volume::DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Memory map grids instead of reading them into memory.
    #[arg(long)]
    pub memmap: bool,

    /// Output CSV (defaults to `volume.csv` in the grid directory).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}
