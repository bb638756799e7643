use crate::options::Volume;
use anyhow::Result;
use log::{info, warn};
use serde::Serialize;
use xsection::{
    dem::{self, Grid, GridMode},
    SectionError, VolumeSummary,
};

#[derive(Serialize)]
struct Row {
    #[serde(rename = "Section")]
    section: String,
    #[serde(rename = "Total_Area")]
    total_area: f64,
    #[serde(rename = "Total_volume")]
    total_volume: f64,
    #[serde(rename = "Average_Depth")]
    average_depth: f64,
    #[serde(rename = "Sd_depth")]
    sd_depth: f64,
    max_erosion: f64,
    max_deposit: f64,
    #[serde(rename = "perUnitDeposit")]
    per_unit_deposit: f64,
}

impl Volume {
    pub fn run(&self) -> Result<()> {
        let mode = if self.memmap {
            GridMode::MemMap
        } else {
            GridMode::InMem
        };
        let out = self
            .out
            .clone()
            .unwrap_or_else(|| self.dem_dir.join("volume.csv"));

        let mut wtr = csv::Writer::from_path(&out)?;
        for path in dem::grid_files(&self.dem_dir)? {
            let section = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let grid = Grid::open(&path, mode)?;
            let summary = match VolumeSummary::from_grid(&grid, self.threshold) {
                Ok(summary) => summary,
                Err(SectionError::InvalidInput(reason)) => {
                    warn!("skipping {section}: {reason}");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            info!("{section}: {summary:?}");

            let VolumeSummary {
                total_area,
                total_volume,
                average_depth,
                sd_depth,
                max_erosion,
                max_deposit,
                per_unit_deposit,
            } = summary;
            wtr.serialize(Row {
                section,
                total_area,
                total_volume,
                average_depth,
                sd_depth,
                max_erosion,
                max_deposit,
                per_unit_deposit,
            })?;
        }
        wtr.flush()?;
        info!("wrote {}", out.display());
        Ok(())
    }
}
