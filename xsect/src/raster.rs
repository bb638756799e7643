use crate::{
    chart::{self, SectionChart, Series},
    options::Dem,
};
use anyhow::{Context, Result};
use log::info;
use xsection::{
    dem::{self, Grid, GridMode},
    SectionProfile,
};

/// Section length to either side of the centerline.
const DEFAULT_WIDTH: f64 = 15.0;

impl Dem {
    pub fn run(&self) -> Result<()> {
        let sections = self.layout.sections(DEFAULT_WIDTH)?;
        let mode = if self.memmap {
            GridMode::MemMap
        } else {
            GridMode::InMem
        };

        let mut charts: Vec<SectionChart> = sections
            .iter()
            .map(|s| SectionChart {
                section_id: s.section_id.clone(),
                series: Vec::new(),
            })
            .collect();

        for path in dem::grid_files(&self.dem_dir)? {
            let label = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let grid = Grid::open(&path, mode)
                .with_context(|| format!("opening grid {}", path.display()))?;
            info!("sampling {} sections from {label}", sections.len());

            for (section, chart) in sections.iter().zip(charts.iter_mut()) {
                let profile = SectionProfile::builder()
                    .section(section)
                    .points(self.points)
                    .build(&grid)?;
                chart.series.push(Series {
                    label: label.clone(),
                    points: profile
                        .valid()
                        .map(|(offset, elev)| (offset, f64::from(elev)))
                        .collect(),
                });
            }
        }

        match &self.svg {
            Some(out) => chart::write_svg(out, &charts),
            None => chart::print_csv(&charts),
        }
    }
}
