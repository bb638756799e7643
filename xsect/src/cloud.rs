use crate::{
    chart::{self, SectionChart, Series},
    options::Cloud,
};
use anyhow::Result;
use log::{debug, info};
use xsection::cloud::{match_section_files, section_files, CloudProfile};

/// Section length to either side of the centerline.
const DEFAULT_WIDTH: f64 = 20.0;

impl Cloud {
    pub fn run(&self) -> Result<()> {
        let sections = self.layout.sections(DEFAULT_WIDTH)?;

        if self.rename {
            match_section_files(&self.cloud_dir, &sections)?;
        }

        let mut charts = Vec::with_capacity(sections.len());
        for section in &sections {
            let mut series = Vec::new();
            for path in section_files(&self.cloud_dir, &section.section_id)? {
                let profile = CloudProfile::from_file(section, &path)?;
                debug!(
                    "{}: {} stations from {}",
                    section.section_id,
                    profile.stations.len(),
                    path.display()
                );
                series.push(Series {
                    label: profile.label,
                    points: profile
                        .stations
                        .iter()
                        .map(|st| (st.distance, st.elevation))
                        .collect(),
                });
            }
            series.sort_by(|a, b| a.label.cmp(&b.label));
            charts.push(SectionChart {
                section_id: section.section_id.clone(),
                series,
            });
        }
        info!(
            "{} of {} sections have cloud data",
            charts.iter().filter(|c| !c.series.is_empty()).count(),
            charts.len()
        );

        match &self.svg {
            Some(out) => chart::write_svg(out, &charts),
            None => chart::print_csv(&charts),
        }
    }
}
