use crate::options::{Format, Sections};
use anyhow::Result;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use std::io::Write;
use xsection::CrossSection;

/// Section length to either side of the centerline.
const DEFAULT_WIDTH: f64 = 20.0;

impl Sections {
    pub fn run(&self) -> Result<()> {
        let sections = self.layout.sections(DEFAULT_WIDTH)?;
        let out = std::io::stdout().lock();
        match self.format {
            Format::Csv => write_csv(out, &sections),
            Format::Json => write_json(out, &sections),
            Format::Geojson => write_geojson(out, &sections),
        }
    }
}

fn write_csv<W: Write>(out: W, sections: &[CrossSection]) -> Result<()> {
    #[derive(Serialize)]
    struct Row<'a> {
        #[serde(rename = "sectionId")]
        section_id: &'a str,
        chainage: f64,
        left_x: f64,
        left_y: f64,
        anchor_x: f64,
        anchor_y: f64,
        right_x: f64,
        right_y: f64,
    }

    let mut wtr = csv::Writer::from_writer(out);
    for s in sections {
        wtr.serialize(Row {
            section_id: &s.section_id,
            chainage: s.chainage,
            left_x: s.left.x,
            left_y: s.left.y,
            anchor_x: s.anchor.x,
            anchor_y: s.anchor.y,
            right_x: s.right.x,
            right_y: s.right.y,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json<W: Write>(mut out: W, sections: &[CrossSection]) -> Result<()> {
    #[derive(Serialize)]
    struct JsonEntry<'a> {
        #[serde(rename = "sectionId")]
        section_id: &'a str,
        chainage: f64,
        left: [f64; 2],
        anchor: [f64; 2],
        right: [f64; 2],
    }

    let reshaped: Vec<JsonEntry> = sections
        .iter()
        .map(|s| JsonEntry {
            section_id: &s.section_id,
            chainage: s.chainage,
            left: [s.left.x, s.left.y],
            anchor: [s.anchor.x, s.anchor.y],
            right: [s.right.x, s.right.y],
        })
        .collect();
    serde_json::to_writer(&mut out, &reshaped)?;
    writeln!(out)?;
    Ok(())
}

fn write_geojson<W: Write>(mut out: W, sections: &[CrossSection]) -> Result<()> {
    let features = sections
        .iter()
        .map(|s| {
            let mut properties = JsonObject::new();
            properties.insert("sectionId".into(), s.section_id.clone().into());
            properties.insert("chainage".into(), s.chainage.into());
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(
                    s.line_string()
                        .coords()
                        .map(|c| vec![c.x, c.y])
                        .collect(),
                ))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    serde_json::to_writer(&mut out, &collection)?;
    writeln!(out)?;
    Ok(())
}
