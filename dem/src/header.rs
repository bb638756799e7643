//! `.hdr` sidecar parsing.

use crate::{DemError, C};
use geo::geometry::Coord;
use std::path::Path;

/// Byte order of the raw `.flt` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Grid georeferencing and layout, as described by a `.hdr` file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    /// Number of columns.
    pub ncols: usize,

    /// Number of rows.
    pub nrows: usize,

    /// Outer lower-left (southwest) corner of the grid.
    ///
    /// Headers using `xllcenter`/`yllcenter` are shifted by half a
    /// cell on parse so this is always the corner.
    pub ll_corner: Coord<C>,

    /// Width and height of a cell in map units.
    pub cell_size: C,

    /// Sentinel for missing samples.
    pub nodata: Option<f32>,

    pub byte_order: Endian,
}

impl Header {
    /// Returns `ncols * nrows`, or `None` if that overflows.
    pub fn sample_count(&self) -> Option<usize> {
        self.ncols.checked_mul(self.nrows)
    }

    /// Reads the header at `path`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DemError::MissingHeader(path.to_owned()))
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&text, path)
    }

    /// Parses header `text`; `path` is only used for error reporting.
    pub fn parse(text: &str, path: &Path) -> Result<Self, DemError> {
        let mk_err = |field| DemError::Header(field, path.to_owned());

        let mut ncols = None;
        let mut nrows = None;
        let mut xll = None;
        let mut yll = None;
        let mut centered = false;
        let mut cell_size = None;
        let mut nodata = None;
        let mut byte_order = Endian::Little;

        for line in text.lines() {
            let mut fields = line.split_whitespace();
            let (Some(key), Some(value)) = (fields.next(), fields.next()) else {
                continue;
            };
            match key.to_ascii_lowercase().as_str() {
                "ncols" => ncols = Some(value.parse::<usize>().map_err(|_| mk_err("ncols"))?),
                "nrows" => nrows = Some(value.parse::<usize>().map_err(|_| mk_err("nrows"))?),
                "xllcorner" => xll = Some(value.parse::<C>().map_err(|_| mk_err("xllcorner"))?),
                "yllcorner" => yll = Some(value.parse::<C>().map_err(|_| mk_err("yllcorner"))?),
                "xllcenter" => {
                    xll = Some(value.parse::<C>().map_err(|_| mk_err("xllcenter"))?);
                    centered = true;
                }
                "yllcenter" => {
                    yll = Some(value.parse::<C>().map_err(|_| mk_err("yllcenter"))?);
                    centered = true;
                }
                "cellsize" => {
                    cell_size = Some(value.parse::<C>().map_err(|_| mk_err("cellsize"))?)
                }
                "nodata_value" => {
                    nodata = Some(value.parse::<f32>().map_err(|_| mk_err("nodata_value"))?)
                }
                "byteorder" => {
                    byte_order = match value.to_ascii_uppercase().as_str() {
                        "LSBFIRST" | "I" => Endian::Little,
                        "MSBFIRST" | "M" => Endian::Big,
                        _ => return Err(mk_err("byteorder")),
                    }
                }
                _ => (),
            }
        }

        let ncols = ncols.filter(|n| *n > 0).ok_or_else(|| mk_err("ncols"))?;
        let nrows = nrows.filter(|n| *n > 0).ok_or_else(|| mk_err("nrows"))?;
        let cell_size = cell_size
            .filter(|c| *c > 0.0)
            .ok_or_else(|| mk_err("cellsize"))?;
        let mut ll_corner = Coord {
            x: xll.ok_or_else(|| mk_err("xllcorner"))?,
            y: yll.ok_or_else(|| mk_err("yllcorner"))?,
        };
        if centered {
            ll_corner.x -= cell_size / 2.0;
            ll_corner.y -= cell_size / 2.0;
        }

        Ok(Self {
            ncols,
            nrows,
            ll_corner,
            cell_size,
            nodata,
            byte_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Endian, Header};
    use crate::DemError;
    use geo::geometry::Coord;
    use std::path::Path;

    #[test]
    fn test_parse_corner_header() {
        let text = "ncols 4\nnrows 3\nxllcorner 1000.0\nyllcorner 2000.0\ncellsize 0.5\nNODATA_value -9999\nbyteorder LSBFIRST\n";
        let hdr = Header::parse(text, Path::new("a.hdr")).unwrap();
        assert_eq!(hdr.ncols, 4);
        assert_eq!(hdr.nrows, 3);
        assert_eq!(hdr.ll_corner, Coord { x: 1000.0, y: 2000.0 });
        assert_eq!(hdr.cell_size, 0.5);
        assert_eq!(hdr.nodata, Some(-9999.0));
        assert_eq!(hdr.byte_order, Endian::Little);
    }

    #[test]
    fn test_parse_center_header() {
        let text = "NCOLS 2\nNROWS 2\nXLLCENTER 10\nYLLCENTER 20\nCELLSIZE 2\nBYTEORDER MSBFIRST\n";
        let hdr = Header::parse(text, Path::new("b.hdr")).unwrap();
        assert_eq!(hdr.ll_corner, Coord { x: 9.0, y: 19.0 });
        assert_eq!(hdr.nodata, None);
        assert_eq!(hdr.byte_order, Endian::Big);
    }

    #[test]
    fn test_missing_field() {
        let text = "ncols 2\nnrows 2\nxllcorner 0\ncellsize 1\n";
        let err = Header::parse(text, Path::new("c.hdr")).unwrap_err();
        assert!(matches!(err, DemError::Header("yllcorner", _)));
    }

    #[test]
    fn test_zero_cellsize_is_rejected() {
        let text = "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 0\n";
        let err = Header::parse(text, Path::new("d.hdr")).unwrap_err();
        assert!(matches!(err, DemError::Header("cellsize", _)));
    }
}
