//! Accumulation of GDAL/ESRI ASCII grid headers.
//!
//! Such headers arrive one `key value` pair per line. Once every field is
//! known the header describes the same geometry a native `grid` directive
//! would.

use tracing::debug;

use crate::classify::GdalKey;
use crate::error::{Error, Result};
use crate::model::{Flip, GridGeometry};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GdalHeader {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xllcorner: Option<f64>,
    yllcorner: Option<f64>,
    xcellsize: Option<f64>,
    ycellsize: Option<f64>,
    observed: bool,
}

impl GdalHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one header field read from line `line`.
    ///
    /// `cellsize` sets both axes, `dx`/`dy` one each; whichever comes later
    /// in the source wins.
    pub fn observe(&mut self, key: GdalKey, raw_value: &str, line: usize) -> Result<()> {
        let value: f64 = raw_value.parse().map_err(|_| Error::MalformedNumber {
            line,
            token: raw_value.to_string(),
        })?;
        debug!("GDAL header field {} = {}", key.as_str(), value);

        self.observed = true;
        match key {
            GdalKey::Ncols => self.ncols = positive_count(value),
            GdalKey::Nrows => self.nrows = positive_count(value),
            GdalKey::Xllcorner => self.xllcorner = Some(value),
            GdalKey::Yllcorner => self.yllcorner = Some(value),
            GdalKey::Cellsize => {
                self.xcellsize = Some(value);
                self.ycellsize = Some(value);
            }
            GdalKey::Dx => self.xcellsize = Some(value),
            GdalKey::Dy => self.ycellsize = Some(value),
        }
        Ok(())
    }

    /// Whether any header field was seen at all.
    pub fn is_observed(&self) -> bool {
        self.observed
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Names of the fields still needed, in header order.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("ncols", self.ncols.is_some()),
            ("nrows", self.nrows.is_some()),
            ("xllcorner", self.xllcorner.is_some()),
            ("yllcorner", self.yllcorner.is_some()),
            ("dx-or-cellsize", self.xcellsize.is_some()),
            ("dy-or-cellsize", self.ycellsize.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, valid)| (!valid).then_some(name))
        .collect()
    }

    /// Geometry described by a complete header.
    ///
    /// A negative cell size toggles the flip of its axis in `flip` and is
    /// stored as a magnitude.
    pub fn geometry(&self, flip: Flip) -> Option<GridGeometry> {
        let (columns, rows) = (self.ncols?, self.nrows?);
        let (step_x, step_y) = (self.xcellsize?, self.ycellsize?);

        let mut flip = flip;
        if step_x < 0.0 {
            flip.horizontal = !flip.horizontal;
        }
        if step_y < 0.0 {
            flip.vertical = !flip.vertical;
        }

        Some(GridGeometry {
            origin_x: self.xllcorner?,
            origin_y: self.yllcorner?,
            step_x: step_x.abs(),
            step_y: step_y.abs(),
            columns,
            rows,
            flip,
        })
    }
}

/// Counts are valid only when their whole part is positive.
fn positive_count(value: f64) -> Option<usize> {
    let whole = value.trunc();
    (whole >= 1.0).then_some(whole as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe_all(header: &mut GdalHeader, fields: &[(GdalKey, &str)]) {
        for (i, (key, value)) in fields.iter().enumerate() {
            header.observe(*key, value, i + 1).unwrap();
        }
    }

    #[test]
    fn test_complete_header() {
        let mut header = GdalHeader::new();
        observe_all(
            &mut header,
            &[
                (GdalKey::Ncols, "3"),
                (GdalKey::Nrows, "2"),
                (GdalKey::Xllcorner, "-100.5"),
                (GdalKey::Yllcorner, "200"),
                (GdalKey::Cellsize, "5"),
            ],
        );
        assert!(header.is_complete());

        let geometry = header.geometry(Flip::default()).unwrap();
        assert_eq!(geometry.columns, 3);
        assert_eq!(geometry.rows, 2);
        assert_eq!(geometry.origin_x, -100.5);
        assert_eq!(geometry.origin_y, 200.0);
        assert_eq!((geometry.step_x, geometry.step_y), (5.0, 5.0));
        assert_eq!(geometry.flip, Flip::default());
    }

    #[test]
    fn test_negative_cellsize_flips_both_axes() {
        let mut header = GdalHeader::new();
        observe_all(
            &mut header,
            &[
                (GdalKey::Ncols, "2"),
                (GdalKey::Nrows, "2"),
                (GdalKey::Xllcorner, "0"),
                (GdalKey::Yllcorner, "0"),
                (GdalKey::Cellsize, "-5"),
            ],
        );

        let geometry = header.geometry(Flip::default()).unwrap();
        assert!(geometry.flip.horizontal);
        assert!(geometry.flip.vertical);
        assert_eq!(geometry.step_x, 5.0);
        assert_eq!(geometry.step_y, 5.0);
    }

    #[test]
    fn test_negative_dx_toggles_existing_flip() {
        let mut header = GdalHeader::new();
        observe_all(
            &mut header,
            &[
                (GdalKey::Ncols, "2"),
                (GdalKey::Nrows, "2"),
                (GdalKey::Xllcorner, "0"),
                (GdalKey::Yllcorner, "0"),
                (GdalKey::Dx, "-2"),
                (GdalKey::Dy, "3"),
            ],
        );

        let geometry = header
            .geometry(Flip {
                vertical: false,
                horizontal: true,
            })
            .unwrap();
        assert_eq!(geometry.flip, Flip::default());
        assert_eq!((geometry.step_x, geometry.step_y), (2.0, 3.0));
    }

    #[test]
    fn test_later_fields_override() {
        let mut header = GdalHeader::new();
        observe_all(
            &mut header,
            &[
                (GdalKey::Dx, "2"),
                (GdalKey::Cellsize, "7"),
                (GdalKey::Dy, "4"),
                (GdalKey::Ncols, "1"),
                (GdalKey::Nrows, "1"),
                (GdalKey::Xllcorner, "0"),
                (GdalKey::Yllcorner, "0"),
            ],
        );

        let geometry = header.geometry(Flip::default()).unwrap();
        assert_eq!((geometry.step_x, geometry.step_y), (7.0, 4.0));
    }

    #[test]
    fn test_missing_fields() {
        let mut header = GdalHeader::new();
        assert!(!header.is_observed());
        assert_eq!(header.missing().len(), 6);

        observe_all(
            &mut header,
            &[
                (GdalKey::Ncols, "0"),
                (GdalKey::Xllcorner, "1"),
                (GdalKey::Dx, "1"),
            ],
        );
        assert!(header.is_observed());
        assert!(!header.is_complete());
        assert_eq!(
            header.missing(),
            vec!["ncols", "nrows", "yllcorner", "dy-or-cellsize"]
        );
        assert_eq!(header.geometry(Flip::default()), None);
    }

    #[test]
    fn test_fractional_counts() {
        assert_eq!(positive_count(3.0), Some(3));
        assert_eq!(positive_count(3.9), Some(3));
        assert_eq!(positive_count(0.5), None);
        assert_eq!(positive_count(-2.0), None);
    }

    #[test]
    fn test_malformed_value() {
        let mut header = GdalHeader::new();
        let err = header.observe(GdalKey::Ncols, "1.2.3", 4).unwrap_err();
        assert!(matches!(err, Error::MalformedNumber { line: 4, .. }));
    }
}
