use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{ElevationMesh, FlipMode, GridGeometry};

/// Fills an [`ElevationMesh`] from data rows, honouring the grid's flips.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    geometry: GridGeometry,
    mesh: ElevationMesh,
    /// Mesh row the next data row goes to. May run off either end once all
    /// rows are filled.
    current_row: isize,
}

impl MeshBuilder {
    /// Allocate a zeroed mesh for `geometry`, or `None` if it is too large.
    ///
    /// `geometry` must have at least one row and one column.
    pub fn new(geometry: GridGeometry) -> Option<Self> {
        let (rows, cols) = geometry.shape();
        let mesh = ElevationMesh::zeroed(rows, cols)?;
        let current_row = geometry.first_row() as isize;
        Some(Self {
            geometry,
            mesh,
            current_row,
        })
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn current_row(&self) -> isize {
        self.current_row
    }

    /// Change orientation and restart population from the matching edge.
    pub fn set_flip(&mut self, mode: FlipMode) {
        self.geometry.flip.apply(mode);
        self.current_row = self.geometry.first_row() as isize;
    }

    /// Write one data row. Returns whether the row was used.
    ///
    /// Rows whose width differs from the grid are skipped, as are rows past
    /// the last mesh row.
    pub fn push_row(&mut self, tokens: &[&str], line: usize) -> Result<bool> {
        if tokens.len() != self.geometry.columns {
            debug!(
                "line {}: skipping row of {} values, grid has {} columns",
                line,
                tokens.len(),
                self.geometry.columns
            );
            return Ok(false);
        }
        if self.current_row < 0 || self.current_row as usize >= self.geometry.rows {
            warn!(
                "line {}: ignoring data row beyond the {} declared rows",
                line, self.geometry.rows
            );
            return Ok(false);
        }

        let values = tokens
            .iter()
            .map(|token| {
                token.parse::<f64>().map_err(|_| Error::MalformedNumber {
                    line,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let row = self.mesh.row_mut(self.current_row as usize);
        if self.geometry.flip.horizontal {
            for (cell, value) in row.iter_mut().zip(values.iter().rev()) {
                *cell = *value;
            }
        } else {
            row.copy_from_slice(&values);
        }

        if self.geometry.flip.vertical {
            self.current_row += 1;
        } else {
            self.current_row -= 1;
        }
        Ok(true)
    }

    pub fn finish(self) -> (GridGeometry, ElevationMesh) {
        (self.geometry, self.mesh)
    }
}
