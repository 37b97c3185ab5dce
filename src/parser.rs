//! Single forward pass over a surface source.
//!
//! Lines are classified one at a time. Grid geometry comes either from a
//! native `grid` directive or from an accumulated GDAL header, and data rows
//! are written into the mesh as they arrive.

use std::io::BufRead;

use tracing::{debug, info, warn};

use crate::classify::{classify, GridHeader};
use crate::error::{Error, Result};
use crate::header::GdalHeader;
use crate::mesh::MeshBuilder;
use crate::model::{ElevationMesh, Flip, FlipMode, GridGeometry};

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Treat every line as candidate mesh data, not only those inside a
    /// `surface` ... `endsurface` block.
    pub skip_surface_check: bool,
}

/// Everything the writer needs from a completed pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSurface {
    pub geometry: GridGeometry,
    pub mesh: ElevationMesh,
    /// Arguments of the last `cs` directive.
    pub coord_system: Option<String>,
    /// Directives copied through unchanged, as `(name, args)`.
    pub direct_commands: Vec<(String, String)>,
    /// Data rows written into the mesh.
    pub rows_read: usize,
}

/// Mutable state of one conversion.
#[derive(Debug, Default)]
pub struct ParseState {
    in_surface_block: bool,
    skip_surface_check: bool,
    gdal: GdalHeader,
    /// Orientation requested before any geometry was committed.
    pending_flip: Flip,
    mesh: Option<MeshBuilder>,
    coord_system: Option<String>,
    direct_commands: Vec<(String, String)>,
    gdal_ignored: bool,
    rows_read: usize,
    line_nr: usize,
}

impl ParseState {
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            skip_surface_check: options.skip_surface_check,
            ..Self::default()
        }
    }

    /// Whether a grid geometry has been committed.
    pub fn header_valid(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn in_surface_block(&self) -> bool {
        self.in_surface_block
    }

    pub fn geometry(&self) -> Option<&GridGeometry> {
        self.mesh.as_ref().map(MeshBuilder::geometry)
    }

    /// Process the next input line.
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        self.line_nr += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);
        let classified = classify(line);

        if classified.surface_start {
            self.in_surface_block = true;
        }
        if classified.surface_end {
            self.in_surface_block = false;
        }
        debug!(
            "{}: {} (in_surface_block={}, recognized={})",
            self.line_nr,
            line,
            self.in_surface_block,
            !classified.is_unrecognized()
        );

        if let Some(args) = classified.coord_system {
            self.coord_system = Some(args.trim_end().to_string());
        }
        if let Some((name, args)) = classified.direct_command {
            self.direct_commands
                .push((name.to_string(), args.trim_end().to_string()));
        }
        if let Some(header) = &classified.grid_header {
            self.commit_grid_header(header);
        }
        if let Some(mode) = classified.grid_flip {
            self.set_flip(mode);
        }
        if let Some((key, value)) = classified.gdal_field {
            self.gdal.observe(key, value, self.line_nr)?;
            self.commit_gdal_header();
        }
        if let Some(tokens) = &classified.data_row {
            if self.in_surface_block || self.skip_surface_check {
                if let Some(mesh) = self.mesh.as_mut() {
                    if mesh.push_row(tokens, self.line_nr)? {
                        self.rows_read += 1;
                    }
                }
            }
        }
        Ok(())
    }

    fn commit_grid_header(&mut self, header: &GridHeader) {
        if header.columns == 0 || header.rows == 0 {
            warn!(
                "line {}: ignoring grid of {}x{} points",
                self.line_nr, header.columns, header.rows
            );
            return;
        }
        self.commit(GridGeometry {
            origin_x: header.origin_x,
            origin_y: header.origin_y,
            step_x: header.step_x,
            step_y: header.step_y,
            columns: header.columns,
            rows: header.rows,
            flip: self.pending_flip,
        });
    }

    fn commit_gdal_header(&mut self) {
        if self.gdal_ignored {
            return;
        }
        let Some(geometry) = self.gdal.geometry(self.pending_flip) else {
            return;
        };
        if self.header_valid() {
            warn!(
                "line {}: ignoring GDAL header, grid already defined",
                self.line_nr
            );
            self.gdal_ignored = true;
            return;
        }
        // GDAL grids carry no surface block around their data.
        self.skip_surface_check = true;
        self.commit(geometry);
        self.gdal_ignored = true;
    }

    fn commit(&mut self, geometry: GridGeometry) {
        if self.header_valid() {
            warn!(
                "line {}: ignoring grid directive, grid already defined",
                self.line_nr
            );
            return;
        }
        let (columns, rows) = (geometry.columns, geometry.rows);
        let Some(mesh) = MeshBuilder::new(geometry) else {
            warn!(
                "line {}: ignoring grid of {}x{} points, too large to allocate",
                self.line_nr, columns, rows
            );
            return;
        };

        let geometry = mesh.geometry();
        info!(
            "Grid of {}x{} points at ({}, {}), spacing ({}, {}), flip {:?}",
            geometry.columns,
            geometry.rows,
            geometry.origin_x,
            geometry.origin_y,
            geometry.step_x,
            geometry.step_y,
            geometry.flip
        );
        self.mesh = Some(mesh);
    }

    fn set_flip(&mut self, mode: FlipMode) {
        match self.mesh.as_mut() {
            Some(mesh) => mesh.set_flip(mode),
            None => self.pending_flip.apply(mode),
        }
    }

    /// Close the pass, failing when no grid was ever defined.
    pub fn finish(self) -> Result<ParsedSurface> {
        let Some(mesh) = self.mesh else {
            if self.gdal.is_observed() {
                return Err(Error::IncompleteHeader {
                    missing: self.gdal.missing(),
                });
            }
            return Err(Error::NoGridCommand);
        };

        let (geometry, mesh) = mesh.finish();
        if self.rows_read < geometry.rows {
            warn!(
                "Only {} of {} grid rows found, remaining rows are zero",
                self.rows_read, geometry.rows
            );
        }

        Ok(ParsedSurface {
            geometry,
            mesh,
            coord_system: self.coord_system,
            direct_commands: self.direct_commands,
            rows_read: self.rows_read,
        })
    }
}

/// Run a full pass over `reader`.
///
/// Lines are decoded leniently: bytes that are not UTF-8, as in comments of
/// legacy encoded Therion files, become replacement characters. Every
/// directive and number is plain ASCII.
pub fn parse_surface<R: BufRead>(mut reader: R, options: &ParseOptions) -> Result<ParsedSurface> {
    let mut state = ParseState::new(options);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        state.feed_line(&String::from_utf8_lossy(line))?;
    }
    state.finish()
}
