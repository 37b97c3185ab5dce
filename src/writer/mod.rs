mod format;

pub use format::SurveyFormat;

use std::io::Write;

use tracing::debug;

use crate::error::Result;
use crate::parser::ParsedSurface;

/// Header comment contents.
#[derive(Debug, Clone, Default)]
pub struct Preamble<'a> {
    pub generator: &'a str,
    pub generated_at: &'a str,
    pub source_name: &'a str,
}

/// Writes a parsed surface as fix stations and nosurvey legs.
pub struct SurveyWriter<W: Write> {
    out: W,
    format: SurveyFormat,
}

impl<W: Write> SurveyWriter<W> {
    pub fn new(out: W, format: SurveyFormat) -> Self {
        Self { out, format }
    }

    /// Write the three header comments and flush them.
    pub fn write_preamble(&mut self, preamble: &Preamble) -> Result<()> {
        let c = self.format.comment_prefix();
        writeln!(self.out, "{} generated by {}", c, preamble.generator)?;
        writeln!(self.out, "{} generated at {}", c, preamble.generated_at)?;
        writeln!(self.out, "{} source file: {}", c, preamble.source_name)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn write_surface(&mut self, surface: &ParsedSurface) -> Result<()> {
        let p = self.format.command_prefix();

        if self.format == SurveyFormat::Therion {
            writeln!(self.out, "survey surface")?;
            writeln!(self.out, "centerline")?;
        }

        if let Some(cs) = &surface.coord_system {
            writeln!(self.out, "{}cs {}", p, cs)?;
            if self.format == SurveyFormat::Survex {
                writeln!(self.out, "{}cs out {}", p, cs)?;
            }
        }
        for (name, args) in &surface.direct_commands {
            writeln!(self.out, "{}{} {}", p, name, args)?;
        }
        writeln!(self.out, "{}flags surface", p)?;

        self.write_stations(surface)?;
        self.write_legs(surface)?;

        if self.format == SurveyFormat::Therion {
            writeln!(self.out, "endcenterline")?;
            writeln!(self.out, "endsurvey")?;
        }
        self.out.flush()?;

        debug!(
            "Wrote {} stations and {} legs",
            surface.mesh.station_count(),
            surface.mesh.leg_count()
        );
        Ok(())
    }

    fn write_stations(&mut self, surface: &ParsedSurface) -> Result<()> {
        let p = self.format.command_prefix();
        let (rows, cols) = surface.mesh.shape();
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = surface.geometry.coordinate(row, col);
                let z = surface.mesh.get(row, col);
                writeln!(
                    self.out,
                    "{}fix {} {} {} {}",
                    p,
                    station_name(row, col),
                    x,
                    y,
                    z
                )?;
            }
        }
        Ok(())
    }

    fn write_legs(&mut self, surface: &ParsedSurface) -> Result<()> {
        let p = self.format.command_prefix();
        writeln!(self.out)?;
        writeln!(self.out, "{}data nosurvey from to", p)?;

        let (rows, cols) = surface.mesh.shape();
        for row in 0..rows {
            for col in 0..cols {
                let from = station_name(row, col);
                if col + 1 < cols {
                    writeln!(self.out, "{} {}", from, station_name(row, col + 1))?;
                }
                if row + 1 < rows {
                    writeln!(self.out, "{} {}", from, station_name(row + 1, col))?;
                }
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn station_name(row: usize, col: usize) -> String {
    format!("surface.{}.{}", row, col)
}
