//! Conversion of Therion surface grids and GDAL ASCII grids into survey data.
//!
//! Every mesh point becomes a fixed station `surface.<row>.<col>` and every
//! pair of neighbouring points a nosurvey leg, written either as Survex or as
//! a Therion centerline.

pub mod classify;
pub mod error;
pub mod header;
pub mod mesh;
pub mod model;
pub mod parser;
pub mod writer;

use std::io::{BufRead, Write};

pub use error::{Error, Result};
pub use model::{ElevationMesh, Flip, FlipMode, GridGeometry};
pub use parser::{parse_surface, ParseOptions, ParsedSurface};
pub use writer::{Preamble, SurveyFormat, SurveyWriter};

pub const TOOL_NAME: &str = "therionsurface2survex";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub format: SurveyFormat,
    pub skip_surface_check: bool,
    /// Shown in the header comment.
    pub source_name: String,
    /// Shown in the header comment.
    pub generated_at: String,
}

/// Parse `input` and write the survey data to `output`.
///
/// The header comments are written even when no usable grid is found; the
/// error is returned after they reach `output`.
pub fn convert<R: BufRead, W: Write>(
    input: R,
    output: W,
    options: &ConvertOptions,
) -> Result<ParsedSurface> {
    let parsed = parse_surface(
        input,
        &ParseOptions {
            skip_surface_check: options.skip_surface_check,
        },
    );

    let generator = format!("{} {}", TOOL_NAME, VERSION);
    let mut writer = SurveyWriter::new(output, options.format);
    writer.write_preamble(&Preamble {
        generator: &generator,
        generated_at: &options.generated_at,
        source_name: &options.source_name,
    })?;

    let surface = parsed?;
    writer.write_surface(&surface)?;
    Ok(surface)
}
