use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use therion_surface::{convert, ConvertOptions, SurveyFormat};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

const EXIT_USAGE: u8 = 1;
const EXIT_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "therionsurface2survex", author, version, long_about = None)]
#[command(about = "Convert therion surface meshes and GDAL ASCII grids to survex or therion centerlines")]
struct Args {
    /// File to read from
    #[arg(value_name = "INFILE")]
    infile: Option<PathBuf>,

    /// File to read from, if not given as the last argument
    #[arg(short, long, value_name = "INFILE")]
    input: Option<PathBuf>,

    /// File to write to. Derived from the input file if not specified
    #[arg(short, long, value_name = "OUTFILE")]
    output: Option<PathBuf>,

    /// Treat every line as mesh data, not only lines inside surface ... endsurface
    #[arg(short, long)]
    skip_surface_check: bool,

    /// Write a therion centerline instead of survex (implied by a .th output file)
    #[arg(short, long)]
    therion: bool,

    /// Print debug output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    /// The last argument wins over `-i`.
    fn input_path(&self) -> Option<&Path> {
        self.infile.as_deref().or(self.input.as_deref())
    }

    fn format(&self) -> SurveyFormat {
        if self.therion {
            return SurveyFormat::Therion;
        }
        self.output
            .as_deref()
            .and_then(SurveyFormat::from_path)
            .unwrap_or_default()
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.format().output_path_for(input))
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    setup_logging(args.debug);

    let Some(input) = args.input_path() else {
        error!("No input file specified");
        return ExitCode::from(EXIT_USAGE);
    };

    match run(&args, input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn setup_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn run(args: &Args, input: &Path) -> Result<()> {
    let start_time = std::time::Instant::now();
    let format = args.format();
    let output = args.output_path(input);
    info!("Converting {:?} to {:?} ({:?})", input, output, format);

    let reader = File::open(input)
        .map(BufReader::new)
        .with_context(|| format!("Unable to open file '{}'", input.display()))?;
    let writer = File::create(&output)
        .map(BufWriter::new)
        .with_context(|| format!("Unable to create file '{}'", output.display()))?;

    let options = ConvertOptions {
        format,
        skip_surface_check: args.skip_surface_check,
        source_name: input.display().to_string(),
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    let surface = convert(reader, writer, &options)
        .with_context(|| format!("Failed to convert '{}'", input.display()))?;

    info!(
        "Written {} stations and {} legs from a {}x{} grid to {:?}",
        surface.mesh.station_count(),
        surface.mesh.leg_count(),
        surface.geometry.columns,
        surface.geometry.rows,
        output
    );
    info!("Total processing time: {:?}", start_time.elapsed());

    Ok(())
}
