//! Recognition of the directives a surface source line may carry.
//!
//! Every predicate is evaluated independently, so one physical line can
//! report several matches at once (`grid 0 0 1 1 2 2` is both a surface
//! start and a grid header).

use crate::model::FlipMode;

/// Directives copied verbatim to the output. None are recognised yet.
const DIRECT_COMMANDS: &[&str] = &[];

/// Keys of the GDAL/ESRI ASCII grid header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdalKey {
    Ncols,
    Nrows,
    Xllcorner,
    Yllcorner,
    Cellsize,
    Dx,
    Dy,
}

impl GdalKey {
    pub const ALL: [GdalKey; 7] = [
        GdalKey::Ncols,
        GdalKey::Nrows,
        GdalKey::Xllcorner,
        GdalKey::Yllcorner,
        GdalKey::Cellsize,
        GdalKey::Dx,
        GdalKey::Dy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GdalKey::Ncols => "ncols",
            GdalKey::Nrows => "nrows",
            GdalKey::Xllcorner => "xllcorner",
            GdalKey::Yllcorner => "yllcorner",
            GdalKey::Cellsize => "cellsize",
            GdalKey::Dx => "dx",
            GdalKey::Dy => "dy",
        }
    }
}

/// The six values of a native `grid` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct GridHeader {
    pub origin_x: f64,
    pub origin_y: f64,
    pub step_x: f64,
    pub step_y: f64,
    pub columns: usize,
    pub rows: usize,
}

/// All directive matches found on one line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedLine<'a> {
    pub surface_start: bool,
    pub surface_end: bool,
    pub coord_system: Option<&'a str>,
    pub direct_command: Option<(&'a str, &'a str)>,
    pub grid_header: Option<GridHeader>,
    pub grid_flip: Option<FlipMode>,
    pub gdal_field: Option<(GdalKey, &'a str)>,
    pub data_row: Option<Vec<&'a str>>,
}

impl ClassifiedLine<'_> {
    pub fn is_unrecognized(&self) -> bool {
        *self == ClassifiedLine::default()
    }
}

pub fn classify(line: &str) -> ClassifiedLine<'_> {
    let head = line.trim_start();

    ClassifiedLine {
        surface_start: head.starts_with("surface") || head.starts_with("grid"),
        surface_end: head.starts_with("endsurface"),
        coord_system: keyword_args(head, "cs"),
        direct_command: direct_command(head),
        grid_header: grid_header(head),
        grid_flip: grid_flip(head),
        gdal_field: gdal_field(head),
        data_row: data_row(head),
    }
}

/// Text following `keyword` and at least one whitespace character.
fn keyword_args<'a>(head: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = head.strip_prefix(keyword)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let args = rest.trim_start();
    (!args.is_empty()).then_some(args)
}

fn direct_command(head: &str) -> Option<(&str, &str)> {
    DIRECT_COMMANDS.iter().find_map(|&name| {
        keyword_args(head, name).map(|args| (&head[..name.len()], args))
    })
}

fn grid_flip(head: &str) -> Option<FlipMode> {
    let args = keyword_args(head, "grid-flip")?;
    ["none", "vertical", "horizontal"]
        .into_iter()
        .find(|mode| args.starts_with(mode))
        .and_then(FlipMode::from_keyword)
}

fn gdal_field(head: &str) -> Option<(GdalKey, &str)> {
    GdalKey::ALL.into_iter().find_map(|key| {
        let args = keyword_args(head, key.as_str())?;
        let unsigned = args.strip_prefix('-').unwrap_or(args);
        let len = unsigned
            .find(|c: char| !is_number_char(c))
            .unwrap_or(unsigned.len());
        if len == 0 {
            return None;
        }
        let sign = args.len() - unsigned.len();
        Some((key, &args[..sign + len]))
    })
}

fn grid_header(head: &str) -> Option<GridHeader> {
    let tokens: Vec<&str> = head.split_whitespace().collect();
    let [keyword, x, y, sx, sy, cols, rows] = tokens.as_slice() else {
        return None;
    };
    if *keyword != "grid" {
        return None;
    }

    Some(GridHeader {
        origin_x: signed_real(x)?,
        origin_y: signed_real(y)?,
        step_x: unsigned_real(sx)?,
        step_y: unsigned_real(sy)?,
        columns: unsigned_int(cols)?,
        rows: unsigned_int(rows)?,
    })
}

fn data_row(head: &str) -> Option<Vec<&str>> {
    let tokens: Vec<&str> = head.split_whitespace().collect();
    if tokens.is_empty() || !tokens.iter().all(|t| t.chars().all(is_number_char)) {
        return None;
    }
    Some(tokens)
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Digits with at most one decimal point, at least one digit.
fn unsigned_real(token: &str) -> Option<f64> {
    let digits = token.chars().filter(char::is_ascii_digit).count();
    let dots = token.chars().filter(|&c| c == '.').count();
    if digits == 0 || dots > 1 || digits + dots != token.len() {
        return None;
    }
    token.parse().ok()
}

fn signed_real(token: &str) -> Option<f64> {
    match token.strip_prefix('-') {
        Some(magnitude) => unsigned_real(magnitude).map(|v| -v),
        None => unsigned_real(token),
    }
}

fn unsigned_int(token: &str) -> Option<usize> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_line_is_also_surface_start() {
        let line = classify("  grid 100 -200.5 10 10 2 3");
        assert!(line.surface_start);
        assert!(!line.surface_end);
        assert_eq!(
            line.grid_header,
            Some(GridHeader {
                origin_x: 100.0,
                origin_y: -200.5,
                step_x: 10.0,
                step_y: 10.0,
                columns: 2,
                rows: 3,
            })
        );
        assert_eq!(line.data_row, None);
    }

    #[test]
    fn test_grid_header_is_strict() {
        assert_eq!(classify("grid 0 0 1 1 2").grid_header, None);
        assert_eq!(classify("grid 0 0 1 1 2 2 9").grid_header, None);
        assert_eq!(classify("grid 0 0 -1 1 2 2").grid_header, None);
        assert_eq!(classify("grid 0 0 1 1 2.5 2").grid_header, None);
        assert_eq!(classify("grid 0 0 1..0 1 2 2").grid_header, None);
        assert!(classify("grid 0 0 1 1 2 2   ").grid_header.is_some());
    }

    #[test]
    fn test_surface_block_markers() {
        assert!(classify("surface").surface_start);
        assert!(classify("\tsurface -title \"x\"").surface_start);
        assert!(classify("endsurface").surface_end);
        assert!(!classify("endsurface").surface_start);
        assert!(!classify("# surface").surface_start);
    }

    #[test]
    fn test_coord_system() {
        assert_eq!(classify("cs UTM33").coord_system, Some("UTM33"));
        assert_eq!(
            classify("  cs EPSG:31258  ").coord_system,
            Some("EPSG:31258  ")
        );
        assert_eq!(classify("cs").coord_system, None);
        assert_eq!(classify("cellsize 5").coord_system, None);
    }

    #[test]
    fn test_grid_flip() {
        assert_eq!(classify("grid-flip none").grid_flip, Some(FlipMode::None));
        assert_eq!(
            classify("grid-flip vertical").grid_flip,
            Some(FlipMode::Vertical)
        );
        assert_eq!(
            classify(" grid-flip   horizontal").grid_flip,
            Some(FlipMode::Horizontal)
        );
        assert_eq!(classify("grid-flip sideways").grid_flip, None);
        assert!(classify("grid-flip none").surface_start);
    }

    #[test]
    fn test_gdal_fields() {
        assert_eq!(classify("ncols 4").gdal_field, Some((GdalKey::Ncols, "4")));
        assert_eq!(
            classify("xllcorner   -12.5").gdal_field,
            Some((GdalKey::Xllcorner, "-12.5"))
        );
        assert_eq!(
            classify("cellsize -5 # trailing").gdal_field,
            Some((GdalKey::Cellsize, "-5"))
        );
        assert_eq!(classify("dy 2").gdal_field, Some((GdalKey::Dy, "2")));
        assert_eq!(classify("ncols four").gdal_field, None);
        assert_eq!(classify("ncolsx 4").gdal_field, None);
        assert_eq!(classify("NODATA_value -9999").gdal_field, None);
    }

    #[test]
    fn test_every_gdal_key_is_recognized() {
        for key in GdalKey::ALL {
            let line = format!("{} 12.5", key.as_str());
            assert_eq!(classify(&line).gdal_field, Some((key, "12.5")), "{}", line);
        }
    }

    #[test]
    fn test_data_rows() {
        assert_eq!(classify("1 2.5 3").data_row, Some(vec!["1", "2.5", "3"]));
        assert_eq!(classify("  10\t20  ").data_row, Some(vec!["10", "20"]));
        assert_eq!(classify("1 -2 3").data_row, None);
        assert_eq!(classify("1e3 2").data_row, None);
        assert_eq!(classify("").data_row, None);
        assert_eq!(classify("   ").data_row, None);
    }

    #[test]
    fn test_direct_command_never_fires() {
        for text in ["fix 1 2 3", "equate a b", "data normal from to", "cs x"] {
            assert_eq!(classify(text).direct_command, None, "{}", text);
        }
    }

    #[test]
    fn test_unrecognized() {
        assert!(classify("bitmap foo.png [0 0 1 1]").is_unrecognized());
        assert!(classify("").is_unrecognized());
        assert!(!classify("endsurface").is_unrecognized());
    }
}
