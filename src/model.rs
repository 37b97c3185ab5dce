/// Orientation of the incoming data relative to the mesh.
///
/// `vertical` makes the first data row fill mesh row 0 instead of the last
/// one, `horizontal` reverses the token order within each row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flip {
    pub vertical: bool,
    pub horizontal: bool,
}

/// Argument of a `grid-flip` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipMode {
    None,
    Vertical,
    Horizontal,
}

impl FlipMode {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "none" => Some(Self::None),
            "vertical" => Some(Self::Vertical),
            "horizontal" => Some(Self::Horizontal),
            _ => None,
        }
    }
}

impl Flip {
    /// `none` clears both flags, the other modes only set their own flag.
    pub fn apply(&mut self, mode: FlipMode) {
        match mode {
            FlipMode::None => *self = Flip::default(),
            FlipMode::Vertical => self.vertical = true,
            FlipMode::Horizontal => self.horizontal = true,
        }
    }
}

/// Placement and density of the surface mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    pub origin_x: f64,
    pub origin_y: f64,
    /// Always a positive magnitude.
    pub step_x: f64,
    /// Always a positive magnitude.
    pub step_y: f64,
    pub columns: usize,
    pub rows: usize,
    pub flip: Flip,
}

impl GridGeometry {
    /// Real world position of the mesh point at `(row, col)`.
    ///
    /// Uses the logical index only; flipping changes which input row filled
    /// the slot, never where the slot is.
    pub fn coordinate(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + self.step_x * col as f64,
            self.origin_y + self.step_y * row as f64,
        )
    }

    /// Mesh row the next data line is written to after an orientation change.
    pub fn first_row(&self) -> usize {
        if self.flip.vertical {
            0
        } else {
            self.rows - 1
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }
}

/// Elevation samples indexed `[row][column]`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationMesh {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f64>,
}

impl ElevationMesh {
    /// A mesh of zeros, or `None` when `rows * cols` points overflow or
    /// cannot be allocated.
    pub fn zeroed(rows: usize, cols: usize) -> Option<Self> {
        let len = rows.checked_mul(cols)?;
        let mut values = Vec::new();
        values.try_reserve_exact(len).ok()?;
        values.resize(len, 0.0);
        Some(Self { rows, cols, values })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.values[start..start + self.cols]
    }

    /// Number of mesh points, one fix station each.
    pub fn station_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of horizontal plus vertical neighbour pairs.
    pub fn leg_count(&self) -> usize {
        if self.rows == 0 || self.cols == 0 {
            return 0;
        }
        self.rows * (self.cols - 1) + self.cols * (self.rows - 1)
    }
}
