//! Pure mesh model for the low-poly background: a jittered grid of
//! oscillating vertices triangulated into two triangles per cell.
//!
//! Nothing in here touches the DOM, so the whole module compiles and tests on
//! the host. Randomness is injected as a uniform-[0,1) closure; the wasm side
//! passes `js_sys::Math::random` and tests pass a seeded generator.

use std::f64::consts::PI;
use std::fmt;

/// Grid cell pitch in CSS pixels, both axes.
pub const CELL_SIZE: f64 = 120.0;
/// Maximum per-axis displacement applied to a fresh vertex around its anchor.
pub const JITTER: f64 = 15.0;
/// Base phase advance per frame, scaled by each vertex's `speed`.
pub const PHASE_STEP: f64 = 0.008;
/// Vertical oscillation is compressed to 70% of the horizontal amplitude.
pub const VERTICAL_SQUASH: f64 = 0.7;
/// Every polygon is painted at this fixed opacity.
pub const FILL_OPACITY: f64 = 0.7;

const SPEED_MIN: f64 = 0.5;
const SPEED_SPAN: f64 = 0.7;
const AMPLITUDE_MIN: f64 = 18.0;
const AMPLITUDE_SPAN: f64 = 18.0;

/// One animated grid point. `x`/`y` hold the current rendered position,
/// `base_x`/`base_y` the undisplaced grid anchor the orbit is centered on.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub base_x: f64,
    pub base_y: f64,
    pub angle: f64,
    pub speed: f64,
    pub amplitude: f64,
}

impl Vertex {
    fn generate(base_x: f64, base_y: f64, rng: &mut impl FnMut() -> f64) -> Self {
        Vertex {
            x: base_x + (rng() - 0.5) * 2.0 * JITTER,
            y: base_y + (rng() - 0.5) * 2.0 * JITTER,
            base_x,
            base_y,
            angle: rng() * 2.0 * PI,
            speed: SPEED_MIN + rng() * SPEED_SPAN,
            amplitude: AMPLITUDE_MIN + rng() * AMPLITUDE_SPAN,
        }
    }

    /// Advance the phase one frame and recompute the position on the
    /// elliptical orbit around the anchor.
    pub fn advance(&mut self) {
        self.angle += PHASE_STEP * self.speed;
        self.x = self.base_x + self.angle.cos() * self.amplitude;
        self.y = self.base_y + self.angle.sin() * self.amplitude * VERTICAL_SQUASH;
    }
}

/// Row-major grid of vertices, sized to overflow the viewport by one cell on
/// every side so the mesh never shows an edge gap.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    vertices: Vec<Vertex>,
}

impl Grid {
    /// Grid dimensions `(rows, cols)` covering a viewport.
    pub fn dimensions_for(width: f64, height: f64) -> (usize, usize) {
        let cols = (width / CELL_SIZE).ceil() as usize + 2;
        let rows = (height / CELL_SIZE).ceil() as usize + 2;
        (rows, cols)
    }

    pub fn generate(width: f64, height: f64, rng: &mut impl FnMut() -> f64) -> Self {
        let (rows, cols) = Self::dimensions_for(width, height);
        let mut vertices = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                vertices.push(Vertex::generate(
                    col as f64 * CELL_SIZE,
                    row as f64 * CELL_SIZE,
                    rng,
                ));
            }
        }
        Grid {
            rows,
            cols,
            vertices,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> &Vertex {
        &self.vertices[row * self.cols + col]
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Advance every vertex one frame.
    pub fn advance(&mut self) {
        for v in &mut self.vertices {
            v.advance();
        }
    }
}

/// Fixed RGB fill assigned to a triangle at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

/// Blue-dominant fill that shifts with the cell position: warmer with row,
/// bluer with column, with per-triangle random variance in the base channel.
/// `alt` marks the second triangle of a cell.
fn triangle_color(row: usize, col: usize, alt: bool, rng: &mut impl FnMut() -> f64) -> Rgb {
    let base = 40.0 + (30.0 * rng()).floor();
    let c = base + row as f64 * 2.0 + if alt { 10.0 } else { 0.0 };
    let blue = 180.0 + col as f64 * 2.0;
    Rgb(
        c.min(255.0) as u8,
        (c + 40.0).min(255.0) as u8,
        blue.min(255.0) as u8,
    )
}

/// One half of a grid cell. Holds `(row, col)` references into the grid, not
/// vertex data; positions are resolved against the live grid each frame.
#[derive(Clone, Debug)]
pub struct Triangle {
    pub indices: [(usize, usize); 3],
    pub fill: Rgb,
}

impl Triangle {
    /// Current corner positions, read from the grid.
    pub fn points(&self, grid: &Grid) -> [(f64, f64); 3] {
        self.indices.map(|(row, col)| {
            let v = grid.get(row, col);
            (v.x, v.y)
        })
    }

    /// SVG `points` attribute value for the current frame.
    pub fn points_attr(&self, grid: &Grid) -> String {
        let [a, b, c] = self.points(grid);
        format!("{},{} {},{} {},{}", a.0, a.1, b.0, b.1, c.0, c.1)
    }
}

/// Split every cell along its diagonal into two triangles. Cells exist for
/// `row < rows-1, col < cols-1`, so every index stays in bounds.
pub fn triangulate(grid: &Grid, rng: &mut impl FnMut() -> f64) -> Vec<Triangle> {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut triangles = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1) * 2);
    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols.saturating_sub(1) {
            triangles.push(Triangle {
                indices: [(row, col), (row + 1, col), (row, col + 1)],
                fill: triangle_color(row, col, false, rng),
            });
            triangles.push(Triangle {
                indices: [(row + 1, col), (row + 1, col + 1), (row, col + 1)],
                fill: triangle_color(row, col, true, rng),
            });
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    // Deterministic uniform-[0,1) source so generation is repeatable.
    fn seeded_rng(mut state: u64) -> impl FnMut() -> f64 {
        move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        }
    }

    #[test]
    fn dimensions_cover_viewport_with_margin() {
        for &(w, h) in &[(1024.0, 768.0), (1920.0, 1080.0), (333.0, 777.0), (1.0, 1.0)] {
            let (rows, cols) = Grid::dimensions_for(w, h);
            assert!(cols as f64 * CELL_SIZE >= w + CELL_SIZE, "{}x{}", w, h);
            assert!(rows as f64 * CELL_SIZE >= h + CELL_SIZE, "{}x{}", w, h);
        }
    }

    #[test]
    fn reference_viewport_counts() {
        let mut rng = seeded_rng(7);
        let grid = Grid::generate(1024.0, 768.0, &mut rng);
        assert_eq!(grid.cols(), 11);
        assert_eq!(grid.rows(), 9);
        assert_eq!(grid.len(), 99);
        let triangles = triangulate(&grid, &mut rng);
        assert_eq!(triangles.len(), 160);
    }

    #[test]
    fn fresh_vertices_stay_within_jitter_of_anchor() {
        let mut rng = seeded_rng(42);
        let grid = Grid::generate(800.0, 600.0, &mut rng);
        for v in grid.vertices() {
            assert!((v.x - v.base_x).abs() <= JITTER);
            assert!((v.y - v.base_y).abs() <= JITTER);
            assert!(v.angle >= 0.0 && v.angle < 2.0 * PI);
            assert!(v.speed >= 0.5 && v.speed < 1.2);
            assert!(v.amplitude >= 18.0 && v.amplitude < 36.0);
        }
    }

    #[test]
    fn phase_advances_linearly() {
        let mut rng = seeded_rng(3);
        let mut grid = Grid::generate(400.0, 300.0, &mut rng);
        let initial: Vec<f64> = grid.vertices().map(|v| v.angle).collect();
        let speeds: Vec<f64> = grid.vertices().map(|v| v.speed).collect();
        let steps = 250;
        for _ in 0..steps {
            grid.advance();
        }
        for (i, v) in grid.vertices().enumerate() {
            let expected = initial[i] + steps as f64 * PHASE_STEP * speeds[i];
            assert!((v.angle - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn orbit_never_exceeds_amplitude() {
        let mut rng = seeded_rng(99);
        let mut grid = Grid::generate(500.0, 500.0, &mut rng);
        for _ in 0..1000 {
            grid.advance();
            for v in grid.vertices() {
                assert!((v.x - v.base_x).abs() <= v.amplitude + 1e-12);
                assert!((v.y - v.base_y).abs() <= v.amplitude * VERTICAL_SQUASH + 1e-12);
            }
        }
    }

    #[test]
    fn two_triangles_per_cell_cover_all_corners() {
        let mut rng = seeded_rng(1);
        let grid = Grid::generate(1024.0, 768.0, &mut rng);
        let triangles = triangulate(&grid, &mut rng);
        let cells = (grid.rows() - 1) * (grid.cols() - 1);
        assert_eq!(triangles.len(), cells * 2);

        for pair in triangles.chunks(2) {
            let mut corners: Vec<(usize, usize)> =
                pair.iter().flat_map(|t| t.indices).collect();
            corners.sort_unstable();
            corners.dedup();
            // Four distinct corners of one cell.
            assert_eq!(corners.len(), 4);
            let (row, col) = corners[0];
            assert_eq!(
                corners,
                vec![(row, col), (row, col + 1), (row + 1, col), (row + 1, col + 1)]
            );
        }

        for t in &triangles {
            for (row, col) in t.indices {
                assert!(row < grid.rows() && col < grid.cols());
            }
        }
    }

    #[test]
    fn fill_follows_cell_position() {
        let mut rng = seeded_rng(5);
        let grid = Grid::generate(1024.0, 768.0, &mut rng);
        let triangles = triangulate(&grid, &mut rng);
        for pair in triangles.chunks(2) {
            let col = pair[0].indices[0].1;
            for t in pair {
                let Rgb(r, g, b) = t.fill;
                assert_eq!(g, r + 40);
                assert_eq!(b as usize, 180 + col * 2);
            }
        }
    }

    #[test]
    fn points_attr_reads_live_positions() {
        let mut rng = seeded_rng(11);
        let mut grid = Grid::generate(200.0, 200.0, &mut rng);
        let triangles = triangulate(&grid, &mut rng);
        let before = triangles[0].points_attr(&grid);
        grid.advance();
        let after = triangles[0].points_attr(&grid);
        assert_ne!(before, after);
        let (row, col) = triangles[0].indices[0];
        let v = grid.get(row, col);
        assert!(after.starts_with(&format!("{},{}", v.x, v.y)));
    }

    #[test]
    fn color_formula_ranges() {
        let mut rng = seeded_rng(13);
        for _ in 0..200 {
            let Rgb(r, g, b) = triangle_color(3, 4, true, &mut rng);
            // base in [40, 70), plus row*2 and the alt offset
            assert!(r >= 56 && r < 86);
            assert_eq!(g, r + 40);
            assert_eq!(b, 188);
        }
    }
}
