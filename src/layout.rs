use crate::foundation::core::{Canvas, Point};

/// Horizontal row placement: symbol centres are `spacing` apart and the block is centred on
/// the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowLayout {
    pub canvas: Canvas,
    pub spacing: u32,
}

impl RowLayout {
    pub fn new(canvas: Canvas, spacing: u32) -> Self {
        Self { canvas, spacing }
    }

    /// Pixel centres for `count` symbols, left to right.
    pub fn centers(&self, count: usize) -> Vec<Point> {
        let y = self.canvas.center().y;
        row_x_positions(count, self.canvas.width, self.spacing)
            .into_iter()
            .map(|x| Point::new(x as f64, y))
            .collect()
    }

    /// Horizontal extent `(min_x, max_x)` covered by `count` symbols plus `margin` on each
    /// side of the outermost centres.
    pub fn extent(&self, count: usize, margin: f64) -> Option<(f64, f64)> {
        let xs = row_x_positions(count, self.canvas.width, self.spacing);
        let first = *xs.first()? as f64;
        let last = *xs.last()? as f64;
        Some((first - margin, last + margin))
    }

    /// Whether `count` symbols, each reaching `margin` from its centre, fit on the canvas.
    pub fn fits(&self, count: usize, margin: f64) -> bool {
        match self.extent(count, margin) {
            Some((lo, hi)) => lo >= 0.0 && hi <= f64::from(self.canvas.width),
            None => true,
        }
    }
}

pub fn row_x_positions(count: usize, width: u32, spacing: u32) -> Vec<i64> {
    if count == 0 {
        return Vec::new();
    }
    let spacing = i64::from(spacing);
    let block = (count as i64 - 1) * spacing;
    let left = (i64::from(width) - block).div_euclid(2);
    (0..count as i64).map(|i| left + i * spacing).collect()
}
