//! Gridded prediction outputs

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sentinel for cells without a prediction
pub const NODATA: f64 = -9999.0;

/// Regular grid of predictions over a rectangle
///
/// Values are row-major with row 0 at `ylim[0]`; each value is the prediction
/// at its cell center.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ContourRectangle {
    /// `y_width` rows of `x_width` values
    pub contour: Vec<f64>,
    /// Number of columns
    pub x_width: usize,
    /// Number of rows
    pub y_width: usize,
    /// Horizontal extent `[min, max]`
    pub xlim: [f64; 2],
    /// Vertical extent `[min, max]`
    pub ylim: [f64; 2],
    /// Range of the sample values `[min, max]`
    pub zlim: [f64; 2],
    /// Cell width in coordinate units
    pub x_resolution: f64,
    /// Cell height in coordinate units
    pub y_resolution: f64,
    /// Spatial reference the coordinates are expressed in, when known
    pub srs: Option<u32>,
}

impl ContourRectangle {
    /// Value at `(col, row)`
    pub fn value(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.x_width || row >= self.y_width {
            return None;
        }
        self.contour.get(row * self.x_width + col).copied()
    }

    /// Center of cell `(col, row)`
    pub fn cell_center(&self, col: usize, row: usize) -> DVec2 {
        DVec2::new(
            self.xlim[0] + (col as f64 + 0.5) * self.x_resolution,
            self.ylim[0] + (row as f64 + 0.5) * self.y_resolution,
        )
    }
}

/// Polygon-masked prediction grid
///
/// Cell `(col, row)` is centred on the node `(xlim[0] + col·width,
/// ylim[0] + row·width)`. Cells whose center lies outside the mask hold
/// [`NODATA`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GridMatrices {
    /// `rows` rows of `cols` values
    pub data: Vec<f64>,
    /// Number of columns
    pub cols: usize,
    /// Number of rows
    pub rows: usize,
    /// Horizontal extent of the mask `[min, max]`
    pub xlim: [f64; 2],
    /// Vertical extent of the mask `[min, max]`
    pub ylim: [f64; 2],
    /// Range of the sample values `[min, max]`
    pub zlim: [f64; 2],
    /// Cell size in coordinate units
    pub width: f64,
    /// Value stored in masked-out cells
    pub nodata: f64,
    /// Spatial reference the coordinates are expressed in, when known
    pub srs: Option<u32>,
}

impl GridMatrices {
    /// Value at `(col, row)`, `None` when out of bounds or masked out
    pub fn value(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let v = self.data[row * self.cols + col];
        (v != self.nodata).then_some(v)
    }

    /// Center of cell `(col, row)`
    pub fn node(&self, col: usize, row: usize) -> DVec2 {
        DVec2::new(
            self.xlim[0] + col as f64 * self.width,
            self.ylim[0] + row as f64 * self.width,
        )
    }

    /// Number of cells holding a prediction
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != self.nodata).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contour_indexing() {
        let rect = ContourRectangle {
            contour: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            x_width: 3,
            y_width: 2,
            xlim: [0.0, 3.0],
            ylim: [10.0, 12.0],
            zlim: [1.0, 6.0],
            x_resolution: 1.0,
            y_resolution: 1.0,
            srs: None,
        };
        assert_eq!(rect.value(2, 0), Some(3.0));
        assert_eq!(rect.value(0, 1), Some(4.0));
        assert_eq!(rect.value(3, 0), None);
        assert_eq!(rect.cell_center(1, 1), DVec2::new(1.5, 11.5));
    }

    #[test]
    fn test_grid_masking() {
        let grid = GridMatrices {
            data: vec![NODATA, 2.0, 3.0, NODATA],
            cols: 2,
            rows: 2,
            xlim: [0.0, 1.0],
            ylim: [0.0, 1.0],
            zlim: [2.0, 3.0],
            width: 1.0,
            nodata: NODATA,
            srs: Some(4326),
        };
        assert_eq!(grid.value(0, 0), None);
        assert_eq!(grid.value(1, 0), Some(2.0));
        assert_eq!(grid.valid_count(), 2);
        assert_eq!(grid.node(1, 1), DVec2::new(1.0, 1.0));
    }
}
