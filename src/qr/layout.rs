//! Symbol geometry: module size, finder regions and the logo cut-out

use crate::error::{Error, Result};

/// Side length of a finder pattern in modules
pub(crate) const FINDER_MODULES: usize = 7;

/// Placement of the module grid inside the output square
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Geometry {
    /// Modules per side
    pub count: usize,
    /// Side of one module in logical units
    pub dot: f64,
    /// Left edge of the grid
    pub x0: f64,
    /// Top edge of the grid
    pub y0: f64,
}

impl Geometry {
    /// Fit `count` modules into a `width`×`height` area with `margin` on every side.
    ///
    /// Modules snap to whole units; when the area holds less than one unit
    /// per module they shrink to a fractional size instead.
    pub fn fit(count: usize, width: u32, height: u32, margin: u32) -> Result<Self> {
        let area = f64::from(width.min(height)) - 2.0 * f64::from(margin);
        if count == 0 || area <= 0.0 {
            return Err(Error::QrEncode(format!(
                "no room for a {count}-module symbol in {width}x{height} with margin {margin}"
            )));
        }

        let exact = area / count as f64;
        let dot = if exact >= 1.0 { exact.floor() } else { exact };
        let grid = count as f64 * dot;
        Ok(Self {
            count,
            dot,
            x0: ((f64::from(width) - grid) / 2.0).floor().max(0.0),
            y0: ((f64::from(height) - grid) / 2.0).floor().max(0.0),
        })
    }

    /// Top-left corners (column, row) of the three finder patterns.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.count - FINDER_MODULES;
        [(0, 0), (far, 0), (0, far)]
    }

    /// Whether a module belongs to a finder pattern.
    pub fn in_finder(&self, col: usize, row: usize) -> bool {
        self.finder_origins().iter().any(|&(fc, fr)| {
            (fc..fc + FINDER_MODULES).contains(&col) && (fr..fr + FINDER_MODULES).contains(&row)
        })
    }

    /// Logical position of a module's top-left corner.
    pub fn module_origin(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.x0 + col as f64 * self.dot,
            self.y0 + row as f64 * self.dot,
        )
    }
}

/// Centered region reserved for the logo
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LogoArea {
    /// Modules cleared horizontally (always odd)
    pub cols: usize,
    /// Modules cleared vertically (always odd)
    pub rows: usize,
    first_col: usize,
    first_row: usize,
    /// Drawn logo box
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LogoArea {
    /// Size the logo cut-out for a logo with the given height/width ratio.
    ///
    /// The cleared module count never exceeds `image_size * count²`, spans
    /// are odd so the cut-out stays centred, and the finder rows and columns
    /// are never covered. Returns `None` when the logo would not be visible.
    pub fn compute(
        geometry: &Geometry,
        image_size: f64,
        margin: u32,
        aspect: f64,
    ) -> Option<Self> {
        let count = geometry.count;
        let max_hidden = (image_size * (count * count) as f64).floor() as usize;
        let max_axis = count.saturating_sub(2 * FINDER_MODULES);
        if max_hidden == 0 || max_axis == 0 || !aspect.is_finite() || aspect <= 0.0 {
            return None;
        }

        let mut cols = odd_at_most(
            ((max_hidden as f64 / aspect).sqrt().floor() as usize).clamp(1, max_axis),
        );
        let mut rows = rows_for(cols, aspect, max_axis);
        while cols * rows > max_hidden && cols > 1 {
            cols -= 2;
            rows = rows_for(cols, aspect, max_axis);
        }
        if cols * rows > max_hidden {
            return None;
        }

        let inset = 2.0 * f64::from(margin);
        let width = cols as f64 * geometry.dot - inset;
        let height = rows as f64 * geometry.dot - inset;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        let first_col = (count - cols) / 2;
        let first_row = (count - rows) / 2;
        let (left, top) = geometry.module_origin(first_col, first_row);
        Some(Self {
            cols,
            rows,
            first_col,
            first_row,
            x: left + f64::from(margin),
            y: top + f64::from(margin),
            width,
            height,
        })
    }

    /// Whether a module lies under the logo.
    pub fn covers(&self, col: usize, row: usize) -> bool {
        (self.first_col..self.first_col + self.cols).contains(&col)
            && (self.first_row..self.first_row + self.rows).contains(&row)
    }
}

fn odd_at_most(n: usize) -> usize {
    if n % 2 == 0 { n.saturating_sub(1).max(1) } else { n }
}

fn rows_for(cols: usize, aspect: f64, max_axis: usize) -> usize {
    let half = ((cols as f64 * aspect - 1.0) / 2.0).ceil().max(0.0) as usize;
    odd_at_most((1 + 2 * half).min(max_axis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_grid_with_whole_module_size() {
        // Version 3 symbol into the 360 preview.
        let geometry = Geometry::fit(29, 360, 360, 0).unwrap();
        assert_eq!(geometry.dot, 12.0);
        assert_eq!(geometry.x0, 6.0);
        assert_eq!(geometry.y0, 6.0);
    }

    #[test]
    fn shrinks_modules_below_one_unit() {
        let geometry = Geometry::fit(29, 16, 16, 0).unwrap();
        assert!(geometry.dot > 0.5 && geometry.dot < 1.0);
        assert!(geometry.count as f64 * geometry.dot <= 16.0);
        assert_eq!(geometry.x0, 0.0);
        assert_eq!(geometry.y0, 0.0);
    }

    #[test]
    fn rejects_margin_that_leaves_no_room() {
        assert!(Geometry::fit(29, 20, 20, 10).is_err());
        assert!(Geometry::fit(29, 20, 20, 9).is_ok());
    }

    #[test]
    fn finder_membership() {
        let geometry = Geometry::fit(25, 250, 250, 0).unwrap();
        assert!(geometry.in_finder(0, 0));
        assert!(geometry.in_finder(24, 6));
        assert!(geometry.in_finder(6, 24));
        assert!(!geometry.in_finder(24, 24));
        assert!(!geometry.in_finder(7, 7));
    }

    #[test]
    fn square_logo_stays_within_budget() {
        let geometry = Geometry::fit(29, 360, 360, 0).unwrap();
        let area = LogoArea::compute(&geometry, 0.32, 8, 1.0).unwrap();

        assert_eq!(area.cols % 2, 1);
        assert_eq!(area.rows % 2, 1);
        assert!(area.cols * area.rows <= (0.32 * 29.0 * 29.0) as usize);
        assert!(area.cols <= 29 - 14 && area.rows <= 29 - 14);
        assert!(area.covers(14, 14));
        assert!(!area.covers(0, 14));
        assert_eq!(area.width, area.cols as f64 * 12.0 - 16.0);
    }

    #[test]
    fn wide_logo_clears_fewer_rows() {
        let geometry = Geometry::fit(29, 360, 360, 0).unwrap();
        let area = LogoArea::compute(&geometry, 0.32, 8, 0.5).unwrap();
        assert!(area.rows < area.cols);
    }

    #[test]
    fn margin_larger_than_cut_out_hides_logo() {
        let geometry = Geometry::fit(21, 42, 42, 0).unwrap();
        assert!(LogoArea::compute(&geometry, 0.32, 8, 1.0).is_none());
    }
}
