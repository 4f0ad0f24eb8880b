use serde::{Deserialize, Serialize};

use crate::*;

/// Height reserved above the grid for the HUD.
pub const HUD_HEIGHT: i32 = 110;
pub const MARGIN: i32 = 30;
pub const GAP: i32 = 12;

/// Square-card geometry for a grid centered on a canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    canvas: Size,
    card_side: i32,
    origin: Point,
}

impl Layout {
    /// Largest square card that fits `rows x cols` cells below the HUD band.
    pub fn new(canvas: Size, (rows, cols): Coord2) -> Self {
        let rows_i = i32::from(rows.max(1));
        let cols_i = i32::from(cols.max(1));

        let max_w = canvas
            .width
            .saturating_sub(2 * MARGIN + (cols_i - 1) * GAP)
            .div_euclid(cols_i);
        let max_h = canvas
            .height
            .saturating_sub(HUD_HEIGHT + 2 * MARGIN + (rows_i - 1) * GAP)
            .div_euclid(rows_i);
        let card_side = max_w.min(max_h).max(0);

        let grid_w = cols_i * card_side + (cols_i - 1) * GAP;
        let grid_h = rows_i * card_side + (rows_i - 1) * GAP;
        let origin = Point::new(
            canvas.width.saturating_sub(grid_w).div_euclid(2),
            canvas
                .height
                .saturating_sub(HUD_HEIGHT + grid_h)
                .div_euclid(2)
                .saturating_add(HUD_HEIGHT),
        );

        Self {
            canvas,
            card_side,
            origin,
        }
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Side of every card in pixels, 0 when the canvas cannot fit the grid.
    pub fn card_side(&self) -> i32 {
        self.card_side
    }

    /// Top-left corner of the first card.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn cell_rect(&self, (row, col): Coord2) -> Rect {
        let step = self.card_side + GAP;
        Rect::new(
            self.origin.x + i32::from(col) * step,
            self.origin.y + i32::from(row) * step,
            self.card_side,
            self.card_side,
        )
    }
}
