//! Geometry primitives and the fixed spacing constants of the invoice page.
//!
//! Coordinates are in PDF points with the origin at the top-left corner of
//! the printable area; `y` grows downwards.

/// A point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when the interiors overlap. Shared edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// A point relative to this rectangle's origin.
    pub fn offset(&self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Components scaled to the `0.0..=1.0` range PDF color operators take.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// Fixed offsets of the sequential flow layout.
pub mod spacing {
    /// A4 portrait, in points.
    pub const PAGE_WIDTH: f32 = 595.0;
    pub const PAGE_HEIGHT: f32 = 842.0;
    /// Unprintable border around the drawing area.
    pub const PAGE_MARGIN: f32 = 40.0;

    /// Left inset of text blocks inside the drawing area.
    pub const MARGIN: f32 = 30.0;
    /// Vertical gap between consecutive text lines.
    pub const LINE_SPACE: f32 = 7.0;
    pub const HEADER_HEIGHT: f32 = 90.0;
    /// Left edge of the amount box in the header band.
    pub const AMOUNT_BOX_X: f32 = 400.0;
    /// Top of the invoice-number and bill-to blocks.
    pub const INFO_TOP: f32 = 120.0;
    /// Gap between the bill-to block and the item table.
    pub const TABLE_GAP: f32 = 40.0;
    pub const CELL_PADDING: f32 = 5.0;
    pub const PRODUCT_COLUMN_WIDTH: f32 = 150.0;
    /// The grand-total label starts this far left of the amount box.
    pub const GRAND_TOTAL_INDENT: f32 = 40.0;
    /// Distance of the dashed separator from the bottom of the drawing area.
    pub const FOOTER_OFFSET: f32 = 100.0;
    pub const DASH_PATTERN: [f32; 2] = [3.0, 3.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(9.0, 9.0, 5.0, 5.0)));
    }

    #[test]
    fn union_covers_both() {
        let u = Rect::new(0.0, 0.0, 10.0, 10.0).union(&Rect::new(20.0, 5.0, 5.0, 20.0));
        assert_eq!(u, Rect::new(0.0, 0.0, 25.0, 25.0));
    }
}
