//! Screen geometry: rectangles, points and tile colors.
//!
//! Rectangles use `(x, y, width, height)` semantics, not corner-to-corner.

use std::fmt;

/// A screen coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle with origin and extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: `x <= px < x + width` and `y <= py < y + height`.
    pub fn contains(&self, point: Point) -> bool {
        self.x <= point.x
            && point.x < self.x + self.width
            && self.y <= point.y
            && point.y < self.y + self.height
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) * self.height.max(0)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True if the two rectangles share any interior point.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

impl From<(i64, i64, i64, i64)> for Rect {
    fn from((x, y, width, height): (i64, i64, i64, i64)) -> Self {
        Self::new(x, y, width, height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// RGB color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// One entry of a layout: where a leaf goes and how it is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub rect: Rect,
    pub color: Rgb,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case((9, 9), true)]
    #[case((0, 0), true)]
    #[case((10, 5), false)]
    #[case((5, 10), false)]
    #[case((-1, 5), false)]
    fn test_contains_is_half_open(#[case] point: (i64, i64), #[case] expected: bool) {
        let rect = Rect::new(0, 0, 10, 10);
        assert_eq!(rect.contains(point.into()), expected);
    }

    #[test]
    fn test_zero_width_contains_nothing() {
        let rect = Rect::new(50, 0, 0, 10);
        assert!(!rect.contains(Point::new(50, 5)));
        assert!(rect.is_degenerate());
    }

    #[test]
    fn test_overlaps_excludes_shared_edge() {
        let left = Rect::new(0, 0, 50, 10);
        let right = Rect::new(50, 0, 50, 10);
        assert!(!left.overlaps(&right));
        assert!(left.overlaps(&Rect::new(49, 9, 5, 5)));
    }

    #[test]
    fn test_rgb_display_is_hex() {
        assert_eq!(Rgb(255, 0, 16).to_string(), "#ff0010");
    }
}
