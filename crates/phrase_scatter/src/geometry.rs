//! Integer image-space geometry: points, axis-aligned rectangles, and distances.
//!
//! Image coordinates grow rightwards on +x and downwards on +y. Rectangles are
//! expected to satisfy `top_left <= bottom_right` componentwise; this is not
//! validated, and overlap tests on inverted rectangles give unspecified answers.
use glam::IVec2;

/// A point in image space, measured in pixels.
pub type Point = IVec2;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    a.as_dvec2().distance(b.as_dvec2())
}

/// Axis-aligned rectangle described by its top-left and bottom-right corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Rect {
    pub fn new(top_left: impl Into<Point>, bottom_right: impl Into<Point>) -> Self {
        Self {
            top_left: top_left.into(),
            bottom_right: bottom_right.into(),
        }
    }

    /// Rectangle extending `half_extent` from `center` on each side.
    pub fn around(center: Point, half_extent: IVec2) -> Self {
        Self {
            top_left: center - half_extent,
            bottom_right: center + half_extent,
        }
    }

    /// Midpoint of both corners, rounded towards negative infinity.
    pub fn center(&self) -> Point {
        IVec2::new(
            (self.top_left.x + self.bottom_right.x).div_euclid(2),
            (self.top_left.y + self.bottom_right.y).div_euclid(2),
        )
    }

    pub fn width(&self) -> i32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> i32 {
        self.bottom_right.y - self.top_left.y
    }

    pub fn translated(&self, offset: IVec2) -> Self {
        Self {
            top_left: self.top_left + offset,
            bottom_right: self.bottom_right + offset,
        }
    }

    /// Whether the rectangle contains `p`, edges included.
    pub fn contains(&self, p: Point) -> bool {
        p.cmpge(self.top_left).all() && p.cmple(self.bottom_right).all()
    }

    /// Separating-axis overlap test. Rectangles that only touch along an edge or
    /// a corner are reported as overlapping.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.top_left.x > other.bottom_right.x || other.top_left.x > self.bottom_right.x {
            return false;
        }
        if self.top_left.y > other.bottom_right.y || other.top_left.y > self.bottom_right.y {
            return false;
        }
        true
    }
}

/// Pixel dimensions of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Length of the diagonal in pixels.
    pub fn diagonal(&self) -> f64 {
        distance(Point::ZERO, Point::new(self.width as i32, self.height as i32))
    }

    /// Geometric center, rounded down.
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[({}, {}) ({}, {})]",
            self.top_left.x, self.top_left.y, self.bottom_right.x, self.bottom_right.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Rect {
        Rect::new(IVec2::new(x0, y0), IVec2::new(x1, y1))
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(IVec2::ZERO, IVec2::new(3, 4)), 5.0);
        assert_eq!(distance(IVec2::new(7, -2), IVec2::new(7, -2)), 0.0);
    }

    #[test]
    fn center_floors_odd_sums() {
        assert_eq!(rect(0, 0, 300, 200).center(), IVec2::new(150, 100));
        assert_eq!(rect(0, 0, 5, 3).center(), IVec2::new(2, 1));
        assert_eq!(rect(-5, -3, 0, 0).center(), IVec2::new(-3, -2));
    }

    #[test]
    fn touching_edges_overlap() {
        let a = rect(0, 0, 10, 10);
        assert!(a.overlaps(&rect(10, 0, 20, 10)));
        assert!(a.overlaps(&rect(10, 10, 20, 20)));
        assert!(!a.overlaps(&rect(11, 0, 20, 10)));
        assert!(!a.overlaps(&rect(0, 11, 10, 20)));
    }

    #[test]
    fn contained_rectangle_overlaps() {
        let outer = rect(0, 0, 100, 100);
        let inner = rect(40, 40, 60, 60);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn around_and_translate() {
        let r = Rect::around(IVec2::new(50, 50), IVec2::new(15, 12));
        assert_eq!(r, rect(35, 38, 65, 62));
        assert_eq!((r.width(), r.height()), (30, 24));
        assert_eq!(r.translated(IVec2::new(-35, 2)), rect(0, 40, 30, 64));
        assert!(r.contains(IVec2::new(35, 62)));
        assert!(!r.contains(IVec2::new(34, 50)));
    }

    #[test]
    fn image_size_center_and_diagonal() {
        let size = ImageSize::new(300, 400);
        assert_eq!(size.diagonal(), 500.0);
        assert_eq!(ImageSize::new(901, 601).center(), IVec2::new(450, 300));
        assert_eq!(size.to_string(), "300x400");
    }

    #[test]
    fn accepts_mint_points() {
        let r = Rect::new(mint::Vector2 { x: 1, y: 2 }, mint::Vector2 { x: 3, y: 4 });
        assert_eq!(r, rect(1, 2, 3, 4));
        assert_eq!(r.to_string(), "[(1, 2) (3, 4)]");
    }
}
