//! Estimated text footprints and the geometry used to fit them on the image.
use glam::IVec2;

use crate::color::Color;
use crate::geometry::{Point, Rect};

/// Estimated footprint of one placed phrase, tagged with its fill color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRegion {
    pub bounds: Rect,
    pub color: Color,
}

impl TextRegion {
    pub fn new(bounds: Rect, color: Color) -> Self {
        Self { bounds, color }
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    pub fn overlaps(&self, other: &TextRegion) -> bool {
        self.bounds.overlaps(&other.bounds)
    }
}

/// Heuristic rendered size `(width, height)` of `text` at `pointsize`.
///
/// Glyphs are assumed half a point wide and lines 1.25 points tall; no font
/// metrics are consulted.
pub fn estimate_text_extent(text: &str, pointsize: u32) -> IVec2 {
    let chars = text.chars().count() as f64;
    let pointsize = f64::from(pointsize);
    let height = (pointsize * 1.25).ceil() as i32;
    let width = (chars * pointsize / 2.0).ceil() as i32;
    IVec2::new(width, height)
}

/// Box centered at `anchor` with the estimated extent. Each side reaches half
/// the extent (rounded down) from the anchor.
pub fn text_box(anchor: Point, extent: IVec2) -> Rect {
    Rect::around(anchor, extent / 2)
}

/// Shift along one axis that brings `[min, max]` inside `[lo, hi]`. The low
/// edge wins when the span does not fit at all.
pub fn fit_axis(min: i32, max: i32, lo: i32, hi: i32) -> i32 {
    if min < lo {
        lo - min
    } else if max > hi {
        hi - max
    } else {
        0
    }
}

/// Shift that moves `bounds` inside an image of `size` kept `padding` pixels
/// away from every edge.
pub fn fit_into_view(bounds: &Rect, width: u32, height: u32, padding: i32) -> IVec2 {
    IVec2::new(
        fit_axis(
            bounds.top_left.x,
            bounds.bottom_right.x,
            padding,
            width as i32 - padding,
        ),
        fit_axis(
            bounds.top_left.y,
            bounds.bottom_right.y,
            padding,
            height as i32 - padding,
        ),
    )
}
