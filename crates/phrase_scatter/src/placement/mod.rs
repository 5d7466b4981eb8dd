//! Zone-based phrase placement.
//!
//! The [`PlacementEngine`] owns a zone arena and the history of one run. For
//! every phrase it draws a zone, an anchor point, a pointsize, and a color,
//! estimates the text footprint, shifts it inside the padded image, and
//! retries until the footprint is clear of everything placed before.
use glam::IVec2;

use crate::color::Color;
use crate::geometry::Point;
use crate::zone::ZoneId;

pub mod engine;
pub mod events;
pub mod region;
pub mod selection;
pub mod session;

pub use engine::PlacementEngine;
pub use region::TextRegion;
pub use session::PlacementSession;

/// Where and how one phrase is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPlacement {
    /// The phrase itself.
    pub text: String,
    /// Fill color.
    pub color: Color,
    /// Font size in points.
    pub pointsize: u32,
    /// Final anchor in absolute image coordinates.
    pub anchor: Point,
    /// Anchor relative to the image center.
    pub offset: IVec2,
    /// Estimated footprint, already shifted into view.
    pub region: TextRegion,
    /// Zone of the successful attempt.
    pub zone: ZoneId,
    /// Attempts it took, the successful one included.
    pub attempts: usize,
}

impl TextPlacement {
    /// Offset in the explicitly signed `+X+Y` form used by center-gravity
    /// annotation, e.g. `+42-17`.
    pub fn offset_geometry(&self) -> String {
        format!(
            "{}{}",
            format_signed(self.offset.x),
            format_signed(self.offset.y)
        )
    }
}

/// Integer with an explicit sign: `+0`, `+42`, `-17`.
pub fn format_signed(value: i32) -> String {
    format!("{value:+}")
}
