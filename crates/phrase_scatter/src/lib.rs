#![forbid(unsafe_code)]
//! phrase_scatter: Zone-based placement of meme-style text phrases on images.
//!
//! Modules:
//! - geometry, color: integer points, rectangles, and RGB fill colors
//! - config: palette, pointsizes, zone grid, retry policy, option merging
//! - zone: sub-regions of the image that anchor points are drawn from
//! - placement: collision-free phrase placement with spatial and color spreading
//! - render: draw directives and the ImageMagick engine
//! - generate: measure the image, place phrases, render once
//!
//! For usage, see README.
pub mod color;
pub mod config;
pub mod error;
pub mod generate;
pub mod geometry;
pub mod placement;
pub mod render;
pub(crate) mod sampling;
pub mod zone;

/// Convenient re-exports for common types. Import with `use phrase_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::color::{Color, ColorSpec};
    pub use crate::config::{parse_pointsizes, Config, Pointsizes, RetryPolicy};
    pub use crate::error::{Error, Result};
    pub use crate::generate::{GenerateOptions, GenerationPlan, MemeGenerator};
    pub use crate::geometry::{distance, ImageSize, Point, Rect};
    pub use crate::placement::events::{EventSink, FnSink, PlacementEvent, VecSink};
    pub use crate::placement::{PlacementEngine, PlacementSession, TextPlacement, TextRegion};
    pub use crate::render::{
        DrawDirective, ImageEngine, ImageMagick, RenderRequest, RenderSettings,
    };
    pub use crate::zone::{generate_zone_grid, Zone, ZoneChoices, ZoneId};
}
