//! Rendering boundary: draw directives and the external image engine.
//!
//! The crate never rasterizes anything itself. Placements are translated into
//! [`DrawDirective`]s and handed, together with global [`RenderSettings`], to an
//! [`ImageEngine`] in a single [`RenderRequest`] per output image.
use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::config::Config;
use crate::error::Result;
use crate::geometry::ImageSize;
use crate::placement::{format_signed, TextPlacement};

pub mod imagemagick;

pub use imagemagick::ImageMagick;

/// Gravity all offsets are relative to.
pub const CENTER_GRAVITY: &str = "Center";

/// One phrase to draw, positioned relative to the image center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawDirective {
    /// Phrase as written. Engines must not let a leading `@` be read as a
    /// file reference; [`ImageMagick`] escapes it.
    pub text: String,
    pub color: Color,
    pub pointsize: u32,
    pub x_offset: i32,
    pub y_offset: i32,
}

impl DrawDirective {
    /// Signed `+X+Y` offset string.
    pub fn geometry(&self) -> String {
        format!(
            "{}{}",
            format_signed(self.x_offset),
            format_signed(self.y_offset)
        )
    }
}

impl From<&TextPlacement> for DrawDirective {
    fn from(placement: &TextPlacement) -> Self {
        Self {
            text: placement.text.clone(),
            color: placement.color,
            pointsize: placement.pointsize,
            x_offset: placement.offset.x,
            y_offset: placement.offset.y,
        }
    }
}

/// Settings applied to the whole output image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Output quality in percent.
    pub quality: u8,
    pub font: String,
    pub gravity: String,
    /// Drop profiles and comments from the output.
    pub strip_metadata: bool,
}

impl RenderSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            quality: config.image_quality,
            font: config.font.clone(),
            gravity: CENTER_GRAVITY.to_owned(),
            strip_metadata: true,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Everything the image engine needs to produce one output image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub settings: RenderSettings,
    pub directives: Vec<DrawDirective>,
}

impl RenderRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        settings: RenderSettings,
        placements: &[TextPlacement],
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            settings,
            directives: placements.iter().map(DrawDirective::from).collect(),
        }
    }
}

/// External collaborator that measures and renders images.
pub trait ImageEngine {
    /// Pixel dimensions of the image at `path`.
    fn dimensions(&self, path: &Path) -> Result<ImageSize>;

    /// Draw every directive onto the source image and write the destination.
    fn render(&self, request: &RenderRequest) -> Result<()>;
}

impl<E: ImageEngine + ?Sized> ImageEngine for &E {
    fn dimensions(&self, path: &Path) -> Result<ImageSize> {
        (**self).dimensions(path)
    }

    fn render(&self, request: &RenderRequest) -> Result<()> {
        (**self).render(request)
    }
}
