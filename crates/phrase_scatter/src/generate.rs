//! Top-level meme generation: measure the image, place phrases, render once.
use std::path::{Path, PathBuf};

use rand::Rng as RngCore;
use tracing::info;

use crate::color::Color;
use crate::config::{Config, Pointsizes};
use crate::error::Result;
use crate::geometry::ImageSize;
use crate::placement::events::EventSink;
use crate::placement::{PlacementEngine, TextPlacement};
use crate::render::{ImageEngine, RenderRequest, RenderSettings};
use crate::zone::Zone;

/// Per-invocation overrides of a [`Config`].
///
/// Unset fields fall back to the config the generator is built with.
#[derive(Debug, Clone, Default, PartialEq)]
#[non_exhaustive]
pub struct GenerateOptions {
    pub colors: Option<Vec<Color>>,
    pub pointsizes: Option<Pointsizes>,
    /// Explicit zones; replace the generated grid when set.
    pub zones: Option<Vec<Zone>>,
    pub horizontal_divisions: Option<u32>,
    pub vertical_divisions: Option<u32>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = Some(colors.into_iter().collect());
        self
    }

    pub fn with_pointsizes(mut self, pointsizes: Pointsizes) -> Self {
        self.pointsizes = Some(pointsizes);
        self
    }

    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.zones = Some(zones);
        self
    }

    pub fn with_divisions(mut self, horizontal: u32, vertical: u32) -> Self {
        self.horizontal_divisions = Some(horizontal);
        self.vertical_divisions = Some(vertical);
        self
    }

    /// Apply the overrides on top of `base` and validate the result.
    pub fn resolve(&self, base: &Config) -> Result<Config> {
        let mut config = base.clone();
        if let Some(colors) = &self.colors {
            config.colors = colors.clone();
        }
        if let Some(pointsizes) = &self.pointsizes {
            config.pointsizes = pointsizes.clone();
        }
        if let Some(h) = self.horizontal_divisions {
            config.horizontal_divisions = h;
        }
        if let Some(v) = self.vertical_divisions {
            config.vertical_divisions = v;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Placements of one run plus the render request built from them.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    pub placements: Vec<TextPlacement>,
    pub request: RenderRequest,
}

/// Writes phrases onto one source image through an [`ImageEngine`].
///
/// The generator owns a [`PlacementEngine`] sized to the source image and can
/// be reused for several outputs; every call starts from a clean history.
#[derive(Debug)]
pub struct MemeGenerator<E: ImageEngine> {
    engine: E,
    source: PathBuf,
    placement: PlacementEngine,
    settings: RenderSettings,
}

impl<E: ImageEngine> MemeGenerator<E> {
    /// Measure the source image through `engine` and prepare placement.
    pub fn new(
        engine: E,
        source: impl Into<PathBuf>,
        config: &Config,
        options: &GenerateOptions,
    ) -> Result<Self> {
        let source = source.into();
        let size = engine.dimensions(&source)?;
        Self::with_size(engine, source, size, config, options)
    }

    /// Like [`MemeGenerator::new`] for a source whose size is already known.
    pub fn with_size(
        engine: E,
        source: impl Into<PathBuf>,
        size: ImageSize,
        config: &Config,
        options: &GenerateOptions,
    ) -> Result<Self> {
        let config = options.resolve(config)?;
        let settings = RenderSettings::from_config(&config);
        let mut placement = PlacementEngine::new(size, config)?;
        if let Some(zones) = &options.zones {
            placement.set_zones(zones.clone());
        }
        Ok(Self {
            engine,
            source: source.into(),
            placement,
            settings,
        })
    }

    pub fn with_render_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn image_size(&self) -> ImageSize {
        self.placement.image_size()
    }

    pub fn render_settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn placement_engine(&self) -> &PlacementEngine {
        &self.placement
    }

    pub fn placement_engine_mut(&mut self) -> &mut PlacementEngine {
        &mut self.placement
    }

    /// Zones of the source image, generating the grid on first use.
    pub fn zones(&mut self) -> Result<&[Zone]> {
        self.placement.zones()
    }

    /// Replace the zones; they are kept for later calls.
    pub fn set_zones(&mut self, zones: Vec<Zone>) {
        self.placement.set_zones(zones);
    }

    /// Place every phrase without rendering.
    pub fn plan<S: AsRef<str>>(
        &mut self,
        destination: impl Into<PathBuf>,
        phrases: &[S],
        rng: &mut dyn RngCore,
    ) -> Result<GenerationPlan> {
        self.plan_with_events(destination, phrases, rng, &mut ())
    }

    pub fn plan_with_events<S: AsRef<str>>(
        &mut self,
        destination: impl Into<PathBuf>,
        phrases: &[S],
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<GenerationPlan> {
        let placements = self.placement.place_all_with_events(phrases, rng, sink)?;
        let request = RenderRequest::new(
            self.source.clone(),
            destination,
            self.settings.clone(),
            &placements,
        );
        Ok(GenerationPlan {
            placements,
            request,
        })
    }

    /// Place every phrase and render them in a single engine call.
    ///
    /// Nothing is rendered if any phrase fails to place.
    pub fn generate_image<S: AsRef<str>>(
        &mut self,
        destination: impl AsRef<Path>,
        phrases: &[S],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<TextPlacement>> {
        self.generate_image_with_events(destination, phrases, rng, &mut ())
    }

    pub fn generate_image_with_events<S: AsRef<str>>(
        &mut self,
        destination: impl AsRef<Path>,
        phrases: &[S],
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<TextPlacement>> {
        let destination = destination.as_ref();
        let plan = self.plan_with_events(destination, phrases, rng, sink)?;
        info!(
            "Generating {} with {} phrases from {}.",
            destination.display(),
            plan.placements.len(),
            self.source.display()
        );
        self.engine.render(&plan.request)?;
        Ok(plan.placements)
    }
}
