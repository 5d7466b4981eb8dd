//! The placement engine: zone arena, run history, and the per-phrase retry loop.
use rand::Rng as RngCore;
use tracing::{debug, info, warn};

use crate::color::Color;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geometry::{ImageSize, Point};
use crate::placement::events::{EventSink, PlacementEvent};
use crate::placement::region::{estimate_text_extent, fit_into_view, text_box, TextRegion};
use crate::placement::selection::{pick_color, pick_zone, NEARBY_DIAGONAL_DIVISOR};
use crate::placement::session::PlacementSession;
use crate::placement::TextPlacement;
use crate::sampling::rand_inclusive;
use crate::zone::{generate_zone_grid, Zone, ZoneId};

/// Places phrases on one image.
///
/// An engine is reusable across runs: [`PlacementEngine::place_all`] resets the
/// history first. It is not meant to be shared between threads; give each
/// concurrent run its own engine and clone the zones and config into it.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    image: ImageSize,
    config: Config,
    zones: Vec<Zone>,
    session: PlacementSession,
}

impl PlacementEngine {
    pub fn new(image: ImageSize, config: Config) -> Result<Self> {
        config.validate()?;
        if image.width == 0 || image.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "image must not be empty, got {image}"
            )));
        }
        Ok(Self {
            image,
            config,
            zones: Vec::new(),
            session: PlacementSession::new(),
        })
    }

    /// Use caller-supplied zones instead of a generated grid.
    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.set_zones(zones);
        self
    }

    pub fn set_zones(&mut self, zones: Vec<Zone>) {
        self.zones = zones;
        self.session.reset();
    }

    pub fn image_size(&self) -> ImageSize {
        self.image
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &PlacementSession {
        &self.session
    }

    pub fn occupied_regions(&self) -> &[TextRegion] {
        &self.session.occupied
    }

    /// Zones of this engine, generating the configured grid on first use.
    pub fn zones(&mut self) -> Result<&[Zone]> {
        self.ensure_zones()?;
        Ok(&self.zones)
    }

    fn ensure_zones(&mut self) -> Result<()> {
        if self.zones.is_empty() {
            self.zones = generate_zone_grid(
                self.image.width,
                self.image.height,
                self.config.horizontal_divisions,
                self.config.vertical_divisions,
            )?;
        }
        Ok(())
    }

    /// Forget the history of the previous run. Zones are kept.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Radius within which placed phrases count as neighbors for color choice.
    pub fn nearby_radius(&self) -> f64 {
        self.image.diagonal() / NEARBY_DIAGONAL_DIVISOR
    }

    pub fn pick_zone(&mut self, rng: &mut dyn RngCore) -> Result<ZoneId> {
        self.ensure_zones()?;
        pick_zone(&self.zones, &mut self.session, rng)
    }

    pub fn pick_color(&mut self, point: Point, rng: &mut dyn RngCore) -> Color {
        let radius = self.nearby_radius();
        pick_color(point, &self.config.colors, radius, &mut self.session, rng)
    }

    /// Place a single phrase on top of whatever this run placed so far.
    pub fn place_text(&mut self, text: &str, rng: &mut dyn RngCore) -> Result<TextPlacement> {
        let index = self.session.occupied.len();
        self.place_text_internal(text, index, rng, &mut ())
    }

    /// Reset the run and place every phrase in order.
    pub fn place_all<S: AsRef<str>>(
        &mut self,
        phrases: &[S],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<TextPlacement>> {
        self.place_all_with_events(phrases, rng, &mut ())
    }

    pub fn place_all_with_events<S: AsRef<str>>(
        &mut self,
        phrases: &[S],
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<TextPlacement>> {
        self.reset();
        self.ensure_zones()?;
        info!(
            "Placing {} phrases on a {} image across {} zones.",
            phrases.len(),
            self.image,
            self.zones.len()
        );
        sink.send(PlacementEvent::RunStarted {
            phrase_count: phrases.len(),
            zone_count: self.zones.len(),
        });

        let mut placements = Vec::with_capacity(phrases.len());
        for (index, phrase) in phrases.iter().enumerate() {
            placements.push(self.place_text_internal(phrase.as_ref(), index, rng, sink)?);
        }

        sink.send(PlacementEvent::RunFinished {
            placed: placements.len(),
        });
        Ok(placements)
    }

    fn place_text_internal(
        &mut self,
        text: &str,
        phrase_index: usize,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<TextPlacement> {
        self.ensure_zones()?;
        let min_size = i64::from(self.config.pointsizes.min());
        let padding = rand_inclusive(rng, min_size..=min_size * 3) as i32;
        let max_attempts = self.config.retry.max_attempts();
        let radius = self.nearby_radius();

        let mut attempt = 0usize;
        loop {
            if max_attempts.is_some_and(|max| attempt >= max) {
                warn!("Gave up placing '{}' after {} attempts.", text, attempt);
                return Err(Error::PlacementExhausted {
                    phrase: text.to_owned(),
                    attempts: attempt,
                });
            }
            attempt += 1;

            let zone_id = pick_zone(&self.zones, &mut self.session, rng)?;
            sink.send(PlacementEvent::ZonePicked {
                phrase_index,
                zone: zone_id,
            });
            let point = self.zones[zone_id.0].random_point(rng);
            let pointsize = self.config.pointsizes.sample(rng);
            let color = pick_color(point, &self.config.colors, radius, &mut self.session, rng);

            let extent = estimate_text_extent(text, pointsize);
            let bounds = text_box(point, extent);
            let shift = fit_into_view(&bounds, self.image.width, self.image.height, padding);
            let region = TextRegion::new(bounds.translated(shift), color);

            if self.session.is_occupied(&region) {
                sink.send(PlacementEvent::AttemptRejected {
                    phrase_index,
                    attempt,
                    region,
                });
                continue;
            }

            self.session.occupied.push(region);
            let anchor = point + shift;
            let placement = TextPlacement {
                text: text.to_owned(),
                color,
                pointsize,
                anchor,
                offset: anchor - self.image.center(),
                region,
                zone: zone_id,
                attempts: attempt,
            };
            debug!(
                "Placed '{}' in {} at {} ({}pt, {}) after {} attempts.",
                text,
                zone_id,
                placement.offset_geometry(),
                pointsize,
                color,
                attempt
            );
            sink.send(PlacementEvent::TextPlaced {
                phrase_index,
                placement: placement.clone(),
            });
            return Ok(placement);
        }
    }
}
