//! Mutable state of one generation run.
use crate::color::Color;
use crate::placement::region::TextRegion;
use crate::zone::ZoneId;

/// Placement history for a single run: what is occupied, which colors and
/// zones were used, and which zones are still free in the current pass.
#[derive(Clone, Debug, Default)]
pub struct PlacementSession {
    /// Regions of successfully placed phrases, in placement order.
    pub occupied: Vec<TextRegion>,
    /// Every color handed out, rejected attempts included.
    pub used_colors: Vec<Color>,
    /// Zone picked most recently.
    pub last_zone: Option<ZoneId>,
    /// Zones not yet picked in this pass. Refilled once exhausted.
    pub available_zones: Vec<ZoneId>,
}

impl PlacementSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all history; the zone pool is refilled lazily on the next pick.
    pub fn reset(&mut self) {
        self.occupied.clear();
        self.used_colors.clear();
        self.last_zone = None;
        self.available_zones.clear();
    }

    pub fn is_occupied(&self, region: &TextRegion) -> bool {
        self.occupied.iter().any(|o| o.overlaps(region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect};

    #[test]
    fn reset_clears_everything() {
        let mut session = PlacementSession::new();
        session.occupied.push(TextRegion::new(
            Rect::new(Point::ZERO, Point::new(5, 5)),
            Color::WHITE,
        ));
        session.used_colors.push(Color::WHITE);
        session.last_zone = Some(ZoneId(2));
        session.available_zones.push(ZoneId(1));

        session.reset();
        assert!(session.occupied.is_empty());
        assert!(session.used_colors.is_empty());
        assert!(session.last_zone.is_none());
        assert!(session.available_zones.is_empty());
    }

    #[test]
    fn occupancy_checks_every_region() {
        let mut session = PlacementSession::new();
        let region = |x: i32| {
            TextRegion::new(
                Rect::new(Point::new(x, 0), Point::new(x + 10, 10)),
                Color::WHITE,
            )
        };
        session.occupied.push(region(0));
        session.occupied.push(region(100));
        assert!(session.is_occupied(&region(105)));
        assert!(session.is_occupied(&region(10)));
        assert!(!session.is_occupied(&region(50)));
    }
}
