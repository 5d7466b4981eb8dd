//! Zones: rectangular sub-regions of an image that anchor points are drawn from.
//!
//! Zones live in an arena owned by the placement engine and are referred to by
//! their [`ZoneId`] (the index into that arena).
use std::ops::RangeInclusive;

use rand::Rng as RngCore;

use crate::geometry::{Point, Rect};
use crate::sampling::{choose, rand_inclusive};

pub mod grid;

pub use grid::generate_zone_grid;

/// Stable index of a zone inside an engine's zone arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneId(pub usize);

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// Where a zone draws its random points from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneChoices {
    /// A fixed set of coordinate pairs, one of which is picked uniformly.
    Coordinates(Vec<Point>),
    /// Independent inclusive ranges; x and y are drawn separately.
    Ranges {
        x: RangeInclusive<i32>,
        y: RangeInclusive<i32>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub bounds: Rect,
    pub choices: ZoneChoices,
}

impl Zone {
    /// Zone sampling anywhere inside `bounds`, edges included.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            choices: ZoneChoices::Ranges {
                x: bounds.top_left.x..=bounds.bottom_right.x,
                y: bounds.top_left.y..=bounds.bottom_right.y,
            },
        }
    }

    pub fn with_coordinates(bounds: Rect, coordinates: impl IntoIterator<Item = Point>) -> Self {
        Self {
            bounds,
            choices: ZoneChoices::Coordinates(coordinates.into_iter().collect()),
        }
    }

    pub fn with_ranges(bounds: Rect, x: RangeInclusive<i32>, y: RangeInclusive<i32>) -> Self {
        Self {
            bounds,
            choices: ZoneChoices::Ranges { x, y },
        }
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Draw a candidate anchor point. A zone without any coordinate choices
    /// yields its center.
    pub fn random_point(&self, rng: &mut dyn RngCore) -> Point {
        match &self.choices {
            ZoneChoices::Coordinates(points) => {
                choose(points, rng).copied().unwrap_or_else(|| self.center())
            }
            ZoneChoices::Ranges { x, y } => {
                let px = rand_inclusive(rng, i64::from(*x.start())..=i64::from(*x.end()));
                let py = rand_inclusive(rng, i64::from(*y.start())..=i64::from(*y.end()));
                Point::new(px as i32, py as i32)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn bounds() -> Rect {
        Rect::new(Point::new(100, 50), Point::new(200, 150))
    }

    #[test]
    fn default_ranges_follow_bounds() {
        let zone = Zone::new(bounds());
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            assert!(zone.bounds.contains(zone.random_point(&mut rng)));
        }
        assert_eq!(zone.center(), Point::new(150, 100));
    }

    #[test]
    fn coordinate_choices_are_sampled_verbatim() {
        let choices = [Point::new(1, 1), Point::new(120, 60), Point::new(-4, 9)];
        let zone = Zone::with_coordinates(bounds(), choices);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            assert!(choices.contains(&zone.random_point(&mut rng)));
        }
    }

    #[test]
    fn independent_ranges_form_a_cartesian_product() {
        let zone = Zone::with_ranges(bounds(), 10..=11, 20..=21);
        let mut rng = StdRng::seed_from_u64(13);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..400 {
            let p = zone.random_point(&mut rng);
            assert!((10..=11).contains(&p.x) && (20..=21).contains(&p.y));
            seen.insert(p);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn empty_coordinates_fall_back_to_center() {
        let zone = Zone::with_coordinates(bounds(), []);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(zone.random_point(&mut rng), Point::new(150, 100));
    }
}
