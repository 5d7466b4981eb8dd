//! Zone and color selection for a placement run.
//!
//! - [pick_zone]: spreads consecutive phrases apart by drawing the next zone
//!   with probability proportional to its distance from the previous one.
//! - [pick_color]: avoids repeating colors already used by nearby phrases.
//!
//! Both record their choice in the [PlacementSession] they are given.
use rand::Rng as RngCore;
use tracing::warn;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{distance, Point};
use crate::placement::session::PlacementSession;
use crate::sampling::{choose, weighted_index};
use crate::zone::{Zone, ZoneId};

/// Placed phrases within `diagonal / NEARBY_DIAGONAL_DIVISOR` of a candidate
/// point count as its neighbors for color selection.
pub const NEARBY_DIAGONAL_DIVISOR: f64 = 2.5;

fn zone_center(zones: &[Zone], id: ZoneId) -> Result<Point> {
    zones
        .get(id.0)
        .map(Zone::center)
        .ok_or_else(|| Error::Other(format!("{id} is not part of the zone set")))
}

/// Pick the next zone and mark it as used.
///
/// The first pick of a run is uniform over the pool. Later picks exclude the
/// previous zone and weight every other pooled zone by the rounded-up distance
/// between the zone centers. The previous zone is only repeated when it is the
/// sole zone left to choose from.
pub fn pick_zone(
    zones: &[Zone],
    session: &mut PlacementSession,
    rng: &mut dyn RngCore,
) -> Result<ZoneId> {
    if zones.is_empty() {
        return Err(Error::MissingZones);
    }
    if session.available_zones.is_empty() {
        session.available_zones = (0..zones.len()).map(ZoneId).collect();
    }

    let chosen = match session.last_zone {
        None => choose(&session.available_zones, rng).copied(),
        Some(last) => {
            let last_center = zone_center(zones, last)?;
            let candidates: Vec<ZoneId> = session
                .available_zones
                .iter()
                .copied()
                .filter(|id| *id != last)
                .collect();
            let weights = candidates
                .iter()
                .map(|id| Ok(distance(last_center, zone_center(zones, *id)?).ceil() as u64))
                .collect::<Result<Vec<u64>>>()?;

            match weighted_index(&weights, rng) {
                Some(i) => Some(candidates[i]),
                None if !candidates.is_empty() => {
                    warn!(
                        "All {} candidate zones share the center of {}; picking uniformly.",
                        candidates.len(),
                        last
                    );
                    choose(&candidates, rng).copied()
                }
                None => choose(&session.available_zones, rng).copied(),
            }
        }
    };

    let chosen = chosen.ok_or(Error::MissingZones)?;
    session.available_zones.retain(|id| *id != chosen);
    session.last_zone = Some(chosen);
    Ok(chosen)
}

/// Pick a fill color for a phrase anchored at `point` and record it as used.
///
/// Colors of placed phrases within `radius` of `point` are unavailable. Once
/// at least as many colors have been handed out as the palette holds, only
/// colors that are both used and nearby are excluded. If nothing is left the
/// whole palette is available again.
pub fn pick_color(
    point: Point,
    palette: &[Color],
    radius: f64,
    session: &mut PlacementSession,
    rng: &mut dyn RngCore,
) -> Color {
    let nearby: Vec<Color> = session
        .occupied
        .iter()
        .filter(|region| distance(point, region.center()) <= radius)
        .map(|region| region.color)
        .collect();

    let unavailable: Vec<Color> = if session.used_colors.len() >= palette.len() {
        nearby
            .into_iter()
            .filter(|c| session.used_colors.contains(c))
            .collect()
    } else {
        nearby
    };

    let available: Vec<Color> = palette
        .iter()
        .copied()
        .filter(|c| !unavailable.contains(c))
        .collect();
    let pool = if available.is_empty() {
        palette
    } else {
        available.as_slice()
    };

    let color = choose(pool, rng).copied().unwrap_or_default();
    session.used_colors.push(color);
    color
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::Rect;
    use crate::placement::region::TextRegion;
    use crate::sampling::tests::FixedRng;
    use crate::zone::generate_zone_grid;

    fn row_of_zones(n: i32) -> Vec<Zone> {
        (0..n)
            .map(|i| {
                Zone::new(Rect::new(
                    Point::new(i * 100, 0),
                    Point::new(i * 100 + 100, 100),
                ))
            })
            .collect()
    }

    #[test]
    fn first_pick_drains_the_pool() {
        let zones = row_of_zones(3);
        let mut session = PlacementSession::new();
        let id = pick_zone(&zones, &mut session, &mut FixedRng { value: 0 }).unwrap();
        assert_eq!(id, ZoneId(0));
        assert_eq!(session.last_zone, Some(ZoneId(0)));
        assert_eq!(session.available_zones, vec![ZoneId(1), ZoneId(2)]);
    }

    #[test]
    fn later_picks_are_weighted_by_distance() {
        let zones = row_of_zones(3);
        let mut session = PlacementSession::new();
        session.last_zone = Some(ZoneId(0));
        session.available_zones = vec![ZoneId(1), ZoneId(2)];
        // Weights are [100, 200]; rolls below a third of the total land on zone 1.
        let mut s1 = session.clone();
        assert_eq!(
            pick_zone(&zones, &mut s1, &mut FixedRng { value: 0x5000_0000 }).unwrap(),
            ZoneId(1)
        );
        assert_eq!(
            pick_zone(&zones, &mut session, &mut FixedRng { value: 0x6000_0000 }).unwrap(),
            ZoneId(2)
        );
    }

    #[test]
    fn never_repeats_previous_zone_with_alternatives() {
        let zones = generate_zone_grid(900, 600, 3, 3).unwrap();
        let mut session = PlacementSession::new();
        let mut rng = StdRng::seed_from_u64(77);
        let mut previous = pick_zone(&zones, &mut session, &mut rng).unwrap();
        for _ in 0..200 {
            let next = pick_zone(&zones, &mut session, &mut rng).unwrap();
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn pool_refills_after_every_zone_was_used() {
        let zones = row_of_zones(4);
        let mut session = PlacementSession::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut first_pass: Vec<ZoneId> = (0..4)
            .map(|_| pick_zone(&zones, &mut session, &mut rng).unwrap())
            .collect();
        first_pass.sort();
        assert_eq!(first_pass, (0..4).map(ZoneId).collect::<Vec<_>>());
        assert!(session.available_zones.is_empty());

        pick_zone(&zones, &mut session, &mut rng).unwrap();
        assert_eq!(session.available_zones.len(), 3);
    }

    #[test]
    fn single_zone_is_reused() {
        let zones = row_of_zones(1);
        let mut session = PlacementSession::new();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..5 {
            assert_eq!(pick_zone(&zones, &mut session, &mut rng).unwrap(), ZoneId(0));
        }
    }

    #[test]
    fn coincident_zone_centers_fall_back_to_uniform() {
        let bounds = Rect::new(Point::ZERO, Point::new(10, 10));
        let zones = vec![Zone::new(bounds), Zone::new(bounds), Zone::new(bounds)];
        let mut session = PlacementSession::new();
        session.last_zone = Some(ZoneId(0));
        session.available_zones = vec![ZoneId(0), ZoneId(2)];
        let id = pick_zone(&zones, &mut session, &mut FixedRng { value: 0 }).unwrap();
        assert_eq!(id, ZoneId(2));
    }

    #[test]
    fn empty_zone_set_is_an_error() {
        let mut session = PlacementSession::new();
        assert!(matches!(
            pick_zone(&[], &mut session, &mut FixedRng { value: 0 }),
            Err(Error::MissingZones)
        ));
    }

    fn occupied_at(session: &mut PlacementSession, center: Point, color: Color) {
        session.occupied.push(TextRegion::new(
            Rect::around(center, glam::IVec2::new(5, 5)),
            color,
        ));
    }

    #[test]
    fn nearby_colors_are_avoided() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        let palette = [red, blue];
        let mut session = PlacementSession::new();
        occupied_at(&mut session, Point::new(50, 50), red);
        session.used_colors.push(red);

        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20 {
            let mut s = session.clone();
            assert_eq!(
                pick_color(Point::new(60, 60), &palette, 100.0, &mut s, &mut rng),
                blue
            );
        }
    }

    #[test]
    fn distant_colors_may_repeat() {
        let red = Color::rgb(255, 0, 0);
        let mut session = PlacementSession::new();
        occupied_at(&mut session, Point::new(500, 500), red);
        session.used_colors.push(red);
        // Single-color palette and nothing nearby.
        let color = pick_color(
            Point::new(0, 0),
            &[red],
            100.0,
            &mut session,
            &mut FixedRng { value: 0 },
        );
        assert_eq!(color, red);
        assert_eq!(session.used_colors, vec![red, red]);
    }

    #[test]
    fn crowded_two_color_palette_allows_repeats() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        let palette = [red, blue];
        let mut session = PlacementSession::new();
        let mut rng = StdRng::seed_from_u64(21);

        let mut picked = Vec::new();
        for i in 0..5 {
            let point = Point::new(10 + i * 12, 10);
            let color = pick_color(point, &palette, 1_000.0, &mut session, &mut rng);
            assert!(palette.contains(&color));
            occupied_at(&mut session, point, color);
            picked.push(color);
        }
        assert_ne!(picked[0], picked[1]);
        assert_eq!(session.used_colors, picked);
    }

    #[test]
    fn fully_blocked_palette_reopens() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        let palette = [red, blue];
        let mut session = PlacementSession::new();
        occupied_at(&mut session, Point::new(10, 10), red);
        occupied_at(&mut session, Point::new(30, 10), blue);
        session.used_colors = vec![red, blue];

        let mut seen = std::collections::HashSet::new();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            let mut s = session.clone();
            seen.insert(pick_color(Point::new(20, 10), &palette, 1_000.0, &mut s, &mut rng));
        }
        assert_eq!(seen.len(), 2);
    }
}
