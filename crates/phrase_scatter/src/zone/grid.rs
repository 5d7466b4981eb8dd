//! Zone grid generation.
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::zone::Zone;

/// Split a `width` x `height` image into `horizontal` x `vertical` zones.
///
/// Cells are `ceil(width / horizontal)` by `ceil(height / vertical)` pixels, so
/// the last column and row may reach past the image edge. Zones are emitted
/// column by column.
pub fn generate_zone_grid(
    width: u32,
    height: u32,
    horizontal: u32,
    vertical: u32,
) -> Result<Vec<Zone>> {
    if horizontal == 0 || vertical == 0 {
        return Err(Error::InvalidConfig("zone divisions must be > 0".into()));
    }
    let x_len = width.div_ceil(horizontal) as i32;
    let y_len = height.div_ceil(vertical) as i32;

    let mut zones = Vec::with_capacity((horizontal * vertical) as usize);
    for x in 0..horizontal as i32 {
        for y in 0..vertical as i32 {
            let top_left = Point::new(x * x_len, y * y_len);
            let bottom_right = Point::new((x + 1) * x_len, (y + 1) * y_len);
            zones.push(Zone::new(Rect::new(top_left, bottom_right)));
        }
    }
    debug!(
        "Generated {} zones of {}x{} px for a {}x{} image.",
        zones.len(),
        x_len,
        y_len,
        width,
        height
    );
    Ok(zones)
}
