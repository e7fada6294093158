//! Raster-based stroke contact test
//!
//! Two strokes "overlap" when their drawn pixels touch: each stroke is
//! printed onto its own canvas in a shared coordinate frame, and the
//! test reports whether any foreground pixel of one lies within the
//! 8-neighbourhood of a foreground pixel of the other. Crossing,
//! touching and near-touching strokes all count; strokes separated by
//! more than a pixel in the shared frame do not.

use scrawl_core::{Point, Trace};

use crate::draw::{FOREGROUND, draw_circle, draw_line};
use crate::error::{RasterError, RasterResult};
use crate::image::Image;

/// Radius in ink units used when printing a dot for contact testing.
pub const CONTACT_RADIUS: i32 = 10;

/// Whether two strokes touch when rasterized into a shared frame.
///
/// # Errors
///
/// Returns [`RasterError::EmptyInk`] if either trace has no points.
pub fn traces_overlap(a: &Trace, b: &Trace) -> RasterResult<bool> {
    if a.is_empty() || b.is_empty() {
        return Err(RasterError::EmptyInk);
    }

    // Shared frame: both strokes translated so the joint bounding box
    // starts at the origin.
    let mut combined = scrawl_core::TraceGroup::new();
    combined.push(a.clone());
    combined.push(b.clone());
    let bounds = combined.bounding_box().ok_or(RasterError::EmptyInk)?;

    let width = (bounds.width().ceil() as u32 + 1).max(1);
    let height = (bounds.height().ceil() as u32 + 1).max(1);
    let origin = Point::new(-bounds.min_x, -bounds.min_y);

    let image_a = print_for_contact(a, origin, width, height)?;
    let image_b = print_for_contact(b, origin, width, height)?;

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            if image_a.get_pixel(x, y) != Some(FOREGROUND) {
                continue;
            }
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if image_b.get_pixel(x + dx, y + dy) == Some(FOREGROUND) {
                        return Ok(true);
                    }
                }
            }
        }
    }

    Ok(false)
}

fn print_for_contact(
    trace: &Trace,
    origin: Point,
    width: u32,
    height: u32,
) -> RasterResult<Image> {
    let mut shifted = trace.clone();
    shifted.translate(origin);

    let mut image = Image::new(width, height)?;
    let points = shifted.points();
    if points.len() == 1 {
        draw_circle(
            &mut image,
            points[0].x as i32,
            points[0].y as i32,
            CONTACT_RADIUS,
        );
    } else {
        for segment in points.windows(2) {
            draw_line(
                &mut image,
                segment[0].x as i32,
                segment[0].y as i32,
                segment[1].x as i32,
                segment[1].y as i32,
                1,
            );
        }
    }
    Ok(image)
}
