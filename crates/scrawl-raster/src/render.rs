//! TraceGroup rasterization
//!
//! Prints vector ink onto a fixed-size canvas for classifier input. The
//! group is normalized before drawing: its longer dimension fills a
//! fixed fraction of the canvas and its centroid lands on the canvas
//! center, so classification is position- and scale-invariant. Ink
//! coordinates grow upward, so the finished canvas is flipped
//! vertically into image orientation.

use scrawl_core::{Point, TraceGroup};

use crate::draw::{draw_circle, draw_line};
use crate::error::{RasterError, RasterResult};
use crate::image::Image;

/// Fraction of the canvas that the ink's longer dimension occupies.
pub const DEFAULT_FILL_FRACTION: f64 = 0.6;

/// Canvas configuration for [`render`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Stroke thickness in pixels
    pub thickness: u32,
    /// Fraction of the canvas the ink's longer dimension fills
    pub fill_fraction: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            thickness: 1,
            fill_fraction: DEFAULT_FILL_FRACTION,
        }
    }
}

impl RenderOptions {
    /// Options for a square canvas of the given side length.
    pub fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
            ..Default::default()
        }
    }
}

/// Render a trace group onto a canvas.
///
/// The group is copied, translated so its lower-left corner sits at the
/// origin, uniformly scaled so its longer dimension spans
/// `fill_fraction` of the canvas, and recentered by its centroid. Each
/// stroke is drawn as connected line segments; strokes with fewer than
/// two points are drawn as filled circles of the stroke thickness.
///
/// # Errors
///
/// Returns [`RasterError::EmptyInk`] for a group without points and
/// [`RasterError::InvalidDimensions`] for a zero-sized canvas.
pub fn render(group: &TraceGroup, options: &RenderOptions) -> RasterResult<Image> {
    let mut ink = group.clone();
    let bounds = ink.bounding_box().ok_or(RasterError::EmptyInk)?;

    ink.translate(Point::new(-bounds.min_x, -bounds.min_y));

    let longest = bounds.width().max(bounds.height());
    if longest > 0.0 {
        ink.scale(Point::new(
            options.fill_fraction * options.width as f64 / longest,
            options.fill_fraction * options.height as f64 / longest,
        ));
    }

    // Non-empty after the checks above, so the centroid exists.
    if let Some(centroid) = ink.centroid() {
        ink.translate(Point::new(
            options.width as f64 / 2.0 - centroid.x,
            options.height as f64 / 2.0 - centroid.y,
        ));
    }

    let mut image = Image::new(options.width, options.height)?;
    for trace in &ink {
        let points = trace.points();
        if points.len() < 2 {
            if let Some(point) = points.first() {
                draw_circle(
                    &mut image,
                    point.x as i32,
                    point.y as i32,
                    options.thickness as i32,
                );
            }
            continue;
        }
        for segment in points.windows(2) {
            draw_line(
                &mut image,
                segment[0].x as i32,
                segment[0].y as i32,
                segment[1].x as i32,
                segment[1].y as i32,
                options.thickness,
            );
        }
    }

    Ok(image.flip_vertical())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrawl_core::Trace;

    fn group(points: &[&[(f64, f64)]]) -> TraceGroup {
        points
            .iter()
            .map(|trace| {
                trace
                    .iter()
                    .map(|&(x, y)| Point::new(x, y))
                    .collect::<Trace>()
            })
            .collect()
    }

    #[test]
    fn test_render_empty_group() {
        assert!(matches!(
            render(&TraceGroup::new(), &RenderOptions::default()),
            Err(RasterError::EmptyInk)
        ));
    }

    #[test]
    fn test_render_line_has_ink() {
        let image = render(
            &group(&[&[(0.0, 0.0), (10.0, 10.0)]]),
            &RenderOptions::square(32),
        )
        .unwrap();
        assert!(image.data().iter().any(|&p| p != 0));
    }

    #[test]
    fn test_render_is_centered() {
        // A vertical bar far from the origin still lands around the
        // canvas center.
        let image = render(
            &group(&[&[(1000.0, 1000.0), (1000.0, 1010.0)]]),
            &RenderOptions::square(64),
        )
        .unwrap();

        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut count = 0.0;
        for y in 0..64 {
            for x in 0..64 {
                if image.get_pixel(x, y) != Some(0) {
                    sum_x += x as f64;
                    sum_y += y as f64;
                    count += 1.0;
                }
            }
        }
        assert!(count > 0.0);
        assert!((sum_x / count - 32.0).abs() < 3.0);
        assert!((sum_y / count - 32.0).abs() < 3.0);
    }

    #[test]
    fn test_render_dot_as_circle() {
        let image = render(&group(&[&[(5.0, 5.0)]]), &RenderOptions::square(16)).unwrap();
        // The dot's disc occupies more than one pixel.
        assert!(image.data().iter().filter(|&&p| p != 0).count() > 1);
    }

    #[test]
    fn test_render_flips_vertically() {
        // Ink along the bottom edge (low y) must end up at the bottom of
        // the image (high row index).
        let tall = group(&[&[(0.0, 0.0), (0.0, 100.0)], &[(0.0, 0.0), (4.0, 0.0)]]);
        let image = render(&tall, &RenderOptions::square(32)).unwrap();

        let top_half: usize = (0..16)
            .map(|y| (0..32).filter(|&x| image.get_pixel(x, y) != Some(0)).count())
            .sum();
        let bottom_half: usize = (16..32)
            .map(|y| (0..32).filter(|&x| image.get_pixel(x, y) != Some(0)).count())
            .sum();
        // The horizontal foot of the shape adds ink to the bottom half.
        assert!(bottom_half > top_half);
    }
}
