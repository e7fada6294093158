//! Drawing primitives
//!
//! Integer Bresenham lines (8-connected, all octants), thick lines and
//! filled circles, used to print ink strokes onto an [`Image`].

use crate::image::Image;

/// Foreground pixel value for drawn ink.
pub const FOREGROUND: u8 = 255;

/// The 8-connected pixel chain between two points, endpoints included.
///
/// Uses integer Bresenham stepping along the major axis; no
/// floating-point arithmetic.
pub fn line_points(x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<(i32, i32)> {
    // Degenerate case: single point
    if x1 == x2 && y1 == y2 {
        return vec![(x1, y1)];
    }

    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x2 > x1 { 1i32 } else { -1 };
    let sy = if y2 > y1 { 1i32 } else { -1 };

    let count = dx.max(dy) + 1;
    let mut points = Vec::with_capacity(count as usize);

    let mut x = x1;
    let mut y = y1;

    if dx >= dy {
        // Step along x (more horizontal)
        let mut err = dx / 2;
        for _ in 0..count {
            points.push((x, y));
            err -= dy;
            if err < 0 {
                y += sy;
                err += dx;
            }
            x += sx;
        }
    } else {
        // Step along y (more vertical)
        let mut err = dy / 2;
        for _ in 0..count {
            points.push((x, y));
            err -= dx;
            if err < 0 {
                x += sx;
                err += dy;
            }
            y += sy;
        }
    }

    points
}

/// Draw a straight line of the given thickness.
///
/// Thickness 1 plots the Bresenham chain; larger thicknesses stamp a
/// filled disc of radius `thickness / 2` at every chain pixel.
pub fn draw_line(image: &mut Image, x1: i32, y1: i32, x2: i32, y2: i32, thickness: u32) {
    let points = line_points(x1, y1, x2, y2);
    if thickness <= 1 {
        for (x, y) in points {
            image.set_pixel(x, y, FOREGROUND);
        }
    } else {
        let radius = (thickness / 2) as i32;
        for (x, y) in points {
            stamp_disc(image, x, y, radius);
        }
    }
}

/// Draw a filled circle.
pub fn draw_circle(image: &mut Image, cx: i32, cy: i32, radius: i32) {
    stamp_disc(image, cx, cy, radius.max(0));
}

fn stamp_disc(image: &mut Image, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                image.set_pixel(cx + dx, cy + dy, FOREGROUND);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_points_degenerate() {
        assert_eq!(line_points(3, 4, 3, 4), vec![(3, 4)]);
    }

    #[test]
    fn test_line_points_horizontal() {
        let points = line_points(0, 2, 4, 2);
        assert_eq!(points.len(), 5);
        assert_eq!(points.first(), Some(&(0, 2)));
        assert_eq!(points.last(), Some(&(4, 2)));
        assert!(points.iter().all(|&(_, y)| y == 2));
    }

    #[test]
    fn test_line_points_steep_and_reversed() {
        let down = line_points(1, 0, 1, 5);
        assert_eq!(down.len(), 6);
        let up = line_points(1, 5, 1, 0);
        assert_eq!(up.len(), 6);

        let diagonal = line_points(0, 0, 3, 3);
        assert_eq!(diagonal, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_draw_line_sets_endpoints() {
        let mut image = Image::new(8, 8).unwrap();
        draw_line(&mut image, 1, 1, 6, 4, 1);
        assert_eq!(image.get_pixel(1, 1), Some(FOREGROUND));
        assert_eq!(image.get_pixel(6, 4), Some(FOREGROUND));
    }

    #[test]
    fn test_thick_line_is_wider() {
        let mut thin = Image::new(10, 10).unwrap();
        draw_line(&mut thin, 0, 5, 9, 5, 1);
        let mut thick = Image::new(10, 10).unwrap();
        draw_line(&mut thick, 0, 5, 9, 5, 3);

        let count = |image: &Image| image.data().iter().filter(|&&p| p != 0).count();
        assert!(count(&thick) > count(&thin));
    }

    #[test]
    fn test_draw_circle() {
        let mut image = Image::new(9, 9).unwrap();
        draw_circle(&mut image, 4, 4, 2);
        assert_eq!(image.get_pixel(4, 4), Some(FOREGROUND));
        assert_eq!(image.get_pixel(6, 4), Some(FOREGROUND));
        assert_eq!(image.get_pixel(7, 4), Some(0));
        // Clipped circles never write outside the canvas.
        draw_circle(&mut image, 0, 0, 3);
    }
}
