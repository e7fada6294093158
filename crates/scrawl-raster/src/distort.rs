//! Randomized affine image distortion
//!
//! Re-evaluating a classifier on several slightly perturbed copies of
//! the same raster and averaging the outputs smooths out sensitivity to
//! exact pen placement. Each [`ImageDistorter::distort`] call picks one
//! perturbation kind uniformly at random - rotation, scaling, shearing
//! or translation - draws its parameter from a fixed range, and applies
//! it with bilinear interpolation.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::error::{RasterError, RasterResult};
use crate::image::Image;

/// Maximum rotation magnitude in radians (15 degrees).
pub const MAX_ROTATION: f64 = std::f64::consts::PI / 12.0;

/// Maximum deviation of the scale factor from 1.
pub const MAX_SCALE_DELTA: f64 = 0.15;

/// Maximum shear factor magnitude.
pub const MAX_SHEAR: f64 = 0.15;

/// Maximum translation magnitude in pixels.
pub const MAX_TRANSLATION: f64 = 5.0;

/// 2D affine transformation with coefficients `[a, b, tx, c, d, ty]`:
///
/// ```text
/// x' = a*x + b*y + tx
/// y' = c*x + d*y + ty
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMap {
    coeffs: [f64; 6],
}

impl Default for AffineMap {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMap {
    /// The identity transformation.
    pub fn identity() -> Self {
        Self {
            coeffs: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        }
    }

    /// Create from raw coefficients.
    pub fn from_coeffs(coeffs: [f64; 6]) -> Self {
        Self { coeffs }
    }

    /// The raw coefficients.
    pub fn coeffs(&self) -> &[f64; 6] {
        &self.coeffs
    }

    /// A translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            coeffs: [1.0, 0.0, tx, 0.0, 1.0, ty],
        }
    }

    /// A scaling about the origin.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            coeffs: [sx, 0.0, 0.0, 0.0, sy, 0.0],
        }
    }

    /// A shear about the origin.
    pub fn shearing(shx: f64, shy: f64) -> Self {
        Self {
            coeffs: [1.0, shx, 0.0, shy, 1.0, 0.0],
        }
    }

    /// A counter-clockwise rotation about the origin.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            coeffs: [cos, -sin, 0.0, sin, cos, 0.0],
        }
    }

    /// A counter-clockwise rotation about an arbitrary center.
    pub fn rotation_about(radians: f64, cx: f64, cy: f64) -> Self {
        AffineMap::translation(-cx, -cy)
            .then(&AffineMap::rotation(radians))
            .then(&AffineMap::translation(cx, cy))
    }

    /// The composition applying `self` first, then `after`.
    pub fn then(&self, after: &AffineMap) -> AffineMap {
        let [a1, b1, tx1, c1, d1, ty1] = self.coeffs;
        let [a2, b2, tx2, c2, d2, ty2] = after.coeffs;
        AffineMap {
            coeffs: [
                a2 * a1 + b2 * c1,
                a2 * b1 + b2 * d1,
                a2 * tx1 + b2 * ty1 + tx2,
                c2 * a1 + d2 * c1,
                c2 * b1 + d2 * d1,
                c2 * tx1 + d2 * ty1 + ty2,
            ],
        }
    }

    /// Apply the transformation to a point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, tx, c, d, ty] = self.coeffs;
        (a * x + b * y + tx, c * x + d * y + ty)
    }

    /// The inverse transformation.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::SingularTransform`] for a non-invertible
    /// map.
    pub fn invert(&self) -> RasterResult<AffineMap> {
        let [a, b, tx, c, d, ty] = self.coeffs;
        let det = a * d - b * c;
        if det.abs() < 1e-12 {
            return Err(RasterError::SingularTransform);
        }
        Ok(AffineMap {
            coeffs: [
                d / det,
                -b / det,
                (b * ty - d * tx) / det,
                -c / det,
                a / det,
                (c * tx - a * ty) / det,
            ],
        })
    }
}

/// Apply an affine transformation with bilinear interpolation.
///
/// Destination pixels are mapped back through the inverse transform and
/// sampled from the source; samples outside the source read as
/// background.
///
/// # Errors
///
/// Returns [`RasterError::SingularTransform`] if `map` cannot be
/// inverted.
pub fn affine_bilinear(image: &Image, map: &AffineMap) -> RasterResult<Image> {
    let inverse = map.invert()?;

    let mut output = Image::new(image.width(), image.height())?;
    for y in 0..image.height() as i32 {
        for x in 0..image.width() as i32 {
            let (sx, sy) = inverse.apply(x as f64, y as f64);
            let value = sample_bilinear(image, sx, sy);
            output.set_pixel(x, y, value);
        }
    }
    Ok(output)
}

fn sample_bilinear(image: &Image, x: f64, y: f64) -> u8 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let x0 = x0 as i32;
    let y0 = y0 as i32;

    let p = |dx: i32, dy: i32| image.get_pixel(x0 + dx, y0 + dy).unwrap_or(0) as f64;

    let value = p(0, 0) * (1.0 - fx) * (1.0 - fy)
        + p(1, 0) * fx * (1.0 - fy)
        + p(0, 1) * (1.0 - fx) * fy
        + p(1, 1) * fx * fy;
    value.round().clamp(0.0, 255.0) as u8
}

/// Applies one randomized affine perturbation per call.
#[derive(Debug)]
pub struct ImageDistorter {
    rng: StdRng,
}

impl ImageDistorter {
    /// A distorter seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: rand::make_rng::<StdRng>(),
        }
    }

    /// A deterministically seeded distorter, for reproducible tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produce a distorted copy of the image.
    ///
    /// One of four perturbations is chosen uniformly: rotation in
    /// [-15deg, 15deg) about the image center, uniform scaling in
    /// [0.85, 1.15) about the origin, shearing in [-0.15, 0.15) on both
    /// axes, or translation in [-5, 5) pixels.
    pub fn distort(&mut self, image: &Image) -> RasterResult<Image> {
        let map = match self.rng.random_range(0u32..4) {
            0 => {
                let angle = self.rng.random_range(-MAX_ROTATION..MAX_ROTATION);
                AffineMap::rotation_about(
                    angle,
                    image.width() as f64 / 2.0,
                    image.height() as f64 / 2.0,
                )
            }
            1 => {
                let factor = 1.0 + self.rng.random_range(-MAX_SCALE_DELTA..MAX_SCALE_DELTA);
                AffineMap::scaling(factor, factor)
            }
            2 => {
                let shear = self.rng.random_range(-MAX_SHEAR..MAX_SHEAR);
                AffineMap::shearing(shear, shear)
            }
            _ => {
                let tx = self.rng.random_range(-MAX_TRANSLATION..MAX_TRANSLATION);
                let ty = self.rng.random_range(-MAX_TRANSLATION..MAX_TRANSLATION);
                AffineMap::translation(tx, ty)
            }
        };

        affine_bilinear(image, &map)
    }
}

impl Default for ImageDistorter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> Image {
        let mut image = Image::new(16, 16).unwrap();
        for i in 4..12 {
            image.set_pixel(i, 8, 255);
            image.set_pixel(8, i, 255);
        }
        image
    }

    #[test]
    fn test_identity_round_trip() {
        let image = test_image();
        let same = affine_bilinear(&image, &AffineMap::identity()).unwrap();
        assert_eq!(same, image);
    }

    #[test]
    fn test_translation_moves_ink() {
        let image = test_image();
        let moved = affine_bilinear(&image, &AffineMap::translation(3.0, 0.0)).unwrap();
        assert_eq!(moved.get_pixel(11, 8), Some(255));
        assert_eq!(moved.get_pixel(4, 8), Some(0));
    }

    #[test]
    fn test_invert_composition() {
        let map = AffineMap::rotation_about(0.3, 8.0, 8.0).then(&AffineMap::translation(1.5, -2.0));
        let round_trip = map.then(&map.invert().unwrap());
        for (a, b) in round_trip
            .coeffs()
            .iter()
            .zip(AffineMap::identity().coeffs())
        {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_singular_map() {
        let collapse = AffineMap::scaling(0.0, 1.0);
        assert!(matches!(
            collapse.invert(),
            Err(RasterError::SingularTransform)
        ));
    }

    #[test]
    fn test_distort_preserves_dimensions() {
        let image = test_image();
        let mut distorter = ImageDistorter::with_seed(7);
        for _ in 0..8 {
            let distorted = distorter.distort(&image).unwrap();
            assert_eq!(distorted.width(), image.width());
            assert_eq!(distorted.height(), image.height());
        }
    }

    #[test]
    fn test_distort_is_seed_deterministic() {
        let image = test_image();
        let mut a = ImageDistorter::with_seed(42);
        let mut b = ImageDistorter::with_seed(42);
        for _ in 0..4 {
            assert_eq!(a.distort(&image).unwrap(), b.distort(&image).unwrap());
        }
    }
}
