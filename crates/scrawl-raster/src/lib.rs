//! scrawl-raster - Ink rasterization for classifier input
//!
//! This crate turns vector ink into the fixed-size single-channel images
//! that the neural classifier consumes:
//!
//! - [`Image`] - a width x height byte canvas with vector conversions
//! - [`render`] - draw a [`TraceGroup`](scrawl_core::TraceGroup) centered
//!   and scaled onto a canvas
//! - [`ImageDistorter`] - randomized affine perturbations for
//!   distortion-averaged evaluation
//! - [`traces_overlap`] - raster-based stroke contact test
//!
//! # Quick Start
//!
//! ```
//! use scrawl_core::{Point, Trace, TraceGroup};
//! use scrawl_raster::{RenderOptions, render};
//!
//! let mut stroke = Trace::new();
//! stroke.push(Point::new(0.0, 0.0));
//! stroke.push(Point::new(10.0, 10.0));
//! let group = TraceGroup::from_traces(vec![stroke]);
//!
//! let image = render(&group, &RenderOptions::default()).unwrap();
//! assert_eq!(image.width(), 64);
//! ```

pub mod distort;
pub mod draw;
mod error;
pub mod image;
pub mod overlap;
pub mod render;

pub use distort::{AffineMap, ImageDistorter, affine_bilinear};
pub use draw::{FOREGROUND, draw_circle, draw_line};
pub use error::{RasterError, RasterResult};
pub use image::Image;
pub use overlap::traces_overlap;
pub use render::{RenderOptions, render};
