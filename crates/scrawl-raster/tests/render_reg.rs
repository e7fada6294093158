//! Rasterization regression test
//!
//! Renders ink onto canvases and checks the vector round-trip bounds
//! and the distortion-averaging preconditions.

use scrawl_core::{Point, Trace, TraceGroup};
use scrawl_raster::{Image, ImageDistorter, RenderOptions, render};
use scrawl_test::RegParams;

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
fn render_reg() {
    let mut rp = RegParams::new("render");

    // --- Test 1: render -> to_vector stays in [-1, 1] ---
    let ink = group(&[
        &[(0.0, 0.0), (20.0, 0.0), (20.0, 20.0)],
        &[(5.0, 5.0), (15.0, 15.0)],
    ]);
    let image = render(&ink, &RenderOptions::square(64)).unwrap();
    let vector = image.to_vector(-1.0, 1.0);
    rp.compare_values(64.0 * 64.0, vector.len() as f64, 0.0);
    rp.compare_bool(
        vector.iter().all(|&v| (-1.0..=1.0).contains(&v)),
        "vector within [-1, 1]",
    );
    rp.compare_bool(vector.iter().any(|&v| v > 0.0), "some ink rendered");

    // --- Test 2: vector round-trips through from_vector ---
    let restored = Image::from_vector(64, 64, &vector, -1.0, 1.0).unwrap();
    rp.compare_bool(restored == image, "round trip exact");

    // --- Test 3: determinism ---
    let again = render(&ink, &RenderOptions::square(64)).unwrap();
    rp.compare_bool(again == image, "render deterministic");

    // --- Test 4: empty ink is a synchronous error ---
    rp.compare_bool(
        render(&TraceGroup::new(), &RenderOptions::default()).is_err(),
        "empty group rejected",
    );

    // --- Test 5: dot renders as a disc ---
    let dot = render(&group(&[&[(3.0, 3.0)]]), &RenderOptions::square(16)).unwrap();
    let ink_pixels = dot.data().iter().filter(|&&p| p != 0).count();
    rp.compare_bool(ink_pixels > 1, "dot covers more than one pixel");

    // --- Test 6: distorted copies share dimensions and stay in range ---
    let mut distorter = ImageDistorter::with_seed(11);
    for _ in 0..4 {
        let distorted = distorter.distort(&image).unwrap();
        rp.compare_values(64.0, distorted.width() as f64, 0.0);
        rp.compare_values(64.0, distorted.height() as f64, 0.0);
        let values = distorted.to_vector(-1.0, 1.0);
        rp.compare_bool(
            values.iter().all(|&v| (-1.0..=1.0).contains(&v)),
            "distorted vector within [-1, 1]",
        );
    }

    assert!(rp.cleanup());
}
