//! Trace geometry regression test
//!
//! Exercises the on-demand derived attributes of traces and trace
//! groups: corners, widths, centroids, centers of mass, closest points.

use scrawl_core::{Point, Trace, TraceGroup};
use scrawl_test::RegParams;

fn line(points: &[(f64, f64)]) -> Trace {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

#[test]
fn trace_reg() {
    let mut rp = RegParams::new("trace");

    // --- Test 1: Trace creation and access ---
    let trace = line(&[(10.0, 20.0), (30.0, 40.0), (50.0, 60.0)]);
    rp.compare_values(3.0, trace.len() as f64, 0.0);
    let p = trace.get(0).unwrap();
    rp.compare_values(10.0, p.x, 0.0);
    rp.compare_values(20.0, p.y, 0.0);

    // --- Test 2: Bounding box ---
    let trace = line(&[(10.0, 5.0), (30.0, 40.0), (15.0, 20.0)]);
    let bounds = trace.bounding_box().unwrap();
    rp.compare_values(10.0, bounds.min_x, 0.001);
    rp.compare_values(5.0, bounds.min_y, 0.001);
    rp.compare_values(30.0, bounds.max_x, 0.001);
    rp.compare_values(40.0, bounds.max_y, 0.001);
    rp.compare_values(20.0, bounds.width(), 0.001);
    rp.compare_values(35.0, bounds.height(), 0.001);

    // --- Test 3: Centroid and center of mass of a square ---
    let square = line(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let centroid = square.centroid().unwrap();
    rp.compare_values(5.0, centroid.x, 0.001);
    rp.compare_values(5.0, centroid.y, 0.001);
    let com = square.center_of_mass().unwrap();
    rp.compare_values(5.0, com.x, 0.001);
    rp.compare_values(5.0, com.y, 0.001);

    // --- Test 4: Translate and scale ---
    let mut moved = line(&[(10.0, 20.0), (30.0, 40.0)]);
    moved.translate(Point::new(5.0, -5.0));
    rp.compare_values(15.0, moved.get(0).unwrap().x, 0.001);
    rp.compare_values(15.0, moved.get(0).unwrap().y, 0.001);
    moved.scale(Point::new(2.0, 3.0));
    rp.compare_values(70.0, moved.get(1).unwrap().x, 0.001);
    rp.compare_values(105.0, moved.get(1).unwrap().y, 0.001);

    // --- Test 5: Outermost points ---
    let trace = line(&[(3.0, 1.0), (-2.0, 5.0), (8.0, 2.0)]);
    rp.compare_values(-2.0, trace.outer_left().unwrap().x, 0.0);
    rp.compare_values(8.0, trace.outer_right().unwrap().x, 0.0);

    // --- Test 6: Minimum distance between traces ---
    let a = line(&[(0.0, 0.0), (1.0, 0.0)]);
    let b = line(&[(1.0, 4.0), (4.0, 4.0)]);
    rp.compare_values(4.0, Trace::minimum_distance(&a, &b).unwrap(), 0.001);

    // --- Test 7: Group geometry and sub-groups ---
    let group = TraceGroup::from_traces(vec![
        line(&[(0.0, 0.0), (4.0, 0.0)]),
        line(&[(0.0, 2.0), (4.0, 2.0)]),
    ]);
    rp.compare_values(8.0, group.area().unwrap(), 0.001);
    let sub = group.sub_group(&[1]).unwrap();
    rp.compare_values(1.0, sub.len() as f64, 0.0);
    rp.compare_bool(group.sub_group(&[5]).is_err(), "sub_group out of range");

    // --- Test 8: Group minimum distance ---
    let left = group.sub_group(&[0]).unwrap();
    let right = group.sub_group(&[1]).unwrap();
    rp.compare_values(
        2.0,
        TraceGroup::minimum_distance(&left, &right).unwrap(),
        0.001,
    );

    // --- Test 9: Empty geometry is an error, not a crash ---
    rp.compare_bool(Trace::new().bounding_box().is_none(), "empty trace bbox");
    rp.compare_bool(
        TraceGroup::new().bounding_box().is_none(),
        "empty group bbox",
    );
    rp.compare_bool(
        TraceGroup::minimum_distance(&TraceGroup::new(), &group).is_err(),
        "empty group distance errors",
    );

    assert!(rp.cleanup());
}
