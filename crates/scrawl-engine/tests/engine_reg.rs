//! End-to-end engine regression test
//!
//! Runs the full pipeline - segmentation, classification (stubbed by
//! cluster geometry), structural parsing, serialization - including
//! the incremental append / remove surface.

use scrawl_core::{Point, Trace, TraceGroup};
use scrawl_engine::{Classification, Engine, EngineResult, Label};
use scrawl_test::RegParams;

fn stroke(points: &[(f64, f64)]) -> Trace {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// A geometric stub classifier: clusters are recognized by stroke
/// count and bounding box against a fixed table; everything else is
/// low-confidence noise.
#[derive(Clone)]
struct StubEntry {
    strokes: usize,
    bounds: (f64, f64, f64, f64),
    label: Label,
    confidence: f64,
}

fn table_stub(
    entries: Vec<StubEntry>,
) -> impl FnMut(&TraceGroup, Option<&TraceGroup>) -> EngineResult<Classification> {
    move |cluster: &TraceGroup, _context: Option<&TraceGroup>| {
        if let Some(bounds) = cluster.bounding_box() {
            for entry in &entries {
                let (min_x, min_y, max_x, max_y) = entry.bounds;
                if cluster.len() == entry.strokes
                    && (bounds.min_x - min_x).abs() < 0.26
                    && (bounds.min_y - min_y).abs() < 0.26
                    && (bounds.max_x - max_x).abs() < 0.26
                    && (bounds.max_y - max_y).abs() < 0.26
                {
                    return Ok(Classification {
                        label: entry.label,
                        confidence: entry.confidence,
                    });
                }
            }
        }
        Ok(Classification {
            label: Label::Plus,
            confidence: 0.1,
        })
    }
}

fn entry(
    strokes: usize,
    bounds: (f64, f64, f64, f64),
    label: Label,
    confidence: f64,
) -> StubEntry {
    StubEntry {
        strokes,
        bounds,
        label,
        confidence,
    }
}

#[test]
fn engine_reg() {
    let mut rp = RegParams::new("engine");

    // --- Test 1: empty expression recognizes to the empty string ---
    let mut engine = Engine::new(table_stub(Vec::new()));
    rp.compare_strings("", &engine.recognize(&TraceGroup::new()).unwrap());
    rp.compare_values(0.0, engine.symbol_count() as f64, 0.0);

    // --- Test 2: two adjacent digits form the baseline "23" ---
    let two = stroke(&[(0.0, 0.0), (2.0, 8.0)]);
    let three = stroke(&[(20.0, 0.0), (22.0, 8.0)]);
    let mut engine = Engine::new(table_stub(vec![
        entry(1, (0.0, 0.0, 2.0, 8.0), Label::Two, 0.9),
        entry(1, (20.0, 0.0, 22.0, 8.0), Label::Three, 0.9),
    ]));
    let expression = TraceGroup::from_traces(vec![two.clone(), three.clone()]);
    rp.compare_strings("23", &engine.recognize(&expression).unwrap());
    rp.compare_values(2.0, engine.symbol_count() as f64, 0.0);
    rp.compare_bool(
        engine.symbols().all(|s| s.parent().is_none()),
        "baseline digits carry no child links",
    );

    // --- Test 3: a small high stroke attaches as an exponent ---
    let base = stroke(&[(0.0, 0.0), (6.0, 10.0)]);
    let exponent = stroke(&[(8.0, 12.0), (10.0, 15.0)]);
    let mut engine = Engine::new(table_stub(vec![
        entry(1, (0.0, 0.0, 6.0, 10.0), Label::Seven, 0.9),
        entry(1, (8.0, 12.0, 10.0, 15.0), Label::Two, 0.9),
    ]));
    let expression = TraceGroup::from_traces(vec![base.clone(), exponent.clone()]);
    rp.compare_strings("7^{2}", &engine.recognize(&expression).unwrap());

    // --- Test 4: append extends the baseline ---
    let mut engine = Engine::new(table_stub(vec![
        entry(1, (0.0, 0.0, 2.0, 8.0), Label::Two, 0.9),
        entry(1, (20.0, 0.0, 22.0, 8.0), Label::Three, 0.9),
    ]));
    let first = TraceGroup::from_traces(vec![two.clone()]);
    rp.compare_strings("2", &engine.recognize(&first).unwrap());
    let added = TraceGroup::from_traces(vec![three.clone()]);
    rp.compare_strings("23", &engine.append(&added).unwrap());
    rp.compare_values(2.0, engine.symbol_count() as f64, 0.0);

    // --- Test 5: removing a symbol's strokes drops the symbol ---
    let erased = TraceGroup::from_traces(vec![three.clone()]);
    rp.compare_strings("2", &engine.remove(&erased).unwrap());
    rp.compare_values(1.0, engine.symbol_count() as f64, 0.0);
    rp.compare_bool(
        engine
            .symbols()
            .all(|s| s.parent().is_none() && s.next().is_none() && s.previous().is_none()),
        "no dangling links after removal",
    );

    // --- Test 6: root content and baseline successor end to end ---
    let root = stroke(&[(0.0, 2.0), (2.0, 0.0), (4.0, 10.0), (9.0, 10.0)]);
    let inner = stroke(&[(5.0, 3.0), (7.0, 4.0), (5.0, 5.0)]);
    let plus = stroke(&[(12.0, 5.0), (16.0, 5.0), (14.0, 3.0), (14.0, 7.0)]);
    let tail = stroke(&[(18.0, 8.0), (22.0, 8.0), (18.0, 0.0), (22.0, 0.0)]);
    let mut engine = Engine::new(table_stub(vec![
        entry(1, (0.0, 0.0, 9.0, 10.0), Label::SquareRoot, 0.9),
        entry(1, (5.0, 3.0, 7.0, 5.0), Label::Three, 0.9),
        entry(1, (12.0, 3.0, 16.0, 7.0), Label::Plus, 0.9),
        entry(1, (18.0, 0.0, 22.0, 8.0), Label::Two, 0.9),
    ]));
    let expression = TraceGroup::from_traces(vec![root, inner, plus, tail]);
    rp.compare_strings("\\sqrt{3}+2", &engine.recognize(&expression).unwrap());

    // --- Test 7: a lone bar is a minus until arguments arrive ---
    let bar = stroke(&[(0.0, 5.0), (10.0, 5.0)]);
    let numerator = stroke(&[(5.0, 7.0), (5.0, 11.0)]);
    let denominator = stroke(&[(5.0, -1.0), (5.0, 3.0)]);
    let mut engine = Engine::new(table_stub(vec![
        entry(1, (0.0, 5.0, 10.0, 5.0), Label::HorizontalLine, 0.9),
        entry(1, (5.0, 7.0, 5.0, 11.0), Label::One, 0.9),
        entry(1, (5.0, -1.0, 5.0, 3.0), Label::Two, 0.9),
    ]));
    let lone = TraceGroup::from_traces(vec![bar.clone()]);
    rp.compare_strings("-", &engine.recognize(&lone).unwrap());
    let arguments = TraceGroup::from_traces(vec![numerator, denominator]);
    rp.compare_strings("\\frac{1}{2}", &engine.append(&arguments).unwrap());

    // --- Test 8: a second bar completes an equals sign on append ---
    let upper = stroke(&[(0.0, 5.0), (10.0, 5.0)]);
    let lower = stroke(&[(0.0, 0.0), (10.0, 0.0)]);
    let mut engine = Engine::new(table_stub(vec![
        entry(1, (0.0, 5.0, 10.0, 5.0), Label::HorizontalLine, 0.9),
        entry(1, (0.0, 0.0, 10.0, 0.0), Label::HorizontalLine, 0.9),
        entry(2, (0.0, 0.0, 10.0, 5.0), Label::Equals, 0.95),
    ]));
    let first = TraceGroup::from_traces(vec![upper.clone()]);
    rp.compare_strings("-", &engine.recognize(&first).unwrap());
    let second = TraceGroup::from_traces(vec![lower.clone()]);
    rp.compare_strings("=", &engine.append(&second).unwrap());
    rp.compare_values(1.0, engine.symbol_count() as f64, 0.0);

    // --- Test 9: reset forgets everything ---
    engine.reset();
    rp.compare_strings("", &engine.to_tex());
    rp.compare_values(0.0, engine.symbol_count() as f64, 0.0);

    assert!(rp.cleanup());
}
