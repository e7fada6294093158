//! Grammar parsing regression test
//!
//! Builds symbol arenas directly (bypassing segmentation) and checks
//! the structural relations and TeX output of the geometrical grammar.

use scrawl_core::{Point, Trace, TraceGroup};
use scrawl_engine::{GrammarParser, Label, Symbol, SymbolArena, serialize};
use scrawl_test::RegParams;

fn symbol(label: Label, min: (f64, f64), max: (f64, f64)) -> Symbol {
    let trace: Trace = [Point::new(min.0, min.1), Point::new(max.0, max.1)]
        .into_iter()
        .collect();
    Symbol::new(label, TraceGroup::from_traces(vec![trace]), 0.9).unwrap()
}

#[test]
fn parse_reg() {
    let mut rp = RegParams::new("parse");
    let mut parser = GrammarParser::new();

    // --- Test 1: two digits chain on the baseline ---
    let mut arena = SymbolArena::from_symbols(vec![
        symbol(Label::Two, (0.0, 0.0), (4.0, 8.0)),
        symbol(Label::Three, (6.0, 0.0), (10.0, 8.0)),
    ]);
    parser.parse(&mut arena).unwrap();
    rp.compare_strings("23", &serialize(&arena));
    let ids = arena.ids();
    rp.compare_bool(
        arena.get(ids[0]).next() == Some(ids[1]),
        "baseline successor linked",
    );
    rp.compare_bool(
        arena.iter().all(|s| s.parent().is_none()),
        "no structural links between baseline digits",
    );

    // --- Test 2: a smaller digit above-right becomes an exponent ---
    let mut arena = SymbolArena::from_symbols(vec![
        symbol(Label::Seven, (0.0, 0.0), (6.0, 10.0)),
        symbol(Label::Two, (7.0, 11.0), (9.0, 14.0)),
    ]);
    parser.parse(&mut arena).unwrap();
    rp.compare_strings("7^{2}", &serialize(&arena));
    let ids = arena.ids();
    rp.compare_bool(
        arena.get(ids[1]).parent() == Some(ids[0]),
        "exponent parented to base",
    );

    // --- Test 3: an equally sized digit does not attach ---
    let mut arena = SymbolArena::from_symbols(vec![
        symbol(Label::Seven, (0.0, 0.0), (6.0, 10.0)),
        symbol(Label::Two, (7.0, 11.0), (13.0, 21.0)),
    ]);
    parser.parse(&mut arena).unwrap();
    rp.compare_bool(
        arena.iter().all(|s| s.parent().is_none()),
        "oversized candidate rejected",
    );

    // --- Test 4: variable with exponent and index ---
    let mut arena = SymbolArena::from_symbols(vec![
        symbol(Label::LowerX, (0.0, 0.0), (6.0, 10.0)),
        symbol(Label::Two, (7.0, 11.0), (9.0, 14.0)),
        symbol(Label::One, (7.0, -4.0), (9.0, -1.0)),
    ]);
    parser.parse(&mut arena).unwrap();
    rp.compare_strings("x^{2}_{1}", &serialize(&arena));

    // --- Test 5: fraction through the between-symbol reroute ---
    let mut arena = SymbolArena::from_symbols(vec![
        symbol(Label::FractionLine, (0.0, 5.0), (10.0, 5.0)),
        symbol(Label::One, (4.0, 7.0), (6.0, 11.0)),
        symbol(Label::Two, (4.0, -1.0), (6.0, 3.0)),
    ]);
    parser.parse(&mut arena).unwrap();
    rp.compare_strings("\\frac{1}{2}", &serialize(&arena));

    // --- Test 6: lone horizontal bar collapses to minus ---
    let mut arena = SymbolArena::from_symbols(vec![symbol(
        Label::HorizontalLine,
        (0.0, 5.0),
        (10.0, 5.0),
    )]);
    parser.parse(&mut arena).unwrap();
    rp.compare_strings("-", &serialize(&arena));

    // --- Test 7: horizontal bar with arguments becomes a fraction ---
    let mut arena = SymbolArena::from_symbols(vec![
        symbol(Label::HorizontalLine, (0.0, 5.0), (10.0, 5.0)),
        symbol(Label::One, (4.0, 7.0), (6.0, 11.0)),
        symbol(Label::Two, (4.0, -1.0), (6.0, 3.0)),
    ]);
    parser.parse(&mut arena).unwrap();
    rp.compare_strings("\\frac{1}{2}", &serialize(&arena));

    // --- Test 8: root content with a baseline successor ---
    let mut arena = SymbolArena::from_symbols(vec![
        symbol(Label::SquareRoot, (0.0, 0.0), (10.0, 10.0)),
        symbol(Label::Three, (3.0, 2.0), (5.0, 6.0)),
        symbol(Label::Plus, (12.0, 3.0), (16.0, 7.0)),
        symbol(Label::Two, (18.0, 0.0), (22.0, 8.0)),
    ]);
    parser.parse(&mut arena).unwrap();
    rp.compare_strings("\\sqrt{3}+2", &serialize(&arena));
    let ids = arena.ids();
    rp.compare_bool(
        arena.get(ids[0]).next() == Some(ids[2]),
        "plus chains off the root",
    );
    rp.compare_bool(
        arena.get(ids[1]).next().is_none(),
        "root content does not claim the successor",
    );

    // --- Test 9: parsing is idempotent across re-parses ---
    parser.parse(&mut arena).unwrap();
    rp.compare_strings("\\sqrt{3}+2", &serialize(&arena));

    // --- Test 10: empty arena serializes to the empty string ---
    rp.compare_strings("", &serialize(&SymbolArena::new()));

    assert!(rp.cleanup());
}
